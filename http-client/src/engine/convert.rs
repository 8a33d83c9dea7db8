use super::super::{Request, Response, ResponseError, ResponseErrorKind};
use log::debug;
use rivet_http::{Headers, HttpStatus, Method, Request as HttpRequest};

/// 将逻辑请求转换为传输层请求
///
/// `GET` 与 `HEAD` 请求不携带请求体，`DELETE` 请求在请求体为空时也不携带请求体
pub(super) fn make_http_request(request: &Request) -> Result<HttpRequest, ResponseError> {
    let url = request.endpoint_url().ok_or_else(|| {
        ResponseError::new_with_msg(ResponseErrorKind::SerializeRequestError, "request url is not set")
    })?;
    let mut builder = HttpRequest::builder();
    builder
        .method(request.method())
        .url(url.to_owned())
        .headers(request.headers().to_owned());
    match request.method() {
        Method::GET | Method::HEAD => {}
        method => {
            let body = request
                .converter()
                .convert_request(request.body())
                .map_err(|err| {
                    ResponseError::new(ResponseErrorKind::SerializeRequestError, err).url(Some(url.to_owned()))
                })?;
            if !(method == Method::DELETE && body.is_empty()) {
                builder.body(body);
            }
        }
    }
    Ok(builder.build())
}

/// 将收到的响应体转换为逻辑响应
///
/// 错误状态码且声明了错误载荷类型时，载荷放入错误载荷中，否则放入响应载荷中
pub(super) fn interpret_response(request: &Request, status: HttpStatus, headers: Headers, body: &[u8]) -> Response {
    match request.converter().convert_response(Some(body)) {
        Ok(payload) => {
            let response = Response::new(status, headers);
            if status.has_error() && request.error_type().is_some() {
                response.with_error(payload)
            } else {
                response.with_body(payload)
            }
        }
        Err(err) => Response::failed(
            ResponseError::new(ResponseErrorKind::ParseResponseError, err).url(request.endpoint_url()),
        ),
    }
}

/// 构建重试次数耗尽的逻辑响应
///
/// 保留最后一次的状态码，声明了错误载荷类型时尽量将响应体转换为错误载荷
pub(super) fn exhausted_response(request: &Request, status: HttpStatus, headers: Headers, body: &[u8]) -> Response {
    let error = request.error_type().and_then(|_| {
        request
            .converter()
            .convert_response(Some(body))
            .unwrap_or_else(|err| {
                debug!("failed to parse the body of exhausted response: {}", err);
                None
            })
    });
    Response::new(status, headers)
        .with_error(error)
        .with_exception(status_code_error(request, status))
}

pub(super) fn status_code_error(request: &Request, status: HttpStatus) -> ResponseError {
    ResponseError::new_with_msg(
        ResponseErrorKind::StatusCodeError(status),
        format!("retries exhausted on status {}", status),
    )
    .url(request.endpoint_url())
}

pub(super) fn unexpected_status_code_error(request: &Request, code: u16) -> ResponseError {
    ResponseError::new_with_msg(
        ResponseErrorKind::UnexpectedStatusCode(code),
        format!("unrecognized status code {}", code),
    )
    .url(request.endpoint_url())
}
