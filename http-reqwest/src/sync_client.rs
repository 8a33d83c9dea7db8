use anyhow::Error as AnyError;
use reqwest::{
    blocking::{Client as SyncReqwestClient, RequestBuilder as SyncReqwestRequestBuilder, Response as SyncReqwestResponse},
    header::HeaderMap,
    Error as ReqwestError, Method as ReqwestMethod,
};
use rivet_http::{
    Connector as ConnectorTrait, Headers, HttpCaller, Method, Request, Response, ResponseError, ResponseErrorKind,
    ResponseResult, TransportOptions,
};

/// Reqwest 阻塞客户端
///
/// 不能在异步运行时的上下文中创建或销毁
#[derive(Debug, Clone, Default)]
pub struct SyncClient {
    sync_client: SyncReqwestClient,
}

impl SyncClient {
    /// 创建 Reqwest 阻塞客户端
    #[inline]
    pub fn new(sync_client: SyncReqwestClient) -> Self {
        Self { sync_client }
    }

    /// 根据传输层选项创建 Reqwest 阻塞客户端
    ///
    /// Reqwest 阻塞客户端只支持整体超时，读取超时与写入超时之和将作为请求的整体超时时长
    pub fn with_options(options: &TransportOptions) -> Result<Self, ResponseError> {
        SyncReqwestClient::builder()
            .connect_timeout(options.connect_timeout())
            .timeout(options.read_timeout() + options.write_timeout())
            .pool_max_idle_per_host(options.pool_max_idle())
            .pool_idle_timeout(options.pool_keep_alive())
            .build()
            .map(Self::new)
            .map_err(|err| ResponseError::builder(ResponseErrorKind::LocalIoError, err).build())
    }
}

impl From<SyncReqwestClient> for SyncClient {
    #[inline]
    fn from(sync_client: SyncReqwestClient) -> Self {
        Self::new(sync_client)
    }
}

impl HttpCaller for SyncClient {
    fn call(&self, request: &Request) -> ResponseResult {
        let reqwest_request = make_sync_reqwest_request(&self.sync_client, request);
        match reqwest_request.send() {
            Ok(reqwest_response) => from_sync_response(reqwest_response, request),
            Err(err) => Err(from_reqwest_error(err, request)),
        }
    }
}

/// Reqwest 连接器
///
/// 每次连接都会根据传输层选项构建新的 [`SyncClient`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Connector;

impl ConnectorTrait for Connector {
    type Caller = SyncClient;

    #[inline]
    fn connect(&self, options: &TransportOptions) -> Result<Self::Caller, ResponseError> {
        SyncClient::with_options(options)
    }
}

fn make_sync_reqwest_request(client: &SyncReqwestClient, request: &Request) -> SyncReqwestRequestBuilder {
    let mut request_builder = client.request(to_reqwest_method(request.method()), request.url());
    for (header_name, header_value) in request.headers() {
        request_builder = request_builder.header(header_name, header_value);
    }
    if let Some(body) = request.body() {
        request_builder = request_builder.body(body.to_vec());
    }
    request_builder
}

fn to_reqwest_method(method: Method) -> ReqwestMethod {
    match method {
        Method::GET => ReqwestMethod::GET,
        Method::POST => ReqwestMethod::POST,
        Method::PUT => ReqwestMethod::PUT,
        Method::DELETE => ReqwestMethod::DELETE,
        Method::PATCH => ReqwestMethod::PATCH,
        Method::HEAD => ReqwestMethod::HEAD,
    }
}

fn from_sync_response(response: SyncReqwestResponse, request: &Request) -> ResponseResult {
    let status_code = response.status().as_u16();
    let headers = from_header_map(response.headers(), request)?;
    let body = response.bytes().map_err(|err| {
        let kind = if err.is_timeout() {
            ResponseErrorKind::TimeoutError
        } else {
            ResponseErrorKind::ReceiveError
        };
        ResponseError::builder(kind, err).url(request.url()).build()
    })?;
    Ok(Response::builder()
        .status_code(status_code)
        .headers(headers)
        .body(body.to_vec())
        .build())
}

fn from_header_map(header_map: &HeaderMap, request: &Request) -> Result<Headers, ResponseError> {
    let mut headers = Headers::new();
    for header_name in header_map.keys() {
        let values = header_map
            .get_all(header_name)
            .iter()
            .map(|value| value.to_str())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                ResponseError::builder(ResponseErrorKind::InvalidHeader, err)
                    .url(request.url())
                    .build()
            })?;
        headers.insert_values(header_name.as_str(), values);
    }
    Ok(headers)
}

fn from_reqwest_error(err: ReqwestError, request: &Request) -> ResponseError {
    let kind = if err.is_timeout() {
        ResponseErrorKind::TimeoutError
    } else if err.is_connect() {
        ResponseErrorKind::ConnectError
    } else if err.is_redirect() {
        ResponseErrorKind::TooManyRedirect
    } else if err.is_builder() {
        ResponseErrorKind::InvalidUrl
    } else if err.is_request() {
        ResponseErrorKind::SendError
    } else {
        ResponseErrorKind::UnknownError
    };
    ResponseError::builder(kind, AnyError::new(err))
        .url(request.url())
        .build()
}
