use super::{
    super::{Request, Response, ResponseError},
    convert::{exhausted_response, interpret_response, make_http_request, unexpected_status_code_error},
    Backoff, RetriedStatsInfo, RetryPolicy,
};
use log::{error, warn};
use rivet_http::{HttpCaller, HttpStatus};
use std::thread::sleep;

/// 在当前线程上阻塞执行请求
///
/// 最多尝试 `retry_count + 1` 次，可重试的状态码在重试前阻塞等待退避时长，
/// 传输层错误立即重试
pub(super) fn call(caller: &dyn HttpCaller, request: &Request, policy: &RetryPolicy, backoff: &dyn Backoff) -> Response {
    let http_request = match make_http_request(request) {
        Ok(http_request) => http_request,
        Err(err) => {
            error!("failed to build request: {}", err);
            return Response::failed(err);
        }
    };
    let mut attempts_remaining = policy.retry_count();
    let mut retried = RetriedStatsInfo::default();

    loop {
        let (code, headers, body) = match caller.call(&http_request) {
            Ok(http_response) => http_response.into_parts(),
            Err(err) if attempts_remaining > 0 => {
                attempts_remaining -= 1;
                retried.increase_on_transport_error();
                warn!(
                    "{} {} failed: {}, {} attempts remaining",
                    http_request.method(),
                    http_request.url(),
                    err,
                    attempts_remaining
                );
                continue;
            }
            Err(err) => {
                error!("{} {} failed: {}", http_request.method(), http_request.url(), err);
                return Response::failed(ResponseError::from(err).retried(&retried));
            }
        };

        let status = match HttpStatus::from_code(code) {
            Some(status) => status,
            None => return Response::failed(unexpected_status_code_error(request, code).retried(&retried)),
        };
        if !policy.is_retryable(status) {
            return interpret_response(request, status, headers, &body);
        }
        if attempts_remaining == 0 {
            error!(
                "{} {} retries exhausted on status {}",
                http_request.method(),
                http_request.url(),
                status
            );
            return exhausted_response(request, status, headers, &body);
        }

        attempts_remaining -= 1;
        retried.increase_on_status();
        let delay = backoff.time(&retried);
        warn!(
            "{} {} returned {}, retry in {:?}, {} attempts remaining",
            http_request.method(),
            http_request.url(),
            status,
            delay,
            attempts_remaining
        );
        sleep(delay);
    }
}
