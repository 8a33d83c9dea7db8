use super::{
    super::{Request, Response, ResponseError, ResponseErrorKind},
    convert::{interpret_response, make_http_request, status_code_error, unexpected_status_code_error},
    dispatcher::{Job, Submitter},
    RetriedStatsInfo, RetryPolicy,
};
use log::{error, warn};
use rivet_http::{HttpCaller, HttpStatus, Request as HttpRequest};
use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

pub(super) type Callback = Box<dyn FnOnce(Response) + Send + 'static>;

/// 在工作线程池中执行的请求
///
/// 每个请求持有独立的重试计数器以及提交时的重试策略快照，
/// 重试时以相同的任务重新进入队列
pub(crate) struct AsyncCall {
    caller: Arc<dyn HttpCaller>,
    request: Request,
    http_request: Result<HttpRequest, ResponseError>,
    policy: Arc<RetryPolicy>,
    retries_left: usize,
    retried: RetriedStatsInfo,
    callback: Callback,
    submitter: Submitter<AsyncCall>,
}

impl AsyncCall {
    pub(super) fn new(
        caller: Arc<dyn HttpCaller>,
        request: Request,
        policy: Arc<RetryPolicy>,
        callback: Callback,
        submitter: Submitter<AsyncCall>,
    ) -> Self {
        Self {
            http_request: make_http_request(&request),
            retries_left: policy.retry_count(),
            retried: Default::default(),
            caller,
            request,
            policy,
            callback,
            submitter,
        }
    }

    /// 交付终结的响应，回调只会被调用一次
    pub(super) fn deliver(self, response: Response) {
        (self.callback)(response)
    }

    pub(super) fn reject(self) {
        error!("worker queue rejected the request to {:?}", self.request.url());
        let err = ResponseError::new_with_msg(ResponseErrorKind::SystemCallError, "worker queue rejected the request")
            .url(self.request.endpoint_url())
            .retried(&self.retried);
        self.deliver(Response::failed(err))
    }

    // 先减少计数器，计数器仍为正数时才重试
    fn should_retry(&mut self) -> bool {
        self.retries_left = self.retries_left.saturating_sub(1);
        self.retries_left > 0
    }

    pub(super) fn url(&self) -> Option<&str> {
        self.request.url()
    }

    fn resubmit(self) {
        let submitter = self.submitter.to_owned();
        if let Err(call) = submitter.submit(self) {
            call.reject();
        }
    }

    fn fail_to_build(self) {
        if let Err(err) = self.http_request {
            error!("failed to build request: {}", err);
            (self.callback)(Response::failed(err));
        }
    }
}

impl Job for AsyncCall {
    fn run(mut self) {
        let result = match &self.http_request {
            Ok(http_request) => self.caller.call(http_request),
            Err(_) => return self.fail_to_build(),
        };
        let (code, headers, body) = match result {
            Ok(http_response) => http_response.into_parts(),
            Err(err) => {
                if self.should_retry() {
                    self.retried.increase_on_transport_error();
                    warn!(
                        "{:?} failed: {}, resubmitted with {} retries left",
                        self.request.url(),
                        err,
                        self.retries_left
                    );
                    return self.resubmit();
                }
                error!("{:?} failed: {}", self.request.url(), err);
                let err = ResponseError::from(err).retried(&self.retried);
                return self.deliver(Response::failed(err));
            }
        };

        let status = match HttpStatus::from_code(code) {
            Some(status) => status,
            None => {
                let err = unexpected_status_code_error(&self.request, code).retried(&self.retried);
                return self.deliver(Response::failed(err));
            }
        };
        if self.policy.is_retryable(status) {
            if self.should_retry() {
                self.retried.increase_on_status();
                warn!(
                    "{:?} returned {}, resubmitted with {} retries left",
                    self.request.url(),
                    status,
                    self.retries_left
                );
                return self.resubmit();
            }
            error!("{:?} retries exhausted on status {}", self.request.url(), status);
            let err = status_code_error(&self.request, status).retried(&self.retried);
            return self.deliver(Response::new(status, headers).with_exception(err));
        }

        let request = &self.request;
        let response = catch_unwind(AssertUnwindSafe(|| interpret_response(request, status, headers, &body)))
            .unwrap_or_else(|_| {
                error!("converter panicked while parsing the response of {:?}", request.url());
                Response::failed(
                    ResponseError::new_with_msg(ResponseErrorKind::ParseResponseError, "converter panicked")
                        .url(request.endpoint_url()),
                )
            });
        self.deliver(response)
    }
}

impl fmt::Debug for AsyncCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncCall")
            .field("request", &self.request)
            .field("retries_left", &self.retries_left)
            .field("retried", &self.retried)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{
            super::{test_utils::ScriptedCaller, ConverterRegistry, PayloadType},
            dispatcher::{Dispatcher, DispatcherOptions},
        },
        *,
    };
    use crossbeam_channel::{bounded, Receiver};
    use rivet_http::ResponseErrorKind as HttpResponseErrorKind;
    use serde_json::json;
    use std::{error::Error, time::Duration};

    fn run_async(caller: Arc<ScriptedCaller>, request: Request, retry_count: usize) -> Receiver<Response> {
        let dispatcher = Dispatcher::<AsyncCall>::start(&DispatcherOptions::default()).unwrap();
        let (tx, rx) = bounded(1);
        let call = AsyncCall::new(
            caller,
            request,
            Arc::new(RetryPolicy::new(retry_count, RetryPolicy::DEFAULT_RETRY_STATUSES)),
            Box::new(move |response| tx.send(response).unwrap()),
            dispatcher.submitter(),
        );
        dispatcher.submit(call).ok().unwrap();
        rx
    }

    fn get_json() -> Result<Request, Box<dyn Error>> {
        Ok(
            Request::builder(&ConverterRegistry::default(), PayloadType::Empty, PayloadType::Json)?
                .url("http://localhost/items")
                .build(),
        )
    }

    #[test]
    fn test_async_success() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let caller = Arc::new(ScriptedCaller::new().status(200, br#"[1,2,3]"#));
        let response = run_async(caller.to_owned(), get_json()?, 3).recv_timeout(Duration::from_secs(5))?;
        assert_eq!(response.status(), HttpStatus::Ok);
        assert_eq!(response.body(), Some(&json!([1, 2, 3]).into()));
        assert_eq!(caller.attempts(), 1);
        Ok(())
    }

    #[test]
    fn test_async_retryable_status_skips_conversion() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let caller = Arc::new(ScriptedCaller::new().status(429, br#"{"error":"slow down"}"#));
        let response = run_async(caller.to_owned(), get_json()?, 3).recv_timeout(Duration::from_secs(5))?;
        assert_eq!(caller.attempts(), 3);
        assert_eq!(response.status(), HttpStatus::TooManyRequests);
        assert!(response.body().is_none());
        assert!(response.error().is_none());
        assert_eq!(
            response.exception().map(|err| err.kind()),
            Some(ResponseErrorKind::StatusCodeError(HttpStatus::TooManyRequests))
        );
        Ok(())
    }

    #[test]
    fn test_async_zero_retries_attempts_once() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let caller = Arc::new(ScriptedCaller::new().transport_error(HttpResponseErrorKind::ConnectError));
        let response = run_async(caller.to_owned(), get_json()?, 0).recv_timeout(Duration::from_secs(5))?;
        assert_eq!(caller.attempts(), 1);
        assert_eq!(response.status(), HttpStatus::RequestFailed);
        assert_eq!(
            response.exception().map(|err| err.kind()),
            Some(ResponseErrorKind::HttpError(HttpResponseErrorKind::ConnectError))
        );
        Ok(())
    }

    #[test]
    fn test_async_recovers_after_transport_error() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let caller = Arc::new(
            ScriptedCaller::new()
                .transport_error(HttpResponseErrorKind::TimeoutError)
                .status(200, br#"{"ok":true}"#),
        );
        let response = run_async(caller.to_owned(), get_json()?, 3).recv_timeout(Duration::from_secs(5))?;
        assert_eq!(caller.attempts(), 2);
        assert_eq!(response.body(), Some(&json!({"ok": true}).into()));
        Ok(())
    }

    #[test]
    fn test_async_converter_panic_is_caught() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let registry = ConverterRegistry::empty();
        registry.register(PayloadType::Empty, PayloadType::Json, super::super::super::test_utils::PanickingConverter);
        let request = Request::builder(&registry, PayloadType::Empty, PayloadType::Json)?
            .url("http://localhost/items")
            .build();
        let caller = Arc::new(ScriptedCaller::new().status(200, b"{}"));
        let response = run_async(caller, request, 3).recv_timeout(Duration::from_secs(5))?;
        assert_eq!(response.status(), HttpStatus::RequestFailed);
        assert_eq!(
            response.exception().map(|err| err.kind()),
            Some(ResponseErrorKind::ParseResponseError)
        );
        Ok(())
    }
}
