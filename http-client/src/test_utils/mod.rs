use super::{ConvertError, Converter, Payload};
use rivet_http::{
    Connector, HttpCaller, Request as HttpRequest, Response as HttpResponse, ResponseError as HttpResponseError,
    ResponseErrorKind as HttpResponseErrorKind, ResponseResult, TransportOptions,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering::SeqCst},
    Arc, Mutex,
};

#[derive(Debug, Clone)]
enum Step {
    Status(u16, Vec<u8>),
    TransportError(HttpResponseErrorKind),
}

/// 按照脚本依次返回响应的 HTTP 请求处理函数
///
/// 脚本执行完毕后重复最后一步
#[derive(Debug, Default)]
pub(crate) struct ScriptedCaller {
    steps: Vec<Step>,
    attempts: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedCaller {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn status(mut self, status_code: u16, body: impl AsRef<[u8]>) -> Self {
        self.steps.push(Step::Status(status_code, body.as_ref().to_vec()));
        self
    }

    pub(crate) fn transport_error(mut self, kind: HttpResponseErrorKind) -> Self {
        self.steps.push(Step::TransportError(kind));
        self
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().to_owned()
    }
}

impl HttpCaller for ScriptedCaller {
    fn call(&self, request: &HttpRequest) -> ResponseResult {
        let index = self.attempts.fetch_add(1, SeqCst);
        self.requests.lock().unwrap().push(request.to_owned());
        match self.steps.get(index).or_else(|| self.steps.last()) {
            Some(Step::Status(status_code, body)) => Ok(HttpResponse::builder()
                .status_code(*status_code)
                .body(body.to_owned())
                .build()),
            Some(Step::TransportError(kind)) => Err(HttpResponseError::builder_with_msg(*kind, "scripted failure")
                .url(request.url())
                .build()),
            None => Ok(HttpResponse::default()),
        }
    }
}

/// 记录构建次数的连接器，所有构建出的请求处理函数共享同一个 [`ScriptedCaller`]
#[derive(Debug)]
pub(crate) struct FakeConnector {
    caller: Option<Arc<ScriptedCaller>>,
    connects: AtomicUsize,
    last_options: Mutex<Option<TransportOptions>>,
}

impl FakeConnector {
    pub(crate) fn new(caller: ScriptedCaller) -> Self {
        Self {
            caller: Some(Arc::new(caller)),
            connects: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            caller: None,
            connects: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub(crate) fn caller(&self) -> &ScriptedCaller {
        self.caller.as_deref().unwrap()
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(SeqCst)
    }

    pub(crate) fn last_options(&self) -> Option<TransportOptions> {
        *self.last_options.lock().unwrap()
    }
}

impl Connector for FakeConnector {
    type Caller = Arc<ScriptedCaller>;

    fn connect(&self, options: &TransportOptions) -> Result<Self::Caller, HttpResponseError> {
        self.connects.fetch_add(1, SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);
        self.caller.to_owned().ok_or_else(|| {
            HttpResponseError::builder_with_msg(HttpResponseErrorKind::LocalIoError, "connector is broken").build()
        })
    }
}

/// 解析响应时总是 panic 的转换器
#[derive(Debug)]
pub(crate) struct PanickingConverter;

impl Converter for PanickingConverter {
    fn convert_request(&self, _body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        Ok(Vec::new())
    }

    fn convert_response(&self, _raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        panic!("converter is broken")
    }

    fn content_type(&self) -> Option<&str> {
        None
    }

    fn accept(&self) -> Option<&str> {
        None
    }
}
