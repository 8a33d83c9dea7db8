use super::super::RetriedStatsInfo;
use anyhow::Error as AnyError;
use assert_impl::assert_impl;
use rivet_http::{HttpStatus, ResponseError as HttpResponseError, ResponseErrorKind as HttpResponseErrorKind};
use std::{
    error::Error as StdError,
    fmt::{self, Debug, Display},
};

/// 响应异常类型
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 传输层错误，重试次数耗尽
    HttpError(HttpResponseErrorKind),

    /// 可重试的状态码，重试次数耗尽
    StatusCodeError(HttpStatus),

    /// 无法识别的状态码
    UnexpectedStatusCode(u16),

    /// 序列化请求载荷失败
    SerializeRequestError,

    /// 解析响应体失败
    ParseResponseError,

    /// 系统调用失败，例如工作队列拒绝了请求
    SystemCallError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpError(kind) => write!(f, "http error: {}", kind),
            Self::StatusCodeError(status) => write!(f, "status code error: {}", status),
            Self::UnexpectedStatusCode(code) => write!(f, "unexpected status code: {}", code),
            Self::SerializeRequestError => f.write_str("serialize request error"),
            Self::ParseResponseError => f.write_str("parse response error"),
            Self::SystemCallError => f.write_str("system call error"),
        }
    }
}

impl From<HttpResponseErrorKind> for ErrorKind {
    #[inline]
    fn from(kind: HttpResponseErrorKind) -> Self {
        Self::HttpError(kind)
    }
}

/// 响应异常
///
/// 表示无法恢复的请求失败，放在 [`super::Response::exception`] 中
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    error: AnyError,
    url: Option<String>,
    retried: Option<RetriedStatsInfo>,
}

impl Error {
    /// 创建响应异常
    #[inline]
    pub fn new(kind: ErrorKind, err: impl Into<AnyError>) -> Self {
        Self {
            kind,
            error: err.into(),
            url: None,
            retried: None,
        }
    }

    /// 使用错误信息创建响应异常
    #[inline]
    pub fn new_with_msg(kind: ErrorKind, msg: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self::new(kind, AnyError::msg(msg))
    }

    /// 设置请求 URL
    #[inline]
    #[must_use]
    pub fn url(mut self, url: Option<impl Into<String>>) -> Self {
        self.url = url.map(Into::into);
        self
    }

    /// 设置重试信息
    #[inline]
    #[must_use]
    pub fn retried(mut self, retried: &RetriedStatsInfo) -> Self {
        self.retried = Some(retried.to_owned());
        self
    }

    /// 获取响应异常类型
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取请求 URL
    #[inline]
    pub fn request_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// 获取重试信息
    #[inline]
    pub fn retried_stats(&self) -> Option<&RetriedStatsInfo> {
        self.retried.as_ref()
    }

    /// 转换为内部错误
    #[inline]
    pub fn into_inner(self) -> AnyError {
        self.error
    }

    #[allow(dead_code)]
    fn assert() {
        assert_impl!(Send: Self);
        assert_impl!(Sync: Self);
    }
}

impl From<HttpResponseError> for Error {
    fn from(err: HttpResponseError) -> Self {
        let url = err.url().map(ToOwned::to_owned);
        Self {
            kind: err.kind().into(),
            url,
            error: err.into_inner(),
            retried: None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(url) = &self.url {
            write!(f, "[{}]", url)?;
        }
        write!(f, " {}", self.error)
    }
}

impl StdError for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.error.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_error() {
        let http_err = HttpResponseError::builder_with_msg(HttpResponseErrorKind::ConnectError, "refused")
            .url("http://127.0.0.1:1/")
            .build();
        let mut retried = RetriedStatsInfo::default();
        retried.increase();
        let err = Error::from(http_err).retried(&retried);
        assert_eq!(err.kind(), ErrorKind::HttpError(HttpResponseErrorKind::ConnectError));
        assert_eq!(err.request_url(), Some("http://127.0.0.1:1/"));
        assert_eq!(err.retried_stats().map(|r| r.retried_total()), Some(1));
        assert_eq!(err.to_string(), "[http error: connect error][http://127.0.0.1:1/] refused");
    }

    #[test]
    fn test_status_code_error_display() {
        let err = Error::new_with_msg(ErrorKind::StatusCodeError(HttpStatus::GatewayTimeout), "retries exhausted");
        assert_eq!(err.to_string(), "[status code error: 504 Gateway Timeout] retries exhausted");
    }
}
