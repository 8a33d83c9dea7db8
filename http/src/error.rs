use anyhow::Error as AnyError;
use std::{
    error::Error as StdError,
    fmt::{self, Debug, Display},
};

/// HTTP 传输错误类型
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 非法的 URL
    InvalidUrl,

    /// 非法的 HTTP 头
    InvalidHeader,

    /// 非法的请求 / 响应错误
    InvalidRequestResponse,

    /// 网络连接失败
    ConnectError,

    /// 代理连接失败
    ProxyError,

    /// DNS 服务器连接失败
    DnsServerError,

    /// 域名解析失败
    UnknownHostError,

    /// 发送失败
    SendError,

    /// 接受失败
    ReceiveError,

    /// 本地 IO 失败
    LocalIoError,

    /// 超时失败
    TimeoutError,

    /// SSL 错误
    SslError,

    /// 重定向次数过多
    TooManyRedirect,

    /// 未知错误
    UnknownError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidUrl => "invalid url",
            Self::InvalidHeader => "invalid header",
            Self::InvalidRequestResponse => "invalid request or response",
            Self::ConnectError => "connect error",
            Self::ProxyError => "proxy error",
            Self::DnsServerError => "dns server error",
            Self::UnknownHostError => "unknown host",
            Self::SendError => "send error",
            Self::ReceiveError => "receive error",
            Self::LocalIoError => "local io error",
            Self::TimeoutError => "timeout",
            Self::SslError => "ssl error",
            Self::TooManyRedirect => "too many redirects",
            Self::UnknownError => "unknown error",
        };
        f.write_str(name)
    }
}

/// HTTP 传输错误
///
/// 表示在收到响应状态行之前传输层发生的错误
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    error: AnyError,
    url: Option<String>,
}

impl Error {
    /// 创建 HTTP 传输错误构建器
    #[inline]
    pub fn builder(kind: ErrorKind, err: impl Into<AnyError>) -> ErrorBuilder {
        ErrorBuilder::new(kind, err)
    }

    /// 使用错误信息创建 HTTP 传输错误构建器
    #[inline]
    pub fn builder_with_msg(kind: ErrorKind, msg: impl Display + Debug + Send + Sync + 'static) -> ErrorBuilder {
        ErrorBuilder::new(kind, AnyError::msg(msg))
    }

    /// 获取 HTTP 传输错误类型
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取出错请求的 URL
    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// 转换为内部错误
    #[inline]
    pub fn into_inner(self) -> AnyError {
        self.error
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

/// HTTP 传输错误构建器
#[derive(Debug)]
pub struct ErrorBuilder {
    inner: Error,
}

impl ErrorBuilder {
    #[inline]
    fn new(kind: ErrorKind, err: impl Into<AnyError>) -> Self {
        Self {
            inner: Error {
                kind,
                error: err.into(),
                url: None,
            },
        }
    }

    /// 设置出错请求的 URL
    #[inline]
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    /// 构建 HTTP 传输错误
    #[inline]
    pub fn build(self) -> Error {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::builder_with_msg(ErrorKind::TimeoutError, "read timed out")
            .url("http://localhost/path")
            .build();
        assert_eq!(err.kind(), ErrorKind::TimeoutError);
        assert_eq!(err.url(), Some("http://localhost/path"));
        assert_eq!(err.to_string(), "[timeout][http://localhost/path] read timed out");
    }
}
