use super::{Headers, Method};

/// 传输层 HTTP 请求
///
/// 由客户端根据逻辑请求构建，请求体已经完成序列化
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: String,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl Request {
    /// 创建传输层 HTTP 请求构建器
    #[inline]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// 获取 HTTP 请求方法
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// 获取 HTTP 请求 URL
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 获取 HTTP 请求头
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 获取 HTTP 请求体
    ///
    /// 返回 `None` 表示该请求不发送请求体
    #[inline]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// 传输层 HTTP 请求构建器
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    /// 设置 HTTP 请求方法
    #[inline]
    pub fn method(&mut self, method: Method) -> &mut Self {
        self.inner.method = method;
        self
    }

    /// 设置 HTTP 请求 URL
    #[inline]
    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.inner.url = url.into();
        self
    }

    /// 设置 HTTP 请求头
    #[inline]
    pub fn headers(&mut self, headers: Headers) -> &mut Self {
        self.inner.headers = headers;
        self
    }

    /// 设置 HTTP 请求体
    #[inline]
    pub fn body(&mut self, body: Vec<u8>) -> &mut Self {
        self.inner.body = Some(body);
        self
    }

    /// 构建传输层 HTTP 请求
    #[inline]
    pub fn build(&mut self) -> Request {
        std::mem::take(&mut self.inner)
    }
}
