use super::{Headers, ResponseError};
use std::result;

/// 传输层 HTTP 响应
///
/// 响应体已经完整读取到内存中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl Default for Response {
    #[inline]
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: Default::default(),
            body: Default::default(),
        }
    }
}

impl Response {
    /// 创建传输层 HTTP 响应构建器
    #[inline]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    /// 获取 HTTP 状态码
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 获取 HTTP 响应头
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 获取 HTTP 响应体
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 拆分为状态码，响应头与响应体
    #[inline]
    pub fn into_parts(self) -> (u16, Headers, Vec<u8>) {
        (self.status_code, self.headers, self.body)
    }
}

/// 传输层 HTTP 响应构建器
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    inner: Response,
}

impl ResponseBuilder {
    /// 设置 HTTP 状态码
    #[inline]
    pub fn status_code(&mut self, status_code: u16) -> &mut Self {
        self.inner.status_code = status_code;
        self
    }

    /// 设置 HTTP 响应头
    #[inline]
    pub fn headers(&mut self, headers: Headers) -> &mut Self {
        self.inner.headers = headers;
        self
    }

    /// 添加 HTTP 响应头
    #[inline]
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.headers.insert(name, value);
        self
    }

    /// 设置 HTTP 响应体
    #[inline]
    pub fn body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.inner.body = body.into();
        self
    }

    /// 构建传输层 HTTP 响应
    #[inline]
    pub fn build(&mut self) -> Response {
        std::mem::take(&mut self.inner)
    }
}

/// 传输层 HTTP 响应结果
pub type Result = result::Result<Response, ResponseError>;
