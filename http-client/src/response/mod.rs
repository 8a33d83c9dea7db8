mod error;

pub use error::{Error as ResponseError, ErrorKind as ResponseErrorKind};

use super::{MediaTypes, Payload};
use rivet_http::{Headers, HttpStatus};
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;

/// 逻辑 HTTP 响应
///
/// 对于一个终结的响应，响应载荷，错误载荷与响应异常三者中只有一个有意义：
/// 响应异常表示请求无法恢复地失败了，错误载荷表示服务器返回了已声明的错误载荷
#[derive(Debug)]
pub struct Response {
    status: HttpStatus,
    headers: Headers,
    body: Option<Payload>,
    error: Option<Payload>,
    exception: Option<ResponseError>,
}

impl Response {
    /// 创建响应
    #[inline]
    pub fn new(status: HttpStatus, headers: Headers) -> Self {
        Self {
            status,
            headers,
            body: None,
            error: None,
            exception: None,
        }
    }

    /// 创建请求失败的响应
    ///
    /// 状态码为 [`HttpStatus::RequestFailed`]
    #[inline]
    pub fn failed(exception: ResponseError) -> Self {
        Self::new(HttpStatus::RequestFailed, Headers::new()).with_exception(exception)
    }

    #[inline]
    pub(crate) fn with_body(mut self, body: Option<Payload>) -> Self {
        self.body = body;
        self
    }

    #[inline]
    pub(crate) fn with_error(mut self, error: Option<Payload>) -> Self {
        self.error = error;
        self
    }

    #[inline]
    pub(crate) fn with_exception(mut self, exception: ResponseError) -> Self {
        self.exception = Some(exception);
        self
    }

    /// 获取状态码
    #[inline]
    pub fn status(&self) -> HttpStatus {
        self.status
    }

    /// 获取 HTTP 响应头
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 获取响应载荷
    #[inline]
    pub fn body(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    /// 获取错误载荷
    #[inline]
    pub fn error(&self) -> Option<&Payload> {
        self.error.as_ref()
    }

    /// 获取响应异常
    #[inline]
    pub fn exception(&self) -> Option<&ResponseError> {
        self.exception.as_ref()
    }

    /// 状态码表示错误，或者存在响应异常
    #[inline]
    pub fn has_error(&self) -> bool {
        self.status.has_error() || self.exception.is_some()
    }

    /// 是否存在响应异常
    #[inline]
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// 将响应载荷反序列化为指定类型
    #[inline]
    pub fn body_as<T: DeserializeOwned>(&self) -> Option<Result<T, JsonError>> {
        self.body.as_ref().map(Payload::deserialize::<T>)
    }

    /// 将错误载荷反序列化为指定类型
    #[inline]
    pub fn error_as<T: DeserializeOwned>(&self) -> Option<Result<T, JsonError>> {
        self.error.as_ref().map(Payload::deserialize::<T>)
    }

    /// 获取响应的 Content-Type
    #[inline]
    pub fn content_type(&self) -> MediaTypes {
        self.headers
            .content_type()
            .map(MediaTypes::parse)
            .unwrap_or_default()
    }

    /// 转换为响应载荷
    #[inline]
    pub fn into_body(self) -> Option<Payload> {
        self.body
    }

    /// 转换为响应异常
    #[inline]
    pub fn into_exception(self) -> Option<ResponseError> {
        self.exception
    }
}
