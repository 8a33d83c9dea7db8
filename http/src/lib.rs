#![cfg_attr(feature = "docs", feature(doc_cfg))]
#![deny(unsafe_code, missing_debug_implementations)]

//! # rivet-http
//!
//! ## Rivet HTTP 接口
//!
//! 为 Rivet HTTP 客户端提供传输层接口定义以及基础数据模型。
//!
//! 实现 [`HttpCaller`] 与 [`Connector`] 接口即可将任意 HTTP 库接入 Rivet，
//! 传输层只负责网络 IO（连接池，TLS，报文收发），重试与载荷转换由上层客户端负责。

mod error;
mod form;
mod header;
mod method;
mod options;
mod request;
mod response;
mod status;

pub use error::{Error as ResponseError, ErrorBuilder as ResponseErrorBuilder, ErrorKind as ResponseErrorKind};
pub use form::{Form, Iter as FormIter};
pub use header::{Headers, Iter as HeadersIter, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
pub use method::{InvalidMethod, Method};
pub use options::{TransportOptions, TransportOptionsBuilder};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, Result as ResponseResult};
pub use status::HttpStatus;

use once_cell::sync::Lazy;
use std::fmt::Debug;

static FULL_USER_AGENT: Lazy<Box<str>> = Lazy::new(|| {
    format!(
        "Rivet/rivet-http-{}/rust-{}",
        env!("CARGO_PKG_VERSION"),
        env!("RUSTC_VERSION"),
    )
    .into()
});

/// 获取 Rivet 库的 UserAgent
///
/// 所有请求默认携带该 UserAgent，除非调用方显式覆盖
#[inline]
pub fn user_agent() -> &'static str {
    &FULL_USER_AGENT
}

/// HTTP 请求处理函数
///
/// 实现该接口，即可处理所有 Rivet 发送的 HTTP 请求
pub trait HttpCaller: Debug + Send + Sync {
    /// 阻塞发送 HTTP 请求
    ///
    /// 只有在收到状态行之前发生的错误（IO 错误，连接被拒绝，超时等）才返回 `Err`，
    /// 任何状态码的响应都应当以 `Ok` 返回
    fn call(&self, request: &Request) -> ResponseResult;
}

impl<T: HttpCaller + ?Sized> HttpCaller for Box<T> {
    #[inline]
    fn call(&self, request: &Request) -> ResponseResult {
        T::call(self, request)
    }
}

impl<T: HttpCaller + ?Sized> HttpCaller for std::sync::Arc<T> {
    #[inline]
    fn call(&self, request: &Request) -> ResponseResult {
        T::call(self, request)
    }
}

/// HTTP 传输层连接器
///
/// 根据传输选项构建 [`HttpCaller`]，调用方保证对同一份选项只构建一次
pub trait Connector: Debug + Send + Sync {
    /// 构建出的 HTTP 请求处理函数
    type Caller: HttpCaller + 'static;

    /// 根据传输选项构建 HTTP 请求处理函数
    fn connect(&self, options: &TransportOptions) -> Result<Self::Caller, ResponseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        assert!(user_agent().starts_with("Rivet/rivet-http-"));
        assert!(user_agent().contains("/rust-"));
    }
}
