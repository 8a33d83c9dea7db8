#![cfg_attr(feature = "docs", feature(doc_cfg))]
#![deny(unsafe_code, missing_debug_implementations)]

//! # rivet-http-client
//!
//! ## 带类型的 HTTP 客户端
//!
//! 请求体与响应体通过按照载荷类型注册的转换器进行序列化与反序列化，
//! 请求由 [`Engine`] 在可替换的传输层上执行，并按照 [`RetryPolicy`] 重试。
//! [`SyncFactory`] 在调用方线程上阻塞执行请求，[`AsyncFactory`] 在工作线程池中执行请求并通过回调交付响应。
//!
//! ### 功能描述
//!
//! #### `ureq`
//!
//! 启用 `ureq` 传输层（默认启用），并为请求工厂提供默认实现
//!
//! #### `reqwest`
//!
//! 启用 `reqwest` 传输层

mod converter;
mod engine;
mod error;
mod factory;
mod media_type;
mod request;
mod response;

#[cfg(test)]
mod test_utils;

pub use converter::{
    BytesConverter, ConvertError, Converter, ConverterNotFoundError, ConverterRegistry, EmptyToJsonConverter,
    FormToJsonConverter, JsonConverter, Payload, PayloadType, StringConverter, StringToJsonConverter,
};
pub use engine::{
    default_backoff, Backoff, DispatcherOptions, Engine, EngineBuilder, EngineConfig, FixedBackoff, RandomizedBackoff,
    Ratio, RetriedStatsInfo, RetryPolicy, NO_BACKOFF,
};
pub use error::{ConfigError, ConfigResult, MIN_TIMEOUT};
pub use factory::{AsyncFactory, SyncFactory};
pub use media_type::MediaTypes;
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseError, ResponseErrorKind};

pub use rivet_http as http;

#[cfg(feature = "reqwest")]
#[cfg_attr(feature = "docs", doc(cfg(feature = "reqwest")))]
pub use rivet_reqwest as reqwest;

#[cfg(feature = "ureq")]
#[cfg_attr(feature = "docs", doc(cfg(feature = "ureq")))]
pub use rivet_ureq as ureq;
