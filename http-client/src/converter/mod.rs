mod bytes;
mod json;
mod payload;
mod registry;
mod text;

pub use bytes::BytesConverter;
pub use json::{EmptyToJsonConverter, FormToJsonConverter, JsonConverter, StringToJsonConverter};
pub use payload::{Payload, PayloadType};
pub use registry::{ConverterNotFoundError, ConverterRegistry};
pub use text::StringConverter;

use auto_impl::auto_impl;
use serde_json::Error as JsonError;
use std::{fmt::Debug, string::FromUtf8Error};
use thiserror::Error;

/// 载荷转换器
///
/// 转换器是无状态的，按照（请求载荷类型，响应载荷类型）注册到 [`ConverterRegistry`] 中。
/// 请求载荷缺失时应当视为空请求体，响应体缺失时应当返回 `None`，两种情况都不应返回错误。
#[auto_impl(&, Box, Arc)]
pub trait Converter: Debug + Send + Sync {
    /// 将请求载荷转换为请求体
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError>;

    /// 将响应体转换为响应载荷
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError>;

    /// 请求体的 Content-Type
    fn content_type(&self) -> Option<&str>;

    /// 期望的响应 Accept
    fn accept(&self) -> Option<&str>;
}

/// 载荷转换错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConvertError {
    /// 载荷类型与转换器不匹配
    #[error("unexpected payload: expected {expected}, found {found}")]
    UnexpectedPayload {
        /// 转换器期望的载荷类型
        expected: PayloadType,
        /// 实际的载荷类型
        found: PayloadType,
    },

    /// JSON 序列化或反序列化失败
    #[error("json error: {0}")]
    Json(#[from] JsonError),

    /// 响应体不是合法的 UTF-8 文本
    #[error("invalid utf-8 text: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl ConvertError {
    #[inline]
    pub(crate) fn unexpected(expected: PayloadType, found: &Payload) -> Self {
        Self::UnexpectedPayload {
            expected,
            found: found.payload_type(),
        }
    }
}

pub(crate) const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";
pub(crate) const APPLICATION_JSON_UTF_8: &str = "application/json; charset=utf-8";
pub(crate) const APPLICATION_WWW_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub(crate) const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub(crate) const ANY: &str = "*/*";
