use rivet_http::Form;
use serde::de::DeserializeOwned;
use serde_json::{Error as JsonError, Value as JsonValue};
use std::{
    borrow::Cow,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

/// 载荷类型
///
/// 转换器按照（请求载荷类型，响应载荷类型）二元组注册，
/// 内置类型之外的载荷可以使用 [`PayloadType::Named`] 扩展
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadType {
    /// 无载荷
    Empty,

    /// 文本
    Text,

    /// 表单
    Form,

    /// JSON
    Json,

    /// 二进制数据
    Bytes,

    /// 自定义载荷类型
    Named(Cow<'static, str>),
}

impl PayloadType {
    /// 创建自定义载荷类型
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }

    /// 载荷是否可以作为该类型使用
    ///
    /// 自定义载荷类型接受任何载荷，由注册的转换器自行判断
    pub fn accepts(&self, payload: &Payload) -> bool {
        match self {
            Self::Named(_) => true,
            expected => &payload.payload_type() == expected,
        }
    }
}

impl Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Text => f.write_str("text"),
            Self::Form => f.write_str("form"),
            Self::Json => f.write_str("json"),
            Self::Bytes => f.write_str("bytes"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// 载荷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// 无载荷
    Empty,

    /// 文本
    Text(String),

    /// 表单
    Form(Form),

    /// JSON
    Json(JsonValue),

    /// 二进制数据
    Bytes(Vec<u8>),
}

impl Payload {
    /// 获取载荷类型
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Empty => PayloadType::Empty,
            Self::Text(_) => PayloadType::Text,
            Self::Form(_) => PayloadType::Form,
            Self::Json(_) => PayloadType::Json,
            Self::Bytes(_) => PayloadType::Bytes,
        }
    }

    /// 序列化为 JSON 载荷
    #[inline]
    pub fn json(value: &impl serde::Serialize) -> Result<Self, JsonError> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// 获取文本
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 获取表单
    #[inline]
    pub fn as_form(&self) -> Option<&Form> {
        match self {
            Self::Form(form) => Some(form),
            _ => None,
        }
    }

    /// 获取 JSON
    #[inline]
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// 获取二进制数据
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// 将载荷反序列化为指定类型
    ///
    /// 文本与二进制数据按照 JSON 解析，表单按照字符串映射表解析
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, JsonError> {
        match self {
            Self::Empty => serde_json::from_value(JsonValue::Null),
            Self::Text(text) => serde_json::from_str(text),
            Self::Form(form) => serde_json::from_value(JsonValue::Object(
                form.iter()
                    .map(|(key, value)| (key.to_owned(), JsonValue::String(value.to_owned())))
                    .collect(),
            )),
            Self::Json(value) => serde_json::from_value(value.to_owned()),
            Self::Bytes(bytes) => serde_json::from_slice(bytes),
        }
    }
}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload_type().hash(state);
        match self {
            Self::Empty => {}
            Self::Text(text) => text.hash(state),
            Self::Form(form) => form.hash(state),
            Self::Json(value) => value.to_string().hash(state),
            Self::Bytes(bytes) => bytes.hash(state),
        }
    }
}

impl From<String> for Payload {
    #[inline]
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Form> for Payload {
    #[inline]
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

impl From<JsonValue> for Payload {
    #[inline]
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Payload {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}
