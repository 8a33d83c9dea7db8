use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error;

/// HTTP 请求方法
///
/// 默认为 `GET`，按约定 `GET` 请求不携带请求体
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    #[default]
    GET,
    /// POST
    POST,
    /// PUT
    PUT,
    /// DELETE
    DELETE,
    /// PATCH
    PATCH,
    /// HEAD
    HEAD,
}

impl Method {
    /// 获取 HTTP 请求方法名称
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::PATCH => "PATCH",
            Self::HEAD => "HEAD",
        }
    }
}

impl Display for Method {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 不支持的 HTTP 请求方法
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not supported method: {0}")]
pub struct InvalidMethod(String);

impl FromStr for Method {
    type Err = InvalidMethod;

    /// 解析 HTTP 请求方法，大小写不敏感，空字符串视为 `GET`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::GET);
        }
        [
            Self::GET,
            Self::POST,
            Self::PUT,
            Self::DELETE,
            Self::PATCH,
            Self::HEAD,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| InvalidMethod(s.to_owned()))
    }
}
