use mime::{Mime, CHARSET};
use std::slice::Iter;

/// 媒体类型列表
///
/// 由 Accept 或 Content-Type 头解析得到，无法解析的条目将被忽略
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaTypes(Vec<Mime>);

impl MediaTypes {
    /// 解析 Accept 或 Content-Type 头的值
    pub fn parse(header_value: &str) -> Self {
        Self(
            header_value
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .filter_map(|entry| entry.parse().ok())
                .collect(),
        )
    }

    /// 获取第一个媒体类型
    #[inline]
    pub fn first(&self) -> Option<&Mime> {
        self.0.first()
    }

    /// 媒体类型数量
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 遍历媒体类型
    #[inline]
    pub fn iter(&self) -> Iter<'_, Mime> {
        self.0.iter()
    }

    /// 第一个媒体类型是否与期望的媒体类型匹配
    #[inline]
    pub fn is_first(&self, expected: &Mime) -> bool {
        self.first().map_or(false, |actual| matches(actual, expected))
    }

    /// 是否存在与期望的媒体类型匹配的条目
    #[inline]
    pub fn contains(&self, expected: &Mime) -> bool {
        self.0.iter().any(|actual| matches(actual, expected))
    }
}

impl<'a> IntoIterator for &'a MediaTypes {
    type Item = &'a Mime;
    type IntoIter = Iter<'a, Mime>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// 比较类型与子类型，期望的媒体类型带有 charset 时还需比较 charset
fn matches(actual: &Mime, expected: &Mime) -> bool {
    if actual.essence_str() != expected.essence_str() {
        return false;
    }
    match expected.get_param(CHARSET) {
        None => true,
        Some(charset) => actual
            .get_param(CHARSET)
            .map_or(false, |actual_charset| {
                actual_charset.as_str().eq_ignore_ascii_case(charset.as_str())
            }),
    }
}
