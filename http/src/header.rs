use std::{
    collections::{hash_map, HashMap},
    hash::{Hash, Hasher},
    iter::FromIterator,
};

/// Accept
pub const ACCEPT: &str = "Accept";
/// Authorization
pub const AUTHORIZATION: &str = "Authorization";
/// Cache-Control
pub const CACHE_CONTROL: &str = "Cache-Control";
/// Content-Type
pub const CONTENT_TYPE: &str = "Content-Type";
/// User-Agent
pub const USER_AGENT: &str = "User-Agent";

/// HTTP 头
///
/// 头名称大小写敏感，每个头只保存一个字符串值，多值头以 `"; "` 拼接。
/// 空值不会被保存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    /// 创建空的 HTTP 头
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// 设置 HTTP 头，值为空时忽略
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.inner.insert(name.into(), value);
        }
        self
    }

    /// 设置多值 HTTP 头，多个值以 `"; "` 拼接，所有值都为空时忽略
    pub fn insert_values<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .filter(|value| !value.as_ref().is_empty())
            .fold(String::new(), |mut joined, value| {
                if !joined.is_empty() {
                    joined.push_str("; ");
                }
                joined.push_str(value.as_ref());
                joined
            });
        self.insert(name, joined)
    }

    /// 合并另一组 HTTP 头，同名头以传入的值为准
    pub fn extend_from(&mut self, headers: &Headers) -> &mut Self {
        self.inner
            .extend(headers.iter().map(|(name, value)| (name.to_owned(), value.to_owned())));
        self
    }

    /// 获取 HTTP 头的值
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// 获取 HTTP 头的值，名称不区分大小写
    ///
    /// 优先精确匹配，用于读取传输层返回的小写头名称
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.get(name).or_else(|| {
            self.inner
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// 是否包含指定的 HTTP 头
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// 移除 HTTP 头
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name)
    }

    /// 获取 Accept
    #[inline]
    pub fn accept(&self) -> Option<&str> {
        self.get_ignore_case(ACCEPT)
    }

    /// 获取 Content-Type
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.get_ignore_case(CONTENT_TYPE)
    }

    /// HTTP 头数量
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// 遍历 HTTP 头
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.inner.iter())
    }
}

impl Hash for Headers {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries: Vec<_> = self.inner.iter().collect();
        entries.sort_unstable();
        entries.hash(state);
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// HTTP 头迭代器
#[derive(Debug)]
pub struct Iter<'a>(hash_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_dropped() {
        let mut headers = Headers::new();
        headers
            .insert(ACCEPT, "")
            .insert(CONTENT_TYPE, "text/plain")
            .insert_values("X-Empty", Vec::<String>::new())
            .insert_values("X-Blank", ["", ""]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.accept(), None);
        assert_eq!(headers.content_type(), Some("text/plain"));
        assert!(!headers.contains("X-Empty"));
    }

    #[test]
    fn test_multi_values_are_joined() {
        let mut headers = Headers::new();
        headers.insert_values("Set-Cookie", ["a=1", "b=2", "", "c=3"]);
        assert_eq!(headers.get("Set-Cookie"), Some("a=1; b=2; c=3"));
        assert_eq!(headers.get("set-cookie"), None);
        assert_eq!(headers.get_ignore_case("set-cookie"), Some("a=1; b=2; c=3"));
    }

    #[test]
    fn test_extend_from_overrides() {
        let mut headers: Headers = [(ACCEPT, "*/*"), (USER_AGENT, "test")].into_iter().collect();
        let overrides: Headers = [(ACCEPT, "application/json")].into_iter().collect();
        headers.extend_from(&overrides);
        assert_eq!(headers.accept(), Some("application/json"));
        assert_eq!(headers.get(USER_AGENT), Some("test"));

        let same: Headers = [(USER_AGENT, "test"), (ACCEPT, "application/json")]
            .into_iter()
            .collect();
        assert_eq!(headers, same);
    }
}
