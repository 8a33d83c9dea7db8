use form_urlencoded::{byte_serialize, parse};
use std::{
    collections::{hash_map, HashMap},
    hash::{Hash, Hasher},
    iter::FromIterator,
};

/// 表单数据
///
/// `GET` 请求中作为查询字符串使用，其他请求中作为请求体使用。
/// 相等性由内容决定，与键的顺序无关。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    inner: HashMap<String, String>,
}

impl Form {
    /// 创建空表单
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    /// 解析表单字符串
    ///
    /// 键与值都会进行 URL 解码，缺少 `=` 的键值对视为空值
    pub fn parse(form_string: &str) -> Self {
        parse(form_string.as_bytes()).into_owned().collect()
    }

    /// 添加键值对，键已存在时替换
    #[inline]
    pub fn add(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.inner.insert(key.into(), value.to_string());
        self
    }

    /// 添加键值对，键已存在时保留原值
    #[inline]
    pub fn add_if_absent(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.inner
            .entry(key.into())
            .or_insert_with(|| value.to_string());
        self
    }

    /// 设置键值对，键已存在时替换
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.inner.insert(key.into(), value.to_string())
    }

    /// 获取值
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// 键值对数量
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// 遍历键值对
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.inner.iter())
    }

    /// 生成表单字符串
    ///
    /// 形如 `key1=value1&key2=value2`，值会进行 URL 编码，键按原样输出，键的顺序不保证
    pub fn to_form_string(&self) -> String {
        let mut form_string = String::new();
        for (key, value) in self.inner.iter() {
            if !form_string.is_empty() {
                form_string.push('&');
            }
            form_string.push_str(key);
            form_string.push('=');
            form_string.extend(byte_serialize(value.as_bytes()));
        }
        form_string
    }
}

impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries: Vec<_> = self.inner.iter().collect();
        entries.sort_unstable();
        entries.hash(state);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Form {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.inner
            .extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
    }
}

/// 表单迭代器
#[derive(Debug)]
pub struct Iter<'a>(hash_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Form {
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
    fn test_form_string() {
        let form = Form::new().add("A", "a").add("B", "b");
        let form_string = form.to_form_string();
        assert!(form_string == "A=a&B=b" || form_string == "B=b&A=a");
        assert_eq!(Form::parse("A=a&B=b"), form);
        assert_eq!(Form::parse("B=b&A=a"), form);
        assert_eq!(Form::parse(&form_string), form);
    }

    #[test]
    fn test_values_are_encoded() {
        let form = Form::new().add("q", "rust & go = fun?");
        assert_eq!(form.to_form_string(), "q=rust+%26+go+%3D+fun%3F");
        assert_eq!(Form::parse(&form.to_form_string()), form);
        assert_eq!(Form::parse("name=%E9%93%86%E9%92%89").get("name"), Some("铆钉"));
    }

    #[test]
    fn test_parse_edge_cases() {
        assert!(Form::parse("").is_empty());
        let form = Form::parse("flag&k=v");
        assert_eq!(form.get("flag"), Some(""));
        assert_eq!(form.get("k"), Some("v"));
    }

    #[test]
    fn test_add_if_absent() {
        let form = Form::new().add("k", 1).add_if_absent("k", 2).add_if_absent("j", 3);
        assert_eq!(form.get("k"), Some("1"));
        assert_eq!(form.get("j"), Some("3"));
        assert_eq!(form.len(), 2);
    }
}
