use super::{
    BytesConverter, Converter, EmptyToJsonConverter, FormToJsonConverter, JsonConverter, PayloadType,
    StringConverter, StringToJsonConverter,
};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

type ConverterKey = (PayloadType, PayloadType);

/// 转换器注册表
///
/// 按照（请求载荷类型，响应载荷类型）保存转换器，注册与查询可以并发进行，
/// 查询总是得到注册前或注册后的完整转换器
#[derive(Debug)]
pub struct ConverterRegistry {
    converters: DashMap<ConverterKey, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// 创建不包含任何转换器的注册表
    #[inline]
    pub fn empty() -> Self {
        Self {
            converters: DashMap::new(),
        }
    }

    /// 注册转换器，返回之前注册的转换器
    #[inline]
    pub fn register(
        &self,
        request_type: PayloadType,
        response_type: PayloadType,
        converter: impl Converter + 'static,
    ) -> Option<Arc<dyn Converter>> {
        self.register_arc(request_type, response_type, Arc::new(converter))
    }

    /// 注册共享的转换器，返回之前注册的转换器
    pub fn register_arc(
        &self,
        request_type: PayloadType,
        response_type: PayloadType,
        converter: Arc<dyn Converter>,
    ) -> Option<Arc<dyn Converter>> {
        self.converters.insert((request_type, response_type), converter)
    }

    /// 查询转换器
    ///
    /// 精确匹配失败时，回退到无请求体类型与同一响应类型的转换器
    pub fn lookup(
        &self,
        request_type: &PayloadType,
        response_type: &PayloadType,
    ) -> Result<Arc<dyn Converter>, ConverterNotFoundError> {
        self.get(request_type, response_type)
            .or_else(|| self.get(&PayloadType::Empty, response_type))
            .ok_or_else(|| ConverterNotFoundError {
                request_type: request_type.to_owned(),
                response_type: response_type.to_owned(),
            })
    }

    /// 查询响应载荷为 JSON 的转换器
    #[inline]
    pub fn default_for(&self, request_type: &PayloadType) -> Result<Arc<dyn Converter>, ConverterNotFoundError> {
        self.lookup(request_type, &PayloadType::Json)
    }

    /// 注册的转换器数量
    #[inline]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// 是否没有注册任何转换器
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn get(&self, request_type: &PayloadType, response_type: &PayloadType) -> Option<Arc<dyn Converter>> {
        self.converters
            .get(&(request_type.to_owned(), response_type.to_owned()))
            .map(|entry| Arc::clone(entry.value()))
    }
}

impl Default for ConverterRegistry {
    /// 创建包含内置转换器的注册表
    fn default() -> Self {
        let registry = Self::empty();
        registry.register(PayloadType::Text, PayloadType::Text, StringConverter);
        registry.register(PayloadType::Empty, PayloadType::Text, StringConverter);
        registry.register(PayloadType::Form, PayloadType::Json, FormToJsonConverter);
        registry.register(PayloadType::Json, PayloadType::Json, JsonConverter);
        registry.register(PayloadType::Text, PayloadType::Json, StringToJsonConverter);
        registry.register(PayloadType::Empty, PayloadType::Json, EmptyToJsonConverter);
        registry.register(PayloadType::Bytes, PayloadType::Bytes, BytesConverter);
        registry.register(PayloadType::Empty, PayloadType::Bytes, BytesConverter);
        registry
    }
}

/// 转换器未找到错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("converter not found: {request_type} -> {response_type}")]
pub struct ConverterNotFoundError {
    request_type: PayloadType,
    response_type: PayloadType,
}

impl ConverterNotFoundError {
    /// 获取请求载荷类型
    #[inline]
    pub fn request_type(&self) -> &PayloadType {
        &self.request_type
    }

    /// 获取响应载荷类型
    #[inline]
    pub fn response_type(&self) -> &PayloadType {
        &self.response_type
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{ConvertError, Payload},
        *,
    };
    use std::{error::Error, thread};

    #[derive(Debug)]
    struct UpperCaseConverter;

    impl Converter for UpperCaseConverter {
        fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
            Ok(body
                .and_then(Payload::as_text)
                .unwrap_or_default()
                .to_uppercase()
                .into_bytes())
        }

        fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
            StringConverter.convert_response(raw)
        }

        fn content_type(&self) -> Option<&str> {
            Some("text/x-upper")
        }

        fn accept(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_builtin_lookup() -> Result<(), Box<dyn Error>> {
        let registry = ConverterRegistry::default();
        assert_eq!(registry.len(), 8);
        assert_eq!(
            registry.lookup(&PayloadType::Json, &PayloadType::Json)?.content_type(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(
            registry.default_for(&PayloadType::Form)?.content_type(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(registry.default_for(&PayloadType::Empty)?.content_type(), None);
        Ok(())
    }

    #[test]
    fn test_lookup_falls_back_to_empty_request() -> Result<(), Box<dyn Error>> {
        let registry = ConverterRegistry::default();
        let converter = registry.lookup(&PayloadType::named("xml"), &PayloadType::Json)?;
        assert_eq!(converter.content_type(), None);
        assert_eq!(converter.accept(), Some("application/json; charset=utf-8"));

        let err = registry
            .lookup(&PayloadType::Json, &PayloadType::named("xml"))
            .unwrap_err();
        assert_eq!(err.request_type(), &PayloadType::Json);
        assert_eq!(err.response_type(), &PayloadType::named("xml"));
        assert_eq!(err.to_string(), "converter not found: json -> xml");

        assert!(ConverterRegistry::empty()
            .lookup(&PayloadType::Text, &PayloadType::Text)
            .is_err());
        Ok(())
    }

    #[test]
    fn test_register_overrides() -> Result<(), Box<dyn Error>> {
        let registry = ConverterRegistry::default();
        let previous = registry.register(PayloadType::Text, PayloadType::Text, UpperCaseConverter);
        assert_eq!(previous.and_then(|c| c.content_type().map(ToOwned::to_owned)).as_deref(), Some("text/plain; charset=utf-8"));

        let again = registry.register(PayloadType::Text, PayloadType::Text, UpperCaseConverter);
        assert_eq!(again.and_then(|c| c.content_type().map(ToOwned::to_owned)).as_deref(), Some("text/x-upper"));

        let converter = registry.lookup(&PayloadType::Text, &PayloadType::Text)?;
        assert_eq!(converter.convert_request(Some(&"abc".into()))?, b"ABC");
        assert_eq!(registry.len(), 8);
        Ok(())
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        let registry = Arc::new(ConverterRegistry::default());
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.to_owned();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        if i % 2 == 0 {
                            registry.register(PayloadType::Json, PayloadType::Json, JsonConverter);
                        } else {
                            let converter = registry.lookup(&PayloadType::Json, &PayloadType::Json).unwrap();
                            assert_eq!(converter.content_type(), Some("application/json; charset=utf-8"));
                        }
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }
    }
}
