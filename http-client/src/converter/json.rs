use super::{
    ConvertError, Converter, Payload, PayloadType, APPLICATION_JSON_UTF_8, APPLICATION_WWW_FORM_URLENCODED,
};

fn parse_json(raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Some(raw) => Ok(Some(Payload::Json(serde_json::from_slice(raw)?))),
    }
}

/// JSON 转换器
///
/// 请求载荷序列化为 JSON，响应体解析为 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl Converter for JsonConverter {
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        match body {
            None | Some(Payload::Empty) => Ok(Vec::new()),
            Some(Payload::Json(value)) => Ok(serde_json::to_vec(value)?),
            Some(other) => Err(ConvertError::unexpected(PayloadType::Json, other)),
        }
    }

    #[inline]
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        parse_json(raw)
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        Some(APPLICATION_JSON_UTF_8)
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(APPLICATION_JSON_UTF_8)
    }
}

/// 表单到 JSON 的转换器
///
/// 请求载荷编码为表单字符串，响应体解析为 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct FormToJsonConverter;

impl Converter for FormToJsonConverter {
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        match body {
            None | Some(Payload::Empty) => Ok(Vec::new()),
            Some(Payload::Form(form)) => Ok(form.to_form_string().into_bytes()),
            Some(other) => Err(ConvertError::unexpected(PayloadType::Form, other)),
        }
    }

    #[inline]
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        parse_json(raw)
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        Some(APPLICATION_WWW_FORM_URLENCODED)
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(APPLICATION_JSON_UTF_8)
    }
}

/// 文本到 JSON 的转换器
///
/// 请求载荷按原样发送，通常是调用方已经编码好的表单字符串，响应体解析为 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToJsonConverter;

impl Converter for StringToJsonConverter {
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        match body {
            None | Some(Payload::Empty) => Ok(Vec::new()),
            Some(Payload::Text(text)) => Ok(text.as_bytes().to_vec()),
            Some(other) => Err(ConvertError::unexpected(PayloadType::Text, other)),
        }
    }

    #[inline]
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        parse_json(raw)
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        Some(APPLICATION_WWW_FORM_URLENCODED)
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(APPLICATION_JSON_UTF_8)
    }
}

/// 无请求体到 JSON 的转换器
///
/// 忽略请求载荷，响应体解析为 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyToJsonConverter;

impl Converter for EmptyToJsonConverter {
    #[inline]
    fn convert_request(&self, _body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        Ok(Vec::new())
    }

    #[inline]
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        parse_json(raw)
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        None
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(APPLICATION_JSON_UTF_8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_http::Form;
    use serde_json::json;
    use std::error::Error;

    #[test]
    fn test_json_converter() -> Result<(), Box<dyn Error>> {
        let converter = JsonConverter;
        assert_eq!(
            converter.convert_request(Some(&json!({"id": 1}).into()))?,
            br#"{"id":1}"#
        );
        assert!(converter.convert_request(None)?.is_empty());
        assert!(converter.convert_request(Some(&"{}".into())).is_err());

        assert_eq!(
            converter.convert_response(Some(br#"{"ok":true}"#))?,
            Some(json!({"ok": true}).into())
        );
        assert_eq!(converter.convert_response(Some(b""))?, None);
        assert_eq!(converter.convert_response(Some(b" \n"))?, None);
        assert_eq!(converter.convert_response(None)?, None);
        assert!(matches!(
            converter.convert_response(Some(b"{not json")),
            Err(ConvertError::Json(_))
        ));
        Ok(())
    }

    #[test]
    fn test_form_to_json_converter() -> Result<(), Box<dyn Error>> {
        let converter = FormToJsonConverter;
        let body = converter.convert_request(Some(&Form::new().add("q", "a b").into()))?;
        assert_eq!(body, b"q=a+b");
        assert_eq!(converter.content_type(), Some(APPLICATION_WWW_FORM_URLENCODED));
        assert_eq!(converter.accept(), Some(APPLICATION_JSON_UTF_8));
        assert_eq!(converter.convert_response(Some(b"[1,2]"))?, Some(json!([1, 2]).into()));
        Ok(())
    }

    #[test]
    fn test_string_and_empty_to_json_converters() -> Result<(), Box<dyn Error>> {
        assert_eq!(StringToJsonConverter.convert_request(Some(&"a=1".into()))?, b"a=1");
        assert_eq!(StringToJsonConverter.content_type(), Some(APPLICATION_WWW_FORM_URLENCODED));
        assert!(EmptyToJsonConverter.convert_request(Some(&"ignored".into()))?.is_empty());
        assert_eq!(EmptyToJsonConverter.content_type(), None);
        assert_eq!(EmptyToJsonConverter.convert_response(Some(b"null"))?, Some(json!(null).into()));
        Ok(())
    }
}
