use super::{ConvertError, Converter, Payload, PayloadType, ANY, TEXT_PLAIN_UTF_8};

/// 文本转换器
///
/// 请求载荷为文本或无载荷，响应体按照 UTF-8 解码为文本
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        match body {
            None | Some(Payload::Empty) => Ok(Vec::new()),
            Some(Payload::Text(text)) => Ok(text.as_bytes().to_vec()),
            Some(other) => Err(ConvertError::unexpected(PayloadType::Text, other)),
        }
    }

    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        raw.map(|raw| String::from_utf8(raw.to_vec()).map(Payload::Text))
            .transpose()
            .map_err(ConvertError::from)
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        Some(TEXT_PLAIN_UTF_8)
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(ANY)
    }
}
