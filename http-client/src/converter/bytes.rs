use super::{ConvertError, Converter, Payload, PayloadType, APPLICATION_OCTET_STREAM, ANY};

/// 二进制数据转换器
///
/// 请求载荷与响应体都按原样传输
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesConverter;

impl Converter for BytesConverter {
    fn convert_request(&self, body: Option<&Payload>) -> Result<Vec<u8>, ConvertError> {
        match body {
            None | Some(Payload::Empty) => Ok(Vec::new()),
            Some(Payload::Bytes(bytes)) => Ok(bytes.to_owned()),
            Some(other) => Err(ConvertError::unexpected(PayloadType::Bytes, other)),
        }
    }

    #[inline]
    fn convert_response(&self, raw: Option<&[u8]>) -> Result<Option<Payload>, ConvertError> {
        Ok(raw.map(|raw| Payload::Bytes(raw.to_vec())))
    }

    #[inline]
    fn content_type(&self) -> Option<&str> {
        Some(APPLICATION_OCTET_STREAM)
    }

    #[inline]
    fn accept(&self) -> Option<&str> {
        Some(ANY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_bytes_converter() -> Result<(), Box<dyn Error>> {
        let converter = BytesConverter;
        assert_eq!(converter.convert_request(Some(&vec![1u8, 2, 3].into()))?, [1, 2, 3]);
        assert!(converter.convert_request(None)?.is_empty());
        assert!(converter.convert_request(Some(&"text".into())).is_err());
        assert_eq!(converter.convert_response(Some(&[4, 5]))?, Some(vec![4u8, 5].into()));
        assert_eq!(converter.convert_response(None)?, None);
        Ok(())
    }
}
