use std::fmt::{self, Display};

macro_rules! http_statuses {
    ($($(#[$docs:meta])* ($variant:ident, $code:literal, $reason:literal);)+) => {
        /// 可识别的 HTTP 状态码
        ///
        /// 除标准状态码外，还包含一个没有实际响应时使用的 `RequestFailed`（499）状态码，
        /// 例如重试耗尽或传输层失败时
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum HttpStatus {
            $(
                $(#[$docs])*
                $variant,
            )+
        }

        impl HttpStatus {
            /// 获取状态码数值
            #[inline]
            pub const fn code(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// 获取状态码描述
            #[inline]
            pub const fn reason(self) -> &'static str {
                match self {
                    $(Self::$variant => $reason,)+
                }
            }

            /// 根据状态码数值查找状态码，无法识别的状态码返回 `None`
            #[inline]
            pub const fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

http_statuses! {
    (Continue, 100, "Continue");
    (SwitchingProtocols, 101, "Switching Protocols");

    (Ok, 200, "OK");
    (Created, 201, "Created");
    (Accepted, 202, "Accepted");
    (NonAuthoritativeInformation, 203, "Non-Authoritative Information");
    (NoContent, 204, "No Content");
    (ResetContent, 205, "Reset Content");
    (PartialContent, 206, "Partial Content");

    (MultipleChoices, 300, "Multiple Choices");
    (MovedPermanently, 301, "Moved Permanently");
    (Found, 302, "Found");
    (SeeOther, 303, "See Other");
    (NotModified, 304, "Not Modified");
    (TemporaryRedirect, 307, "Temporary Redirect");
    (PermanentRedirect, 308, "Permanent Redirect");

    (BadRequest, 400, "Bad Request");
    (Unauthorized, 401, "Unauthorized");
    (PaymentRequired, 402, "Payment Required");
    (Forbidden, 403, "Forbidden");
    (NotFound, 404, "Not Found");
    (MethodNotAllowed, 405, "Method Not Allowed");
    (NotAcceptable, 406, "Not Acceptable");
    (ProxyAuthenticationRequired, 407, "Proxy Authentication Required");
    (RequestTimeout, 408, "Request Timeout");
    (Conflict, 409, "Conflict");
    (Gone, 410, "Gone");
    (LengthRequired, 411, "Length Required");
    (PreconditionFailed, 412, "Precondition Failed");
    (PayloadTooLarge, 413, "Payload Too Large");
    (UriTooLong, 414, "URI Too Long");
    (UnsupportedMediaType, 415, "Unsupported Media Type");
    (RangeNotSatisfiable, 416, "Range Not Satisfiable");
    (ExpectationFailed, 417, "Expectation Failed");
    (ImATeapot, 418, "I'm a teapot");
    (MisdirectedRequest, 421, "Misdirected Request");
    (UnprocessableEntity, 422, "Unprocessable Entity");
    (Locked, 423, "Locked");
    (FailedDependency, 424, "Failed Dependency");
    (TooEarly, 425, "Too Early");
    (UpgradeRequired, 426, "Upgrade Required");
    (PreconditionRequired, 428, "Precondition Required");
    (TooManyRequests, 429, "Too Many Requests");
    (RequestHeaderFieldsTooLarge, 431, "Request Header Fields Too Large");
    (UnavailableForLegalReasons, 451, "Unavailable For Legal Reasons");
    /// 请求失败，没有可用的响应状态码
    (RequestFailed, 499, "Request Failed");

    (InternalServerError, 500, "Internal Server Error");
    (NotImplemented, 501, "Not Implemented");
    (BadGateway, 502, "Bad Gateway");
    (ServiceUnavailable, 503, "Service Unavailable");
    (GatewayTimeout, 504, "Gateway Timeout");
    (HttpVersionNotSupported, 505, "HTTP Version Not Supported");
    (VariantAlsoNegotiates, 506, "Variant Also Negotiates");
    (InsufficientStorage, 507, "Insufficient Storage");
    (LoopDetected, 508, "Loop Detected");
    (NotExtended, 510, "Not Extended");
    (NetworkAuthenticationRequired, 511, "Network Authentication Required");
}

impl HttpStatus {
    /// 是否为错误状态码（小于 200 或大于等于 400）
    #[inline]
    pub const fn has_error(self) -> bool {
        let code = self.code();
        code < 200 || code >= 400
    }

    /// 是否为成功状态码（2xx）
    #[inline]
    pub const fn is_success(self) -> bool {
        let code = self.code();
        code >= 200 && code < 300
    }
}

impl Display for HttpStatus {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

impl From<HttpStatus> for u16 {
    #[inline]
    fn from(status: HttpStatus) -> Self {
        status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(HttpStatus::from_code(200), Some(HttpStatus::Ok));
        assert_eq!(HttpStatus::from_code(429), Some(HttpStatus::TooManyRequests));
        assert_eq!(HttpStatus::from_code(499), Some(HttpStatus::RequestFailed));
        assert_eq!(HttpStatus::from_code(299), None);
        assert_eq!(HttpStatus::from_code(0), None);
        for code in 0..1000u16 {
            if let Some(status) = HttpStatus::from_code(code) {
                assert_eq!(status.code(), code);
            }
        }
    }

    #[test]
    fn test_has_error() {
        assert!(HttpStatus::Continue.has_error());
        assert!(!HttpStatus::Ok.has_error());
        assert!(!HttpStatus::NoContent.has_error());
        assert!(!HttpStatus::Found.has_error());
        assert!(HttpStatus::NotFound.has_error());
        assert!(HttpStatus::RequestFailed.has_error());
        assert!(HttpStatus::GatewayTimeout.has_error());
        assert_eq!(HttpStatus::GatewayTimeout.to_string(), "504 Gateway Timeout");
    }
}
