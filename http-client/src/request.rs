use super::{Converter, ConverterNotFoundError, ConverterRegistry, Payload, PayloadType};
use rivet_http::{user_agent, Form, Headers, Method, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 逻辑 HTTP 请求
///
/// 由 [`RequestBuilder`] 构建，包含请求载荷以及选定的转换器。
/// 相等性与哈希仅由 HTTP 头，请求方法，URL 与请求载荷决定。
#[derive(Clone)]
pub struct Request {
    method: Method,
    url: Option<String>,
    headers: Headers,
    form: Option<Form>,
    body: Option<Payload>,
    converter: Arc<dyn Converter>,
    request_type: PayloadType,
    response_type: PayloadType,
    error_type: Option<PayloadType>,
}

impl Request {
    /// 从转换器注册表中选定转换器，创建请求构建器
    pub fn builder(
        registry: &ConverterRegistry,
        request_type: PayloadType,
        response_type: PayloadType,
    ) -> Result<RequestBuilder, ConverterNotFoundError> {
        let converter = registry.lookup(&request_type, &response_type)?;
        Ok(RequestBuilder::with_converter(converter, request_type, response_type))
    }

    /// 获取 HTTP 请求方法
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// 获取 URL
    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// 获取 HTTP 请求头
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 获取查询表单
    ///
    /// 仅 `GET` 请求会将表单作为查询字符串
    #[inline]
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// 获取请求载荷
    #[inline]
    pub fn body(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    /// 是否包含请求载荷
    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// 获取转换器
    #[inline]
    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

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

    /// 获取错误载荷类型
    #[inline]
    pub fn error_type(&self) -> Option<&PayloadType> {
        self.error_type.as_ref()
    }

    /// 获取最终请求的 URL
    ///
    /// `GET` 请求携带非空表单时，将表单字符串作为查询字符串追加到 URL 后
    pub fn endpoint_url(&self) -> Option<String> {
        let url = self.url.as_deref()?;
        match &self.form {
            Some(form) if self.method == Method::GET && !form.is_empty() => {
                Some(format!("{}?{}", url, form.to_form_string()))
            }
            _ => Some(url.to_owned()),
        }
    }

    /// 请求是否不完整
    ///
    /// URL 未设置，或非 `GET` 请求缺少请求载荷时，请求不完整
    pub fn is_empty(&self) -> bool {
        self.url.as_deref().map_or(true, str::is_empty) || (self.method != Method::GET && self.body.is_none())
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("form", &self.form)
            .field("body", &self.body)
            .field("request_type", &self.request_type)
            .field("response_type", &self.response_type)
            .field("error_type", &self.error_type)
            .finish()
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.headers == other.headers
            && self.method == other.method
            && self.url == other.url
            && self.body == other.body
    }
}

impl Eq for Request {}

impl Hash for Request {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.headers.hash(state);
        self.method.hash(state);
        self.url.hash(state);
        self.body.hash(state);
    }
}

/// 逻辑 HTTP 请求构建器
///
/// 每一步都消耗构建器并返回新的构建器，最终由 [`RequestBuilder::build`] 生成请求
#[derive(Debug)]
#[must_use]
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    /// 使用指定的转换器创建请求构建器
    ///
    /// 新请求默认携带 User-Agent，以及转换器声明的 Accept 与 Content-Type
    pub fn with_converter(
        converter: Arc<dyn Converter>,
        request_type: PayloadType,
        response_type: PayloadType,
    ) -> Self {
        let mut headers = Headers::new();
        headers.insert(USER_AGENT, user_agent());
        if let Some(accept) = converter.accept() {
            headers.insert(ACCEPT, accept);
        }
        if let Some(content_type) = converter.content_type() {
            headers.insert(CONTENT_TYPE, content_type);
        }
        Self {
            inner: Request {
                headers,
                converter,
                request_type,
                response_type,
                method: Default::default(),
                url: None,
                form: None,
                body: None,
                error_type: None,
            },
        }
    }

    /// 设置 HTTP 请求方法
    ///
    /// 非 `GET` 请求在没有设置 Content-Type 时，默认使用表单的 Content-Type
    pub fn method(mut self, method: Method) -> Self {
        self.inner.method = method;
        if method != Method::GET && self.inner.headers.content_type().is_none() {
            self.inner.headers.insert(CONTENT_TYPE, DEFAULT_CONTENT_TYPE);
        }
        self
    }

    /// 设置 URL
    #[inline]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    /// 设置 HTTP 请求头，值为空时忽略
    #[inline]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.headers.insert(name, value);
        self
    }

    /// 合并 HTTP 请求头，同名头以传入的值为准
    #[inline]
    pub fn headers(mut self, headers: &Headers) -> Self {
        self.inner.headers.extend_from(headers);
        self
    }

    /// 设置 Accept
    #[inline]
    pub fn accept(self, accept: impl Into<String>) -> Self {
        self.header(ACCEPT, accept)
    }

    /// 设置 Content-Type
    #[inline]
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(CONTENT_TYPE, content_type)
    }

    /// 设置表单
    ///
    /// `GET` 请求的表单作为查询字符串，其他请求的表单作为请求载荷，
    /// 因此应当在设置请求方法之后调用
    pub fn form(mut self, form: Form) -> Self {
        if self.inner.method == Method::GET {
            self.inner.form = Some(form);
        } else {
            self.inner.body = Some(Payload::Form(form));
        }
        self
    }

    /// 设置请求载荷
    ///
    /// `GET` 请求不携带请求体，此时调用将被忽略
    pub fn body(mut self, body: impl Into<Payload>) -> Self {
        if self.inner.method != Method::GET {
            self.inner.body = Some(body.into());
        }
        self
    }

    /// 声明错误载荷类型
    ///
    /// 声明后，错误状态码的响应载荷将放入 [`crate::Response::error`] 中
    #[inline]
    pub fn error_type(mut self, error_type: PayloadType) -> Self {
        self.inner.error_type = Some(error_type);
        self
    }

    /// 构建逻辑 HTTP 请求
    #[inline]
    pub fn build(self) -> Request {
        self.inner
    }
}
