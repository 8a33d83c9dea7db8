use anyhow::Error as AnyError;
use log::debug;
use rivet_http::{
    Connector as ConnectorTrait, Headers, HttpCaller, Request, Response, ResponseError, ResponseErrorKind,
    ResponseResult, TransportOptions,
};
use std::{
    error::Error as StdError,
    io::{Error as IoError, ErrorKind as IoErrorKind, Read},
};
use ureq::{
    Agent, AgentBuilder, Error as UreqError, ErrorKind as UreqErrorKind, Request as UreqRequest,
    Response as UreqResponse, Transport,
};

/// Ureq 客户端
#[derive(Debug, Clone)]
pub struct Client {
    client: Agent,
}

impl Client {
    /// 创建 Ureq 客户端
    #[inline]
    pub fn new(client: Agent) -> Self {
        Self { client }
    }

    /// 根据传输层选项创建 Ureq 客户端
    ///
    /// Ureq 不支持设置空闲连接保持时长，该选项将被忽略
    pub fn with_options(options: &TransportOptions) -> Self {
        if options.pool_keep_alive() != TransportOptions::DEFAULT_POOL_KEEP_ALIVE {
            debug!(
                "pool keep-alive {:?} is ignored by the ureq transport",
                options.pool_keep_alive()
            );
        }
        Self::new(
            AgentBuilder::new()
                .timeout_connect(options.connect_timeout())
                .timeout_read(options.read_timeout())
                .timeout_write(options.write_timeout())
                .max_idle_connections(options.pool_max_idle())
                .max_idle_connections_per_host(options.pool_max_idle())
                .build(),
        )
    }
}

impl From<Agent> for Client {
    #[inline]
    fn from(agent: Agent) -> Self {
        Self::new(agent)
    }
}

impl Default for Client {
    #[inline]
    fn default() -> Self {
        Self::with_options(&Default::default())
    }
}

impl HttpCaller for Client {
    fn call(&self, request: &Request) -> ResponseResult {
        let ureq_request = make_ureq_request(&self.client, request);
        let result = match request.body() {
            Some(body) => ureq_request.send_bytes(body),
            None => ureq_request.call(),
        };
        match result {
            Ok(response) => make_response(response, request),
            Err(UreqError::Status(_, response)) => make_response(response, request),
            Err(UreqError::Transport(transport)) => Err(from_ureq_transport(transport, request)),
        }
    }
}

/// Ureq 连接器
///
/// 每次连接都会根据传输层选项构建新的 [`Client`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Connector;

impl ConnectorTrait for Connector {
    type Caller = Client;

    #[inline]
    fn connect(&self, options: &TransportOptions) -> Result<Self::Caller, ResponseError> {
        Ok(Client::with_options(options))
    }
}

fn make_ureq_request(agent: &Agent, request: &Request) -> UreqRequest {
    let mut request_builder = agent.request(request.method().as_str(), request.url());
    for (header_name, header_value) in request.headers() {
        request_builder = request_builder.set(header_name, header_value);
    }
    request_builder
}

fn make_response(response: UreqResponse, request: &Request) -> ResponseResult {
    let mut headers = Headers::new();
    for header_name in response.headers_names() {
        headers.insert_values(header_name.to_owned(), response.all(&header_name));
    }
    let status_code = response.status();
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|err| build_receive_error(request, err))?;
    Ok(Response::builder()
        .status_code(status_code)
        .headers(headers)
        .body(body)
        .build())
}

fn build_receive_error(request: &Request, err: IoError) -> ResponseError {
    let kind = if is_timeout(&err) {
        ResponseErrorKind::TimeoutError
    } else {
        ResponseErrorKind::ReceiveError
    };
    ResponseError::builder(kind, err).url(request.url()).build()
}

fn from_ureq_transport(transport: Transport, request: &Request) -> ResponseError {
    let response_error_kind = match transport.kind() {
        UreqErrorKind::InvalidUrl => ResponseErrorKind::InvalidUrl,
        UreqErrorKind::UnknownScheme => ResponseErrorKind::InvalidUrl,
        UreqErrorKind::Dns => ResponseErrorKind::UnknownHostError,
        UreqErrorKind::ConnectionFailed => ResponseErrorKind::ConnectError,
        UreqErrorKind::TooManyRedirects => ResponseErrorKind::TooManyRedirect,
        UreqErrorKind::BadStatus => ResponseErrorKind::InvalidRequestResponse,
        UreqErrorKind::BadHeader => ResponseErrorKind::InvalidHeader,
        UreqErrorKind::Io if source_is_timeout(&transport) => ResponseErrorKind::TimeoutError,
        UreqErrorKind::Io => ResponseErrorKind::LocalIoError,
        UreqErrorKind::InvalidProxyUrl => ResponseErrorKind::ProxyError,
        UreqErrorKind::ProxyConnect => ResponseErrorKind::ProxyError,
        UreqErrorKind::ProxyUnauthorized => ResponseErrorKind::ProxyError,
        UreqErrorKind::HTTP => ResponseErrorKind::InvalidRequestResponse,
        UreqErrorKind::InsecureRequestHttpsOnly => ResponseErrorKind::SslError,
    };
    ResponseError::builder(response_error_kind, AnyError::new(transport))
        .url(request.url())
        .build()
}

fn source_is_timeout(transport: &Transport) -> bool {
    transport
        .source()
        .and_then(|source| source.downcast_ref::<IoError>())
        .map_or(false, is_timeout)
}

fn is_timeout(err: &IoError) -> bool {
    matches!(err.kind(), IoErrorKind::TimedOut | IoErrorKind::WouldBlock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_connect_ignores_pool_keep_alive() -> Result<(), ResponseError> {
        env_logger::builder().is_test(true).try_init().ok();

        let options = TransportOptions::builder()
            .pool_max_idle(2)
            .pool_keep_alive(Duration::from_secs(60))
            .build();
        let client = Connector.connect(&options)?;
        assert!(format!("{:?}", client).starts_with("Client"));
        Ok(())
    }
}
