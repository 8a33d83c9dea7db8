mod async_call;
mod backoff;
mod config;
mod convert;
mod dispatcher;
mod retry;
mod sync_call;

pub use backoff::{default_backoff, Backoff, FixedBackoff, RandomizedBackoff, Ratio, NO_BACKOFF};
pub use config::EngineConfig;
pub use dispatcher::DispatcherOptions;
pub use retry::{RetriedStatsInfo, RetryPolicy};

use super::{ConfigError, ConverterRegistry, Request, Response};
use assert_impl::assert_impl;
use async_call::AsyncCall;
use dispatcher::Dispatcher;
use log::{info, warn};
use once_cell::sync::OnceCell;
use rivet_http::{Connector, HttpCaller, TransportOptions};
use std::{fmt, sync::Arc};

/// 请求执行引擎
///
/// 持有传输层，转换器注册表，重试策略与退避策略，
/// 同时提供阻塞执行与在工作线程池中异步执行两种方式。
///
/// 传输层在首次执行请求时才会构建，此后传输层选项不可再修改；
/// 工作线程池在首次异步执行请求时启动
pub struct Engine<C: Connector> {
    connector: C,
    transport_options: TransportOptions,
    caller: OnceCell<Arc<C::Caller>>,
    registry: Arc<ConverterRegistry>,
    retry_policy: Arc<RetryPolicy>,
    backoff: Arc<dyn Backoff>,
    dispatcher_options: DispatcherOptions,
    dispatcher: OnceCell<Dispatcher<AsyncCall>>,
}

impl<C: Connector> Engine<C> {
    /// 使用默认配置创建引擎
    #[inline]
    pub fn new(connector: C) -> Self {
        Self::builder(connector).build()
    }

    /// 创建引擎构建器
    #[inline]
    pub fn builder(connector: C) -> EngineBuilder<C> {
        EngineBuilder::new(connector)
    }

    /// 获取传输层连接器
    #[inline]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// 获取转换器注册表
    #[inline]
    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    /// 获取传输层选项
    #[inline]
    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// 获取重试策略
    #[inline]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// 获取工作线程池选项
    #[inline]
    pub fn dispatcher_options(&self) -> &DispatcherOptions {
        &self.dispatcher_options
    }

    /// 获取退避策略
    #[inline]
    pub fn backoff(&self) -> &dyn Backoff {
        &*self.backoff
    }

    /// 传输层是否已经构建
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.caller.get().is_some()
    }

    /// 修改传输层选项
    ///
    /// 传输层已经构建后返回 [`ConfigError::TransportConnected`]
    pub fn update_transport_options(&mut self, f: impl FnOnce(&mut TransportOptions)) -> Result<(), ConfigError> {
        if self.is_connected() {
            return Err(ConfigError::TransportConnected);
        }
        f(&mut self.transport_options);
        Ok(())
    }

    /// 修改重试策略
    ///
    /// 仅影响此后发出的请求，已在执行中的异步请求继续使用提交时的策略
    #[inline]
    pub fn retry_policy_mut(&mut self) -> &mut RetryPolicy {
        Arc::make_mut(&mut self.retry_policy)
    }

    /// 修改工作线程池选项
    ///
    /// 工作线程池已经启动后返回 [`ConfigError::DispatcherStarted`]
    pub fn update_dispatcher_options(&mut self, f: impl FnOnce(&mut DispatcherOptions)) -> Result<(), ConfigError> {
        if self.dispatcher.get().is_some() {
            return Err(ConfigError::DispatcherStarted);
        }
        f(&mut self.dispatcher_options);
        Ok(())
    }

    /// 设置退避策略
    #[inline]
    pub fn set_backoff(&mut self, backoff: impl Backoff + 'static) -> &mut Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// 阻塞执行请求
    ///
    /// 只有传输层无法构建时才返回 `Err`，请求本身的失败都记录在响应中
    pub fn execute(&self, request: &Request) -> Result<Response, ConfigError> {
        let caller = self.caller()?;
        Ok(sync_call::call(&**caller, request, &self.retry_policy, &*self.backoff))
    }

    /// 在工作线程池中异步执行请求
    ///
    /// 返回 `Ok` 后，回调函数将在工作线程中被调用且仅被调用一次；
    /// 任务队列已满时返回 [`ConfigError::QueueFull`]，回调函数不会被调用
    pub fn enqueue(
        &self,
        request: Request,
        callback: impl FnOnce(Response) + Send + 'static,
    ) -> Result<(), ConfigError> {
        let caller: Arc<dyn HttpCaller> = self.caller()?.to_owned();
        let dispatcher = self
            .dispatcher
            .get_or_try_init(|| Dispatcher::start(&self.dispatcher_options))?;
        let call = AsyncCall::new(
            caller,
            request,
            self.retry_policy.to_owned(),
            Box::new(callback),
            dispatcher.submitter(),
        );
        dispatcher.submit(call).map_err(|call| {
            warn!("worker queue is full, request to {:?} is not accepted", call.url());
            ConfigError::QueueFull
        })
    }

    fn caller(&self) -> Result<&Arc<C::Caller>, ConfigError> {
        self.caller.get_or_try_init(|| {
            let caller = self
                .connector
                .connect(&self.transport_options)
                .map_err(ConfigError::Connect)?;
            info!("transport connected with {:?}", self.transport_options);
            Ok(Arc::new(caller))
        })
    }

    #[allow(dead_code)]
    fn assert() {
        assert_impl!(Send: Self);
        assert_impl!(Sync: Self);
    }
}

impl<C: Connector> fmt::Debug for Engine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("connector", &self.connector)
            .field("transport_options", &self.transport_options)
            .field("connected", &self.is_connected())
            .field("registry", &self.registry)
            .field("retry_policy", &self.retry_policy)
            .field("backoff", &self.backoff)
            .field("dispatcher_options", &self.dispatcher_options)
            .field("dispatcher", &self.dispatcher.get())
            .finish()
    }
}

/// 请求执行引擎构建器
#[must_use]
#[derive(Debug)]
pub struct EngineBuilder<C> {
    connector: C,
    transport_options: TransportOptions,
    registry: Arc<ConverterRegistry>,
    retry_policy: RetryPolicy,
    backoff: Arc<dyn Backoff>,
    dispatcher_options: DispatcherOptions,
}

impl<C: Connector> EngineBuilder<C> {
    /// 创建引擎构建器
    #[inline]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            transport_options: Default::default(),
            registry: Default::default(),
            retry_policy: Default::default(),
            backoff: Arc::new(default_backoff()),
            dispatcher_options: Default::default(),
        }
    }

    /// 设置传输层选项
    #[inline]
    pub fn transport_options(mut self, transport_options: TransportOptions) -> Self {
        self.transport_options = transport_options;
        self
    }

    /// 设置转换器注册表
    ///
    /// 默认使用注册了所有内置转换器的注册表
    #[inline]
    pub fn registry(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// 设置重试策略
    #[inline]
    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// 设置退避策略
    ///
    /// 默认在 1 到 2 秒之间随机退避
    #[inline]
    pub fn backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// 设置工作线程池选项
    #[inline]
    pub fn dispatcher_options(mut self, dispatcher_options: DispatcherOptions) -> Self {
        self.dispatcher_options = dispatcher_options;
        self
    }

    /// 应用引擎配置
    ///
    /// 覆盖传输层选项，重试策略与工作线程池选项
    pub fn config(mut self, config: &EngineConfig) -> Result<Self, ConfigError> {
        self.transport_options = config.transport_options()?;
        self.retry_policy = config.retry_policy()?;
        self.dispatcher_options = config.dispatcher_options()?;
        Ok(self)
    }

    /// 构建引擎
    pub fn build(self) -> Engine<C> {
        Engine {
            connector: self.connector,
            transport_options: self.transport_options,
            caller: OnceCell::new(),
            registry: self.registry,
            retry_policy: Arc::new(self.retry_policy),
            backoff: self.backoff,
            dispatcher_options: self.dispatcher_options,
            dispatcher: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{
            test_utils::{FakeConnector, ScriptedCaller},
            PayloadType,
        },
        *,
    };
    use crossbeam_channel::bounded;
    use rivet_http::{HttpStatus, ResponseErrorKind as HttpResponseErrorKind};
    use serde_json::json;
    use std::{error::Error, thread, time::Duration};

    fn engine(caller: ScriptedCaller) -> Engine<FakeConnector> {
        Engine::builder(FakeConnector::new(caller)).backoff(NO_BACKOFF).build()
    }

    fn get_json(engine: &Engine<FakeConnector>) -> Result<Request, Box<dyn Error>> {
        Ok(
            Request::builder(engine.registry(), PayloadType::Empty, PayloadType::Json)?
                .url("http://localhost/items")
                .build(),
        )
    }

    #[test]
    fn test_connects_once() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let engine = Arc::new(engine(ScriptedCaller::new().status(200, b"{}")));
        assert!(!engine.is_connected());
        let threads = (0..8)
            .map(|_| {
                let engine = engine.to_owned();
                thread::spawn(move || {
                    let request = Request::builder(engine.registry(), PayloadType::Empty, PayloadType::Json)
                        .unwrap()
                        .url("http://localhost/items")
                        .build();
                    engine.execute(&request).unwrap().status()
                })
            })
            .collect::<Vec<_>>();
        for thread in threads {
            assert_eq!(thread.join().unwrap(), HttpStatus::Ok);
        }
        assert!(engine.is_connected());
        assert_eq!(engine.connector.connects(), 1);
        assert_eq!(engine.connector.caller().attempts(), 8);
        Ok(())
    }

    #[test]
    fn test_transport_options_frozen_after_connect() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let mut engine = engine(ScriptedCaller::new().status(200, b"{}"));
        engine.update_transport_options(|options| {
            options.set_read_timeout(Duration::from_millis(900));
        })?;
        engine.execute(&get_json(&engine)?)?;
        assert_eq!(
            engine.connector.last_options().map(|options| options.read_timeout()),
            Some(Duration::from_millis(900))
        );
        assert!(matches!(
            engine.update_transport_options(|options| {
                options.set_read_timeout(Duration::from_millis(300));
            }),
            Err(ConfigError::TransportConnected)
        ));
        Ok(())
    }

    #[test]
    fn test_connect_failure_is_config_error() -> Result<(), Box<dyn Error>> {
        let engine = Engine::new(FakeConnector::failing());
        let request = get_json(&engine)?;
        assert!(matches!(engine.execute(&request), Err(ConfigError::Connect(_))));
        assert!(matches!(
            engine.enqueue(request, |_| unreachable!()),
            Err(ConfigError::Connect(_))
        ));
        assert!(!engine.is_connected());
        Ok(())
    }

    #[test]
    fn test_retry_policy_changes_apply_to_later_requests() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let mut engine = engine(ScriptedCaller::new().status(503, b""));
        let response = engine.execute(&get_json(&engine)?)?;
        assert_eq!(response.status(), HttpStatus::ServiceUnavailable);
        assert_eq!(engine.connector.caller().attempts(), 1);

        engine
            .retry_policy_mut()
            .set_retry_count(2)
            .add_retry_status(HttpStatus::ServiceUnavailable);
        let response = engine.execute(&get_json(&engine)?)?;
        assert_eq!(response.status(), HttpStatus::ServiceUnavailable);
        assert!(response.has_exception());
        assert_eq!(engine.connector.caller().attempts(), 4);
        Ok(())
    }

    #[test]
    fn test_enqueue_rejected_when_queue_full() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let engine = engine(ScriptedCaller::new().status(200, b"{}"));
        assert!(engine.dispatcher.set(Dispatcher::saturated()).is_ok());
        assert!(matches!(
            engine.enqueue(get_json(&engine)?, |_| unreachable!()),
            Err(ConfigError::QueueFull)
        ));
        assert_eq!(engine.connector.caller().attempts(), 0);
        Ok(())
    }

    #[test]
    fn test_enqueue() -> Result<(), Box<dyn Error>> {
        env_logger::builder().is_test(true).try_init().ok();

        let mut engine = engine(
            ScriptedCaller::new()
                .transport_error(HttpResponseErrorKind::ConnectError)
                .status(200, br#"{"id":7}"#),
        );
        engine.update_dispatcher_options(|options| {
            options.set_thread_name_prefix("engine-test");
        })?;
        let (tx, rx) = bounded(1);
        engine.enqueue(get_json(&engine)?, move |response| {
            tx.send((response, thread::current().name().map(ToOwned::to_owned)))
                .unwrap()
        })?;
        let (response, thread_name) = rx.recv_timeout(Duration::from_secs(5))?;
        assert_eq!(response.body(), Some(&json!({"id": 7}).into()));
        assert!(thread_name.unwrap().starts_with("engine-test-"));
        assert!(matches!(
            engine.update_dispatcher_options(|_| {}),
            Err(ConfigError::DispatcherStarted)
        ));
        Ok(())
    }

    #[test]
    fn test_config() -> Result<(), Box<dyn Error>> {
        let config: EngineConfig = serde_json::from_str(r#"{"retry_count": 0, "connect_timeout_ms": 1500}"#)?;
        let engine = Engine::builder(FakeConnector::new(ScriptedCaller::new()))
            .config(&config)?
            .build();
        assert_eq!(engine.retry_policy().retry_count(), 0);
        assert_eq!(engine.transport_options().connect_timeout(), Duration::from_millis(1500));
        assert!(engine.retry_policy().is_retryable(HttpStatus::GatewayTimeout));

        let config: EngineConfig = serde_json::from_str(r#"{"connect_timeout_ms": 0, "read_timeout_ms": 5}"#)?;
        assert!(matches!(
            Engine::builder(FakeConnector::new(ScriptedCaller::new())).config(&config),
            Err(ConfigError::TimeoutTooSmall { .. })
        ));
        Ok(())
    }
}
