use super::{
    super::{ConfigError, Engine, Request, Response},
    check_request,
};
use rivet_http::Connector;

/// 阻塞请求工厂
///
/// 在调用方线程上执行请求，包括重试之间的退避等待
#[derive(Debug)]
pub struct SyncFactory<C: Connector> {
    engine: Option<Engine<C>>,
}

impl<C: Connector> SyncFactory<C> {
    /// 创建关联了请求执行引擎的请求工厂
    #[inline]
    pub fn new(engine: Engine<C>) -> Self {
        Self { engine: Some(engine) }
    }

    /// 创建没有关联请求执行引擎的请求工厂
    #[inline]
    pub fn detached() -> Self {
        Self { engine: None }
    }

    /// 阻塞执行请求
    ///
    /// 只有配置错误才会返回 `Err`，请求失败记录在返回的响应中
    pub fn invoke(&self, request: &Request) -> Result<Response, ConfigError> {
        let engine = self.attached()?;
        check_request(request)?;
        engine.execute(request)
    }
}

impl_factory_setters!(SyncFactory);

#[cfg(feature = "ureq")]
impl Default for SyncFactory<rivet_ureq::Connector> {
    #[inline]
    fn default() -> Self {
        Self::new(Engine::new(rivet_ureq::Connector))
    }
}
