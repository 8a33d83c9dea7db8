use super::{
    super::{ConfigError, Engine, Request, Response},
    check_request,
};
use rivet_http::Connector;
use std::num::NonZeroUsize;

/// 异步请求工厂
///
/// 请求在引擎的工作线程池中执行，`invoke` 立即返回，
/// 终结的响应通过回调函数交付
#[derive(Debug)]
pub struct AsyncFactory<C: Connector> {
    engine: Option<Engine<C>>,
}

impl<C: Connector> AsyncFactory<C> {
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

    /// 异步执行请求
    ///
    /// 返回 `Ok` 后不会再有任何错误返回给调用方，
    /// 回调函数在工作线程中被调用且仅被调用一次；
    /// 任务队列已满时返回 [`ConfigError::QueueFull`]，回调函数不会被调用
    pub fn invoke(
        &self,
        request: Request,
        callback: impl FnOnce(Response) + Send + 'static,
    ) -> Result<(), ConfigError> {
        let engine = self.attached()?;
        check_request(&request)?;
        engine.enqueue(request, callback)
    }

    /// 设置工作线程数
    ///
    /// 工作线程池启动后不可再修改
    pub fn set_thread_count(&mut self, thread_count: usize) -> Result<&mut Self, ConfigError> {
        let thread_count = NonZeroUsize::new(thread_count).ok_or(ConfigError::InvalidThreadCount)?;
        self.attached_mut()?.update_dispatcher_options(|options| {
            options.set_thread_count(thread_count);
        })?;
        Ok(self)
    }

    /// 设置任务队列容量
    ///
    /// 低于 [`DispatcherOptions::MIN_QUEUE_CAPACITY`](crate::DispatcherOptions::MIN_QUEUE_CAPACITY) 时使用下限，
    /// 工作线程池启动后不可再修改
    pub fn set_queue_capacity(&mut self, queue_capacity: usize) -> Result<&mut Self, ConfigError> {
        self.attached_mut()?.update_dispatcher_options(|options| {
            options.set_queue_capacity(queue_capacity);
        })?;
        Ok(self)
    }
}

impl_factory_setters!(AsyncFactory);

#[cfg(feature = "ureq")]
impl Default for AsyncFactory<rivet_ureq::Connector> {
    #[inline]
    fn default() -> Self {
        Self::new(Engine::new(rivet_ureq::Connector))
    }
}
