macro_rules! impl_factory_setters {
    ($factory:ident) => {
        impl<C: rivet_http::Connector> $factory<C> {
            /// 关联请求执行引擎，返回之前关联的引擎
            #[inline]
            pub fn attach(&mut self, engine: $crate::Engine<C>) -> Option<$crate::Engine<C>> {
                self.engine.replace(engine)
            }

            /// 获取关联的请求执行引擎
            #[inline]
            pub fn engine(&self) -> Option<&$crate::Engine<C>> {
                self.engine.as_ref()
            }

            /// 获取关联的请求执行引擎的可变引用
            #[inline]
            pub fn engine_mut(&mut self) -> Option<&mut $crate::Engine<C>> {
                self.engine.as_mut()
            }

            fn attached(&self) -> Result<&$crate::Engine<C>, $crate::ConfigError> {
                self.engine.as_ref().ok_or($crate::ConfigError::EngineNotAttached)
            }

            fn attached_mut(&mut self) -> Result<&mut $crate::Engine<C>, $crate::ConfigError> {
                self.engine.as_mut().ok_or($crate::ConfigError::EngineNotAttached)
            }

            /// 使用关联引擎的转换器注册表创建请求构建器
            pub fn request(
                &self,
                request_type: $crate::PayloadType,
                response_type: $crate::PayloadType,
            ) -> Result<$crate::RequestBuilder, $crate::ConfigError> {
                let engine = self.attached()?;
                Ok($crate::Request::builder(engine.registry(), request_type, response_type)?)
            }

            /// 设置重试次数
            pub fn set_retry_count(&mut self, retry_count: usize) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.retry_policy_mut().set_retry_count(retry_count);
                Ok(self)
            }

            /// 添加可重试的状态码
            pub fn add_retry_status(
                &mut self,
                status: rivet_http::HttpStatus,
            ) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.retry_policy_mut().add_retry_status(status);
                Ok(self)
            }

            /// 替换可重试的状态码集合
            pub fn set_retry_statuses(
                &mut self,
                statuses: impl IntoIterator<Item = rivet_http::HttpStatus>,
            ) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.retry_policy_mut().set_retry_statuses(statuses);
                Ok(self)
            }

            /// 设置退避策略
            pub fn set_backoff(
                &mut self,
                backoff: impl $crate::Backoff + 'static,
            ) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.set_backoff(backoff);
                Ok(self)
            }

            /// 设置连接超时时长，不能低于 [`MIN_TIMEOUT`](crate::MIN_TIMEOUT)
            pub fn set_connect_timeout(&mut self, timeout: std::time::Duration) -> Result<&mut Self, $crate::ConfigError> {
                let timeout = $crate::error::check_timeout("connect timeout", timeout)?;
                self.attached_mut()?.update_transport_options(|options| {
                    options.set_connect_timeout(timeout);
                })?;
                Ok(self)
            }

            /// 设置读取超时时长，不能低于 [`MIN_TIMEOUT`](crate::MIN_TIMEOUT)
            pub fn set_read_timeout(&mut self, timeout: std::time::Duration) -> Result<&mut Self, $crate::ConfigError> {
                let timeout = $crate::error::check_timeout("read timeout", timeout)?;
                self.attached_mut()?.update_transport_options(|options| {
                    options.set_read_timeout(timeout);
                })?;
                Ok(self)
            }

            /// 设置写入超时时长，不能低于 [`MIN_TIMEOUT`](crate::MIN_TIMEOUT)
            pub fn set_write_timeout(&mut self, timeout: std::time::Duration) -> Result<&mut Self, $crate::ConfigError> {
                let timeout = $crate::error::check_timeout("write timeout", timeout)?;
                self.attached_mut()?.update_transport_options(|options| {
                    options.set_write_timeout(timeout);
                })?;
                Ok(self)
            }

            /// 设置连接池最大空闲连接数
            pub fn set_pool_max_idle(&mut self, max_idle: usize) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.update_transport_options(|options| {
                    options.set_pool_max_idle(max_idle);
                })?;
                Ok(self)
            }

            /// 设置空闲连接保持时长
            pub fn set_pool_keep_alive(
                &mut self,
                keep_alive: std::time::Duration,
            ) -> Result<&mut Self, $crate::ConfigError> {
                self.attached_mut()?.update_transport_options(|options| {
                    options.set_pool_keep_alive(keep_alive);
                })?;
                Ok(self)
            }

            /// 注册转换器
            pub fn register_converter(
                &mut self,
                request_type: $crate::PayloadType,
                response_type: $crate::PayloadType,
                converter: impl $crate::Converter + 'static,
            ) -> Result<&mut Self, $crate::ConfigError> {
                self.attached()?.registry().register(request_type, response_type, converter);
                Ok(self)
            }
        }
    };
}

mod async_factory;
mod sync_factory;

pub use async_factory::AsyncFactory;
pub use sync_factory::SyncFactory;

use super::{ConfigError, Request};

fn check_request(request: &Request) -> Result<(), ConfigError> {
    if request.is_empty() {
        return Err(ConfigError::EmptyRequest);
    }
    match request.body() {
        Some(body) if !request.request_type().accepts(body) => Err(ConfigError::PayloadMismatch {
            expected: request.request_type().to_owned(),
            found: body.payload_type(),
        }),
        _ => Ok(()),
    }
}
