use super::{ConverterNotFoundError, PayloadType};
use rivet_http::ResponseError as HttpResponseError;
use std::{io::Error as IoError, time::Duration};
use thiserror::Error;

/// 配置错误
///
/// 在引入错误配置的调用中同步返回，不会进入重试流程
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// 没有关联请求执行引擎
    #[error("Engine is not attached")]
    EngineNotAttached,

    /// 超时时长低于下限
    #[error("{name} {value:?} is less than the minimum {minimum:?}")]
    TimeoutTooSmall {
        /// 超时选项名称
        name: &'static str,
        /// 设置的超时时长
        value: Duration,
        /// 超时时长下限
        minimum: Duration,
    },

    /// 转换器未找到
    #[error("{0}")]
    ConverterNotFound(#[from] ConverterNotFoundError),

    /// 请求缺少方法，URL 或请求体
    #[error("Request is empty")]
    EmptyRequest,

    /// 请求体与声明的请求载荷类型不符
    #[error("Request body is {found}, but {expected} is declared")]
    PayloadMismatch {
        /// 声明的请求载荷类型
        expected: PayloadType,
        /// 实际的请求体类型
        found: PayloadType,
    },

    /// 传输层已经构建，不能再修改传输层选项
    #[error("Transport is already connected")]
    TransportConnected,

    /// 工作线程池已经启动，不能再修改工作线程池选项
    #[error("Dispatcher is already started")]
    DispatcherStarted,

    /// 传输层构建失败
    #[error("Connect transport error: {0}")]
    Connect(#[source] HttpResponseError),

    /// 工作线程创建失败
    #[error("Spawn worker thread error: {0}")]
    SpawnWorker(#[source] IoError),

    /// 工作线程数必须大于 0
    #[error("Thread count must be positive")]
    InvalidThreadCount,

    /// 无法识别的状态码
    #[error("Unknown status code: {0}")]
    UnknownStatus(u16),

    /// 任务队列已满，请求未被接受
    #[error("Worker queue is full")]
    QueueFull,
}

/// 配置结果
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 超时时长的下限
pub const MIN_TIMEOUT: Duration = Duration::from_millis(200);

pub(crate) fn check_timeout(name: &'static str, value: Duration) -> ConfigResult<Duration> {
    if value < MIN_TIMEOUT {
        return Err(ConfigError::TimeoutTooSmall {
            name,
            value,
            minimum: MIN_TIMEOUT,
        });
    }
    Ok(value)
}
