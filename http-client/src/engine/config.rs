use super::{
    super::{error::check_timeout, ConfigError},
    DispatcherOptions, RetryPolicy,
};
use rivet_http::{HttpStatus, TransportOptions};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, time::Duration};

/// 引擎配置
///
/// 可以从任意 serde 支持的格式中加载，时长均以毫秒为单位，缺省的字段使用默认值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 重试次数
    pub retry_count: usize,
    /// 可重试的状态码
    pub retry_statuses: Vec<u16>,
    /// 连接超时时长
    pub connect_timeout_ms: u64,
    /// 读取超时时长
    pub read_timeout_ms: u64,
    /// 写入超时时长
    pub write_timeout_ms: u64,
    /// 连接池最大空闲连接数
    pub pool_max_idle: usize,
    /// 空闲连接保持时长
    pub pool_keep_alive_ms: u64,
    /// 工作线程数，未设置时使用默认值
    pub thread_count: Option<usize>,
    /// 任务队列容量
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_count: RetryPolicy::DEFAULT_RETRY_COUNT,
            retry_statuses: RetryPolicy::DEFAULT_RETRY_STATUSES
                .iter()
                .map(|status| status.code())
                .collect(),
            connect_timeout_ms: millis(TransportOptions::DEFAULT_CONNECT_TIMEOUT),
            read_timeout_ms: millis(TransportOptions::DEFAULT_READ_TIMEOUT),
            write_timeout_ms: millis(TransportOptions::DEFAULT_WRITE_TIMEOUT),
            pool_max_idle: TransportOptions::DEFAULT_POOL_MAX_IDLE,
            pool_keep_alive_ms: millis(TransportOptions::DEFAULT_POOL_KEEP_ALIVE),
            thread_count: None,
            queue_capacity: DispatcherOptions::MIN_QUEUE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub(super) fn transport_options(&self) -> Result<TransportOptions, ConfigError> {
        Ok(TransportOptions::builder()
            .connect_timeout(check_timeout(
                "connect timeout",
                Duration::from_millis(self.connect_timeout_ms),
            )?)
            .read_timeout(check_timeout("read timeout", Duration::from_millis(self.read_timeout_ms))?)
            .write_timeout(check_timeout("write timeout", Duration::from_millis(self.write_timeout_ms))?)
            .pool_max_idle(self.pool_max_idle)
            .pool_keep_alive(Duration::from_millis(self.pool_keep_alive_ms))
            .build())
    }

    pub(super) fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let statuses = self
            .retry_statuses
            .iter()
            .map(|&code| HttpStatus::from_code(code).ok_or(ConfigError::UnknownStatus(code)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RetryPolicy::new(self.retry_count, statuses))
    }

    pub(super) fn dispatcher_options(&self) -> Result<DispatcherOptions, ConfigError> {
        let mut options = DispatcherOptions::default();
        if let Some(thread_count) = self.thread_count {
            options.set_thread_count(NonZeroUsize::new(thread_count).ok_or(ConfigError::InvalidThreadCount)?);
        }
        options.set_queue_capacity(self.queue_capacity);
        Ok(options)
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis().try_into().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_defaults_from_empty_document() -> Result<()> {
        let config: EngineConfig = serde_json::from_str("{}")?;
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.transport_options()?, TransportOptions::default());
        assert_eq!(config.retry_policy()?, RetryPolicy::default());
        assert_eq!(config.dispatcher_options()?, DispatcherOptions::default());
        Ok(())
    }

    #[test]
    fn test_partial_document() -> Result<()> {
        let config: EngineConfig = serde_json::from_str(
            r#"{"retry_count": 1, "retry_statuses": [503, 504], "read_timeout_ms": 800, "thread_count": 2}"#,
        )?;
        let policy = config.retry_policy()?;
        assert_eq!(policy.retry_count(), 1);
        assert!(policy.is_retryable(HttpStatus::ServiceUnavailable));
        assert!(!policy.is_retryable(HttpStatus::TooManyRequests));

        let options = config.transport_options()?;
        assert_eq!(options.read_timeout(), Duration::from_millis(800));
        assert_eq!(options.connect_timeout(), TransportOptions::DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.dispatcher_options()?.thread_count().get(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_values() {
        let config = EngineConfig {
            retry_statuses: vec![504, 299],
            thread_count: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.retry_policy(), Err(ConfigError::UnknownStatus(299))));
        assert!(matches!(config.dispatcher_options(), Err(ConfigError::InvalidThreadCount)));
    }

    #[test]
    fn test_timeouts_below_floor() -> Result<()> {
        let config: EngineConfig = serde_json::from_str(r#"{"connect_timeout_ms": 0, "read_timeout_ms": 5}"#)?;
        assert!(matches!(
            config.transport_options(),
            Err(ConfigError::TimeoutTooSmall {
                name: "connect timeout",
                value: Duration::ZERO,
                ..
            })
        ));

        let config: EngineConfig = serde_json::from_str(r#"{"write_timeout_ms": 199}"#)?;
        assert!(matches!(
            config.transport_options(),
            Err(ConfigError::TimeoutTooSmall { name: "write timeout", .. })
        ));
        Ok(())
    }
}
