use super::{Backoff, RetriedStatsInfo};
use std::time::Duration;

/// 无退避时长
pub const NO_BACKOFF: FixedBackoff = FixedBackoff::new(Duration::from_nanos(0));

/// 固定时长的退避
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    /// 创建固定时长的退避
    #[inline]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// 获取固定时长
    #[inline]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Backoff for FixedBackoff {
    #[inline]
    fn time(&self, _retried: &RetriedStatsInfo) -> Duration {
        self.delay
    }
}

impl Default for FixedBackoff {
    #[inline]
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
