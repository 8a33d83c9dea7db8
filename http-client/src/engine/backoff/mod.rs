mod fixed;
mod randomized;

use super::RetriedStatsInfo;
use auto_impl::auto_impl;
use std::{fmt::Debug, time::Duration};

/// 退避时长获取接口
#[auto_impl(&, Box, Arc)]
pub trait Backoff: Debug + Sync + Send {
    /// 获取退避时长
    fn time(&self, retried: &RetriedStatsInfo) -> Duration;
}

pub use fixed::{FixedBackoff, NO_BACKOFF};
pub use randomized::{RandomizedBackoff, Ratio};

/// 默认的退避时长，在 1 到 2 秒之间随机
#[inline]
pub fn default_backoff() -> RandomizedBackoff<FixedBackoff> {
    RandomizedBackoff::new(
        FixedBackoff::new(Duration::from_secs(1)),
        Ratio::new_raw(1, 1),
        Ratio::new_raw(2, 1),
    )
}
