use super::{Backoff, RetriedStatsInfo};
use rand::{thread_rng, Rng};
use std::{convert::TryInto, time::Duration};

pub use num_rational::Ratio;

/// 随机时长的退避
///
/// 在基础退避时长的最小比例与最大比例之间均匀随机
#[derive(Debug, Clone)]
pub struct RandomizedBackoff<P> {
    base_backoff: P,
    minification: Ratio<u8>,
    magnification: Ratio<u8>,
}

impl<P> RandomizedBackoff<P> {
    /// 创建随机时长的退避
    #[inline]
    pub fn new(base_backoff: P, minification: Ratio<u8>, magnification: Ratio<u8>) -> Self {
        Self {
            base_backoff,
            minification,
            magnification,
        }
    }

    /// 获取基础退避
    #[inline]
    pub fn base_backoff(&self) -> &P {
        &self.base_backoff
    }

    /// 获取最小比例
    #[inline]
    pub fn minification(&self) -> Ratio<u8> {
        self.minification
    }

    /// 获取最大比例
    #[inline]
    pub fn magnification(&self) -> Ratio<u8> {
        self.magnification
    }
}

impl<P: Backoff> Backoff for RandomizedBackoff<P> {
    fn time(&self, retried: &RetriedStatsInfo) -> Duration {
        let duration = self.base_backoff.time(retried);
        let minified = scale(self.minification, duration);
        let magnified = scale(self.magnification, duration);
        if minified >= magnified {
            return Duration::from_nanos(minified);
        }
        Duration::from_nanos(thread_rng().gen_range(minified..magnified))
    }
}

fn scale(ratio: Ratio<u8>, duration: Duration) -> u64 {
    let ratio: Ratio<u128> = Ratio::new_raw((*ratio.numer()).into(), (*ratio.denom()).into());
    (ratio * duration.as_nanos())
        .to_integer()
        .try_into()
        .unwrap_or(u64::MAX)
}

impl<P: Default> Default for RandomizedBackoff<P> {
    #[inline]
    fn default() -> Self {
        RandomizedBackoff::new(P::default(), Ratio::new_raw(1, 2), Ratio::new_raw(3, 2))
    }
}
