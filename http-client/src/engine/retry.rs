use rivet_http::HttpStatus;
use std::{collections::HashSet, fmt};

/// 重试策略
///
/// 包含重试次数以及可重试的状态码集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_count: usize,
    retry_statuses: HashSet<HttpStatus>,
}

impl RetryPolicy {
    /// 默认重试次数
    pub const DEFAULT_RETRY_COUNT: usize = 3;

    /// 默认可重试的状态码
    pub const DEFAULT_RETRY_STATUSES: [HttpStatus; 3] = [
        HttpStatus::RequestTimeout,
        HttpStatus::TooManyRequests,
        HttpStatus::GatewayTimeout,
    ];

    /// 创建重试策略
    #[inline]
    pub fn new(retry_count: usize, retry_statuses: impl IntoIterator<Item = HttpStatus>) -> Self {
        Self {
            retry_count,
            retry_statuses: retry_statuses.into_iter().collect(),
        }
    }

    /// 获取重试次数
    #[inline]
    pub fn retry_count(&self) -> usize {
        self.retry_count
    }

    /// 获取可重试的状态码集合
    #[inline]
    pub fn retry_statuses(&self) -> &HashSet<HttpStatus> {
        &self.retry_statuses
    }

    /// 状态码是否可重试
    #[inline]
    pub fn is_retryable(&self, status: HttpStatus) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// 设置重试次数
    #[inline]
    pub fn set_retry_count(&mut self, retry_count: usize) -> &mut Self {
        self.retry_count = retry_count;
        self
    }

    /// 添加可重试的状态码
    #[inline]
    pub fn add_retry_status(&mut self, status: HttpStatus) -> &mut Self {
        self.retry_statuses.insert(status);
        self
    }

    /// 替换可重试的状态码集合
    #[inline]
    pub fn set_retry_statuses(&mut self, statuses: impl IntoIterator<Item = HttpStatus>) -> &mut Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }
}

impl Default for RetryPolicy {
    #[inline]
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETRY_COUNT, Self::DEFAULT_RETRY_STATUSES)
    }
}

/// 重试统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetriedStatsInfo {
    retried_total: usize,
    retried_on_transport_error: usize,
    retried_on_status: usize,
}

impl RetriedStatsInfo {
    #[inline]
    pub(crate) fn increase(&mut self) {
        self.retried_total += 1;
    }

    #[inline]
    pub(crate) fn increase_on_transport_error(&mut self) {
        self.increase();
        self.retried_on_transport_error += 1;
    }

    #[inline]
    pub(crate) fn increase_on_status(&mut self) {
        self.increase();
        self.retried_on_status += 1;
    }

    /// 总共重试的次数
    #[inline]
    pub fn retried_total(&self) -> usize {
        self.retried_total
    }

    /// 因传输层错误重试的次数
    #[inline]
    pub fn retried_on_transport_error(&self) -> usize {
        self.retried_on_transport_error
    }

    /// 因可重试的状态码重试的次数
    #[inline]
    pub fn retried_on_status(&self) -> usize {
        self.retried_on_status
    }
}

impl fmt::Display for RetriedStatsInfo {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.retried_total, self.retried_on_transport_error, self.retried_on_status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let mut policy = RetryPolicy::default();
        assert_eq!(policy.retry_count(), 3);
        assert!(policy.is_retryable(HttpStatus::RequestTimeout));
        assert!(policy.is_retryable(HttpStatus::TooManyRequests));
        assert!(policy.is_retryable(HttpStatus::GatewayTimeout));
        assert!(!policy.is_retryable(HttpStatus::ServiceUnavailable));

        policy.add_retry_status(HttpStatus::ServiceUnavailable).set_retry_count(0);
        assert!(policy.is_retryable(HttpStatus::ServiceUnavailable));
        assert_eq!(policy.retry_count(), 0);

        policy.set_retry_statuses([HttpStatus::BadGateway]);
        assert_eq!(policy.retry_statuses().len(), 1);
    }

    #[test]
    fn test_retried_stats() {
        let mut retried = RetriedStatsInfo::default();
        retried.increase_on_status();
        retried.increase_on_transport_error();
        retried.increase_on_status();
        assert_eq!(retried.retried_total(), 3);
        assert_eq!(retried.retried_on_status(), 2);
        assert_eq!(retried.to_string(), "3,1,2");
    }
}
