use std::time::Duration;

/// 传输层选项
///
/// 在传输层首次使用时读取，此后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportOptions {
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    pool_max_idle: usize,
    pool_keep_alive: Duration,
}

impl TransportOptions {
    /// 默认连接超时时长
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);
    /// 默认读取超时时长
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);
    /// 默认写入超时时长
    pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(5000);
    /// 默认连接池最大空闲连接数
    pub const DEFAULT_POOL_MAX_IDLE: usize = 10;
    /// 默认连接池空闲连接保持时长
    pub const DEFAULT_POOL_KEEP_ALIVE: Duration = Duration::from_millis(2000);

    /// 创建传输层选项构建器
    #[inline]
    pub fn builder() -> TransportOptionsBuilder {
        TransportOptionsBuilder::default()
    }

    /// 获取连接超时时长
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// 获取读取超时时长
    #[inline]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// 获取写入超时时长
    #[inline]
    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// 获取连接池最大空闲连接数
    #[inline]
    pub fn pool_max_idle(&self) -> usize {
        self.pool_max_idle
    }

    /// 获取连接池空闲连接保持时长
    ///
    /// Ureq 传输层不支持该选项，会忽略设置的值
    #[inline]
    pub fn pool_keep_alive(&self) -> Duration {
        self.pool_keep_alive
    }

    /// 设置连接超时时长
    #[inline]
    pub fn set_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.connect_timeout = timeout;
        self
    }

    /// 设置读取超时时长
    #[inline]
    pub fn set_read_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.read_timeout = timeout;
        self
    }

    /// 设置写入超时时长
    #[inline]
    pub fn set_write_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.write_timeout = timeout;
        self
    }

    /// 设置连接池最大空闲连接数
    #[inline]
    pub fn set_pool_max_idle(&mut self, max_idle: usize) -> &mut Self {
        self.pool_max_idle = max_idle;
        self
    }

    /// 设置连接池空闲连接保持时长
    #[inline]
    pub fn set_pool_keep_alive(&mut self, keep_alive: Duration) -> &mut Self {
        self.pool_keep_alive = keep_alive;
        self
    }
}

impl Default for TransportOptions {
    #[inline]
    fn default() -> Self {
        Self {
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            write_timeout: Self::DEFAULT_WRITE_TIMEOUT,
            pool_max_idle: Self::DEFAULT_POOL_MAX_IDLE,
            pool_keep_alive: Self::DEFAULT_POOL_KEEP_ALIVE,
        }
    }
}

/// 传输层选项构建器
#[derive(Debug, Clone, Default)]
pub struct TransportOptionsBuilder(TransportOptions);

impl TransportOptionsBuilder {
    /// 设置连接超时时长
    #[inline]
    pub fn connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.0.set_connect_timeout(timeout);
        self
    }

    /// 设置读取超时时长
    #[inline]
    pub fn read_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.0.set_read_timeout(timeout);
        self
    }

    /// 设置写入超时时长
    #[inline]
    pub fn write_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.0.set_write_timeout(timeout);
        self
    }

    /// 设置连接池最大空闲连接数
    #[inline]
    pub fn pool_max_idle(&mut self, max_idle: usize) -> &mut Self {
        self.0.set_pool_max_idle(max_idle);
        self
    }

    /// 设置连接池空闲连接保持时长
    #[inline]
    pub fn pool_keep_alive(&mut self, keep_alive: Duration) -> &mut Self {
        self.0.set_pool_keep_alive(keep_alive);
        self
    }

    /// 构建传输层选项
    #[inline]
    pub fn build(&self) -> TransportOptions {
        self.0
    }
}
