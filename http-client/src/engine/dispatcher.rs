use super::super::ConfigError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{error, info};
use std::{
    borrow::Cow,
    fmt,
    num::NonZeroUsize,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering::SeqCst},
        Arc,
    },
    thread::{available_parallelism, Builder as ThreadBuilder},
};

/// 工作线程池选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherOptions {
    thread_count: NonZeroUsize,
    queue_capacity: usize,
    thread_name_prefix: Cow<'static, str>,
}

impl DispatcherOptions {
    /// 任务队列容量的下限
    pub const MIN_QUEUE_CAPACITY: usize = 1_000_000;

    /// 默认工作线程名称前缀
    pub const DEFAULT_THREAD_NAME_PREFIX: &'static str = "rivet-http-worker";

    /// 获取工作线程数
    #[inline]
    pub fn thread_count(&self) -> NonZeroUsize {
        self.thread_count
    }

    /// 获取任务队列容量
    ///
    /// 不会低于 [`DispatcherOptions::MIN_QUEUE_CAPACITY`]
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(Self::MIN_QUEUE_CAPACITY)
    }

    /// 获取工作线程名称前缀
    #[inline]
    pub fn thread_name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }

    /// 设置工作线程数
    #[inline]
    pub fn set_thread_count(&mut self, thread_count: NonZeroUsize) -> &mut Self {
        self.thread_count = thread_count;
        self
    }

    /// 设置任务队列容量，低于下限时将使用下限
    #[inline]
    pub fn set_queue_capacity(&mut self, queue_capacity: usize) -> &mut Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// 设置工作线程名称前缀
    #[inline]
    pub fn set_thread_name_prefix(&mut self, prefix: impl Into<Cow<'static, str>>) -> &mut Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        let parallelism = available_parallelism().map_or(1, NonZeroUsize::get);
        Self {
            thread_count: NonZeroUsize::new(parallelism * 2).unwrap_or(NonZeroUsize::MIN),
            queue_capacity: Self::MIN_QUEUE_CAPACITY,
            thread_name_prefix: Cow::Borrowed(Self::DEFAULT_THREAD_NAME_PREFIX),
        }
    }
}

/// 工作线程池中执行的任务
pub(crate) trait Job: Send + 'static {
    fn run(self);
}

/// 任务提交句柄
///
/// 队列已满或所有工作线程都已退出时，提交失败并返回任务本身
pub(crate) struct Submitter<J> {
    sender: Sender<J>,
    queued: Arc<AtomicUsize>,
    capacity: usize,
}

impl<J> Submitter<J> {
    pub(crate) fn submit(&self, job: J) -> Result<(), J> {
        if self.queued.fetch_add(1, SeqCst) >= self.capacity {
            self.queued.fetch_sub(1, SeqCst);
            return Err(job);
        }
        self.sender.send(job).map_err(|err| {
            self.queued.fetch_sub(1, SeqCst);
            err.into_inner()
        })
    }
}

impl<J> Clone for Submitter<J> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            queued: self.queued.clone(),
            capacity: self.capacity,
        }
    }
}

impl<J> fmt::Debug for Submitter<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitter")
            .field("queued", &self.queued.load(SeqCst))
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// 工作线程池
///
/// 固定数量的工作线程从 FIFO 队列中获取任务，
/// 所有提交句柄都被释放后，工作线程执行完剩余任务即退出
pub(crate) struct Dispatcher<J> {
    submitter: Submitter<J>,
    thread_count: usize,
}

impl<J: Job> Dispatcher<J> {
    pub(crate) fn start(options: &DispatcherOptions) -> Result<Self, ConfigError> {
        let (sender, receiver) = unbounded::<J>();
        let queued = Arc::new(AtomicUsize::new(0));
        let thread_count = options.thread_count().get();
        for index in 0..thread_count {
            let receiver = receiver.to_owned();
            let queued = queued.to_owned();
            ThreadBuilder::new()
                .name(format!("{}-{}", options.thread_name_prefix(), index))
                .spawn(move || work(receiver, queued))
                .map_err(|err| {
                    // 已启动的工作线程在队列发送端释放后退出
                    error!(
                        "failed to spawn worker {} of {}, {} workers started: {}",
                        index, thread_count, index, err
                    );
                    ConfigError::SpawnWorker(err)
                })?;
        }
        info!(
            "dispatcher started: {} workers, queue capacity {}",
            thread_count,
            options.queue_capacity()
        );
        Ok(Self {
            submitter: Submitter {
                sender,
                queued,
                capacity: options.queue_capacity(),
            },
            thread_count,
        })
    }

    /// 没有工作线程且容量为零的工作线程池，所有提交都被拒绝
    #[cfg(test)]
    pub(crate) fn saturated() -> Self {
        let (sender, _) = unbounded();
        Self {
            submitter: Submitter {
                sender,
                queued: Arc::new(AtomicUsize::new(0)),
                capacity: 0,
            },
            thread_count: 0,
        }
    }

    #[inline]
    pub(crate) fn submitter(&self) -> Submitter<J> {
        self.submitter.to_owned()
    }

    #[inline]
    pub(crate) fn submit(&self, job: J) -> Result<(), J> {
        self.submitter.submit(job)
    }
}

impl<J> fmt::Debug for Dispatcher<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("submitter", &self.submitter)
            .field("thread_count", &self.thread_count)
            .finish()
    }
}

fn work<J: Job>(receiver: Receiver<J>, queued: Arc<AtomicUsize>) {
    while let Ok(job) = receiver.recv() {
        queued.fetch_sub(1, SeqCst);
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| job.run())) {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            error!("worker job panicked: {}", message);
        }
    }
}
