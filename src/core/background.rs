use crate::config::BackgroundConfig;
use crate::domain::model::Block;
use crate::domain::ports::Executor;
use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct BackgroundHandle {
    runtime: Handle,
}

impl BackgroundHandle {
    /// 沿用既有 runtime（例如 `#[tokio::main]` 建立的）
    pub fn from_tokio(runtime: Handle) -> Self {
        Self { runtime }
    }

    pub fn current() -> Result<Self> {
        Ok(Self::from_tokio(Handle::try_current()?))
    }

    pub fn tokio_handle(&self) -> &Handle {
        &self.runtime
    }

    /// 於 blocking pool 執行，block 之間可並行且不保證順序
    pub fn enqueue<F>(&self, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // JoinHandle 直接丟棄，block 內的 panic 由 tokio 吸收
        drop(self.runtime.spawn_blocking(block));
    }

    pub fn spawn<Fut>(&self, future: Fut) -> JoinHandle<Fut::Output>
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// 至少經過 `delay` 後交給 `target`；計時器一律在此 runtime 上
    pub fn execute_after<E>(&self, delay: Duration, target: E, block: Block)
    where
        E: Executor + 'static,
    {
        tracing::debug!("Scheduling block after {:?}", delay);
        drop(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            target.execute(block);
        }));
    }
}

impl Executor for BackgroundHandle {
    fn execute(&self, block: Block) {
        self.enqueue(block);
    }
}

/// drop 時關閉 runtime，最多等待 `shutdown_timeout_ms`
pub struct BackgroundPool {
    runtime: Option<Runtime>,
    handle: BackgroundHandle,
    shutdown_timeout: Duration,
}

impl BackgroundPool {
    pub fn new(config: &BackgroundConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .max_blocking_threads(config.max_blocking_threads.max(1))
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()?;

        tracing::debug!(
            "Background pool started: {} workers, {} blocking threads",
            config.worker_threads,
            config.max_blocking_threads
        );

        let handle = BackgroundHandle::from_tokio(runtime.handle().clone());
        Ok(Self {
            runtime: Some(runtime),
            handle,
            shutdown_timeout: config.shutdown_timeout(),
        })
    }

    pub fn handle(&self) -> BackgroundHandle {
        self.handle.clone()
    }
}

impl Drop for BackgroundPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(self.shutdown_timeout);
            tracing::debug!("Background pool shut down");
        }
    }
}
