use crate::config::DispatchConfig;
use crate::core::background::{BackgroundHandle, BackgroundPool};
use crate::core::main_queue::{MainHandle, MainQueue};
use crate::utils::error::Result;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tokio::sync::oneshot;

/// main context 與背景 pool 的便利包裝，兩者皆明確傳入
#[derive(Debug, Clone)]
pub struct Dispatcher {
    main: MainHandle,
    background: BackgroundHandle,
}

impl Dispatcher {
    pub fn new(main: MainHandle, background: BackgroundHandle) -> Self {
        Self { main, background }
    }

    pub fn main(&self) -> &MainHandle {
        &self.main
    }

    pub fn background(&self) -> &BackgroundHandle {
        &self.background
    }

    pub fn is_main(&self) -> bool {
        self.main.is_current()
    }

    /// 已在 main context 上時直接 inline 執行，否則排入佇列
    pub fn on_main<F>(&self, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.main.is_current() {
            block();
        } else {
            self.main.enqueue(block);
        }
    }

    /// 在 main context 執行並等待完成，block 內的 panic 會在呼叫端重新拋出。
    /// 不可在 async task 內呼叫。
    ///
    /// # Panics
    ///
    /// 從 main context 呼叫（會自我等待）或 main context 已關閉時 panic。
    pub fn on_main_sync<F, R>(&self, block: F) -> R
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        assert!(
            !self.main.is_current(),
            "on_main_sync called from the main context, which would deadlock"
        );

        let (tx, rx) = oneshot::channel();
        self.main.enqueue(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(block));
            // 呼叫端已放棄等待時忽略
            let _ = tx.send(result);
        });

        match rx.blocking_recv() {
            Ok(Ok(value)) => value,
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => panic!("main context shut down before the block could run"),
        }
    }

    /// 一律排入佇列，即使在 main context 上也不 inline
    pub fn on_main_async<F>(&self, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.main.enqueue(block);
    }

    pub fn in_background<F>(&self, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.background.enqueue(block);
    }

    pub fn on_main_after<F>(&self, delay_seconds: f64, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.background.execute_after(
            delay_from_secs(delay_seconds),
            self.main.clone(),
            Box::new(block),
        );
    }

    pub fn in_background_after<F>(&self, delay_seconds: f64, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.background.execute_after(
            delay_from_secs(delay_seconds),
            self.background.clone(),
            Box::new(block),
        );
    }
}

// 負值與 NaN 視為立即執行，過大的值取 Duration::MAX
fn delay_from_secs(delay_seconds: f64) -> Duration {
    Duration::try_from_secs_f64(delay_seconds).unwrap_or(if delay_seconds > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

pub struct DispatchRuntime {
    // 欄位依宣告順序 drop：先 background 再 main
    _background: BackgroundPool,
    _main: MainQueue,
    dispatcher: Dispatcher,
}

impl DispatchRuntime {
    pub fn start(config: &DispatchConfig) -> Result<Self> {
        let background = BackgroundPool::new(&config.background)?;
        let main = MainQueue::spawn(&config.main)?;
        let dispatcher = Dispatcher::new(main.handle(), background.handle());

        tracing::info!(
            "Dispatch runtime started (main: '{}', background: '{}')",
            config.main.thread_name,
            config.background.thread_name
        );

        Ok(Self {
            _background: background,
            _main: main,
            dispatcher,
        })
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }
}
