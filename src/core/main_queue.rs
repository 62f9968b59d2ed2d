use crate::config::MainConfig;
use crate::domain::model::Block;
use crate::domain::ports::Executor;
use crate::utils::error::Result;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

enum Message {
    Run(Block),
    Quit,
}

struct Shared {
    // 執行 MainLoop 的執行緒，loop 開始時寫入一次
    thread: OnceLock<ThreadId>,
}

#[derive(Clone)]
pub struct MainHandle {
    sender: UnboundedSender<Message>,
    shared: Arc<Shared>,
}

impl MainHandle {
    pub fn is_current(&self) -> bool {
        self.shared
            .thread
            .get()
            .is_some_and(|id| *id == thread::current().id())
    }

    /// 排在已送出的 block 之後，不會 inline 執行
    pub fn enqueue<F>(&self, block: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.send_block(Box::new(block));
    }

    /// 已排入的 block 執行完後停止 loop
    pub fn quit(&self) {
        if self.sender.send(Message::Quit).is_err() {
            tracing::debug!("Main loop already stopped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn send_block(&self, block: Block) {
        if self.sender.send(Message::Run(block)).is_err() {
            tracing::warn!("Main context has shut down, dropping block");
        }
    }
}

impl Executor for MainHandle {
    fn execute(&self, block: Block) {
        self.send_block(block);
    }
}

impl fmt::Debug for MainHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainHandle")
            .field("thread", &self.shared.thread.get())
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

pub struct MainLoop {
    receiver: UnboundedReceiver<Message>,
    shared: Arc<Shared>,
}

impl MainLoop {
    /// 讓呼叫端執行緒成為 main context，直到收到 quit 或所有 handle 被 drop。
    /// 不可在 async task 內呼叫。
    pub fn run(mut self) {
        let _ = self.shared.thread.set(thread::current().id());
        tracing::debug!(
            "Main loop started on thread {:?}",
            thread::current().name().unwrap_or("<unnamed>")
        );

        let mut processed = 0usize;
        let mut panicked = 0usize;
        while let Some(message) = self.receiver.blocking_recv() {
            match message {
                Message::Run(block) => {
                    // panic hook 已回報訊息，loop 繼續處理後面的 block
                    if panic::catch_unwind(AssertUnwindSafe(block)).is_err() {
                        panicked += 1;
                        tracing::error!("❌ Block on the main context panicked");
                    }
                    processed += 1;
                }
                Message::Quit => break,
            }
        }

        tracing::debug!(
            "Main loop stopped after {} blocks ({} panicked)",
            processed,
            panicked
        );
    }
}

/// 在專屬執行緒上執行的 main context，drop 時先 quit 再 join
pub struct MainQueue {
    handle: MainHandle,
    thread: Option<JoinHandle<()>>,
}

impl MainQueue {
    pub fn channel() -> (MainHandle, MainLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            thread: OnceLock::new(),
        });

        (
            MainHandle {
                sender,
                shared: Arc::clone(&shared),
            },
            MainLoop { receiver, shared },
        )
    }

    pub fn spawn(config: &MainConfig) -> Result<Self> {
        let (handle, main_loop) = Self::channel();
        let thread = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || main_loop.run())?;

        tracing::debug!("Spawned main context thread '{}'", config.thread_name);

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> MainHandle {
        self.handle.clone()
    }
}

impl Drop for MainQueue {
    fn drop(&mut self) {
        self.handle.quit();

        if let Some(thread) = self.thread.take() {
            // 在 main 自身上 join 會永遠等待
            if self.handle.is_current() {
                return;
            }
            if thread.join().is_err() {
                tracing::error!("Main context thread panicked");
            }
        }
    }
}
