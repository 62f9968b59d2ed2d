pub mod background;
pub mod currency;
pub mod dispatcher;
pub mod guaranteed;
pub mod main_queue;
pub mod shell;

pub use crate::domain::model::{Block, ShellResponse};
pub use crate::domain::ports::Executor;
pub use crate::utils::error::Result;
