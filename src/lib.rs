pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Commands};

pub use crate::config::DispatchConfig;
pub use crate::core::{
    background::{BackgroundHandle, BackgroundPool},
    currency::determine_currencies,
    dispatcher::{DispatchRuntime, Dispatcher},
    guaranteed::{guaranteed_array, guaranteed_index_str, guaranteed_string},
    main_queue::{MainHandle, MainLoop, MainQueue},
    shell::CommandRunner,
};
pub use crate::domain::{model::ShellResponse, ports::Executor};
pub use crate::utils::error::{DispatchError, Result};
