pub mod toml_config;

pub use toml_config::{BackgroundConfig, DispatchConfig, MainConfig, ShellConfig};

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dispatch-utils")]
#[command(about = "Run work on a main context and a background pool")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run a shell command in the background and report it on the main context
    Run {
        /// Do not log the command and its output
        #[arg(long)]
        silent: bool,

        /// Override the shell program from config
        #[arg(long)]
        shell: Option<String>,

        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print the currency codes found in a JSON document
    Currencies {
        /// JSON file to read, stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔（若有），並套用命令列覆蓋設定
    pub fn load_config(&self) -> crate::utils::error::Result<DispatchConfig> {
        let mut config = match &self.config {
            Some(path) => DispatchConfig::from_file(path)?,
            None => DispatchConfig::default(),
        };

        if let Commands::Run { silent, shell, .. } = &self.command {
            if *silent {
                config.shell.silent = true;
            }
            if let Some(program) = shell {
                tracing::info!("🔧 Shell program overridden to: {}", program);
                config.shell.program = program.clone();
            }
        }

        Ok(config)
    }

    /// `run` 的指令字串：單一參數視為原始 shell 字串，多個參數逐一加上引號
    pub fn shell_command(&self) -> Option<String> {
        match &self.command {
            Commands::Run { command, .. } => Some(match command.as_slice() {
                [single] => single.clone(),
                words => shell_words::join(words),
            }),
            Commands::Currencies { .. } => None,
        }
    }
}
