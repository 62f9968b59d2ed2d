use crate::config::ShellConfig;
use crate::core::dispatcher::Dispatcher;
use crate::domain::model::ShellResponse;
use crate::utils::error::{DispatchError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tokio::process::Command;

const ESCAPE_CHARACTER: char = '\u{1B}';

fn escape_sequence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\S{0,2}").expect("escape sequence pattern is valid"))
}

/// 移除 ESC 以及其後最多兩個非空白字元
pub fn clean_escape_sequences(text: &str) -> String {
    if !text.contains(ESCAPE_CHARACTER) {
        return text.to_string();
    }
    escape_sequence_regex().replace_all(text, "").into_owned()
}

/// 去掉頭尾換行，再移除 escape sequence
pub fn clean_shell_output(text: &str) -> String {
    clean_escape_sequences(text.trim_matches(|c: char| c == '\n' || c == '\r'))
}

fn split_lines(raw: &[u8]) -> Vec<String> {
    let cleaned = clean_shell_output(&String::from_utf8_lossy(raw));
    if cleaned.is_empty() {
        Vec::new()
    } else {
        cleaned.split('\n').map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    config: ShellConfig,
}

impl CommandRunner {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Run `program` with `args`, wait for it to exit and return its output.
    ///
    /// A non-zero exit is not an error; it is reported in
    /// [`ShellResponse::exit_code`] (`-1` when killed by a signal).
    pub async fn run_command(&self, program: &str, args: &[String]) -> Result<ShellResponse> {
        tracing::debug!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DispatchError::CommandError {
                command: program.to_string(),
                message: e.to_string(),
            })?;

        let response = ShellResponse {
            output: split_lines(&output.stdout),
            error: split_lines(&output.stderr),
            exit_code: output.status.code().unwrap_or(-1),
        };

        if !self.config.silent {
            tracing::info!("cmd: {} {}", program, args.join(" "));
            tracing::info!("stdout:\n{}", response.output.join("\n"));
            tracing::info!("stderr:\n{}", response.error.join("\n"));
        }

        Ok(response)
    }

    /// 透過設定的 login shell 執行
    pub async fn run_command_as_user(&self, command: &str) -> Result<ShellResponse> {
        let mut args = self.config.args.clone();
        args.push(command.to_string());
        self.run_command(&self.config.program, &args).await
    }

    /// Run `command` on the background pool and hand the result to
    /// `callback` on the main context.
    pub fn run_command_as_user_in_background<F>(
        &self,
        dispatcher: &Dispatcher,
        command: impl Into<String>,
        callback: F,
    ) where
        F: FnOnce(Result<ShellResponse>) + Send + 'static,
    {
        let runner = self.clone();
        let command = command.into();
        let main = dispatcher.clone();

        drop(dispatcher.background().spawn(async move {
            let result = runner.run_command_as_user(&command).await;
            if let Err(e) = &result {
                tracing::warn!("❌ Background command failed: {}", e);
            }
            main.on_main_async(move || callback(result));
        }));
    }
}
