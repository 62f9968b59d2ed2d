use crate::utils::error::{DispatchError, Result};
use crate::utils::validation::{
    validate_executable, validate_range, validate_thread_name, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub main: MainConfig,
    pub background: BackgroundConfig,
    pub shell: ShellConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MainConfig {
    pub thread_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub worker_threads: usize,
    pub max_blocking_threads: usize,
    pub thread_name: String,
    pub shutdown_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
    pub silent: bool,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            thread_name: "main-dispatch".to_string(),
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            max_blocking_threads: 64,
            thread_name: "background-dispatch".to_string(),
            shutdown_timeout_ms: 1000,
        }
    }
}

impl BackgroundConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        // 以登入 shell 執行，與使用者在終端機中看到的環境一致
        Self {
            program: "/bin/bash".to_string(),
            args: vec!["-l".to_string(), "-c".to_string()],
            silent: false,
        }
    }
}

impl DispatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DispatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DispatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHELL_PROGRAM})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DispatchError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<()> {
        validate_thread_name("main.thread_name", &self.main.thread_name)?;

        validate_range("background.worker_threads", self.background.worker_threads, 1, 1024)?;
        validate_range(
            "background.max_blocking_threads",
            self.background.max_blocking_threads,
            1,
            4096,
        )?;
        validate_thread_name("background.thread_name", &self.background.thread_name)?;

        validate_executable("shell.program", &self.shell.program)?;

        Ok(())
    }
}
