use serde::{Deserialize, Serialize};

/// 一個延遲執行的工作單元，沒有參數也沒有回傳值
pub type Block = Box<dyn FnOnce() + Send + 'static>;

/// 執行 shell 指令的結果，stdout/stderr 已清理並以行分割
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellResponse {
    pub output: Vec<String>,
    pub error: Vec<String>,
    pub exit_code: i32,
}

impl ShellResponse {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
