use crate::utils::error::{DispatchError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> DispatchError {
    DispatchError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 執行緒名稱不可為空白，也不可含 NUL（`thread::Builder` 會 panic）
pub fn validate_thread_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(field, name, "Thread name cannot be blank"));
    }
    if name.contains('\0') {
        return Err(invalid(field, name.escape_default(), "Thread name contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Expected {}..={}", min, max)));
    }
    Ok(())
}

/// 含 `/` 的程式需指向可執行檔，否則在 `PATH` 中尋找
pub fn validate_executable(field: &str, program: &str) -> Result<()> {
    if program.trim().is_empty() {
        return Err(invalid(field, program, "Program cannot be blank"));
    }
    if program.contains('\0') {
        return Err(invalid(field, program.escape_default(), "Program contains a NUL byte"));
    }

    if program.contains('/') {
        let path = Path::new(program);
        if !path.is_file() {
            return Err(invalid(field, program, "No such file"));
        }
        if !is_executable(path) {
            return Err(invalid(field, program, "File is not executable"));
        }
        return Ok(());
    }

    let found = std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(program))
                .any(|candidate| candidate.is_file() && is_executable(&candidate))
        })
        .unwrap_or(false);

    if found {
        Ok(())
    } else {
        Err(invalid(field, program, "Not found in PATH"))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
