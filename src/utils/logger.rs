use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "dispatch_utils";

// RUST_LOG 優先，否則只開啟本 crate 的指定等級
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{}={},warn", CRATE_TARGET, level))
    })
}

/// 日誌寫到 stderr，stdout 留給指令輸出。verbose 時顯示執行緒名稱，
/// 方便分辨 main context 與背景 worker。
pub fn init_cli_logger(verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(verbose)
        .without_time()
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global logger already installed");
    }
}

pub fn init_json_logger() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .json()
        .with_current_span(false)
        .flatten_event(true);

    if tracing_subscriber::registry()
        .with(env_filter(false))
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global logger already installed");
    }
}
