use anyhow::Context;
use clap::Parser;
use dispatch_utils::utils::{logger, validation::Validate};
use dispatch_utils::{
    determine_currencies, BackgroundPool, CliConfig, CommandRunner, Commands, DispatchConfig,
    Dispatcher, MainQueue,
};
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = cli.load_config().context("failed to load configuration")?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match &cli.command {
        Commands::Run { .. } => {
            let command = cli.shell_command().context("missing command")?;
            let exit_code = run_command(&config, &command)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Currencies { file } => print_currencies(file.as_deref())?,
    }

    Ok(())
}

/// 在背景執行指令，並在 main context（本行程的主執行緒）輸出結果
fn run_command(config: &DispatchConfig, command: &str) -> anyhow::Result<i32> {
    let pool = BackgroundPool::new(&config.background).context("failed to start background pool")?;
    let (main, main_loop) = MainQueue::channel();
    let dispatcher = Dispatcher::new(main.clone(), pool.handle());
    let runner = CommandRunner::new(config.shell.clone());

    tracing::info!("🚀 Running: {}", command);

    let exit_code = Arc::new(AtomicI32::new(0));
    let exit = Arc::clone(&exit_code);
    runner.run_command_as_user_in_background(&dispatcher, command, move |result| {
        match result {
            Ok(response) => {
                for line in &response.output {
                    println!("{}", line);
                }
                for line in &response.error {
                    eprintln!("{}", line);
                }
                exit.store(response.exit_code, Ordering::SeqCst);
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("💡 建議: {}", e.recovery_suggestion());
                exit.store(127, Ordering::SeqCst);
            }
        }
        main.quit();
    });

    main_loop.run();
    drop(pool);

    Ok(exit_code.load(Ordering::SeqCst))
}

fn print_currencies(file: Option<&Path>) -> anyhow::Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let document: serde_json::Value =
        serde_json::from_str(&content).context("input is not valid JSON")?;

    let currencies = determine_currencies(&document);
    tracing::debug!("Found {} currencies", currencies.len());
    for code in currencies {
        println!("{}", code);
    }

    Ok(())
}
