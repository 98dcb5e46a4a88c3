use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use autoclose_diff_tabs::config::Config;
use autoclose_diff_tabs::host::{DryRunHost, DryRunServices};
use autoclose_diff_tabs::logging::init_tracing;
use autoclose_diff_tabs::services::{SelectionObserver, Simulator};

#[derive(Parser, Debug)]
#[command(name = "autoclose-diff-tabs")]
#[command(about = "Закрывает diff-вкладки, когда фокус уходит на другой документ (эмуляция хоста)")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "autoclose.toml")]
    config: String,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,

    /// Сколько раз прогнать сценарий окон (0 - до Ctrl+C)
    #[arg(long)]
    cycles: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(cycles) = args.cycles {
        config.simulation.cycles = cycles;
    }

    init_tracing(&config.logging, args.log_level.as_deref())?;

    info!("Запуск autoclose-diff-tabs v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    let host = Arc::new(DryRunHost::new());
    let observer = SelectionObserver::new(host.clone());

    if let Err(e) = observer.start(&DryRunServices(host.clone())).await {
        warn!("Не удалось подписаться на события выбора: {}", e);
    }

    if !observer.is_active() {
        warn!("Наблюдатель неактивен - окна закрываться не будут");
    }

    let simulator = Simulator::new(config.simulation.clone(), host.clone());

    tokio::select! {
        result = simulator.run() => {
            if let Err(e) = result {
                error!("Ошибка в Simulator: {}", e);
            }
        }
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    }

    info!("Завершение работы...");
    observer.stop();

    info!(
        "autoclose-diff-tabs завершил работу, закрыто diff-окон: {}",
        host.closed_frames().len()
    );
    Ok(())
}
