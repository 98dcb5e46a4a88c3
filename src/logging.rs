use anyhow::Result;

use crate::config::LoggingConfig;

/// Инициализация tracing: RUST_LOG > уровень из CLI > уровень из конфигурации
pub fn init_tracing(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = level_override.unwrap_or(&config.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init()?,
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
    }

    Ok(())
}

// Макрос условного логирования: аргументы форматируются только при включённом DEBUG
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
