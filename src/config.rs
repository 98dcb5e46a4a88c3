use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::host::FrameRecord;
use crate::services::diff_classifier::DIFF_EDITOR_TYPE;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub interval_ms: u64,
    /// 0 - крутить сценарий до Ctrl+C
    #[serde(default)]
    pub cycles: u32,
    pub frames: Vec<FrameRecord>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            cycles: 0,
            frames: default_script(),
        }
    }
}

/// Сценарий по умолчанию: обычные файлы вперемешку с разными видами diff-окон
fn default_script() -> Vec<FrameRecord> {
    vec![
        FrameRecord::new("main.rs").with_moniker("C:\\work\\app\\src\\main.rs"),
        FrameRecord::new("main.rs").with_moniker("gitdiff://app/src/main.rs"),
        FrameRecord::new("Diff - config.rs"),
        FrameRecord::new("lib.rs").with_moniker("C:\\work\\app\\src\\lib.rs"),
        FrameRecord::new("lib.rs (Staged Changes)"),
        FrameRecord::new("Cargo.toml").with_editor_type(DIFF_EDITOR_TYPE),
        FrameRecord::new("README.md").with_moniker("C:\\work\\app\\README.md"),
    ]
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(figment::providers::Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("AUTOCLOSE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.simulation.interval_ms < 100 {
            anyhow::bail!("interval_ms должно быть минимум 100");
        }

        if self.simulation.frames.is_empty() {
            anyhow::bail!("Сценарий simulation.frames пуст");
        }

        for (i, frame) in self.simulation.frames.iter().enumerate() {
            if frame.is_empty() {
                anyhow::bail!("Окно #{} сценария не имеет ни одного свойства", i + 1);
            }
        }

        Ok(())
    }
}
