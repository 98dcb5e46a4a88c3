use crate::config::SimulationConfig;
use crate::error::Result;
use crate::events::FrameHandle;
use crate::host::DryRunHost;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::DiffClassifier;

/// Прогоняет сценарий окон через эмулируемый хост
pub struct Simulator {
    config: SimulationConfig,
    host: Arc<DryRunHost>,
}

impl Simulator {
    pub fn new(config: SimulationConfig, host: Arc<DryRunHost>) -> Self {
        Self { config, host }
    }

    /// Количество активаций до остановки; `None` - бесконечно
    pub fn total_steps(&self) -> Option<usize> {
        match self.config.cycles {
            0 => None,
            cycles => Some(cycles as usize * self.config.frames.len()),
        }
    }

    pub async fn run(&self) -> Result<()> {
        if self.config.frames.is_empty() {
            return Err(crate::autoclose_error!(internal, "сценарий окон пуст"));
        }

        info!(
            "Dry-run: эмуляция смены окон, {} окон в сценарии ({} diff), интервал {}мс",
            self.config.frames.len(),
            self.diff_frames_in_script(),
            self.config.interval_ms
        );

        let mut ticker = interval(Duration::from_millis(self.config.interval_ms));
        let mut step = 0usize;

        while self.total_steps().map_or(true, |total| step < total) {
            ticker.tick().await;
            self.step(step);
            step += 1;
        }

        info!(
            "Dry-run: сценарий завершён, закрыто окон: {}, открыто: {}",
            self.host.closed_frames().len(),
            self.host.open_frame_count()
        );
        Ok(())
    }

    /// Открыть следующее окно сценария и сделать его активным.
    /// Возвращает `None`, если сценарий пуст.
    pub fn step(&self, step: usize) -> Option<FrameHandle> {
        let record = self.config.frames.get(step.checked_rem(self.config.frames.len())?)?.clone();
        let caption = record.caption.clone().unwrap_or_default();
        let frame = self.host.open_frame(record);

        info!("Dry-run: фокус на {} \"{}\"", frame, caption);
        self.host.activate(frame);

        debug!(
            "Dry-run: всего закрыто {}, открыто {}",
            self.host.closed_frames().len(),
            self.host.open_frame_count()
        );
        Some(frame)
    }

    /// Сколько окон сценария классификатор сочтёт diff-окнами
    pub fn diff_frames_in_script(&self) -> usize {
        // Отдельный хост, чтобы не трогать окна основного
        let probe = Arc::new(DryRunHost::new());
        let classifier = DiffClassifier::new(probe.clone());

        self.config
            .frames
            .iter()
            .filter(|record| classifier.is_diff_window(probe.open_frame((*record).clone())))
            .count()
    }
}
