use crate::error::Result;
use crate::events::{ElementKind, FrameHandle, HostStatus, SaveMode, SelectionValue, SubscriptionCookie};
use crate::host::{SelectionEvents, SelectionMonitor, ServiceProvider, WindowFrames};
use crate::debug_if_enabled;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::DiffClassifier;

/// Активная подписка на события выбора
struct Subscription {
    monitor: Arc<dyn SelectionMonitor>,
    cookie: SubscriptionCookie,
}

/// Закрывает предыдущее diff-окно, как только фокус уходит с него.
///
/// Хранит не больше одного окна. Состояние меняется только из
/// уведомлений хоста, которые приходят последовательно.
pub struct SelectionObserver {
    frames: Arc<dyn WindowFrames>,
    classifier: DiffClassifier,
    subscription: Mutex<Option<Subscription>>,
    tracked: Mutex<Option<FrameHandle>>,
}

impl SelectionObserver {
    pub fn new(frames: Arc<dyn WindowFrames>) -> Arc<Self> {
        info!("Инициализация SelectionObserver");
        Arc::new(Self {
            classifier: DiffClassifier::new(frames.clone()),
            frames,
            subscription: Mutex::new(None),
            tracked: Mutex::new(None),
        })
    }

    /// Подписаться на события выбора хоста.
    ///
    /// Отсутствие сервиса не ошибка: наблюдатель просто остаётся неактивным.
    pub async fn start(self: &Arc<Self>, services: &dyn ServiceProvider) -> Result<()> {
        if self.is_active() {
            debug!("SelectionObserver уже подписан");
            return Ok(());
        }

        let Some(monitor) = services.selection_monitor().await else {
            info!("Сервис событий выбора недоступен, автозакрытие diff-вкладок отключено");
            return Ok(());
        };

        let cookie = monitor.advise(self.clone() as Arc<dyn SelectionEvents>)?;
        info!("SelectionObserver подписан на события выбора ({})", cookie);

        *self.subscription.lock() = Some(Subscription { monitor, cookie });
        Ok(())
    }

    /// Отписаться от событий. Повторный вызов ничего не делает.
    pub fn stop(&self) {
        let Some(subscription) = self.subscription.lock().take() else {
            return;
        };

        match subscription.monitor.unadvise(subscription.cookie) {
            Ok(()) => info!("SelectionObserver отписан ({})", subscription.cookie),
            Err(e) => warn!("Не удалось отписаться ({}): {}", subscription.cookie, e),
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Окно, которое будет закрыто при следующей смене активного документа
    pub fn tracked(&self) -> Option<FrameHandle> {
        *self.tracked.lock()
    }

    fn handle_document_frame_change(&self, new: &SelectionValue) {
        // Слот освобождается до вызова хоста: close_frame может синхронно
        // прислать следующее событие
        let previous = self.tracked.lock().take();
        if let Some(frame) = previous {
            self.close_quietly(frame);
        }

        let Some(frame) = new.as_frame() else {
            return;
        };

        if self.classifier.is_diff_window(frame) {
            debug!("Отслеживаем diff-окно {}", frame);
            *self.tracked.lock() = Some(frame);
        }
    }

    fn close_quietly(&self, frame: FrameHandle) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.frames.close_frame(frame, SaveMode::NoSave)
        }));

        match result {
            Ok(Ok(())) => info!("Закрыто diff-окно {}", frame),
            Ok(Err(e)) => debug!("Diff-окно {} не закрыто: {}", frame, e),
            Err(_) => warn!("Закрытие diff-окна {} прервано паникой в хосте", frame),
        }
    }
}

impl SelectionEvents for SelectionObserver {
    fn on_element_value_changed(
        &self,
        kind: ElementKind,
        _old: &SelectionValue,
        new: &SelectionValue,
    ) -> HostStatus {
        if !kind.is_document_frame() {
            return HostStatus::Ok;
        }

        debug_if_enabled!("Смена активного документа на {}", new);

        if catch_unwind(AssertUnwindSafe(|| self.handle_document_frame_change(new))).is_err() {
            warn!("Обработка смены активного документа прервана паникой");
        }

        HostStatus::Ok
    }
}

impl Drop for SelectionObserver {
    fn drop(&mut self) {
        info!("SelectionObserver завершает работу");
    }
}
