use crate::error::{AutoCloseError, Result};
use crate::events::{
    ElementChange, ElementKind, FrameHandle, FrameProperty, SaveMode, SelectionValue,
    SubscriptionCookie,
};
use crate::debug_if_enabled;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::r#trait::{SelectionEvents, SelectionMonitor, ServiceProvider, WindowFrames};

/// Метаданные окна документа в эмулируемом хосте
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub moniker: Option<String>,
    #[serde(default)]
    pub editor_type: Option<Uuid>,
}

impl FrameRecord {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Self::default()
        }
    }

    pub fn with_moniker(mut self, moniker: impl Into<String>) -> Self {
        self.moniker = Some(moniker.into());
        self
    }

    pub fn with_editor_type(mut self, editor_type: Uuid) -> Self {
        self.editor_type = Some(editor_type);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.moniker.is_none() && self.editor_type.is_none()
    }
}

/// Хост без IDE: держит окна и подписчиков в памяти и рассылает
/// события смены активного документа.
pub struct DryRunHost {
    frames: DashMap<FrameHandle, FrameRecord>,
    listeners: RwLock<BTreeMap<SubscriptionCookie, Arc<dyn SelectionEvents>>>,
    active_frame: RwLock<Option<FrameHandle>>,
    closed_frames: RwLock<Vec<FrameHandle>>,
    next_frame: AtomicU64,
    next_cookie: AtomicU32,
    offers_selection_monitor: bool,
}

impl Default for DryRunHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunHost {
    pub fn new() -> Self {
        Self {
            frames: DashMap::new(),
            listeners: RwLock::new(BTreeMap::new()),
            active_frame: RwLock::new(None),
            closed_frames: RwLock::new(Vec::new()),
            next_frame: AtomicU64::new(1),
            next_cookie: AtomicU32::new(1),
            offers_selection_monitor: true,
        }
    }

    /// Хост без сервиса рассылки событий выбора
    pub fn with_selection_monitor(mut self, offered: bool) -> Self {
        self.offers_selection_monitor = offered;
        self
    }

    pub fn open_frame(&self, record: FrameRecord) -> FrameHandle {
        let frame = FrameHandle::new(self.next_frame.fetch_add(1, Ordering::Relaxed));
        debug!("Dry-run: открыто окно {} {:?}", frame, record);
        self.frames.insert(frame, record);
        frame
    }

    pub fn is_open(&self, frame: FrameHandle) -> bool {
        self.frames.contains_key(&frame)
    }

    pub fn open_frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn active_frame(&self) -> Option<FrameHandle> {
        *self.active_frame.read()
    }

    pub fn closed_frames(&self) -> Vec<FrameHandle> {
        self.closed_frames.read().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Сделать окно активным документом и разослать событие
    pub fn activate(&self, frame: FrameHandle) {
        let previous = self.active_frame.write().replace(frame);
        self.broadcast(ElementChange::document_frame(previous, Some(frame)));
    }

    /// Разослать изменение элемента выбора всем подписчикам
    pub fn broadcast(&self, change: ElementChange) {
        debug_if_enabled!("Dry-run: рассылка {}", change);

        // Снимок подписчиков: обработчик может закрывать окна и повторно входить в хост
        let listeners: Vec<Arc<dyn SelectionEvents>> =
            self.listeners.read().values().cloned().collect();

        for listener in listeners {
            let status = listener.on_element_value_changed(change.kind, &change.old, &change.new);
            if !status.is_ok() {
                warn!("Dry-run: подписчик вернул {:?} на {:?}", status, change.kind);
            }
        }
    }

    pub fn broadcast_element(&self, kind: ElementKind, new: SelectionValue) {
        self.broadcast(ElementChange::new(kind, SelectionValue::Empty, new));
    }

    fn record(&self, frame: FrameHandle) -> Result<FrameRecord> {
        match self.frames.get(&frame) {
            Some(record) => Ok(record.clone()),
            None => AutoCloseError::frame_not_found(frame),
        }
    }
}

impl WindowFrames for DryRunHost {
    fn string_property(&self, frame: FrameHandle, property: FrameProperty) -> Result<Option<String>> {
        let record = self.record(frame)?;
        match property {
            FrameProperty::Caption => Ok(record.caption),
            FrameProperty::Moniker => Ok(record.moniker),
            FrameProperty::EditorType => Err(AutoCloseError::PropertyType { frame, property }),
        }
    }

    fn guid_property(&self, frame: FrameHandle, property: FrameProperty) -> Result<Option<Uuid>> {
        let record = self.record(frame)?;
        match property {
            FrameProperty::EditorType => Ok(record.editor_type),
            FrameProperty::Caption | FrameProperty::Moniker => {
                Err(AutoCloseError::PropertyType { frame, property })
            }
        }
    }

    fn close_frame(&self, frame: FrameHandle, mode: SaveMode) -> Result<()> {
        let (_, record) = self
            .frames
            .remove(&frame)
            .ok_or(AutoCloseError::FrameNotFound(frame))?;

        {
            let mut active = self.active_frame.write();
            if *active == Some(frame) {
                *active = None;
            }
        }
        self.closed_frames.write().push(frame);

        info!(
            "Dry-run: закрыто окно {} ({:?}, {:?})",
            frame,
            record.caption.as_deref().unwrap_or("без заголовка"),
            mode
        );
        Ok(())
    }
}

impl SelectionMonitor for DryRunHost {
    fn advise(&self, listener: Arc<dyn SelectionEvents>) -> Result<SubscriptionCookie> {
        let raw = self.next_cookie.fetch_add(1, Ordering::Relaxed);
        let cookie = SubscriptionCookie::new(raw)
            .ok_or_else(|| crate::autoclose_error!(internal, "счётчик подписок переполнен"))?;

        self.listeners.write().insert(cookie, listener);
        debug!("Dry-run: подписчик зарегистрирован ({})", cookie);
        Ok(cookie)
    }

    fn unadvise(&self, cookie: SubscriptionCookie) -> Result<()> {
        match self.listeners.write().remove(&cookie) {
            Some(_) => {
                debug!("Dry-run: подписчик удалён ({})", cookie);
                Ok(())
            }
            None => Err(crate::autoclose_error!(
                internal,
                "подписка {} не зарегистрирована",
                cookie
            )),
        }
    }
}

/// Тонкая обёртка, чтобы отдавать хост как сервис через `Arc`
pub struct DryRunServices(pub Arc<DryRunHost>);

#[async_trait::async_trait]
impl ServiceProvider for DryRunServices {
    async fn selection_monitor(&self) -> Option<Arc<dyn SelectionMonitor>> {
        if self.0.offers_selection_monitor {
            Some(self.0.clone() as Arc<dyn SelectionMonitor>)
        } else {
            None
        }
    }
}
