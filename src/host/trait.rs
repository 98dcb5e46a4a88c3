use crate::error::Result;
use crate::events::{
    ElementKind, FrameHandle, FrameProperty, HostStatus, SaveMode, SelectionValue,
    SubscriptionCookie,
};
use std::sync::Arc;
use uuid::Uuid;

/// Listener for the host's selection broadcasts.
///
/// The host requires all three notifications to be implemented. Only
/// `on_element_value_changed` carries behaviour here, the other two accept
/// the call and report success.
pub trait SelectionEvents: Send + Sync {
    fn on_element_value_changed(
        &self,
        kind: ElementKind,
        old: &SelectionValue,
        new: &SelectionValue,
    ) -> HostStatus;

    fn on_selection_changed(&self, _old: &SelectionValue, _new: &SelectionValue) -> HostStatus {
        HostStatus::Ok
    }

    fn on_cmd_ui_context_changed(&self, _cookie: u32, _active: bool) -> HostStatus {
        HostStatus::Ok
    }
}

/// Selection broadcast service: advise/unadvise listeners.
pub trait SelectionMonitor: Send + Sync {
    fn advise(&self, listener: Arc<dyn SelectionEvents>) -> Result<SubscriptionCookie>;

    fn unadvise(&self, cookie: SubscriptionCookie) -> Result<()>;
}

/// Window frame queries and commands.
///
/// `Err` means the host call itself failed (frame gone, bad handle).
/// `Ok(None)` means the frame exists but does not carry the property.
pub trait WindowFrames: Send + Sync {
    fn string_property(&self, frame: FrameHandle, property: FrameProperty) -> Result<Option<String>>;

    fn guid_property(&self, frame: FrameHandle, property: FrameProperty) -> Result<Option<Uuid>>;

    fn close_frame(&self, frame: FrameHandle, mode: SaveMode) -> Result<()>;
}

/// Service lookup performed once during startup
#[async_trait::async_trait]
pub trait ServiceProvider: Send + Sync {
    /// `None` when the host has no selection broadcast service
    async fn selection_monitor(&self) -> Option<Arc<dyn SelectionMonitor>>;
}
