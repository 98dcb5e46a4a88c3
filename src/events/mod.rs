pub mod frame;
pub mod selection;

pub use frame::{FrameHandle, FrameProperty, SaveMode, SubscriptionCookie};
pub use selection::{ElementKind, HostStatus, SelectionValue};

/// Изменение элемента выбора, как его видит хост
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementChange {
    pub kind: ElementKind,
    pub old: SelectionValue,
    pub new: SelectionValue,
    pub timestamp: std::time::Instant,
}

impl ElementChange {
    pub fn new(kind: ElementKind, old: SelectionValue, new: SelectionValue) -> Self {
        Self {
            kind,
            old,
            new,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn document_frame(old: Option<FrameHandle>, new: Option<FrameHandle>) -> Self {
        Self::new(ElementKind::DocumentFrame, old.into(), new.into())
    }
}

impl std::fmt::Display for ElementChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: {} -> {} ({}ms ago)",
            self.kind,
            self.old,
            self.new,
            self.timestamp.elapsed().as_millis()
        )
    }
}
