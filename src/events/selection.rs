use super::frame::FrameHandle;
use std::fmt;

/// Элемент выбора, об изменении которого сообщает хост
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    UndoManager,
    WindowFrame,
    /// Активное окно документа - единственный элемент, который нас интересует
    DocumentFrame,
    StartupProject,
    PropertyBrowser,
    UserContext,
    ResultList,
    LastWindowFrame,
    Unknown(u32),
}

impl ElementKind {
    /// Преобразовать числовой идентификатор элемента хоста
    pub fn from_raw(id: u32) -> Self {
        match id {
            0 => Self::UndoManager,
            1 => Self::WindowFrame,
            2 => Self::DocumentFrame,
            3 => Self::StartupProject,
            4 => Self::PropertyBrowser,
            5 => Self::UserContext,
            6 => Self::ResultList,
            7 => Self::LastWindowFrame,
            other => Self::Unknown(other),
        }
    }

    pub fn is_document_frame(self) -> bool {
        self == Self::DocumentFrame
    }
}

/// Значение элемента выбора до или после изменения
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionValue {
    #[default]
    Empty,
    Frame(FrameHandle),
    Other(String),
}

impl SelectionValue {
    pub fn as_frame(&self) -> Option<FrameHandle> {
        match self {
            Self::Frame(frame) => Some(*frame),
            _ => None,
        }
    }
}

impl From<Option<FrameHandle>> for SelectionValue {
    fn from(frame: Option<FrameHandle>) -> Self {
        frame.map_or(Self::Empty, Self::Frame)
    }
}

impl fmt::Display for SelectionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "<пусто>"),
            Self::Frame(frame) => write!(f, "{}", frame),
            Self::Other(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// Код возврата уведомления обратно в хост
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStatus {
    Ok,
    Fail(i32),
}

impl HostStatus {
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_from_raw() {
        assert_eq!(ElementKind::from_raw(2), ElementKind::DocumentFrame);
        assert_eq!(ElementKind::from_raw(1), ElementKind::WindowFrame);
        assert_eq!(ElementKind::from_raw(99), ElementKind::Unknown(99));
        assert!(ElementKind::from_raw(2).is_document_frame());
        assert!(!ElementKind::WindowFrame.is_document_frame());
    }

    #[test]
    fn test_selection_value_frame_extraction() {
        let frame = FrameHandle::new(3);
        assert_eq!(SelectionValue::Frame(frame).as_frame(), Some(frame));
        assert_eq!(SelectionValue::Other("project".to_string()).as_frame(), None);
        assert_eq!(SelectionValue::from(None::<FrameHandle>), SelectionValue::Empty);
        assert_eq!(SelectionValue::from(Some(frame)), SelectionValue::Frame(frame));
    }
}
