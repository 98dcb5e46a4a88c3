use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Непрозрачный идентификатор окна документа в хосте.
///
/// Хост владеет окном; хэндл не продлевает его жизнь и может устареть
/// к моменту следующего события. Проверка актуальности - только через
/// ошибку самого вызова хоста.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Свойства окна, которые умеет отдавать хост
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameProperty {
    /// Идентификатор ресурса документа (путь или URI)
    Moniker,
    /// Заголовок вкладки
    Caption,
    /// GUID фабрики редактора
    EditorType,
}

/// Режим сохранения при закрытии окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SaveMode {
    #[default]
    NoSave,
    SaveIfDirty,
    PromptSave,
}

/// Токен подписки на события выбора. Ноль хостом не выдаётся.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionCookie(NonZeroU32);

impl SubscriptionCookie {
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SubscriptionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cookie#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_cookie_is_rejected() {
        assert!(SubscriptionCookie::new(0).is_none());
        assert_eq!(SubscriptionCookie::new(7).map(SubscriptionCookie::get), Some(7));
    }

    #[test]
    fn test_frame_handle_display() {
        assert_eq!(FrameHandle::new(42).to_string(), "frame#42");
        assert_eq!(SaveMode::default(), SaveMode::NoSave);
    }
}
