use crate::events::{FrameHandle, FrameProperty};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutoCloseError {
    #[error("Окно не найдено: {0}")]
    FrameNotFound(FrameHandle),

    #[error("Свойство {property:?} окна {frame} имеет другой тип")]
    PropertyType {
        frame: FrameHandle,
        property: FrameProperty,
    },

    #[error("Вызов хоста {call} завершился с кодом {code:#010x}")]
    HostCall { call: &'static str, code: i32 },

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl AutoCloseError {
    pub fn frame_not_found<T>(frame: FrameHandle) -> Result<T> {
        Err(AutoCloseError::FrameNotFound(frame))
    }
}

pub type Result<T> = std::result::Result<T, AutoCloseError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! autoclose_error {
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::AutoCloseError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::AutoCloseError::Internal(format!($($arg)*))
    };
    (host_call, $call:expr, $code:expr) => {
        $crate::error::AutoCloseError::HostCall { call: $call, code: $code }
    };
}
