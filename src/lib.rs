//! Автозакрытие diff-вкладок: наблюдатель смены активного документа и
//! эвристический классификатор diff-окон поверх абстрактного хоста IDE.

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod services;

pub use error::{AutoCloseError, Result};
pub use services::{DiffClassifier, SelectionObserver};
