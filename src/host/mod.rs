//! Host boundary: responsibility and boundaries
//!
//! This module describes ONLY what the add-in consumes from the host IDE:
//! service lookup, selection broadcast subscription, window frame queries and
//! window close. It MUST NOT decide anything about diff windows; that belongs
//! to the services layer.

mod dry_run_host;
mod r#trait;

pub use self::dry_run_host::{DryRunHost, DryRunServices, FrameRecord};
pub use self::r#trait::{SelectionEvents, SelectionMonitor, ServiceProvider, WindowFrames};
