//! Annotrack Common Library
//!
//! Shared plumbing for the Annotrack workspace members:
//!
//! - **Logging**: `tracing` subscriber configuration and initialization
//! - **Log view**: the bounded in-process log buffer shown by front-ends

pub mod log_view;
pub mod logging;

pub use log_view::LogView;
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
