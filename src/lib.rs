// Library surface for the TUI binary, headless integration tests and reuse.
// Timing logic never touches the terminal; `ui` only renders `App`.
pub mod app;
pub mod app_dirs;
pub mod breath;
pub mod config;
pub mod countdown;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod ui;

pub use error::{FocusError, Result};
