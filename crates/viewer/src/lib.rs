// crates/viewer/src/lib.rs
//! The task board viewer.
//!
//! A [`ViewerShell`] owns one session: configuration, the record store, the
//! active query and the full-text toggle. [`ShellHandle::spawn`] runs it as a
//! single event loop that debounces input, auto-reloads on a timer and
//! publishes [`BoardSnapshot`]s for the HTTP layer.

pub mod actor;
pub mod loader;
pub mod markdown;
pub mod render;
pub mod shell;
pub mod source;

pub use actor::{ShellClosed, ShellCommand, ShellHandle};
pub use loader::{ContentLoader, LoadReport};
pub use markdown::{open_task, render_markdown, TaskModal};
pub use render::{dynamic_css, render_board, status_icon, BoardSnapshot, ColumnLoad, ColumnView};
pub use shell::{SessionContext, ViewerShell};
pub use source::{is_plain_filename, FsSource, SourceError, TaskSource};
