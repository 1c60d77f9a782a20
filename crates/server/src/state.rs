// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;
use taskmgr_core::ProjectLayout;
use taskmgr_viewer::{ShellHandle, TaskSource};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    pub layout: ProjectLayout,
    /// Read access for config and modal documents.
    pub source: Arc<dyn TaskSource>,
    /// The running viewer shell; owns the board and search session.
    pub shell: ShellHandle,
}

impl AppState {
    pub fn new(layout: ProjectLayout, source: Arc<dyn TaskSource>, shell: ShellHandle) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            layout,
            source,
            shell,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
