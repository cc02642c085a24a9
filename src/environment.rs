//! Page/environment collaborator
//!
//! The pipeline never reads ambient state directly. Browser details and the
//! recent console diagnostics are handed in through an
//! [`EnvironmentSnapshotProvider`] at call time.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::session::SessionStorage;

/// Maximum lines kept in the console diagnostics buffer
pub const CONSOLE_BUFFER_CAPACITY: usize = 20;

/// Storage key holding the console diagnostics buffer
pub const CONSOLE_BUFFER_KEY: &str = "error_reporting_console_buffer";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Browser details captured with a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub user_agent: String,
    pub url: String,
    pub viewport: Viewport,
}

impl EnvironmentSnapshot {
    pub fn new(user_agent: impl Into<String>, url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            url: url.into(),
            viewport: Viewport { width, height },
        }
    }
}

/// Read-only access to the page environment
pub trait EnvironmentSnapshotProvider: Send + Sync {
    fn snapshot(&self) -> EnvironmentSnapshot;

    /// Recent console diagnostics, oldest first
    fn recent_diagnostics(&self) -> Vec<String>;
}

/// Append-only ring of recent log/warning lines, persisted in session storage
#[derive(Clone)]
pub struct ConsoleBuffer {
    storage: Arc<dyn SessionStorage>,
}

impl ConsoleBuffer {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Append a line, dropping the oldest once capacity is reached
    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines();
        lines.push(line.into());
        if lines.len() > CONSOLE_BUFFER_CAPACITY {
            let excess = lines.len() - CONSOLE_BUFFER_CAPACITY;
            lines.drain(..excess);
        }
        match serde_json::to_string(&lines) {
            Ok(raw) => self.storage.set(CONSOLE_BUFFER_KEY, raw),
            Err(e) => warn!("Failed to persist console buffer: {}", e),
        }
    }

    /// All buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.storage
            .get(CONSOLE_BUFFER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

/// Environment provider backed by a fixed snapshot and a console buffer
#[derive(Clone)]
pub struct PageEnvironment {
    snapshot: EnvironmentSnapshot,
    console: Option<ConsoleBuffer>,
}

impl PageEnvironment {
    pub fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self {
            snapshot,
            console: None,
        }
    }

    pub fn with_console(mut self, console: ConsoleBuffer) -> Self {
        self.console = Some(console);
        self
    }
}

impl EnvironmentSnapshotProvider for PageEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.snapshot.clone()
    }

    fn recent_diagnostics(&self) -> Vec<String> {
        self.console.as_ref().map(ConsoleBuffer::lines).unwrap_or_default()
    }
}
