//! Stable anonymous session id

use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

use super::storage::SessionStorage;

/// Storage key holding the session id
pub const SESSION_ID_KEY: &str = "error_reporting_session_id";

/// Per-browsing-session context handed to the pipeline
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
    init_lock: Arc<Mutex<()>>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            init_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Session id for this browsing session.
    ///
    /// Generated and written to session storage on first use; every later
    /// call returns the stored value.
    pub fn session_id(&self) -> String {
        if let Some(existing) = self.storage.get(SESSION_ID_KEY) {
            return existing;
        }

        // A poisoned lock only means another caller panicked mid-init
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = self.storage.get(SESSION_ID_KEY) {
            return existing;
        }

        let id = format!("session_{}", Uuid::new_v4().simple());
        self.storage.set(SESSION_ID_KEY, id.clone());
        debug!(session_id = %id, "Started reporting session");
        id
    }

    /// Underlying session storage
    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }
}
