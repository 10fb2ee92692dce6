//! In-memory session registry.
//!
//! Each wizard session is owned by exactly one client; the registry only
//! arbitrates access between request handlers. Sessions are ephemeral and
//! vanish on restart, matching the model's no-durability contract.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::wizard::state::{WizardSnapshot, WizardState};
use crate::wizard::WizardError;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, WizardState>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session and returns its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().await.insert(id, WizardState::new());
        id
    }

    /// Runs a closure against the session's state under the registry lock.
    /// The closure must not block; all collaborator I/O happens outside.
    pub async fn with<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardState) -> Result<T, WizardError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.lock().await;
        let state = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(state).map_err(AppError::from)
    }

    /// Clones the session state for read-only work outside the lock.
    pub async fn get(&self, id: Uuid) -> Result<WizardState, AppError> {
        let sessions = self.inner.lock().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<WizardSnapshot, AppError> {
        Ok(self.get(id).await?.snapshot())
    }
}
