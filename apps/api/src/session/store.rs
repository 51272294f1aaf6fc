use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{Anchor, PresentationSession};

/// In-memory presentation sessions keyed by session id, bounded by `capacity`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, PresentationSession<Anchor>>>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Arc::default(),
            capacity,
        }
    }

    /// Opens a session, refusing once `capacity` sessions are live.
    pub async fn create(&self) -> Result<Uuid, AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.capacity {
            warn!(capacity = self.capacity, "Session capacity reached");
            return Err(AppError::Capacity(format!(
                "At most {} presentation sessions may be open",
                self.capacity
            )));
        }
        let id = Uuid::new_v4();
        sessions.insert(id, PresentationSession::new());
        info!(session_id = %id, active = sessions.len(), "Presentation session created");
        Ok(id)
    }

    /// Drops the session together with its view and anchors.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&id).ok_or_else(|| not_found(id))?;
        info!(session_id = %id, active = sessions.len(), "Presentation session closed");
        Ok(())
    }

    /// Runs `f` against the session with exclusive access.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut PresentationSession<Anchor>) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        Ok(f(session))
    }

    /// Runs `f` against the session with shared access.
    pub async fn read<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&PresentationSession<Anchor>) -> T,
    ) -> Result<T, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or_else(|| not_found(id))?;
        Ok(f(session))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
