//! Registry of live event-stream sessions keyed by generated session id

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::errors::AppError;

const SESSION_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Default)]
pub struct SessionManager {
    channels: RwLock<HashMap<String, mpsc::Sender<String>>>,
}

/// Handle returned on streaming accept. Dropping it (or just the guard)
/// removes the session; queued undelivered payloads are dropped with it.
pub struct OpenSession {
    pub id: String,
    pub receiver: mpsc::Receiver<String>,
    pub guard: SessionGuard,
}

pub struct SessionGuard {
    id: String,
    manager: Arc<SessionManager>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.manager.close(&self.id);
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(self: &Arc<Self>) -> OpenSession {
        let id = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), sender);

        OpenSession {
            guard: SessionGuard {
                id: id.clone(),
                manager: Arc::clone(self),
            },
            id,
            receiver,
        }
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(session_id)
    }

    pub fn close(&self, session_id: &str) -> bool {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some()
    }

    /// Sends a payload to the session's stream. Session ids are single-use:
    /// an unknown or already-closed id is a NotFound outcome, never a queue
    /// for a future connection.
    pub async fn dispatch(&self, session_id: &str, payload: String) -> Result<(), AppError> {
        // clone the sender out of the lock; never hold it across an await
        let sender = {
            let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
            channels.get(session_id).cloned()
        };

        let Some(sender) = sender else {
            return Err(AppError::session_not_found(session_id));
        };

        if sender.send(payload).await.is_err() {
            // receiver gone: the connection closed without the guard having
            // run yet, so drop the stale entry now
            self.close(session_id);
            return Err(AppError::session_not_found(session_id));
        }

        Ok(())
    }
}
