use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::workflow::state::WorkflowState;

/// Workflow state per user session. Results committed by one request stay
/// visible to every later request of the same session until overwritten.
/// There is no reset transition; a fresh session id starts not-ready.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, WorkflowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for the session, not-ready for unknown sessions.
    pub async fn get(&self, session_id: &str) -> WorkflowState {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the session's state in one step. All fields of the new
    /// state become visible together, never partially.
    pub async fn commit(&self, session_id: &str, state: WorkflowState) {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), state);
    }
}
