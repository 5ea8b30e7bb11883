use std::collections::HashMap;
use std::time::Duration;

use story_core::SessionState;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    touched: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.touched) >= idle_timeout
    }
}

/// In-process store of live reading sessions, keyed by a random id.
///
/// A session that has not been read or written for `idle_timeout` is
/// treated as gone and dropped on the next access or sweep.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            idle_timeout,
        }
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn insert(&self, state: SessionState) -> Uuid {
        let id = Uuid::new_v4();
        let entry = Entry {
            state,
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        id
    }

    /// Current state of a live session. Refreshes its idle clock.
    pub async fn get(&self, id: Uuid) -> Option<SessionState> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        if !entry.is_idle(now, self.idle_timeout) {
            entry.touched = now;
            return Some(entry.state.clone());
        }
        sessions.remove(&id);
        tracing::debug!(session_id = %id, "idle session dropped");
        None
    }

    /// Store the new state of an existing session. Returns `false` if the
    /// session has been removed or has gone idle meanwhile.
    pub async fn replace(&self, id: Uuid, state: SessionState) -> bool {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(&id) else {
            return false;
        };
        if !entry.is_idle(now, self.idle_timeout) {
            entry.state = state;
            entry.touched = now;
            return true;
        }
        sessions.remove(&id);
        false
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionState> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|entry| entry.state)
    }

    /// Drop every idle session and return how many were dropped.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn replace_does_not_resurrect_removed_sessions() {
        let registry = SessionRegistry::new(HOUR);
        let id = registry.insert(SessionState::NoProfile).await;
        assert!(registry.replace(id, SessionState::NoProfile).await);

        registry.remove(id).await;
        assert!(!registry.replace(id, SessionState::NoProfile).await);
        assert!(registry.get(id).await.is_none());
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn idle_sessions_expire_on_access() {
        let registry = SessionRegistry::new(Duration::from_millis(20));
        let id = registry.insert(SessionState::NoProfile).await;
        assert!(registry.get(id).await.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(registry.get(id).await.is_none());
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn sweep_keeps_only_recent_sessions() {
        let registry = SessionRegistry::new(Duration::from_millis(40));
        registry.insert(SessionState::NoProfile).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        let fresh = registry.insert(SessionState::NoProfile).await;

        assert_eq!(registry.sweep().await, 1);
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(fresh).await.is_some());
    }
}
