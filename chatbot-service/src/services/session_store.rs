//! In-memory session store shared by all chat handlers.
//!
//! Contract notes:
//! - `resolve` never fails. A missing id and an unknown id are treated the
//!   same way: a session is created under the (supplied or generated) id.
//! - `append_message` on a missing session is a silent no-op; the return
//!   value only reports whether anything was appended.
//! - Appends for the same id are serialized by the map's shard lock, so
//!   concurrent turns never lose messages. No lock is held while a model call
//!   is in flight.

use crate::models::{ChatMessage, ModelSettings, Role, Session, SessionSummary};
use crate::services::metrics::ACTIVE_SESSIONS;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Retention limits. Both are off by default, which keeps every session
/// until it is deleted or the process exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Remove sessions with no activity for longer than this.
    pub idle_ttl: Option<Duration>,
    /// Keep at most this many sessions, dropping the least recently active.
    pub max_sessions: Option<usize>,
}

impl RetentionPolicy {
    pub fn is_enabled(&self) -> bool {
        self.idle_ttl.is_some() || self.max_sessions.is_some()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    defaults: ModelSettings,
    retention: RetentionPolicy,
}

impl SessionStore {
    pub fn new(defaults: ModelSettings, retention: RetentionPolicy) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            defaults,
            retention,
        }
    }

    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// Return the id of an existing session, creating one when `session_id`
    /// is absent or unknown.
    pub fn resolve(&self, session_id: Option<&str>) -> String {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.sessions
            .entry(session_id.clone())
            .or_insert_with(|| {
                tracing::info!(session_id = %session_id, "Session created");
                Session::new(session_id.clone(), self.defaults.clone(), Utc::now())
            });

        session_id
    }

    /// Append a timestamped message. Returns `false` without side effects if
    /// the session does not exist.
    pub fn append_message(&self, session_id: &str, role: Role, content: impl Into<String>) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.add_message(role, content.into(), Utc::now());
                true
            }
            None => {
                tracing::debug!(session_id = %session_id, role = %role, "Append to missing session ignored");
                false
            }
        }
    }

    /// Remember a successful text exchange as model context for later turns.
    pub fn record_exchange(&self, session_id: &str, user: &str, assistant: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.add_exchange(user.to_string(), assistant.to_string(), Utc::now());
                true
            }
            None => false,
        }
    }

    /// Replace the system prompt used for this and later turns.
    pub fn update_system_prompt(&self, session_id: &str, system_prompt: impl Into<String>) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut session) => {
                session.settings.system_prompt = system_prompt.into();
                true
            }
            None => false,
        }
    }

    /// Snapshot of a session.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|s| s.value().clone())
    }

    /// Snapshot of a session's messages.
    pub fn history(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        self.sessions.get(session_id).map(|s| s.messages.clone())
    }

    /// Remove a session. Returns `false` if it did not exist.
    pub fn delete(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "Session deleted");
        }
        removed
    }

    /// Summaries of all sessions, oldest first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> =
            self.sessions.iter().map(|s| s.value().summary()).collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Apply the retention policy as of `now`. Returns how many sessions were
    /// removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;

        if let Some(ttl) = self.retention.idle_ttl {
            self.sessions.retain(|_, session| {
                // A negative idle time (clock skew) never expires a session.
                let expired = (now - session.last_active_at)
                    .to_std()
                    .map(|idle| idle > ttl)
                    .unwrap_or(false);
                if expired {
                    removed += 1;
                }
                !expired
            });
        }

        if let Some(max) = self.retention.max_sessions {
            let len = self.sessions.len();
            if len > max {
                let mut by_activity: Vec<(String, DateTime<Utc>)> = self
                    .sessions
                    .iter()
                    .map(|s| (s.key().clone(), s.last_active_at))
                    .collect();
                by_activity.sort_by(|a, b| a.1.cmp(&b.1));

                for (session_id, _) in by_activity.into_iter().take(len - max) {
                    if self.sessions.remove(&session_id).is_some() {
                        removed += 1;
                    }
                }
            }
        }

        removed
    }
}

/// Run [`SessionStore::sweep`] every `interval` until the runtime shuts down.
pub fn spawn_sweeper(store: SessionStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = store.sweep(Utc::now());
            ACTIVE_SESSIONS.set(store.len() as i64);
            if removed > 0 {
                tracing::info!(
                    removed = removed,
                    remaining = store.len(),
                    "Evicted chat sessions"
                );
            }
        }
    })
}
