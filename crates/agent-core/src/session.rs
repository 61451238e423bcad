//! Session Management
//!
//! Per-session conversation history, held in an injectable store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chat session and its history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Ordered user/assistant turns
    pub conversation: Conversation,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with an empty history
    pub fn with_id(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation: Conversation::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Append a turn
    pub fn push(&mut self, message: Message) {
        self.conversation.push(message);
        self.touch();
    }

    /// History as a slice of turns
    pub fn history(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }
}

/// How much history a store keeps per session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum turns kept; `None` keeps everything
    pub max_turns: Option<usize>,
}

impl RetentionPolicy {
    pub const fn unbounded() -> Self {
        Self { max_turns: None }
    }

    pub const fn max_turns(max: usize) -> Self {
        Self {
            max_turns: Some(max),
        }
    }

    /// Trim a session's history, dropping the oldest turns
    pub fn apply(&self, session: &mut Session) {
        if let Some(max) = self.max_turns {
            session.conversation.retain_last(max);
        }
    }
}

/// Session store trait
pub trait SessionStore: Send + Sync {
    /// Create (or reset) a session with an empty history
    fn start(&self, id: SessionId) -> Result<Session>;

    /// Load a session by ID
    fn load(&self, id: &SessionId) -> Result<Option<Session>>;

    /// Save a session, applying the store's retention policy
    fn save(&self, session: &Session) -> Result<()>;

    /// Delete a session
    fn delete(&self, id: &SessionId) -> Result<()>;

    /// Number of live sessions
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    retention: RetentionPolicy,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_retention(RetentionPolicy::unbounded())
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            retention,
        }
    }

    pub const fn retention(&self) -> RetentionPolicy {
        self.retention
    }
}

fn poisoned<T>(_: T) -> AgentError {
    AgentError::Session("session store lock poisoned".into())
}

impl SessionStore for MemorySessionStore {
    fn start(&self, id: SessionId) -> Result<Session> {
        let session = Session::with_id(id);
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn load(&self, id: &SessionId) -> Result<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut session = session.clone();
        self.retention.apply(&mut session);

        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.remove(id);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().map_err(poisoned)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_creates_empty_history() {
        let store = MemorySessionStore::new();
        let id = SessionId::from_string("s1");

        let session = store.start(id.clone()).unwrap();

        assert_eq!(session.message_count(), 0);
        let loaded = store.load(&id).unwrap().unwrap();
        assert!(loaded.history().is_empty());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_start_resets_existing_session() {
        let store = MemorySessionStore::new();
        let mut session = store.start(SessionId::from_string("s1")).unwrap();
        session.push(Message::user("hi"));
        store.save(&session).unwrap();

        store.start(SessionId::from_string("s1")).unwrap();

        let loaded = store.load(&session.id).unwrap().unwrap();
        assert!(loaded.history().is_empty());
    }

    #[test]
    fn test_unknown_session_loads_none() {
        let store = MemorySessionStore::new();
        assert!(store.load(&SessionId::new()).unwrap().is_none());
    }

    #[test]
    fn test_retention_keeps_latest_turns() {
        let store = MemorySessionStore::with_retention(RetentionPolicy::max_turns(2));
        let mut session = store.start(SessionId::from_string("s1")).unwrap();
        session.push(Message::user("q1"));
        session.push(Message::assistant("a1"));
        session.push(Message::user("q2"));
        session.push(Message::assistant("a2"));

        store.save(&session).unwrap();

        let loaded = store.load(&session.id).unwrap().unwrap();
        let contents: Vec<_> = loaded.history().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q2", "a2"]);
    }

    #[test]
    fn test_delete() {
        let store = MemorySessionStore::new();
        let session = store.start(SessionId::new()).unwrap();

        store.delete(&session.id).unwrap();

        assert!(store.is_empty().unwrap());
    }
}
