//! Chat Lifecycle
//!
//! Turns host runtime events (chat started, message received) into session
//! store updates and agent runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as TurnLock;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::reasoning::Agent;
use crate::session::{Session, SessionId, SessionStore};

/// Default greeting sent when a chat starts
pub const DEFAULT_WELCOME: &str = "Welcome! How can I help you today?";

/// Handles chat events for every session in a store
///
/// Turns on the same session run one at a time; different sessions run
/// concurrently.
pub struct ChatHandler {
    agent: Arc<Agent>,
    store: Arc<dyn SessionStore>,
    welcome: String,
    turns: Mutex<HashMap<SessionId, Arc<TurnLock<()>>>>,
}

impl ChatHandler {
    pub fn new(agent: Arc<Agent>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            agent,
            store,
            welcome: DEFAULT_WELCOME.into(),
            turns: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    /// Chat started: initialize an empty history and return the welcome message
    pub fn on_chat_start(&self, id: SessionId) -> Result<String> {
        let session = self.store.start(id)?;
        tracing::info!(session = %session.id, "Chat session started");
        Ok(self.welcome.clone())
    }

    /// Message received: append the user turn, run the agent, append the
    /// reply and persist the history.
    ///
    /// Nothing is saved when the agent fails.
    pub async fn on_message(&self, id: &SessionId, content: impl Into<String>) -> Result<String> {
        let lock = self.turn_lock(id)?;
        let _turn = lock.lock().await;

        let Some(mut session) = self.store.load(id)? else {
            self.forget(id)?;
            return Err(AgentError::Session(format!("session {id} has not been started")));
        };

        session.push(Message::user(content));

        let reply = self.agent.run(session.history()).await.map_err(|e| {
            tracing::error!(session = %id, error = %e, "Agent run failed");
            e
        })?;

        session.push(Message::assistant(reply.clone()));
        self.store.save(&session)?;

        tracing::debug!(session = %id, turns = session.message_count(), "Turn completed");
        Ok(reply)
    }

    fn turn_lock(&self, id: &SessionId) -> Result<Arc<TurnLock<()>>> {
        let mut turns = self.turns.lock().map_err(poisoned)?;
        Ok(Arc::clone(turns.entry(id.clone()).or_default()))
    }

    fn forget(&self, id: &SessionId) -> Result<()> {
        self.turns.lock().map_err(poisoned)?.remove(id);
        Ok(())
    }

    /// Current history of a session
    pub fn history(&self, id: &SessionId) -> Result<Option<Session>> {
        self.store.load(id)
    }

    /// Drop a session and its history
    pub fn end(&self, id: &SessionId) -> Result<()> {
        self.store.delete(id)?;
        self.forget(id)?;
        tracing::info!(session = %id, "Chat session ended");
        Ok(())
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn welcome(&self) -> &str {
        &self.welcome
    }
}

fn poisoned<T>(_: T) -> AgentError {
    AgentError::Session("turn lock poisoned".into())
}
