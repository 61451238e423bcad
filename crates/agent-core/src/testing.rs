//! Scripted provider and tools shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema};

/// Replays queued completions and records every request it receives
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<Completion>>>,
    requests: Mutex<Vec<Vec<Message>>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Completion>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn failing(error: AgentError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(error)])),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering, so overlapping calls interleave
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolSchema],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Completion::text("(script exhausted)", "scripted")))
    }
}

/// Returns a canned weather payload for any city
pub struct StubWeatherTool;

#[async_trait]
impl Tool for StubWeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Fetch current weather for a city".into(),
            parameters: vec![ParameterSchema::required("city", "string", "City name")],
            category: None,
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let city = call
            .arguments
            .get("city")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if city == "Atlantis" {
            return Err(AgentError::ToolExecution("connection refused".into()));
        }
        Ok(ToolResult::success(
            "get_weather",
            format!(r#"{{"city":"{city}","temperature":31.0}}"#),
        ))
    }
}

pub fn weather_call(city: &str, id: &str) -> ToolCall {
    let mut arguments = HashMap::new();
    arguments.insert("city".to_string(), Value::String(city.to_string()));
    ToolCall::new("get_weather", arguments).with_id(id)
}
