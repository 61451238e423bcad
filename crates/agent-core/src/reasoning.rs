//! Reasoning Loop
//!
//! Drives the remote model through native function calling: the model either
//! answers directly or requests tools, whose results are fed back until it
//! produces a final answer.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Instructions sent as the system message on every run
    pub system_prompt: String,

    /// Maximum model calls per run before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when they help answer the question, then answer concisely.";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Run the agent over a conversation history and return the final answer.
    ///
    /// The history is read, never modified: tool traffic for this run lives
    /// in a private working context.
    pub async fn run(&self, history: &[Message]) -> Result<String> {
        let mut context = Vec::with_capacity(history.len() + 1);
        context.push(Message::system(self.config.system_prompt.clone()));
        context.extend(history.iter().filter(|m| m.is_turn()).cloned());

        let schemas: Vec<ToolSchema> = self.tools.schemas();
        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            let completion = self
                .provider
                .complete(&context, &schemas, &self.config.generation)
                .await?;

            if !completion.wants_tools() {
                tracing::debug!(iterations, "Agent produced final answer");
                return Ok(completion.content);
            }

            let calls: Vec<ToolCall> = completion
                .tool_calls
                .into_iter()
                .map(|mut call| {
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    call
                })
                .collect();

            context.push(Message::assistant_tool_calls(
                completion.content,
                calls.clone(),
            ));

            for call in &calls {
                let result = self.execute_tool(call).await?;
                context.push(Message::tool(result.output, call.id.clone()));
            }
        }
    }

    /// Run with a simple string input and no session history
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.run(&[Message::user(question)]).await
    }

    /// Execute a tool call.
    ///
    /// Unknown tools and invalid arguments are reported to the model as a
    /// failed result; execution failures abort the run.
    async fn execute_tool(&self, call: &ToolCall) -> Result<ToolResult> {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id.clone_from(&call.id);
                Ok(result)
            }
            Err(e) if e.is_tool_misuse() => {
                tracing::warn!(tool = %call.name, error = %e, "Rejected tool call");
                Ok(ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {e}"),
                    data: None,
                })
            }
            Err(e) => {
                tracing::error!(tool = %call.name, error = %e, "Tool execution failed");
                Err(e)
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::provider::Completion;
    use crate::testing::{weather_call, ScriptedProvider, StubWeatherTool};

    fn agent(provider: Arc<ScriptedProvider>) -> Agent {
        AgentBuilder::new()
            .provider(provider)
            .tool(StubWeatherTool)
            .system_prompt("You are a weather assistant.")
            .max_iterations(3)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![Completion::text("Hi!", "m")]));
        let history = vec![Message::user("Hello")];

        let answer = agent(provider.clone()).run(&history).await.unwrap();

        assert_eq!(answer, "Hi!");
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0].role, Role::System);
        assert_eq!(requests[0][0].content, "You are a weather assistant.");
        assert_eq!(requests[0][1].content, "Hello");
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Completion::tool_calls(vec![weather_call("Lahore", "call_1")], "m"),
            Completion::text("It is 31°C in Lahore.", "m"),
        ]));
        let history = vec![Message::user("What's the weather in Lahore?")];

        let answer = agent(provider.clone()).run(&history).await.unwrap();

        assert_eq!(answer, "It is 31°C in Lahore.");
        let second = &provider.requests()[1];
        let assistant = &second[2];
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.tool_calls[0].name, "get_weather");
        let tool = &second[3];
        assert_eq!(tool.role, Role::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool.content.contains("Lahore"));
        // Caller's history is untouched
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let bogus = ToolCall::new("get_stock_price", Default::default()).with_id("c9");
        let provider = Arc::new(ScriptedProvider::new(vec![
            Completion::tool_calls(vec![bogus], "m"),
            Completion::text("Sorry, I can only do weather.", "m"),
        ]));

        let answer = agent(provider.clone()).ask("AAPL?").await.unwrap();

        assert_eq!(answer, "Sorry, I can only do weather.");
        let tool = &provider.requests()[1][3];
        assert!(tool.content.contains("Tool not found: get_stock_price"));
    }

    #[tokio::test]
    async fn test_tool_execution_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![Completion::tool_calls(
            vec![weather_call("Atlantis", "c1")],
            "m",
        )]));

        let err = agent(provider).ask("Weather in Atlantis?").await.unwrap_err();

        assert!(matches!(err, AgentError::ToolExecution(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::failing(AgentError::Provider(
            "boom".into(),
        )));

        let err = agent(provider).ask("Hi").await.unwrap_err();

        assert!(matches!(err, AgentError::Provider(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let looping: Vec<_> = (0..5)
            .map(|i| Completion::tool_calls(vec![weather_call("Lahore", &format!("c{i}"))], "m"))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(looping));

        let err = agent(provider).ask("Loop forever").await.unwrap_err();

        assert!(matches!(err, AgentError::MaxIterations(3)));
    }

    #[test]
    fn test_builder_requires_provider() {
        let result = AgentBuilder::new().build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }
}
