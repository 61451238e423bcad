//! Current Weather Tool
//!
//! Fetches current conditions for a city from OpenWeatherMap.

use async_trait::async_trait;

use agent_core::{ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use super::fetch_record;
use crate::provider::OpenWeatherMapProvider;

pub const NAME: &str = "get_weather";

/// Tool for current weather conditions
pub struct CurrentWeatherTool {
    provider: OpenWeatherMapProvider,
}

impl CurrentWeatherTool {
    pub fn new(provider: OpenWeatherMapProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Fetch weather information for a specific city. Returns temperature (C), description, humidity and wind speed right now.".into(),
            parameters: vec![ParameterSchema::required(
                "city",
                "string",
                "City name (e.g., 'London')",
            )],
            category: Some("current".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        fetch_record(&self.provider, NAME, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use agent_core::AgentError;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn call(city: &str) -> ToolCall {
        ToolCall::new(NAME, serde_json::from_value(json!({"city": city})).unwrap())
    }

    async fn tool_with(response: ResponseTemplate) -> (MockServer, CurrentWeatherTool) {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(response).mount(&server).await;
        let tool = CurrentWeatherTool::new(
            OpenWeatherMapProvider::new(ApiKey::new("ow-key")).with_base_url(server.uri()),
        );
        (server, tool)
    }

    #[tokio::test]
    async fn test_current_conditions_output() {
        let (_server, tool) = tool_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "London",
            "main": {"temp": 14.2, "humidity": 81},
            "weather": [{"description": "light rain"}],
            "wind": {"speed": 5.1}
        })))
        .await;

        let result = tool.execute(&call("London")).await.unwrap();

        assert!(result.success);
        assert_eq!(result.name, NAME);
        assert_eq!(result.data.unwrap()["description"], "light rain");
    }

    #[tokio::test]
    async fn test_malformed_body_is_execution_error() {
        let (_server, tool) =
            tool_with(ResponseTemplate::new(200).set_body_string("not json")).await;

        let err = tool.execute(&call("London")).await.unwrap_err();

        assert!(matches!(err, AgentError::ToolExecution(ref msg) if msg.contains("Malformed")));
        assert!(!err.is_tool_misuse());
    }
}
