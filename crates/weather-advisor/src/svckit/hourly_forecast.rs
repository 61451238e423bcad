//! Hourly Forecast Tool

use async_trait::async_trait;
use serde_json::json;

use agent_core::{ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use super::fetch_record;
use crate::provider::TomorrowProvider;

pub const NAME: &str = "get_tomorrow_forecast";

/// Tool for hour-by-hour forecasts from Tomorrow.io
pub struct HourlyForecastTool {
    provider: TomorrowProvider,
}

impl HourlyForecastTool {
    pub fn new(provider: TomorrowProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for HourlyForecastTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Get an hourly weather forecast for a city from Tomorrow.io. Returns temperature (C), wind speed, humidity and precipitation probability per hour.".into(),
            parameters: vec![
                ParameterSchema::required("city", "string", "City or place name"),
                ParameterSchema::optional("hours", "integer", "Number of hourly entries")
                    .with_default(json!(24)),
            ],
            category: Some("forecast".into()),
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
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_default_hours_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("location", "Karachi"))
            .and(query_param("limit", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timelines": {"hourly": [
                    {"time": "2024-05-01T00:00:00Z", "values": {"temperature": 29.4}}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = HourlyForecastTool::new(
            TomorrowProvider::new(ApiKey::new("tm-key")).with_base_url(server.uri()),
        );
        let call = ToolCall::new(
            NAME,
            serde_json::from_value(json!({"city": "Karachi", "hours": null})).unwrap(),
        );

        let result = tool.execute(&call).await.unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["forecast"][0]["temperature"], 29.4);
    }
}
