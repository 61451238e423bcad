//! Timeline Tool
//!
//! Historical and forecast weather over a date range from Visual Crossing,
//! either one entry per day or flattened to one entry per hour.

use async_trait::async_trait;
use serde_json::json;

use agent_core::{ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use super::fetch_record;
use crate::provider::VisualCrossingProvider;

pub const NAME: &str = "get_visualcrossing_weather";

pub struct TimelineTool {
    provider: VisualCrossingProvider,
}

impl TimelineTool {
    pub fn new(provider: VisualCrossingProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for TimelineTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Fetch weather data from Visual Crossing with options for historical, forecast, and hourly data. Omit dates for the default forecast window.".into(),
            parameters: vec![
                ParameterSchema::required("city", "string", "Location city or place name"),
                ParameterSchema::optional("start_date", "string", "Start date 'YYYY-MM-DD'"),
                ParameterSchema::optional(
                    "end_date",
                    "string",
                    "End date 'YYYY-MM-DD' (defaults to start_date)",
                ),
                ParameterSchema::optional(
                    "include_hours",
                    "boolean",
                    "Return hourly entries instead of daily ones",
                )
                .with_default(json!(false)),
                ParameterSchema::optional(
                    "days_limit",
                    "integer",
                    "Number of days to return (daily data only)",
                )
                .with_default(json!(3)),
            ],
            category: Some("history".into()),
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_date_range_hourly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Lahore/2024-05-01/2024-05-02"))
            .and(query_param("include", "hours"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resolvedAddress": "Lahore, Pakistan",
                "days": [
                    {"datetime": "2024-05-01", "hours": [{"datetime": "00:00:00", "temp": 28.0}]},
                    {"datetime": "2024-05-02", "hours": [{"datetime": "00:00:00", "temp": 29.0}]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TimelineTool::new(
            VisualCrossingProvider::new(ApiKey::new("vc-key")).with_base_url(server.uri()),
        );
        let call = ToolCall::new(
            NAME,
            serde_json::from_value(json!({
                "city": "Lahore",
                "start_date": "2024-05-01",
                "end_date": "2024-05-02",
                "include_hours": true
            }))
            .unwrap(),
        );

        let result = tool.execute(&call).await.unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["location"], "Lahore, Pakistan");
        assert_eq!(data["forecast"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_schema_requires_only_city() {
        let tool = TimelineTool::new(VisualCrossingProvider::new(ApiKey::new("k")));
        let schema = tool.schema().to_json_schema();

        assert_eq!(schema["required"], json!(["city"]));
        assert_eq!(schema["properties"]["include_hours"]["type"], "boolean");
    }
}
