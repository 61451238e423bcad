//! Daily Forecast Tool
//!
//! Multi-day forecast from WeatherAPI.com.

use async_trait::async_trait;
use serde_json::json;

use agent_core::{ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use super::fetch_record;
use crate::provider::WeatherApiProvider;

pub const NAME: &str = "get_weatherapi_forecast";

/// Tool for multi-day forecasts
pub struct DailyForecastTool {
    provider: WeatherApiProvider,
}

impl DailyForecastTool {
    pub fn new(provider: WeatherApiProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Tool for DailyForecastTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Get a daily weather forecast for a city from WeatherAPI. Returns condition, average temperature (C), humidity and max wind (kph) per day.".into(),
            parameters: vec![
                ParameterSchema::required("city", "string", "City or place name (e.g., 'Lahore')"),
                ParameterSchema::optional("days", "integer", "Number of forecast days")
                    .with_default(json!(3)),
            ],
            category: Some("forecast".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        fetch_record(&self.provider, NAME, call).await
    }
}
