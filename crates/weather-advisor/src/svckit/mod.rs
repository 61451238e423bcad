//! Service Kit - Agent Tools
//!
//! Each tool wraps one provider adapter and implements `agent_core::Tool`
//! for the weather assistant.

mod current_weather;
mod daily_forecast;
mod hourly_forecast;
mod timeline;

pub use current_weather::CurrentWeatherTool;
pub use daily_forecast::DailyForecastTool;
pub use hourly_forecast::HourlyForecastTool;
pub use timeline::TimelineTool;

use agent_core::{AgentError, Result as CoreResult, ToolCall, ToolResult};

use crate::model::WeatherRecord;
use crate::provider::WeatherProvider;

/// Decode `call` into the provider's query, fetch, and wrap the record.
///
/// Undecodable arguments are a validation failure; adapter errors surface as
/// `AgentError::ToolExecution`.
pub(crate) async fn fetch_record<P: WeatherProvider>(
    provider: &P,
    name: &str,
    call: &ToolCall,
) -> CoreResult<ToolResult> {
    let query: P::Query = serde_json::from_value(call.arguments_object())
        .map_err(|e| AgentError::ToolValidation(format!("Invalid arguments for {name}: {e}")))?;

    let record = provider.fetch(&query).await?;
    tracing::debug!(tool = name, provider = %provider.id(), error = record.is_error(), "Weather fetched");

    record_result(name, &record)
}

/// Serialize `record` as the tool output; an error record is a failed result
pub(crate) fn record_result(name: &str, record: &WeatherRecord) -> CoreResult<ToolResult> {
    let data = serde_json::to_value(record)?;
    let output = data.to_string();

    let result = if record.is_error() {
        ToolResult::failure(name, output)
    } else {
        ToolResult::success(name, output)
    };

    Ok(result.with_data(data))
}
