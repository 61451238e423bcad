//! # weather-advisor
//!
//! Weather assistant domain: four provider adapters and the agent tools that
//! expose them to the model.
//!
//! ```text
//! ┌────────────────────────────┬──────────────────┬───────────────────────┐
//! │ Tool                       │ Provider         │ Data                  │
//! ├────────────────────────────┼──────────────────┼───────────────────────┤
//! │ get_weatherapi_forecast    │ WeatherAPI       │ daily, N days         │
//! │ get_tomorrow_forecast      │ Tomorrow.io      │ hourly, N hours       │
//! │ get_visualcrossing_weather │ Visual Crossing  │ date range, day/hour  │
//! │ get_weather                │ OpenWeatherMap   │ current conditions    │
//! └────────────────────────────┴──────────────────┴───────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod svckit;

use agent_core::ToolRegistry;

pub use config::{ApiKey, ProviderKeys};
pub use error::{AdvisorError, Result};
pub use model::{ProviderId, WeatherRecord};
pub use provider::WeatherProvider;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{CurrentWeatherTool, DailyForecastTool, HourlyForecastTool, TimelineTool};
}

/// System prompt for the weather assistant agent
pub const WEATHER_ASSISTANT_PROMPT: &str = r#"You are a helpful assistant that fetches weather forecasts using different APIs.

- Use `get_weather` for current conditions in a city.
- Use `get_weatherapi_forecast` for a multi-day daily forecast.
- Use `get_tomorrow_forecast` for an hour-by-hour forecast.
- Use `get_visualcrossing_weather` for historical data or a specific date range.

Give weather details in proper charts, with icons that show the weather conditions.
Always give times in a readable format like 21 May 12:00 PM."#;

/// Greeting sent when a chat session starts
pub const WELCOME_MESSAGE: &str = "Welcome to Weather assistant Enter your query about weather";

/// Registry holding all four weather tools against the live provider APIs
pub fn weather_tools(keys: &ProviderKeys) -> ToolRegistry {
    use provider::{OpenWeatherMapProvider, TomorrowProvider, VisualCrossingProvider, WeatherApiProvider};

    let mut registry = ToolRegistry::new();
    registry.register(tools::DailyForecastTool::new(WeatherApiProvider::new(
        keys.weatherapi.clone(),
    )));
    registry.register(tools::HourlyForecastTool::new(TomorrowProvider::new(
        keys.tomorrow.clone(),
    )));
    registry.register(tools::TimelineTool::new(VisualCrossingProvider::new(
        keys.visualcrossing.clone(),
    )));
    registry.register(tools::CurrentWeatherTool::new(OpenWeatherMapProvider::new(
        keys.openweathermap.clone(),
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> ProviderKeys {
        ProviderKeys::from_lookup(|_| Some("test-key".into())).unwrap()
    }

    #[test]
    fn test_weather_tools_registered() {
        let registry = weather_tools(&keys());

        assert_eq!(
            registry.names(),
            vec![
                "get_tomorrow_forecast",
                "get_visualcrossing_weather",
                "get_weather",
                "get_weatherapi_forecast",
            ]
        );
        assert!(registry.schemas().iter().all(|s| !s.has_side_effects));
    }
}
