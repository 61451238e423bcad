//! Domain Models
//!
//! Query arguments accepted by each provider adapter and the normalized
//! records they return. Every provider keeps its own entry shape; the
//! `source` tag tells consumers which one they are looking at.

use serde::{Deserialize, Deserializer, Serialize};

/// Upstream weather providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "WeatherAPI")]
    WeatherApi,
    #[serde(rename = "Tomorrow.io")]
    Tomorrow,
    #[serde(rename = "Visual Crossing")]
    VisualCrossing,
    #[serde(rename = "OpenWeatherMap")]
    OpenWeatherMap,
}

impl ProviderId {
    /// Name reported as `source` and in error records
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::WeatherApi => "WeatherAPI",
            Self::Tomorrow => "Tomorrow.io",
            Self::VisualCrossing => "Visual Crossing",
            Self::OpenWeatherMap => "OpenWeatherMap",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Queries
// ============================================================================

const fn default_days() -> u32 {
    3
}

const fn default_hours() -> u32 {
    24
}

/// Counts arrive as JSON numbers; some backends send `3.0` for `3`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    n.as_u64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected a non-negative whole number, got {n}")))
}

/// Daily forecast request (WeatherAPI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastQuery {
    pub city: String,
    #[serde(default = "default_days", deserialize_with = "whole_number")]
    pub days: u32,
}

impl DailyForecastQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            days: default_days(),
        }
    }
}

/// Hourly forecast request (Tomorrow.io)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecastQuery {
    pub city: String,
    #[serde(default = "default_hours", deserialize_with = "whole_number")]
    pub hours: u32,
}

impl HourlyForecastQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            hours: default_hours(),
        }
    }
}

/// Date-range request, hourly or daily (Visual Crossing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineQuery {
    pub city: String,
    /// `YYYY-MM-DD`; absent means the provider's default window
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub include_hours: bool,
    /// Only applies to daily output
    #[serde(default = "default_days", deserialize_with = "whole_number")]
    pub days_limit: u32,
}

impl TimelineQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            start_date: None,
            end_date: None,
            include_hours: false,
            days_limit: default_days(),
        }
    }
}

/// Current conditions request (OpenWeatherMap)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeatherQuery {
    pub city: String,
}

// ============================================================================
// Records
// ============================================================================

/// One day from the WeatherAPI forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecastEntry {
    pub date: String,
    pub condition: String,
    pub avg_temp: f64,
    pub humidity: f64,
    pub wind_kph: f64,
}

/// One hour from the Tomorrow.io forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecastEntry {
    pub time: String,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
}

/// One day from a Visual Crossing timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDayEntry {
    pub date: Option<String>,
    pub temp: Option<f64>,
    pub description: Option<String>,
    pub humidity: Option<f64>,
    pub wind_kph: Option<f64>,
}

/// One hour from a Visual Crossing timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineHourEntry {
    pub datetime: Option<String>,
    pub temp: Option<f64>,
    pub description: Option<String>,
    pub humidity: Option<f64>,
    pub wind_kph: Option<f64>,
}

/// Current conditions snapshot from OpenWeatherMap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// Provider-specific forecast sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Forecast {
    Daily(Vec<DailyForecastEntry>),
    Hourly(Vec<HourlyForecastEntry>),
    TimelineDays(Vec<TimelineDayEntry>),
    TimelineHours(Vec<TimelineHourEntry>),
}

impl Forecast {
    pub fn len(&self) -> usize {
        match self {
            Self::Daily(v) => v.len(),
            Self::Hourly(v) => v.len(),
            Self::TimelineDays(v) => v.len(),
            Self::TimelineHours(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized adapter output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherRecord {
    Forecast {
        source: ProviderId,
        location: String,
        forecast: Forecast,
    },
    Current(CurrentConditions),
    Error {
        error: String,
    },
}

impl WeatherRecord {
    /// Record for a non-200 upstream response
    pub fn upstream_error(provider: ProviderId, status: u16) -> Self {
        Self::Error {
            error: format!("{provider} error: {status}"),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            Self::Forecast { forecast, .. } => Some(forecast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_defaults() {
        let daily: DailyForecastQuery = serde_json::from_value(json!({"city": "Lahore"})).unwrap();
        assert_eq!(daily.days, 3);

        let hourly: HourlyForecastQuery = serde_json::from_value(json!({"city": "Lahore"})).unwrap();
        assert_eq!(hourly.hours, 24);

        let timeline: TimelineQuery = serde_json::from_value(json!({"city": "Lahore"})).unwrap();
        assert_eq!(timeline, TimelineQuery::new("Lahore"));
    }

    #[test]
    fn test_counts_accept_whole_floats() {
        let daily: DailyForecastQuery =
            serde_json::from_value(json!({"city": "Lahore", "days": 5.0})).unwrap();
        assert_eq!(daily.days, 5);

        let timeline: TimelineQuery =
            serde_json::from_value(json!({"city": "Lahore", "days_limit": 2})).unwrap();
        assert_eq!(timeline.days_limit, 2);

        assert!(serde_json::from_value::<HourlyForecastQuery>(json!({"city": "Lahore", "hours": 1.5})).is_err());
        assert!(serde_json::from_value::<DailyForecastQuery>(json!({"city": "Lahore", "days": -1})).is_err());
    }

    #[test]
    fn test_error_record_shape() {
        let record = WeatherRecord::upstream_error(ProviderId::Tomorrow, 429);
        assert!(record.is_error());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"error": "Tomorrow.io error: 429"})
        );
    }

    #[test]
    fn test_forecast_record_shape() {
        let record = WeatherRecord::Forecast {
            source: ProviderId::VisualCrossing,
            location: "Lahore, Pakistan".into(),
            forecast: Forecast::TimelineDays(vec![TimelineDayEntry {
                date: Some("2024-05-01".into()),
                temp: Some(35.2),
                description: None,
                humidity: Some(20.0),
                wind_kph: Some(11.5),
            }]),
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["source"], "Visual Crossing");
        assert_eq!(value["forecast"][0]["date"], "2024-05-01");
        assert!(value["forecast"][0]["description"].is_null());
    }
}
