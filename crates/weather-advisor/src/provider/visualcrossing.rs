use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{get_json, Fetched, WeatherProvider};
use crate::config::ApiKey;
use crate::error::{AdvisorError, Result};
use crate::model::{
    Forecast, ProviderId, TimelineDayEntry, TimelineHourEntry, TimelineQuery, WeatherRecord,
};

const BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Visual Crossing timeline adapter (history and forecast, daily or hourly)
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.into(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/{city}[/{start}[/{end}]]`
    ///
    /// A lone `start_date` is pushed twice so the range covers that single
    /// day. A lone `end_date` is pushed as the only date segment. Empty
    /// date strings count as absent.
    fn timeline_url(&self, query: &TimelineQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AdvisorError::Config(format!("Invalid Visual Crossing base URL: {e}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                AdvisorError::Config("Visual Crossing base URL cannot hold a path".into())
            })?;
            segments.pop_if_empty().push(&query.city);

            let start = query.start_date.as_deref().filter(|d| !d.is_empty());
            let end = query.end_date.as_deref().filter(|d| !d.is_empty());
            match (start, end) {
                (Some(start), Some(end)) => {
                    segments.push(start).push(end);
                }
                (Some(start), None) => {
                    segments.push(start).push(start);
                }
                (None, Some(end)) => {
                    segments.push(end);
                }
                (None, None) => {}
            }
        }

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcResponse {
    resolved_address: Option<String>,
    #[serde(default)]
    days: Vec<VcDay>,
}

#[derive(Debug, Deserialize)]
struct VcDay {
    datetime: Option<String>,
    temp: Option<f64>,
    conditions: Option<String>,
    humidity: Option<f64>,
    windspeed: Option<f64>,
    #[serde(default)]
    hours: Vec<VcHour>,
}

#[derive(Debug, Deserialize)]
struct VcHour {
    datetime: Option<String>,
    temp: Option<f64>,
    conditions: Option<String>,
    humidity: Option<f64>,
    windspeed: Option<f64>,
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    type Query = TimelineQuery;

    fn id(&self) -> ProviderId {
        ProviderId::VisualCrossing
    }

    async fn fetch(&self, query: &TimelineQuery) -> Result<WeatherRecord> {
        let url = self.timeline_url(query)?;
        let include = if query.include_hours { "hours" } else { "days" };
        let request = self.http.get(url).query(&[
            ("key", self.api_key.expose()),
            ("unitGroup", "metric"),
            ("include", include),
        ]);

        let parsed: VcResponse = match get_json(self.id(), request).await? {
            Fetched::Body(body) => body,
            Fetched::Status(status) => return Ok(WeatherRecord::upstream_error(self.id(), status)),
        };

        let forecast = if query.include_hours {
            Forecast::TimelineHours(
                parsed
                    .days
                    .into_iter()
                    .flat_map(|day| day.hours)
                    .map(|hour| TimelineHourEntry {
                        datetime: hour.datetime,
                        temp: hour.temp,
                        description: hour.conditions,
                        humidity: hour.humidity,
                        wind_kph: hour.windspeed,
                    })
                    .collect(),
            )
        } else {
            Forecast::TimelineDays(
                parsed
                    .days
                    .into_iter()
                    .take(query.days_limit as usize)
                    .map(|day| TimelineDayEntry {
                        date: day.datetime,
                        temp: day.temp,
                        description: day.conditions,
                        humidity: day.humidity,
                        wind_kph: day.windspeed,
                    })
                    .collect(),
            )
        };

        Ok(WeatherRecord::Forecast {
            source: self.id(),
            location: parsed
                .resolved_address
                .unwrap_or_else(|| query.city.clone()),
            forecast,
        })
    }
}
