use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, Fetched, WeatherProvider};
use crate::config::ApiKey;
use crate::error::Result;
use crate::model::{Forecast, HourlyForecastEntry, HourlyForecastQuery, ProviderId, WeatherRecord};

const BASE_URL: &str = "https://api.tomorrow.io/v4";

/// Tomorrow.io hourly forecast adapter
#[derive(Debug, Clone)]
pub struct TomorrowProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl TomorrowProvider {
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
}

#[derive(Debug, Deserialize)]
struct TmResponse {
    #[serde(default)]
    timelines: TmTimelines,
}

#[derive(Debug, Default, Deserialize)]
struct TmTimelines {
    #[serde(default)]
    hourly: Vec<TmEntry>,
}

#[derive(Debug, Deserialize)]
struct TmEntry {
    time: String,
    values: TmValues,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmValues {
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    humidity: Option<f64>,
    precipitation_probability: Option<f64>,
}

#[async_trait]
impl WeatherProvider for TomorrowProvider {
    type Query = HourlyForecastQuery;

    fn id(&self) -> ProviderId {
        ProviderId::Tomorrow
    }

    async fn fetch(&self, query: &HourlyForecastQuery) -> Result<WeatherRecord> {
        let limit = query.hours.to_string();
        let request = self
            .http
            .get(format!("{}/weather/forecast", self.base_url))
            .query(&[
                ("location", query.city.as_str()),
                ("apikey", self.api_key.expose()),
                ("timesteps", "1h"),
                ("units", "metric"),
                ("limit", limit.as_str()),
            ]);

        let parsed: TmResponse = match get_json(self.id(), request).await? {
            Fetched::Body(body) => body,
            Fetched::Status(status) => return Ok(WeatherRecord::upstream_error(self.id(), status)),
        };

        let forecast = parsed
            .timelines
            .hourly
            .into_iter()
            .map(|entry| HourlyForecastEntry {
                time: entry.time,
                temperature: entry.values.temperature,
                wind_speed: entry.values.wind_speed,
                humidity: entry.values.humidity,
                precipitation: entry.values.precipitation_probability,
            })
            .collect();

        Ok(WeatherRecord::Forecast {
            source: self.id(),
            location: query.city.clone(),
            forecast: Forecast::Hourly(forecast),
        })
    }
}
