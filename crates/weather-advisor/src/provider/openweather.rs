use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, Fetched, WeatherProvider};
use crate::config::ApiKey;
use crate::error::{AdvisorError, Result};
use crate::model::{CurrentConditions, CurrentWeatherQuery, ProviderId, WeatherRecord};

const BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// OpenWeatherMap current conditions adapter
#[derive(Debug, Clone)]
pub struct OpenWeatherMapProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl OpenWeatherMapProvider {
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
struct OwResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    type Query = CurrentWeatherQuery;

    fn id(&self) -> ProviderId {
        ProviderId::OpenWeatherMap
    }

    async fn fetch(&self, query: &CurrentWeatherQuery) -> Result<WeatherRecord> {
        let request = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", query.city.as_str()),
                ("appid", self.api_key.expose()),
                ("units", "metric"),
            ]);

        let parsed: OwResponse = match get_json(self.id(), request).await? {
            Fetched::Body(body) => body,
            Fetched::Status(status) => return Ok(WeatherRecord::upstream_error(self.id(), status)),
        };

        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| AdvisorError::MissingField("weather[0]".into()))?;

        Ok(WeatherRecord::Current(CurrentConditions {
            city: parsed.name,
            temperature: parsed.main.temp,
            description,
            humidity: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
        }))
    }
}
