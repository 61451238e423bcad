use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, Fetched, WeatherProvider};
use crate::config::ApiKey;
use crate::error::Result;
use crate::model::{DailyForecastEntry, DailyForecastQuery, Forecast, ProviderId, WeatherRecord};

const BASE_URL: &str = "http://api.weatherapi.com/v1";

/// WeatherAPI.com daily forecast adapter
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
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
struct WaResponse {
    #[serde(default)]
    location: Option<WaLocation>,
    #[serde(default)]
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    avghumidity: f64,
    maxwind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    type Query = DailyForecastQuery;

    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch(&self, query: &DailyForecastQuery) -> Result<WeatherRecord> {
        let days = query.days.to_string();
        let request = self
            .http
            .get(format!("{}/forecast.json", self.base_url))
            .query(&[
                ("key", self.api_key.expose()),
                ("q", query.city.as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ]);

        let parsed: WaResponse = match get_json(self.id(), request).await? {
            Fetched::Body(body) => body,
            Fetched::Status(status) => return Ok(WeatherRecord::upstream_error(self.id(), status)),
        };

        let forecast = parsed
            .forecast
            .forecastday
            .into_iter()
            .take(query.days as usize)
            .map(|day| DailyForecastEntry {
                date: day.date,
                condition: day.day.condition.text,
                avg_temp: day.day.avgtemp_c,
                humidity: day.day.avghumidity,
                wind_kph: day.day.maxwind_kph,
            })
            .collect();

        Ok(WeatherRecord::Forecast {
            source: self.id(),
            location: parsed
                .location
                .and_then(|l| l.name)
                .unwrap_or_else(|| query.city.clone()),
            forecast: Forecast::Daily(forecast),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn day(date: &str, text: &str, temp: f64) -> serde_json::Value {
        json!({
            "date": date,
            "day": {
                "avgtemp_c": temp,
                "avghumidity": 40,
                "maxwind_kph": 18.4,
                "condition": {"text": text}
            }
        })
    }

    fn provider(server: &MockServer) -> WeatherApiProvider {
        WeatherApiProvider::new(ApiKey::new("wa-key")).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_three_day_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "wa-key"))
            .and(query_param("q", "Lahore"))
            .and(query_param("days", "3"))
            .and(query_param("aqi", "no"))
            .and(query_param("alerts", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": {"name": "Lahore"},
                "forecast": {"forecastday": [
                    day("2024-05-01", "Sunny", 34.1),
                    day("2024-05-02", "Partly cloudy", 33.0),
                    day("2024-05-03", "Patchy rain nearby", 30.2),
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = provider(&server)
            .fetch(&DailyForecastQuery::new("Lahore"))
            .await
            .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["source"], "WeatherAPI");
        assert_eq!(value["location"], "Lahore");
        let entries = value["forecast"].as_array().unwrap();
        assert!(entries.len() <= 3);
        assert_eq!(entries.len(), 3);
        for entry in entries {
            let mut keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
            keys.sort();
            assert_eq!(keys, vec!["avg_temp", "condition", "date", "humidity", "wind_kph"]);
        }
        assert_eq!(entries[0]["condition"], "Sunny");
        assert_eq!(entries[0]["humidity"], 40.0);
    }

    #[tokio::test]
    async fn test_extra_days_are_capped() {
        let server = MockServer::start().await;
        let days: Vec<_> = (1..=5)
            .map(|d| day(&format!("2024-05-0{d}"), "Sunny", 30.0))
            .collect();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forecast": {"forecastday": days}
            })))
            .mount(&server)
            .await;

        let record = provider(&server)
            .fetch(&DailyForecastQuery::new("Nowhere"))
            .await
            .unwrap();

        assert_eq!(record.forecast().map(Forecast::len), Some(3));
        // No location block: falls back to the requested city
        assert!(matches!(record, WeatherRecord::Forecast { location, .. } if location == "Nowhere"));
    }

    #[tokio::test]
    async fn test_non_200_is_error_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let record = provider(&server)
            .fetch(&DailyForecastQuery::new("Lahore"))
            .await
            .unwrap();

        assert_eq!(
            record,
            WeatherRecord::Error {
                error: "WeatherAPI error: 400".into()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_day_field_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forecast": {"forecastday": [{"date": "2024-05-01"}]}
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch(&DailyForecastQuery::new("Lahore"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdvisorError::Parse(_)));
    }
}
