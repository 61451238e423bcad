//! Weather Provider Adapters
//!
//! One adapter per upstream API. Each builds its provider-specific request,
//! performs a single GET and maps the JSON body into a [`WeatherRecord`].
//! A non-200 status becomes an error record; transport and decoding failures
//! are returned as [`AdvisorError`](crate::error::AdvisorError).

mod openweather;
mod tomorrow;
mod visualcrossing;
mod weatherapi;

pub use openweather::OpenWeatherMapProvider;
pub use tomorrow::TomorrowProvider;
pub use visualcrossing::VisualCrossingProvider;
pub use weatherapi::WeatherApiProvider;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{ProviderId, WeatherRecord};

/// Weather provider adapter trait (Strategy pattern)
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Arguments this provider accepts
    type Query: DeserializeOwned + Send + Sync;

    /// Which upstream this adapter talks to
    fn id(&self) -> ProviderId;

    /// Fetch and normalize weather for `query`
    async fn fetch(&self, query: &Self::Query) -> Result<WeatherRecord>;
}

/// Outcome of an upstream GET
pub(crate) enum Fetched<T> {
    Body(T),
    Status(u16),
}

/// Send `request` and decode a 200 body as `T`; any other status is
/// returned as-is for the caller to turn into an error record.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> Result<Fetched<T>> {
    let res = request.send().await?;
    let status = res.status();

    if status != StatusCode::OK {
        tracing::warn!(%provider, status = status.as_u16(), "Weather provider returned an error status");
        return Ok(Fetched::Status(status.as_u16()));
    }

    let body = res.text().await?;
    let parsed = serde_json::from_str(&body)?;
    tracing::debug!(%provider, bytes = body.len(), "Weather provider responded");
    Ok(Fetched::Body(parsed))
}
