use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::{error::FetchError, model::WeatherResult};

use super::WeatherSource;

/// HTTP client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http))
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    sys: Option<OwSys>,
}

impl From<OwCurrentResponse> for WeatherResult {
    fn from(parsed: OwCurrentResponse) -> Self {
        let main = parsed.main.unwrap_or_default();
        let (description, icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_default();

        WeatherResult {
            city: parsed.name,
            country: parsed.sys.and_then(|s| s.country),
            temperature_c: main.temp,
            feels_like_c: main.feels_like,
            humidity_pct: main.humidity,
            description,
            icon,
            observation_time: parsed.dt.and_then(unix_to_utc),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, url: &Url) -> Result<WeatherResult, FetchError> {
        tracing::debug!(url = %redact_key(url), "requesting current weather");

        // reqwest errors embed the URL, which carries the API key.
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%status, "weather lookup missed");
            // The body only annotates the error; a lookup miss stays a miss.
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let body = res.text().await.map_err(|e| FetchError::Transport(e.without_url()))?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        let result = WeatherResult::from(parsed);

        tracing::info!(location = %result.location_label(), "weather received");
        Ok(result)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

/// The request URL with the `appid` value masked, for logging.
fn redact_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
