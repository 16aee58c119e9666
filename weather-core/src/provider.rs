use crate::{Config, WeatherResult, error::FetchError, provider::openweather::OpenWeatherClient};
use async_trait::async_trait;
use reqwest::Url;
use std::fmt::Debug;

pub mod openweather;

/// The single-request operation that turns a prepared URL into a
/// [`WeatherResult`] or a [`FetchError`].
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(&self, url: &Url) -> Result<WeatherResult, FetchError>;
}

/// Construct the weather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let client = OpenWeatherClient::with_timeout(config.request_timeout())?;
    Ok(Box::new(client))
}
