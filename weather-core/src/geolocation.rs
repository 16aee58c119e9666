//! Device position lookup.
//!
//! A terminal has no native geolocation capability, so the position is
//! approximated from an IP geolocation service, taken from config, or
//! reported as unsupported.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    config::{GeolocationConfig, GeolocationMode},
    error::LocationError,
    model::Coordinates,
};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position from an IP geolocation service such as ip-api.com.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocation service returned status {}",
                res.status()
            )));
        }

        let body: IpLookupResponse = res
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            return Err(LocationError::Unavailable(
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(LocationError::Unavailable("response carried no coordinates".to_string())),
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No geolocation capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Construct the geolocator selected by `mode`.
///
/// `fixed` without both coordinates falls back to [`NoGeolocator`].
pub fn geolocator_from_config(config: &GeolocationConfig) -> anyhow::Result<Box<dyn Geolocator>> {
    let boxed: Box<dyn Geolocator> = match config.mode {
        GeolocationMode::Ip => Box::new(IpGeolocator::new(config.endpoint(), config.timeout())?),
        GeolocationMode::Fixed => match config.fixed_coordinates() {
            Some(coord) => Box::new(FixedGeolocator(coord)),
            None => {
                tracing::warn!("geolocation mode is `fixed` but latitude/longitude are not set");
                Box::new(NoGeolocator)
            }
        },
        GeolocationMode::Disabled => Box::new(NoGeolocator),
    };

    Ok(boxed)
}
