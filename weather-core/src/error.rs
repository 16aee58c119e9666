//! Error types surfaced to the session.
//!
//! Nothing here is fatal: every variant ends up as a single user-visible
//! string on the input screen.

use reqwest::StatusCode;
use thiserror::Error;

pub const INVALID_CITY: &str = "Please enter a valid city name.";
pub const CITY_NOT_FOUND: &str =
    "City not found. Please enter a valid city name or try again later.";
pub const WEATHER_UNAVAILABLE: &str =
    "Weather information is not available at the moment. Try again later.";
pub const GENERIC_FAILURE: &str = "An error occurred. Try again later.";
pub const LOCATION_UNAVAILABLE: &str =
    "Unable to locate you. Please ensure your device allows access to your location and try again.";
pub const LOCATION_UNSUPPORTED: &str = "Geolocation is not supported by this device.";

/// Failure of a single weather lookup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather service answered with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// A lookup miss shows the call-site message; anything else is generic.
    pub fn user_message(&self, fallback: &'static str) -> &'static str {
        match self {
            FetchError::Status { .. } => fallback,
            FetchError::Transport(_) | FetchError::Decode(_) => GENERIC_FAILURE,
        }
    }
}

/// Failure to obtain the device position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("unable to locate: {0}")]
    Unavailable(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Unsupported => LOCATION_UNSUPPORTED,
            LocationError::Unavailable(_) => LOCATION_UNAVAILABLE,
        }
    }
}
