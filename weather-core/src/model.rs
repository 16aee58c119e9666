use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CITY_NOT_FOUND, WEATHER_UNAVAILABLE};

const ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

/// A latitude/longitude pair obtained from device geolocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What the user asked for: a city by name, or the weather at a position.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates(Coordinates),
}

impl WeatherQuery {
    /// Message shown when the service answers with a non-success status.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            WeatherQuery::City(_) => CITY_NOT_FOUND,
            WeatherQuery::Coordinates(_) => WEATHER_UNAVAILABLE,
        }
    }
}

/// Base URL and API key of the remote weather service.
#[derive(Clone)]
pub struct Endpoint {
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"***")
            .finish()
    }
}

impl Endpoint {
    pub fn new(base_url: Url, api_key: String) -> Self {
        Self { base_url, api_key }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the request URL for a query. City text is passed through as
    /// typed; only percent-encoding is applied.
    pub fn url_for(&self, query: &WeatherQuery) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                WeatherQuery::City(city) => {
                    pairs.append_pair("q", city);
                }
                WeatherQuery::Coordinates(coord) => {
                    pairs
                        .append_pair("lat", &coord.lat.to_string())
                        .append_pair("lon", &coord.lon.to_string());
                }
            }
            pairs
                .append_pair("units", "metric")
                .append_pair("appid", &self.api_key);
        }
        url
    }
}

/// Current conditions as reported by the weather service.
///
/// Every field is optional: the response is validated once when it is
/// decoded, and anything the service left out is rendered blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: Option<String>,
    pub country: Option<String>,
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub observation_time: Option<DateTime<Utc>>,
}

impl WeatherResult {
    /// URL of the condition icon, e.g. `http://openweathermap.org/img/wn/01d@2x.png`.
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| format!("{ICON_BASE_URL}/{icon}@2x.png"))
    }

    /// "City, CC", or whichever half is known.
    pub fn location_label(&self) -> String {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => format!("{city}, {country}"),
            (Some(city), None) => city.to_string(),
            (None, Some(country)) => country.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        let base = Url::parse("https://api.example.test/data/2.5/weather").unwrap();
        Endpoint::new(base, "KEY".to_string())
    }

    #[test]
    fn city_url_carries_query_units_and_key() {
        let url = endpoint().url_for(&WeatherQuery::City("Paris".into()));
        assert_eq!(
            url.as_str(),
            "https://api.example.test/data/2.5/weather?q=Paris&units=metric&appid=KEY"
        );
    }

    #[test]
    fn city_text_is_not_trimmed_or_rewritten() {
        let url = endpoint().url_for(&WeatherQuery::City(" São Paulo".into()));
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some(" São Paulo"));
    }

    #[test]
    fn coordinates_url_carries_lat_lon() {
        let query = WeatherQuery::Coordinates(Coordinates { lat: 48.85, lon: 2.35 });
        let url = endpoint().url_for(&query);
        assert_eq!(
            url.query(),
            Some("lat=48.85&lon=2.35&units=metric&appid=KEY")
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let printed = format!("{:?}", endpoint());
        assert!(!printed.contains("KEY"));
        assert!(printed.contains("api.example.test"));
    }

    #[test]
    fn fallback_message_depends_on_query_kind() {
        assert_eq!(WeatherQuery::City("Rome".into()).fallback_message(), CITY_NOT_FOUND);
        let coord = WeatherQuery::Coordinates(Coordinates { lat: 0.0, lon: 0.0 });
        assert_eq!(coord.fallback_message(), WEATHER_UNAVAILABLE);
    }

    #[test]
    fn icon_url_and_location_label() {
        let result = WeatherResult {
            city: Some("Paris".into()),
            country: Some("FR".into()),
            icon: Some("01d".into()),
            ..Default::default()
        };
        assert_eq!(
            result.icon_url().as_deref(),
            Some("http://openweathermap.org/img/wn/01d@2x.png")
        );
        assert_eq!(result.location_label(), "Paris, FR");

        let empty = WeatherResult::default();
        assert_eq!(empty.icon_url(), None);
        assert_eq!(empty.location_label(), "");
    }
}
