use std::fmt;

use crate::{model::WeatherResult, session::Session};

pub const TITLE: &str = "Weather App";

/// Which of the two screens to show, with everything it displays.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Input(InputView),
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputView {
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub icon_url: Option<String>,
    pub temperature: Option<i64>,
    pub description: Option<String>,
    pub location: String,
    pub feels_like: Option<i64>,
    pub humidity: Option<u8>,
}

impl From<&WeatherResult> for ResultView {
    fn from(weather: &WeatherResult) -> Self {
        ResultView {
            icon_url: weather.icon_url(),
            temperature: weather.temperature_c.and_then(round_half_up),
            description: weather.description.clone(),
            location: weather.location_label(),
            feels_like: weather.feels_like_c.and_then(round_half_up),
            humidity: weather.humidity_pct,
        }
    }
}

pub fn render(session: &Session) -> Screen {
    match session.weather() {
        Some(weather) if session.state().status => Screen::Result(ResultView::from(weather)),
        _ => Screen::Input(InputView {
            error: session.state().error.clone(),
            loading: session.state().loading,
        }),
    }
}

/// Round to the nearest integer, halves toward positive infinity
/// (`-2.5` becomes `-2`, `2.5` becomes `3`).
fn round_half_up(value: f64) -> Option<i64> {
    value.is_finite().then(|| (value + 0.5).floor() as i64)
}

fn degrees(value: Option<i64>) -> String {
    value.map(|v| format!("{v}° C")).unwrap_or_default()
}

impl fmt::Display for InputView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        if let Some(error) = &self.error {
            writeln!(f, "! {error}")?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }
        Ok(())
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        if let Some(icon) = &self.icon_url {
            writeln!(f, "{icon}")?;
        }
        writeln!(f, "{}", degrees(self.temperature))?;
        writeln!(f, "{}", self.description.as_deref().unwrap_or_default())?;
        writeln!(f, "{}", self.location)?;
        writeln!(f, "{} Feels like", degrees(self.feels_like))?;
        let humidity = self.humidity.map(|h| h.to_string()).unwrap_or_default();
        writeln!(f, "{humidity}% Humidity")
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Input(view) => fmt::Display::fmt(view, f),
            Screen::Result(view) => fmt::Display::fmt(view, f),
        }
    }
}
