use crate::{
    Config,
    geolocation::{Geolocator, geolocator_from_config},
    model::Endpoint,
    provider::{WeatherSource, source_from_config},
    session::{Effect, Event, Session, Transition},
    view::{Screen, render},
};

/// Drives a [`Session`]: feeds events through the reducer and runs the
/// effects it asks for, one at a time.
#[derive(Debug)]
pub struct App {
    session: Session,
    endpoint: Endpoint,
    source: Box<dyn WeatherSource>,
    geolocator: Box<dyn Geolocator>,
}

impl App {
    pub fn new(
        endpoint: Endpoint,
        source: Box<dyn WeatherSource>,
        geolocator: Box<dyn Geolocator>,
    ) -> Self {
        Self { session: Session::new(), endpoint, source, geolocator }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.endpoint()?;
        let source = source_from_config(config)?;
        let geolocator = geolocator_from_config(&config.geolocation)?;
        Ok(Self::new(endpoint, source, geolocator))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        render(&self.session)
    }

    /// Apply `event` and return the effect still to be run, if any. The
    /// session already reflects the pending work (e.g. `loading`).
    pub fn begin(&mut self, event: Event) -> Option<Effect> {
        let Transition { session, effect } = std::mem::take(&mut self.session).reduce(event);
        self.session = session;
        effect
    }

    /// Run one effect to completion and report its outcome as an event.
    pub async fn execute(&self, effect: Effect) -> Event {
        match effect {
            Effect::Locate => match self.geolocator.current_position().await {
                Ok(coord) => {
                    tracing::debug!(lat = coord.lat, lon = coord.lon, "device located");
                    Event::LocationResolved(coord)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "geolocation failed");
                    Event::LocationFailed(err)
                }
            },
            Effect::Fetch(request) => {
                let url = self.endpoint.url_for(&request.query);
                match self.source.fetch_weather(&url).await {
                    Ok(result) => Event::FetchSucceeded { generation: request.generation, result },
                    Err(err) => {
                        tracing::warn!(error = %err, "weather lookup failed");
                        Event::FetchFailed {
                            generation: request.generation,
                            message: err.user_message(request.fallback_message()).to_string(),
                        }
                    }
                }
            }
        }
    }

    /// Apply `event` and every effect that follows from it.
    pub async fn dispatch(&mut self, event: Event) {
        self.dispatch_with(event, |_, _| {}).await
    }

    /// Like [`App::dispatch`], calling `on_effect` with the session as it
    /// stands before each effect runs, e.g. to show a loading indicator.
    pub async fn dispatch_with<F>(&mut self, event: Event, mut on_effect: F)
    where
        F: FnMut(&Effect, &Session),
    {
        let mut pending = self.begin(event);
        while let Some(effect) = pending {
            on_effect(&effect, &self.session);
            let outcome = self.execute(effect).await;
            pending = self.begin(outcome);
        }
    }
}
