//! Session state and its transition function.
//!
//! [`Session::reduce`] is pure: it consumes the current session and an
//! [`Event`] and returns the next session plus at most one [`Effect`] for
//! the driver to run. Network and geolocation results come back as events.
//!
//! Every fetch is tagged with a generation number. Completions carrying an
//! older generation are dropped, so only the most recent request can change
//! what is on screen.

use crate::{
    error::{INVALID_CITY, LocationError},
    model::{Coordinates, WeatherQuery, WeatherResult},
};

/// Shortest accepted city name is three characters.
const MIN_CITY_CHARS: usize = 3;

/// The status/error/loading record driving which screen is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// `true` only while a weather result is on screen.
    pub status: bool,
    pub error: Option<String>,
    /// Set while a fetch is outstanding.
    pub loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    state: SessionState,
    coordinates: Option<Coordinates>,
    weather: Option<WeatherResult>,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// City text submitted with Enter.
    CitySubmitted(String),
    /// The "get device location" action.
    LocateRequested,
    LocationResolved(Coordinates),
    LocationFailed(LocationError),
    FetchSucceeded { generation: u64, result: WeatherResult },
    FetchFailed { generation: u64, message: String },
    /// The "go back" action.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: WeatherQuery,
}

impl FetchRequest {
    pub fn fallback_message(&self) -> &'static str {
        self.query.fallback_message()
    }
}

/// Work the driver has to perform on behalf of the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Locate,
    Fetch(FetchRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: Session,
    pub effect: Option<Effect>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn weather(&self) -> Option<&WeatherResult> {
        self.weather.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reduce(self, event: Event) -> Transition {
        match event {
            Event::CitySubmitted(city) => {
                if city.chars().count() < MIN_CITY_CHARS {
                    return self.with_error(INVALID_CITY.to_string()).settle();
                }
                self.start_fetch(WeatherQuery::City(city))
            }

            Event::LocateRequested => Transition { session: self, effect: Some(Effect::Locate) },

            // Every position report is a change, even when it repeats the
            // stored one, so locating again after a failed lookup refetches.
            Event::LocationResolved(coord) => {
                let session = Session { coordinates: Some(coord), ..self };
                session.start_fetch(WeatherQuery::Coordinates(coord))
            }

            Event::LocationFailed(err) => self.with_error(err.user_message().to_string()).settle(),

            Event::FetchSucceeded { generation, result } => {
                if generation != self.generation {
                    return self.settle();
                }
                Session {
                    state: SessionState { status: true, error: None, loading: false },
                    weather: Some(result),
                    ..self
                }
                .settle()
            }

            Event::FetchFailed { generation, message } => {
                if generation != self.generation {
                    return self.settle();
                }
                let state = SessionState { error: Some(message), loading: false, ..self.state };
                Session { state, ..self }.settle()
            }

            Event::Reset => Session {
                state: SessionState::default(),
                coordinates: None,
                weather: None,
                generation: self.generation + 1,
            }
            .settle(),
        }
    }

    fn start_fetch(self, query: WeatherQuery) -> Transition {
        let generation = self.generation + 1;
        let state = SessionState { loading: true, ..self.state };
        let session = Session { state, generation, ..self };

        Transition {
            session,
            effect: Some(Effect::Fetch(FetchRequest { generation, query })),
        }
    }

    fn with_error(self, message: String) -> Self {
        let state = SessionState { error: Some(message), ..self.state };
        Session { state, ..self }
    }

    fn settle(self) -> Transition {
        Transition { session: self, effect: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CITY_NOT_FOUND, GENERIC_FAILURE, LOCATION_UNSUPPORTED, WEATHER_UNAVAILABLE};

    fn paris() -> WeatherResult {
        WeatherResult {
            city: Some("Paris".into()),
            country: Some("FR".into()),
            temperature_c: Some(21.4),
            ..Default::default()
        }
    }

    fn fetch_of(t: &Transition) -> FetchRequest {
        match &t.effect {
            Some(Effect::Fetch(req)) => req.clone(),
            other => panic!("expected fetch effect, got {other:?}"),
        }
    }

    #[test]
    fn new_session_is_idle() {
        let s = Session::new();
        assert_eq!(s.state(), &SessionState { status: false, error: None, loading: false });
        assert_eq!(s.coordinates(), None);
        assert_eq!(s.weather(), None);
    }

    #[test]
    fn short_city_is_rejected_without_fetch() {
        for input in ["", "P", "Pa", "  ", "Zü"] {
            let t = Session::new().reduce(Event::CitySubmitted(input.into()));
            assert_eq!(t.effect, None, "input {input:?}");
            assert_eq!(t.session.state().error.as_deref(), Some(INVALID_CITY));
            assert!(!t.session.state().loading);
        }
    }

    #[test]
    fn valid_city_starts_exactly_one_fetch_with_text_unmodified() {
        let t = Session::new().reduce(Event::CitySubmitted(" Par".into()));
        let req = fetch_of(&t);
        assert_eq!(req.query, WeatherQuery::City(" Par".into()));
        assert_eq!(req.fallback_message(), CITY_NOT_FOUND);
        assert_eq!(req.generation, t.session.generation());
        assert!(t.session.state().loading);
    }

    #[test]
    fn loading_preserves_previous_error() {
        let s = Session::new().reduce(Event::CitySubmitted("Pa".into())).session;
        let t = s.reduce(Event::CitySubmitted("Paris".into()));
        assert!(t.session.state().loading);
        assert_eq!(t.session.state().error.as_deref(), Some(INVALID_CITY));
    }

    #[test]
    fn success_shows_result_and_clears_error() {
        let s = Session::new().reduce(Event::CitySubmitted("Pa".into())).session;
        let t = s.reduce(Event::CitySubmitted("Paris".into()));
        let req = fetch_of(&t);

        let done = t.session.reduce(Event::FetchSucceeded {
            generation: req.generation,
            result: paris(),
        });
        assert_eq!(done.effect, None);
        assert_eq!(
            done.session.state(),
            &SessionState { status: true, error: None, loading: false }
        );
        assert_eq!(done.session.weather(), Some(&paris()));
    }

    #[test]
    fn failure_sets_message_and_clears_loading() {
        let t = Session::new().reduce(Event::CitySubmitted("Atlantis".into()));
        let req = fetch_of(&t);

        let done = t.session.reduce(Event::FetchFailed {
            generation: req.generation,
            message: CITY_NOT_FOUND.into(),
        });
        let state = done.session.state();
        assert!(!state.status);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(CITY_NOT_FOUND));
        assert_eq!(done.session.weather(), None);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let first = Session::new().reduce(Event::LocationResolved(Coordinates { lat: 1.0, lon: 2.0 }));
        let first_req = fetch_of(&first);
        let second = first.session.reduce(Event::CitySubmitted("Berlin".into()));
        let second_req = fetch_of(&second);
        assert!(second_req.generation > first_req.generation);

        // The location fetch resolves last but was superseded.
        let s = second
            .session
            .reduce(Event::FetchSucceeded { generation: second_req.generation, result: paris() })
            .session
            .reduce(Event::FetchFailed {
                generation: first_req.generation,
                message: WEATHER_UNAVAILABLE.into(),
            })
            .session;

        assert!(s.state().status);
        assert_eq!(s.state().error, None);
        assert_eq!(s.weather(), Some(&paris()));
    }

    #[test]
    fn locate_request_asks_driver_to_locate() {
        let t = Session::new().reduce(Event::LocateRequested);
        assert_eq!(t.effect, Some(Effect::Locate));
        assert_eq!(t.session, Session::new());
    }

    #[test]
    fn location_report_triggers_one_fetch() {
        let coord = Coordinates { lat: 48.85, lon: 2.35 };
        let t = Session::new().reduce(Event::LocationResolved(coord));
        let req = fetch_of(&t);
        assert_eq!(req.query, WeatherQuery::Coordinates(coord));
        assert_eq!(req.fallback_message(), WEATHER_UNAVAILABLE);
        assert_eq!(t.session.coordinates(), Some(coord));
    }

    #[test]
    fn same_position_after_failed_lookup_fetches_again() {
        let coord = Coordinates { lat: 48.85, lon: 2.35 };
        let t = Session::new().reduce(Event::LocationResolved(coord));
        let first = fetch_of(&t);
        let failed = t
            .session
            .reduce(Event::FetchFailed {
                generation: first.generation,
                message: WEATHER_UNAVAILABLE.into(),
            })
            .session;

        let again = failed.reduce(Event::LocationResolved(coord));
        let second = fetch_of(&again);
        assert!(second.generation > first.generation);
        assert_eq!(second.query, WeatherQuery::Coordinates(coord));
        assert!(again.session.state().loading);
    }

    #[test]
    fn location_failure_sets_message_and_keeps_coordinates_absent() {
        let t = Session::new().reduce(Event::LocationFailed(LocationError::Unsupported));
        assert_eq!(t.effect, None);
        assert_eq!(t.session.state().error.as_deref(), Some(LOCATION_UNSUPPORTED));
        assert_eq!(t.session.coordinates(), None);
    }

    #[test]
    fn reset_returns_to_initial_screen() {
        let coord = Coordinates { lat: 48.85, lon: 2.35 };
        let t = Session::new().reduce(Event::LocationResolved(coord));
        let req = fetch_of(&t);
        let shown = t
            .session
            .reduce(Event::FetchSucceeded { generation: req.generation, result: paris() })
            .session;

        let reset = shown.reduce(Event::Reset).session;
        assert_eq!(reset.state(), &SessionState::default());
        assert_eq!(reset.coordinates(), None);
        assert_eq!(reset.weather(), None);

        // Same position again after reset fetches again.
        assert!(matches!(
            reset.reduce(Event::LocationResolved(coord)).effect,
            Some(Effect::Fetch(_))
        ));
    }

    #[test]
    fn reset_discards_in_flight_response() {
        let t = Session::new().reduce(Event::CitySubmitted("Paris".into()));
        let req = fetch_of(&t);
        let reset = t.session.reduce(Event::Reset).session;

        let after = reset.reduce(Event::FetchFailed {
            generation: req.generation,
            message: GENERIC_FAILURE.into(),
        });
        assert_eq!(after.session.state(), &SessionState::default());
    }
}
