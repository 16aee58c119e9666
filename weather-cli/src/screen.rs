//! The interactive weather screen.
//!
//! Each turn prints the current [`Screen`] and offers the actions that screen
//! has: search a city or locate the device on the input screen, go back on
//! the result screen.

use anyhow::Context;
use inquire::{InquireError, Select, Text};
use weather_core::{App, Event, Screen, session::Effect};

const SEARCH_CITY: &str = "Enter city name";
const LOCATE: &str = "Get Device Location";
const GO_BACK: &str = "Go back";
const QUIT: &str = "Quit";

pub async fn run(mut app: App) -> anyhow::Result<()> {
    loop {
        let screen = app.screen();
        println!("\n{screen}");

        let event = match screen {
            Screen::Input(_) => input_action()?,
            Screen::Result(_) => result_action()?,
        };
        let Some(event) = event else {
            break;
        };

        app.dispatch_with(event, |effect, _| match effect {
            Effect::Locate => println!("Locating..."),
            Effect::Fetch(_) => println!("Loading..."),
        })
        .await;
    }

    Ok(())
}

/// `None` means the user wants to leave.
fn input_action() -> anyhow::Result<Option<Event>> {
    let choice = Select::new("What next?", vec![SEARCH_CITY, LOCATE, QUIT]).prompt();
    let Some(choice) = cancelled_as_none(choice)? else {
        return Ok(None);
    };

    match choice {
        SEARCH_CITY => {
            let city = Text::new("City:").with_placeholder(SEARCH_CITY).prompt();
            match cancelled_as_none(city)? {
                Some(city) => Ok(Some(Event::CitySubmitted(city))),
                // Esc on the text prompt returns to the menu.
                None => input_action(),
            }
        }
        LOCATE => Ok(Some(Event::LocateRequested)),
        _ => Ok(None),
    }
}

fn result_action() -> anyhow::Result<Option<Event>> {
    let choice = Select::new("What next?", vec![GO_BACK, QUIT]).prompt();
    match cancelled_as_none(choice)? {
        Some(GO_BACK) => Ok(Some(Event::Reset)),
        _ => Ok(None),
    }
}

fn cancelled_as_none<T>(answer: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read from the terminal"),
    }
}
