pub mod api;
pub mod controller;
pub mod form;
pub mod state;

pub use api::{EventsApi, HttpEventsApi};
pub use controller::{CalendarController, DropOutcome, EventDrop};
pub use form::{EventForm, SlotSelection};
pub use state::{CalendarState, Notice, NoticeKind};

use crate::config::ClientConfig;
use crate::error::AppResult;

/// Switch the locale used for notices
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Build a controller talking HTTP, with the configured locale applied
pub fn connect(config: &ClientConfig) -> AppResult<CalendarController<HttpEventsApi>> {
    let api = HttpEventsApi::from_config(config)?;
    set_locale(&config.locale);
    Ok(CalendarController::new(api))
}
