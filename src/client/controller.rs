use chrono::{DateTime, Utc};
use rust_i18n::t;
use tracing::{debug, warn};

use super::api::EventsApi;
use super::form::{EventForm, SlotSelection};
use super::state::{CalendarState, Notice};
use crate::error::AppResult;
use crate::events::{Event, EventPatch};

/// An event dragged to a new time by the calendar widget
#[derive(Debug, Clone, PartialEq)]
pub struct EventDrop {
    pub id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// What the widget should do with a dropped event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Keep the new position
    Committed,
    /// Put the event back where it was
    Reverted,
}

/// Drives [`CalendarState`] from user gestures and API responses
pub struct CalendarController<A> {
    api: A,
    state: CalendarState,
}

impl<A: EventsApi> CalendarController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: CalendarState::default(),
        }
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    /// Hand pending notices to the view
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    /// Fetch the event list. A failure leaves the list empty.
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(events) => {
                debug!("Loaded {} events", events.len());
                self.state.set_events(events);
            }
            Err(e) => {
                warn!("Failed to load events: {}", e);
                self.state.set_events(Vec::new());
                self.state.push_notice(Notice::error(t!("events_load_failed")));
            }
        }
        self.state.finish_loading();
    }

    /// Open a create form for an empty slot
    pub fn select_slot(&mut self, slot: SlotSelection) {
        self.state.open_form(EventForm::for_slot(&slot));
    }

    /// Open an edit form for a known event; false when the id is unknown
    pub fn select_event(&mut self, id: &str) -> bool {
        match self.state.event(id) {
            Some(event) => {
                let form = EventForm::for_event(event);
                self.state.open_form(form);
                true
            }
            None => false,
        }
    }

    /// The open form, for input edits
    pub fn form_mut(&mut self) -> Option<&mut EventForm> {
        self.state.form_mut()
    }

    /// Reschedule a dragged event.
    ///
    /// The local record moves immediately and moves back if the update
    /// fails. Without an id nothing is sent.
    pub async fn drop_event(&mut self, drop: EventDrop) -> DropOutcome {
        let Some(id) = drop.id else {
            self.state.push_notice(Notice::error(t!("event_id_required")));
            return DropOutcome::Reverted;
        };

        let previous = self.state.event(&id).cloned();
        if let Some(before) = &previous {
            let mut moved = before.clone();
            moved.start = drop.start;
            if let Some(end) = drop.end {
                moved.end = end;
            }
            self.state.upsert(moved);
        }

        let patch = EventPatch::reschedule(drop.start, drop.end);
        match self.api.update(&id, &patch).await {
            Ok(updated) => {
                self.state.upsert(updated);
                self.state.push_notice(Notice::success(t!("event_updated")));
                DropOutcome::Committed
            }
            Err(e) => {
                warn!("Failed to reschedule event {}: {}", id, e);
                if let Some(before) = previous {
                    self.state.upsert(before);
                }
                self.state.push_notice(Notice::error(t!("event_update_failed")));
                DropOutcome::Reverted
            }
        }
    }

    /// Save the open form; true when it was saved and closed
    pub async fn submit(&mut self) -> bool {
        let Some(form) = self.state.form().cloned() else {
            return false;
        };

        let edit = form.is_edit();
        match self.save(&form).await {
            Ok(event) => {
                self.state.upsert(event);
                self.state.close_form();
                let message = if edit {
                    t!("event_updated")
                } else {
                    t!("event_added")
                };
                self.state.push_notice(Notice::success(message));
                true
            }
            Err(e) => {
                warn!("Failed to save event: {}", e);
                self.state.push_notice(Notice::error(t!("event_save_failed")));
                false
            }
        }
    }

    async fn save(&self, form: &EventForm) -> AppResult<Event> {
        match &form.event_id {
            Some(id) => {
                let patch = form.to_patch()?;
                self.api.update(id, &patch).await
            }
            None => {
                let payload = form.to_new_event()?;
                self.api.create(&payload).await
            }
        }
    }

    /// Close the form without saving
    pub fn cancel(&mut self) {
        self.state.close_form();
    }
}
