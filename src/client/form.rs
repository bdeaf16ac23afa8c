use chrono::{DateTime, Utc};

use crate::error::{validation_error, AppResult};
use crate::events::{Category, Event, EventPatch, NewEvent, Priority};
use crate::utils::time::{format_form_timestamp, parse_timestamp};

/// A time range picked on an empty part of the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSelection {
    pub start: String,
    pub end: String,
    pub all_day: bool,
}

/// The create/edit form.
///
/// Times are kept as the text the inputs hold; they are parsed when the
/// form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    pub description: String,
    pub location: String,
    pub category: Option<Category>,
    pub priority: Priority,
    /// Set when editing an existing event
    pub event_id: Option<String>,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            start: String::new(),
            end: String::new(),
            all_day: false,
            description: String::new(),
            location: String::new(),
            category: None,
            priority: Priority::Low,
            event_id: None,
        }
    }
}

impl EventForm {
    /// Blank form in create mode covering `slot`
    pub fn for_slot(slot: &SlotSelection) -> Self {
        Self {
            start: slot.start.clone(),
            end: slot.end.clone(),
            all_day: slot.all_day,
            ..Default::default()
        }
    }

    /// Form in edit mode holding every field of `event`
    pub fn for_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            start: format_form_timestamp(&event.start),
            end: format_form_timestamp(&event.end),
            all_day: event.all_day,
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            category: event.category,
            priority: event.priority,
            event_id: Some(event.id.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.event_id.is_some()
    }

    /// Create payload; blank inputs are left out for the server to judge
    pub fn to_new_event(&self) -> AppResult<NewEvent> {
        Ok(NewEvent {
            title: non_blank(&self.title),
            start: parse_field("start", &self.start)?,
            end: parse_field("end", &self.end)?,
            all_day: Some(self.all_day),
            description: non_blank(&self.description),
            location: non_blank(&self.location),
            category: self.category,
            priority: Some(self.priority),
        })
    }

    /// Update carrying the whole form; blank optional text clears the field
    pub fn to_patch(&self) -> AppResult<EventPatch> {
        Ok(EventPatch {
            title: Some(self.title.clone()),
            start: parse_field("start", &self.start)?,
            end: parse_field("end", &self.end)?,
            all_day: Some(self.all_day),
            description: Some(non_blank(&self.description)),
            location: Some(non_blank(&self.location)),
            category: Some(self.category),
            priority: Some(self.priority),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_field(name: &str, value: &str) -> AppResult<Option<DateTime<Utc>>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| validation_error(&format!("Invalid {} time: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> Event {
        Event {
            id: "e1".to_string(),
            title: "Dentist".to_string(),
            start: Utc.with_ymd_and_hms(2024, 2, 1, 14, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 1, 15, 0, 0).unwrap(),
            all_day: false,
            description: None,
            location: Some("Clinic".to_string()),
            category: Some(Category::Health),
            priority: Priority::High,
        }
    }

    #[test]
    fn slot_form_is_create_mode() {
        let form = EventForm::for_slot(&SlotSelection {
            start: "2024-02-01".to_string(),
            end: "2024-02-02".to_string(),
            all_day: true,
        });
        assert!(!form.is_edit());
        assert!(form.all_day);
        assert_eq!(form.title, "");
        assert_eq!(form.priority, Priority::Low);

        let payload = form.to_new_event().unwrap();
        assert_eq!(payload.title, None);
        assert_eq!(payload.start, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn event_form_holds_every_field() {
        let form = EventForm::for_event(&event());
        assert_eq!(form.event_id.as_deref(), Some("e1"));
        assert_eq!(form.start, "2024-02-01T14:00");
        assert_eq!(form.end, "2024-02-01T15:00");
        assert_eq!(form.description, "");
        assert_eq!(form.location, "Clinic");
        assert_eq!(form.category, Some(Category::Health));
        assert_eq!(form.priority, Priority::High);
    }

    #[test]
    fn patch_sends_full_form_state() {
        let mut form = EventForm::for_event(&event());
        form.location.clear();

        let patch = form.to_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Dentist"));
        assert_eq!(patch.start, Some(event().start));
        assert_eq!(patch.location, Some(None));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.category, Some(Some(Category::Health)));
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let mut form = EventForm::for_event(&event());
        form.end = "soon".to_string();
        assert!(form.to_patch().is_err());
        assert!(form.to_new_event().is_err());
    }
}
