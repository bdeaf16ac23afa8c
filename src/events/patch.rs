use super::models::{Category, EventRecord, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A partial update to an event.
///
/// Fields that are absent leave the stored value alone. For the required
/// fields (`title`, `start`, `end`, `allDay`, `priority`) an explicit
/// `null` is treated the same as absent. The optional fields
/// (`description`, `location`, `category`) are doubly optional so that
/// `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        with = "crate::utils::time::flexible_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "crate::utils::time::flexible_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Any value that is present, `null` included, becomes `Some`
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl EventPatch {
    /// Patch that only moves an event in time
    pub fn reschedule(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            start: Some(start),
            end,
            ..Default::default()
        }
    }

    /// Merge the supplied fields into `record`
    pub fn apply(self, record: &mut EventRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(start) = self.start {
            record.start = start;
        }
        if let Some(end) = self.end {
            record.end = end;
        }
        if let Some(all_day) = self.all_day {
            record.all_day = all_day;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
    }
}
