use super::form::EventForm;
use crate::events::Event;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the view renders from.
///
/// Only the controller mutates it; the view reads it and drains notices.
#[derive(Debug, Clone)]
pub struct CalendarState {
    events: Vec<Event>,
    form: Option<EventForm>,
    loading: bool,
    notices: Vec<Notice>,
}

impl Default for CalendarState {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            form: None,
            loading: true,
            notices: Vec::new(),
        }
    }
}

impl CalendarState {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Open form, if any
    pub fn form(&self) -> Option<&EventForm> {
        self.form.as_ref()
    }

    /// True until the first load has finished
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub(super) fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub(super) fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub(super) fn open_form(&mut self, form: EventForm) {
        self.form = Some(form);
    }

    pub(super) fn close_form(&mut self) {
        self.form = None;
    }

    pub(super) fn form_mut(&mut self) -> Option<&mut EventForm> {
        self.form.as_mut()
    }

    /// Replace the event with the same id, or append it
    pub(super) fn upsert(&mut self, event: Event) {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    pub(super) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub(super) fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
