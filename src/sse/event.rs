//! SSE event model and wire encoding

use std::fmt::Write as _;

/// One event block of a `text/event-stream` body
///
/// Used both for events we send and for events decoded by [`super::SseParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field; clients treat a missing name as `message`
    pub event: Option<String>,
    pub id: Option<String>,
    /// Reconnection delay hint in milliseconds
    pub retry: Option<u64>,
    /// Non-standard fields, kept in order
    pub fields: Vec<(String, String)>,
    /// Payload; embedded newlines become separate `data:` lines
    pub data: Option<String>,
    /// Comment line (`: text`), ignored by clients
    pub comment: Option<String>,
}

impl SseEvent {
    /// Event with a name, e.g. `SseEvent::named("message")`
    pub fn named(event: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            ..Self::default()
        }
    }

    /// Comment-only block, used for heartbeats
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            comment: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub const fn retry(mut self, millis: u64) -> Self {
        self.retry = Some(millis);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Value of a non-standard field
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when nothing would be written for this block
    pub const fn is_empty(&self) -> bool {
        self.event.is_none()
            && self.id.is_none()
            && self.retry.is_none()
            && self.fields.is_empty()
            && self.data.is_none()
            && self.comment.is_none()
    }

    /// Serialize to wire format, terminated by a blank line
    ///
    /// Field order: comment, event, id, retry, custom fields, data.
    pub fn encode(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        if let Some(comment) = &self.comment {
            push_lines(&mut out, "", comment);
        }
        if let Some(event) = &self.event {
            push_field(&mut out, "event", event);
        }
        if let Some(id) = &self.id {
            push_field(&mut out, "id", id);
        }
        if let Some(retry) = self.retry {
            let _ = writeln!(out, "retry: {retry}");
        }
        for (name, value) in &self.fields {
            push_field(&mut out, name, value);
        }
        if let Some(data) = &self.data {
            push_lines(&mut out, "data", data);
        }
        out.push('\n');
        out
    }
}

/// Single-line field; a stray newline would start a new field, so it is cut there
fn push_field(out: &mut String, name: &str, value: &str) {
    let value = value.split(['\r', '\n']).next().unwrap_or_default();
    let _ = writeln!(out, "{name}: {value}");
}

/// One `name: line` per line of `value` (`name` empty for comments)
fn push_lines(out: &mut String, name: &str, value: &str) {
    for line in value.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let _ = writeln!(out, "{name}: {line}");
    }
}
