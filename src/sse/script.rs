//! The fixed event sequence served on `/events`
//!
//! Steps are rendered when they are sent so message timestamps reflect
//! the moment of writing.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

use super::event::SseEvent;

/// Number of `message` events and heartbeats
pub const MESSAGE_COUNT: u32 = 3;
pub const HEARTBEAT_COUNT: u32 = 3;

/// Retry hint carried by the `important` event
pub const IMPORTANT_RETRY_MS: u64 = 5000;

pub const MULTILINE_TEXT: &str = "Line 1\nLine 2\nLine 3";

/// JSON payload of a `message` event
#[derive(Debug, Serialize)]
pub struct MessagePayload {
    pub message: String,
    /// ISO-8601 local time with microseconds
    pub timestamp: String,
}

/// Compact JSON with a space after `:` and `,`, e.g. `{"a": 1, "b": 2}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize a payload in the spaced single-line JSON style
pub fn to_spaced_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoStep {
    /// `message` event, ids 1..=3
    Message { index: u32 },
    Multiline,
    Important,
    Custom,
    /// Comment-only keepalive
    Heartbeat { index: u32 },
}

impl DemoStep {
    /// Build the event for this step; `now` stamps message payloads
    pub fn render(&self, now: NaiveDateTime) -> Result<SseEvent, serde_json::Error> {
        let event = match *self {
            Self::Message { index } => {
                let payload = MessagePayload {
                    message: format!("Hello from SSE server - Message {index}"),
                    timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
                };
                SseEvent::named("message")
                    .id(index)
                    .data(to_spaced_json(&payload)?)
            }
            Self::Multiline => SseEvent::named("multiline")
                .id(MESSAGE_COUNT + 1)
                .data(MULTILINE_TEXT),
            Self::Important => SseEvent::named("important")
                .id(MESSAGE_COUNT + 2)
                .retry(IMPORTANT_RETRY_MS)
                .data(format!(
                    "This event suggests a {} second retry",
                    IMPORTANT_RETRY_MS / 1000
                )),
            Self::Custom => SseEvent::named("custom")
                .id(MESSAGE_COUNT + 3)
                .field("custom_field", "custom_value")
                .data("Event with custom fields"),
            Self::Heartbeat { .. } => SseEvent::comment("heartbeat"),
        };
        Ok(event)
    }

    /// Progress line logged after the step is written
    pub fn log_line(&self) -> String {
        match self {
            Self::Message { index } => format!("Sent message {index}"),
            Self::Multiline => "Sent multiline event".to_string(),
            Self::Important => "Sent retry event".to_string(),
            Self::Custom => "Sent custom field event".to_string(),
            Self::Heartbeat { index } => format!("Sent heartbeat {index}"),
        }
    }
}

/// All steps in emission order
pub fn demo_script() -> Vec<DemoStep> {
    (1..=MESSAGE_COUNT)
        .map(|index| DemoStep::Message { index })
        .chain([DemoStep::Multiline, DemoStep::Important, DemoStep::Custom])
        .chain((1..=HEARTBEAT_COUNT).map(|index| DemoStep::Heartbeat { index }))
        .collect()
}
