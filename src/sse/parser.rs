//! Incremental `text/event-stream` decoder
//!
//! Feed arbitrary chunks; complete events come out as soon as their
//! terminating blank line has been seen. Comment lines are skipped.

use super::event::SseEvent;

#[derive(Debug, Default)]
pub struct SseParser {
    /// Bytes after the last newline, waiting for the rest of the line
    partial: String,
    current: SseEvent,
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return every event it completed
    pub fn feed(&mut self, chunk: &str) -> Vec<SseEvent> {
        self.partial.push_str(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if let Some(event) = self.process_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Flush state at end of stream; a trailing event without blank line is still returned
    pub fn finish(mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.partial);
        if !rest.is_empty() {
            if let Some(event) = self.process_line(&rest) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.current.event = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            "id" => self.current.id = Some(value.to_string()),
            "retry" => {
                if let Ok(millis) = value.parse() {
                    self.current.retry = Some(millis);
                }
            }
            other => self
                .current
                .fields
                .push((other.to_string(), value.to_string())),
        }
        None
    }

    /// Emit the pending event if it carries anything a client would act on
    fn dispatch(&mut self) -> Option<SseEvent> {
        let has_content = !self.data_lines.is_empty()
            || self.current.event.is_some()
            || self.current.id.is_some()
            || self.current.retry.is_some();

        if !has_content {
            self.current = SseEvent::default();
            return None;
        }

        let mut event = std::mem::take(&mut self.current);
        if !self.data_lines.is_empty() {
            event.data = Some(self.data_lines.join("\n"));
            self.data_lines.clear();
        }
        Some(event)
    }
}

/// Decode a complete stream body
pub fn parse_stream(body: &str) -> Vec<SseEvent> {
    let mut parser = SseParser::new();
    let mut events = parser.feed(body);
    events.extend(parser.finish());
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_data_joined() {
        let events = parse_stream("event: multiline\nid: 4\ndata: Line 1\ndata: Line 2\ndata: Line 3\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("multiline"));
        assert_eq!(events[0].id.as_deref(), Some("4"));
        assert_eq!(events[0].data.as_deref(), Some("Line 1\nLine 2\nLine 3"));
    }

    #[test]
    fn test_comments_skipped() {
        let events = parse_stream(": heartbeat\n\n: heartbeat\n\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data.as_deref(), Some("x"));
        assert_eq!(events[0].comment, None);
    }

    #[test]
    fn test_chunks_split_mid_line() {
        let mut parser = SseParser::new();
        assert!(parser.feed("event: mess").is_empty());
        assert!(parser.feed("age\r\nda").is_empty());
        let events = parser.feed("ta: hello\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("message"));
        assert_eq!(events[0].data.as_deref(), Some("hello"));
    }

    #[test]
    fn test_retry_and_unknown_fields() {
        let events = parse_stream("retry: 5000\ncustom_field: custom_value\nflag\ndata:no-space\n\n");
        assert_eq!(events[0].retry, Some(5000));
        assert_eq!(events[0].get_field("custom_field"), Some("custom_value"));
        assert_eq!(events[0].get_field("flag"), Some(""));
        assert_eq!(events[0].data.as_deref(), Some("no-space"));
    }

    #[test]
    fn test_invalid_retry_ignored() {
        let events = parse_stream("retry: soon\ndata: x\n\n");
        assert_eq!(events[0].retry, None);
    }

    #[test]
    fn test_only_one_leading_space_stripped() {
        let events = parse_stream("data:  indented\n\n");
        assert_eq!(events[0].data.as_deref(), Some(" indented"));
    }

    #[test]
    fn test_trailing_event_without_blank_line() {
        let events = parse_stream("event: last\ndata: end");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data.as_deref(), Some("end"));
    }

    #[test]
    fn test_decodes_encoder_output() {
        let sent = SseEvent::named("custom")
            .id(6)
            .retry(100)
            .field("custom_field", "custom_value")
            .data("a\nb");
        assert_eq!(parse_stream(&sent.encode()), vec![sent]);
    }
}
