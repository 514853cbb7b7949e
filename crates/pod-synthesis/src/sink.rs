//! Message sinks: where progress messages and tool output go.

use std::cell::RefCell;

use anstyle::{AnsiColor, Reset, Style};

use crate::error::Severity;

/// Receiver for operator-facing messages and external tool output.
pub trait MessageSink {
    /// Report a progress or diagnostic message.
    fn message(&self, severity: Severity, text: &str);

    /// Forward one line of external tool output, in production order.
    fn tool_output(&self, line: &str);

    fn info(&self, text: &str) {
        self.message(Severity::Info, text);
    }

    fn warn(&self, text: &str) {
        self.message(Severity::Warning, text);
    }
}

const SHELL: Style = AnsiColor::Cyan.on_default();

/// Console sink: messages through `tracing`, tool output on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    color: bool,
}

impl TracingSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format_tool_line(&self, line: &str) -> String {
        if self.color {
            format!("{}{line}{}", SHELL.render(), Reset.render())
        } else {
            format!("SHELL>{line}")
        }
    }
}

impl MessageSink for TracingSink {
    fn message(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Info => tracing::info!("{text}"),
            Severity::Warning => tracing::warn!("{text}"),
            Severity::Error => tracing::error!("{text}"),
        }
    }

    fn tool_output(&self, line: &str) {
        println!("{}", self.format_tool_line(line));
    }
}

/// One recorded sink event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Message(Severity, String),
    ToolOutput(String),
}

/// Sink that records every event in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RefCell<Vec<SinkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.borrow().clone()
    }

    /// Messages at or above `severity`.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Message(s, text) if *s >= severity => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn tool_lines(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::ToolOutput(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }
}

impl MessageSink for MemorySink {
    fn message(&self, severity: Severity, text: &str) {
        self.events
            .borrow_mut()
            .push(SinkEvent::Message(severity, text.to_string()));
    }

    fn tool_output(&self, line: &str) {
        self.events
            .borrow_mut()
            .push(SinkEvent::ToolOutput(line.to_string()));
    }
}
