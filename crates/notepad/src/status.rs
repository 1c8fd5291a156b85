use std::fmt;
use std::time::{Duration, Instant};

use crate::eol::Eol;

pub const ENCODING: &str = "UTF-8";

/// Bottom bar contents, derived from the editor and the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub line: usize,
    pub column: usize,
    pub characters: usize,
    pub lines: usize,
    pub eol: Eol,
    pub encoding: &'static str,
    pub language: String,
}

impl StatusBar {
    pub fn segments(&self) -> [String; 5] {
        [
            format!("Ln {}, Col {}", self.line, self.column),
            format!("{} characters, {} lines", self.characters, self.lines),
            self.eol.to_string(),
            self.encoding.to_string(),
            self.language.clone(),
        ]
    }
}

impl fmt::Display for StatusBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join(" | "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        let auto_clear_duration = Some(match message_type {
            MessageType::Info => Duration::from_secs(3),
            MessageType::Success => Duration::from_secs(2),
            MessageType::Warning => Duration::from_secs(5),
            MessageType::Error => Duration::from_secs(7),
        });
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.auto_clear_duration
            .is_some_and(|duration| self.created_at.elapsed() > duration)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.message_type {
            MessageType::Info => "",
            MessageType::Success => "✓ ",
            MessageType::Warning => "! ",
            MessageType::Error => "E: ",
        };
        write!(f, "{}{}", prefix, self.content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Info);
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Success);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Error);
    }

    fn set(&mut self, content: String, message_type: MessageType) {
        self.current_message = Some(StatusMessage::new(content, message_type));
    }

    /// Drop the current message once it has expired.
    pub fn update(&mut self) {
        if self
            .current_message
            .as_ref()
            .is_some_and(StatusMessage::is_expired)
        {
            self.current_message = None;
        }
    }

    /// Hand out the current message, leaving the manager empty.
    pub fn take(&mut self) -> Option<StatusMessage> {
        self.current_message.take()
    }
}
