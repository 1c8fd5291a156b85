// Notepad library exports

pub mod buffer;
pub mod codec;
pub mod command_processor;
pub mod config;
pub mod diff;
pub mod document;
pub mod eol;
pub mod fs_access;
pub mod host;
pub mod keymap;
pub mod language;
pub mod links;
pub mod orchestrator;
pub mod prefs;
pub mod prompt;
pub mod status;

#[cfg(test)]
mod test_support;

pub use buffer::BufferSurface;
pub use command_processor::{CommandProcessor, TerminalOrchestrator};
pub use config::Config;
pub use document::{DirtyState, Document};
pub use eol::Eol;
pub use host::{Confirm, EditorSurface, FileAccess, FileHandle};
pub use language::LanguageRegistry;
pub use links::{parse_incoming_link, LinkBuilder};
pub use orchestrator::{Orchestrator, Outcome, UnloadDecision};
pub use prefs::{DisplayFlags, FileStorage, PreferencesStore, ViewPreferences};
