//! In-memory hosts for orchestrator tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::eol::Eol;
use crate::host::{Confirm, EditorSurface, FileAccess, FileHandle};
use crate::prefs::DisplayFlags;

#[derive(Debug, Default)]
pub struct MemorySurface {
    pub text: String,
    pub language: String,
    pub eol: Eol,
    pub display: DisplayFlags,
    pub title: String,
}

impl MemorySurface {
    /// Simulates typing at the end of the buffer. The caller reports the
    /// edit to the orchestrator.
    pub fn type_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl EditorSurface for MemorySurface {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, content: &str) {
        self.text = content.to_string();
    }

    fn set_language(&mut self, language_id: &str) {
        self.language = language_id.to_string();
    }

    fn set_eol(&mut self, eol: Eol) {
        self.eol = eol;
    }

    fn apply_display(&mut self, flags: &DisplayFlags) {
        self.display = *flags;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: Option<String>,
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryFile {
    pub fn new(name: &str, mime_type: Option<&str>, contents: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.map(str::to_string),
            contents: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }

    /// A file whose reads and writes fail.
    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mime_type: None,
            contents: Arc::new(Mutex::new(None)),
        }
    }

    pub fn contents(&self) -> String {
        self.contents.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    async fn read_text(&self) -> Result<String> {
        self.contents
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("permission denied"))
    }

    async fn write_text(&self, content: &str) -> Result<()> {
        let mut contents = self.contents.lock().unwrap();
        match contents.as_mut() {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(anyhow!("permission denied")),
        }
    }
}

/// Pickers that hand out queued files. An empty queue acts as a dismissed
/// picker.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    pub to_open: VecDeque<MemoryFile>,
    pub to_save: VecDeque<MemoryFile>,
    /// Suggested names passed to the save picker.
    pub save_requests: Vec<String>,
}

#[async_trait]
impl FileAccess for MemoryFiles {
    type Handle = MemoryFile;

    async fn pick_open(&mut self) -> Result<Option<MemoryFile>> {
        Ok(self.to_open.pop_front())
    }

    async fn pick_save(&mut self, suggested_name: &str) -> Result<Option<MemoryFile>> {
        self.save_requests.push(suggested_name.to_string());
        Ok(self.to_save.pop_front())
    }
}

/// Answers prompts from a script, declining once it runs out.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}
