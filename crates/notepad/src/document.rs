//! The active document and its dirty-tracking state machine.

use crate::eol::Eol;

pub const PLAINTEXT: &str = "plaintext";
pub const UNTITLED: &str = "Untitled";
pub const SNAPSHOT: &str = "Snapshot";
pub const EMBEDDED: &str = "Embedded";

/// Dirty tracking.
///
/// `Loading` is entered by [`Document::load`]. The first edit notification
/// that arrives while loading is the editor echoing the programmatic content
/// assignment, so it moves the document to `Clean` instead of `Dirty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    Clean,
    Loading,
    Dirty,
}

/// The single editable document. `H` is the file handle type of the host.
#[derive(Debug, Clone)]
pub struct Document<H> {
    content: String,
    baseline: String,
    origin: Option<H>,
    display_name: String,
    language_id: String,
    eol: Eol,
    state: DirtyState,
}

impl<H> Document<H> {
    /// Blank, clean document shown at startup.
    pub fn new(default_eol: Eol) -> Self {
        Self {
            content: String::new(),
            baseline: String::new(),
            origin: None,
            display_name: UNTITLED.to_string(),
            language_id: PLAINTEXT.to_string(),
            eol: default_eol,
            state: DirtyState::Clean,
        }
    }

    /// Replace the document with a blank one. The result is dirty so that the
    /// leave-without-saving prompt also covers a fresh buffer.
    pub fn create_new(&mut self, default_eol: Eol) {
        *self = Self::new(default_eol);
        self.state = DirtyState::Dirty;
        log::debug!("Created new document");
    }

    pub fn load(
        &mut self,
        content: String,
        language_id: Option<&str>,
        display_name: &str,
        origin: Option<H>,
    ) {
        self.eol = Eol::detect(&content);
        self.baseline = content.clone();
        self.content = content;
        self.language_id = language_id.unwrap_or(PLAINTEXT).to_string();
        self.display_name = display_name.to_string();
        self.origin = origin;
        self.state = DirtyState::Loading;
        log::debug!(
            "Loaded '{}' as {} ({})",
            self.display_name,
            self.language_id,
            self.eol
        );
    }

    pub fn on_user_edit(&mut self) {
        self.state = match self.state {
            DirtyState::Loading => DirtyState::Clean,
            DirtyState::Clean | DirtyState::Dirty => DirtyState::Dirty,
        };
    }

    /// Leave `Loading` without consuming an edit notification.
    pub fn settle(&mut self) {
        if self.state == DirtyState::Loading {
            self.state = DirtyState::Clean;
        }
    }

    pub fn mark_saved(&mut self) {
        self.baseline = self.content.clone();
        self.state = DirtyState::Clean;
    }

    pub fn set_eol(&mut self, eol: Eol) {
        self.eol = eol;
    }

    pub fn set_language(&mut self, language_id: &str) {
        self.language_id = language_id.to_string();
    }

    /// Record the editor's current text. Does not touch the dirty state.
    pub fn sync_content(&mut self, content: String) {
        self.content = content;
    }

    /// Replace both the content and the diff baseline, e.g. after the editor
    /// normalized the loaded text. Does not touch the dirty state.
    pub fn rebase(&mut self, content: String) {
        self.baseline = content.clone();
        self.content = content;
    }

    /// Attach the file the document was just written to.
    pub fn set_origin(&mut self, origin: H, display_name: &str) {
        self.origin = Some(origin);
        self.display_name = display_name.to_string();
    }

    /// Window title: the display name, with ` *` while dirty.
    pub fn title(&self) -> String {
        if self.is_dirty() {
            format!("{} *", self.display_name)
        } else {
            self.display_name.clone()
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state == DirtyState::Dirty
    }

    pub fn state(&self) -> DirtyState {
        self.state
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn origin(&self) -> Option<&H> {
        self.origin.as_ref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn eol(&self) -> Eol {
        self.eol
    }
}
