//! Binds the document and the view preferences to the editor surface and
//! runs the new/open/save/exit flows.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

use crate::diff::DiffView;
use crate::document::{Document, EMBEDDED, SNAPSHOT};
use crate::eol::Eol;
use crate::host::{Confirm, EditorSurface, FileAccess, FileHandle};
use crate::keymap::{KeyChord, KeyDisposition, Shortcut};
use crate::language::{file_extension, LanguageRegistry};
use crate::links::{IncomingLink, LinkBuilder, LinkMode};
use crate::prefs::{DisplayFlags, KeyValueStorage, PreferencesPatch, PreferencesStore};
use crate::status::{StatusBar, ENCODING};

pub const UNSAVED_CHANGES_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to leave?";

/// How a document-replacing or saving operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The unsaved-changes prompt was declined.
    Declined,
    /// A file picker was dismissed.
    Cancelled,
    /// Another open/save/new is still in flight.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    Allow,
    Veto,
}

/// Marks an open/save/new as outstanding. Clones share the same flag, so a
/// host can keep one to grey out its controls.
#[derive(Debug, Clone, Default)]
pub struct FlightLock(Arc<AtomicBool>);

impl FlightLock {
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(Arc::clone(&self.0)))
    }

    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the [`FlightLock`] when dropped.
#[derive(Debug)]
pub struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Orchestrator<E, F: FileAccess, C, S> {
    document: Document<F::Handle>,
    editor: E,
    files: F,
    confirm: C,
    prefs: PreferencesStore<S>,
    languages: LanguageRegistry,
    links: LinkBuilder,
    /// Display flags of an embed session; `None` means the stored
    /// preferences apply.
    session_flags: Option<DisplayFlags>,
    flight: FlightLock,
    should_quit: bool,
}

impl<E, F, C, S> Orchestrator<E, F, C, S>
where
    E: EditorSurface,
    F: FileAccess,
    C: Confirm,
    S: KeyValueStorage,
{
    pub fn new(
        editor: E,
        files: F,
        confirm: C,
        prefs: PreferencesStore<S>,
        links: LinkBuilder,
    ) -> Self {
        let document = Document::new(prefs.get().default_eol);
        let mut orchestrator = Self {
            document,
            editor,
            files,
            confirm,
            prefs,
            languages: LanguageRegistry::builtin(),
            links,
            session_flags: None,
            flight: FlightLock::default(),
            should_quit: false,
        };
        orchestrator.editor.set_eol(orchestrator.document.eol());
        orchestrator.apply_display();
        orchestrator.render_title();
        orchestrator
    }

    pub fn with_languages(mut self, languages: LanguageRegistry) -> Self {
        self.languages = languages;
        self
    }

    pub fn document(&self) -> &Document<F::Handle> {
        &self.document
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn files_mut(&mut self) -> &mut F {
        &mut self.files
    }

    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    pub fn preferences(&self) -> &PreferencesStore<S> {
        &self.prefs
    }

    /// Display flags in effect: the embed session's, else the stored ones.
    pub fn display_flags(&self) -> DisplayFlags {
        self.session_flags
            .unwrap_or_else(|| self.prefs.get().display_flags())
    }

    pub fn is_embed_session(&self) -> bool {
        self.session_flags.is_some()
    }

    pub fn flight_lock(&self) -> FlightLock {
        self.flight.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Blocking unsaved-changes prompt. `true` means go ahead.
    fn pending_change_gate(&mut self) -> bool {
        if !self.document.is_dirty() {
            return true;
        }
        let proceed = self.confirm.confirm(UNSAVED_CHANGES_PROMPT);
        if !proceed {
            log::debug!("Unsaved-changes prompt declined");
        }
        proceed
    }

    pub fn create_new(&mut self) -> Outcome {
        let Some(_guard) = self.flight.try_acquire() else {
            return Outcome::Busy;
        };
        if !self.pending_change_gate() {
            return Outcome::Declined;
        }

        let default_eol = self.prefs.get().default_eol;
        self.document.create_new(default_eol);
        self.session_flags = None;
        self.editor.set_language(self.document.language_id());
        self.editor.set_value("");
        self.editor.set_eol(default_eol);
        self.apply_display();
        self.render_title();
        Outcome::Done
    }

    /// Open `handle`, or ask the host for one when it is `None`.
    pub async fn open(&mut self, handle: Option<F::Handle>) -> Result<Outcome> {
        let Some(_guard) = self.flight.try_acquire() else {
            return Ok(Outcome::Busy);
        };
        if !self.pending_change_gate() {
            return Ok(Outcome::Declined);
        }

        let handle = match handle {
            Some(handle) => handle,
            None => match self.files.pick_open().await? {
                Some(handle) => handle,
                None => return Ok(Outcome::Cancelled),
            },
        };

        let content = handle
            .read_text()
            .await
            .with_context(|| format!("Failed to read {}", handle.name()))?;
        let language_id = self
            .languages
            .classify(handle.mime_type(), handle.name())
            .to_string();
        let name = handle.name().to_string();

        self.session_flags = None;
        self.load_into_editor(content, &language_id, &name, Some(handle));
        self.apply_display();
        log::info!("Opened {} as {}", name, language_id);
        Ok(Outcome::Done)
    }

    /// Write the buffer to its file, asking for a destination when there is
    /// none yet or when `save_as` is set.
    pub async fn save(&mut self, save_as: bool) -> Result<Outcome> {
        let Some(_guard) = self.flight.try_acquire() else {
            return Ok(Outcome::Busy);
        };

        let content = self.editor.value();
        let (handle, picked) = match self.document.origin() {
            Some(origin) if !save_as => (origin.clone(), false),
            _ => {
                let suggested = suggested_file_name(self.document.display_name());
                match self.files.pick_save(&suggested).await? {
                    Some(handle) => (handle, true),
                    None => return Ok(Outcome::Cancelled),
                }
            }
        };

        handle
            .write_text(&content)
            .await
            .with_context(|| format!("Failed to write {}", handle.name()))?;

        let name = handle.name().to_string();
        self.document.sync_content(content);
        if picked {
            self.document.set_origin(handle, &name);
        }
        self.document.mark_saved();
        self.render_title();
        log::info!("Saved {}", name);
        Ok(Outcome::Done)
    }

    pub fn exit(&mut self) -> Outcome {
        if !self.pending_change_gate() {
            return Outcome::Declined;
        }
        self.should_quit = true;
        Outcome::Done
    }

    /// Leave without the unsaved-changes prompt.
    pub fn quit_without_saving(&mut self) {
        if self.document.is_dirty() {
            log::info!("Discarding unsaved changes to {}", self.document.display_name());
        }
        self.should_quit = true;
    }

    /// Platform close/navigation hook.
    pub fn before_unload(&self) -> UnloadDecision {
        if self.document.is_dirty() {
            UnloadDecision::Veto
        } else {
            UnloadDecision::Allow
        }
    }

    /// Content-change notification from the editor surface.
    pub fn on_user_edit(&mut self) {
        let was_dirty = self.document.is_dirty();
        self.document.on_user_edit();
        if was_dirty != self.document.is_dirty() {
            self.render_title();
        }
    }

    pub async fn run_shortcut(&mut self, shortcut: Shortcut) -> Result<Outcome> {
        log::debug!("Shortcut {:?}", shortcut);
        match shortcut {
            Shortcut::New => Ok(self.create_new()),
            Shortcut::Open => self.open(None).await,
            Shortcut::Save => self.save(false).await,
            Shortcut::SaveAs => self.save(true).await,
        }
    }

    /// Run the shortcut bound to `chord`, if any. A declined or cancelled
    /// shortcut still counts as handled.
    pub async fn handle_key(&mut self, chord: &KeyChord) -> Result<KeyDisposition> {
        match Shortcut::from_chord(chord) {
            Some(shortcut) => {
                self.run_shortcut(shortcut).await?;
                Ok(KeyDisposition::Handled)
            }
            None => Ok(KeyDisposition::PassThrough),
        }
    }

    /// Replace the document with the content of a snapshot or embed link.
    pub fn load_link(&mut self, link: IncomingLink) -> Outcome {
        let Some(_guard) = self.flight.try_acquire() else {
            return Outcome::Busy;
        };
        if !self.pending_change_gate() {
            return Outcome::Declined;
        }

        let name = match link.mode {
            LinkMode::Snapshot => SNAPSHOT,
            LinkMode::Embed => EMBEDDED,
        };
        self.session_flags = match link.mode {
            LinkMode::Embed => Some(link.flags.unwrap_or_default()),
            LinkMode::Snapshot => None,
        };
        self.load_into_editor(link.content, &link.language_id, name, None);
        self.apply_display();
        Outcome::Done
    }

    pub fn snapshot_link(&mut self) -> Option<Url> {
        self.document.sync_content(self.editor.value());
        self.links.build_snapshot_link(&self.document)
    }

    pub fn embed_link(&mut self, flags: DisplayFlags) -> Option<Url> {
        self.document.sync_content(self.editor.value());
        self.links.build_embed_link(&self.document, flags)
    }

    pub fn set_eol(&mut self, eol: Eol) {
        self.document.set_eol(eol);
        self.editor.set_eol(eol);
    }

    pub fn set_language(&mut self, language_id: &str) {
        self.document.set_language(language_id);
        self.editor.set_language(language_id);
    }

    pub fn set_default_eol(&mut self, eol: Eol) -> Result<()> {
        self.prefs.set(PreferencesPatch {
            default_eol: Some(eol),
            ..Default::default()
        })?;
        Ok(())
    }

    /// Toggle display options. During an embed session only the session's
    /// flags change; the store is left alone.
    pub fn set_view(&mut self, patch: PreferencesPatch) -> Result<DisplayFlags> {
        match self.session_flags.as_mut() {
            Some(flags) => {
                if let Some(value) = patch.line_numbers_enabled {
                    flags.line_numbers = value;
                }
                if let Some(value) = patch.minimap_enabled {
                    flags.minimap = value;
                }
                if let Some(value) = patch.sticky_scroll_enabled {
                    flags.sticky_scroll = value;
                }
                if let Some(eol) = patch.default_eol {
                    self.set_default_eol(eol)?;
                }
            }
            None => {
                self.prefs.set(patch)?;
            }
        }
        self.apply_display();
        Ok(self.display_flags())
    }

    pub fn status_bar(&self) -> StatusBar {
        let (line, column) = self.editor.cursor_position();
        StatusBar {
            line,
            column,
            characters: self.editor.character_count(),
            lines: self.editor.line_count(),
            eol: self.document.eol(),
            encoding: ENCODING,
            language: self
                .languages
                .display_name(self.document.language_id())
                .to_string(),
        }
    }

    pub fn diff_view(&self) -> DiffView {
        DiffView::new(
            self.document.language_id(),
            self.document.baseline().to_string(),
            self.editor.value(),
        )
    }

    /// Live preview document for the current buffer.
    pub fn preview(&self) -> String {
        preview::render(
            preview::PreviewKind::from_language_id(self.document.language_id()),
            &self.editor.value(),
        )
    }

    fn load_into_editor(
        &mut self,
        content: String,
        language_id: &str,
        display_name: &str,
        origin: Option<F::Handle>,
    ) {
        self.editor.set_language(language_id);
        self.editor.set_value(&content);
        self.document
            .load(content, Some(language_id), display_name, origin);
        self.editor.set_eol(self.document.eol());
        // Mixed line endings were just normalized by the editor
        self.document.rebase(self.editor.value());
        if !self.editor.echoes_programmatic_changes() {
            self.document.settle();
        }
        self.render_title();
    }

    fn apply_display(&mut self) {
        let flags = self.display_flags();
        self.editor.apply_display(&flags);
    }

    fn render_title(&mut self) {
        self.editor.set_title(&self.document.title());
    }
}

fn suggested_file_name(display_name: &str) -> String {
    if file_extension(display_name).is_empty() {
        format!("{}.txt", display_name)
    } else {
        display_name.to_string()
    }
}
