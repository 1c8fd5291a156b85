//! Capabilities the orchestrator borrows from its host: the editor widget,
//! file access, and a blocking yes/no prompt.

use anyhow::Result;
use async_trait::async_trait;

use crate::eol::Eol;
use crate::prefs::DisplayFlags;

/// The embedded text editor. It owns the text buffer; the orchestrator only
/// pushes and pulls whole values at transition points.
pub trait EditorSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, content: &str);
    fn set_language(&mut self, language_id: &str);
    fn set_eol(&mut self, eol: Eol);
    fn apply_display(&mut self, flags: &DisplayFlags);
    fn set_title(&mut self, title: &str);

    /// 1-based line and column of the cursor.
    fn cursor_position(&self) -> (usize, usize) {
        (1, 1)
    }

    fn character_count(&self) -> usize {
        self.value().chars().count()
    }

    fn line_count(&self) -> usize {
        self.value().split('\n').count()
    }

    /// Whether `set_value` comes back as one content-change notification.
    /// Surfaces that stay silent let the document leave its loading state
    /// right away.
    fn echoes_programmatic_changes(&self) -> bool {
        true
    }
}

/// An external file the document can be read from or written to.
#[async_trait]
pub trait FileHandle: Clone + Send + Sync {
    fn name(&self) -> &str;

    /// Declared MIME type, when the platform provides one.
    fn mime_type(&self) -> Option<&str> {
        None
    }

    async fn read_text(&self) -> Result<String>;

    /// Replace the whole file with `content`.
    async fn write_text(&self, content: &str) -> Result<()>;
}

/// Interactive acquisition of file handles. `Ok(None)` means the user
/// dismissed the picker.
#[async_trait]
pub trait FileAccess: Send {
    type Handle: FileHandle;

    async fn pick_open(&mut self) -> Result<Option<Self::Handle>>;
    async fn pick_save(&mut self, suggested_name: &str) -> Result<Option<Self::Handle>>;
}

pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}
