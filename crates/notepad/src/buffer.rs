use ropey::Rope;

use crate::eol::Eol;
use crate::host::EditorSurface;
use crate::prefs::DisplayFlags;

/// Headless editor surface for the terminal host. Edits arrive as whole
/// lines appended at the end; programmatic assignments are not echoed.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    rope: Rope,
    language_id: String,
    eol: Eol,
    display: DisplayFlags,
    title: String,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` as a new last line. Refused in read-only mode.
    pub fn append_line(&mut self, text: &str) -> bool {
        if self.display.read_only {
            log::warn!("Buffer is read-only, edit ignored");
            return false;
        }

        let end = self.rope.len_chars();
        let ends_with_break = end > 0 && self.rope.char(end - 1) == '\n';
        if end > 0 && !ends_with_break {
            self.rope.insert(end, self.eol.sequence());
        }
        let end = self.rope.len_chars();
        self.rope.insert(end, text);
        true
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn display(&self) -> DisplayFlags {
        self.display
    }

    /// Buffer text for the terminal, with a line-number gutter when enabled.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, line) in self.rope.lines().enumerate() {
            let text = line.to_string();
            let text = text.trim_end_matches(['\r', '\n']);
            if index + 1 == self.rope.len_lines() && text.is_empty() && index > 0 {
                break;
            }
            if self.display.line_numbers {
                out.push_str(&format!("{:>4}  ", index + 1));
            }
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

impl EditorSurface for BufferSurface {
    fn value(&self) -> String {
        self.rope.to_string()
    }

    fn set_value(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }

    fn set_language(&mut self, language_id: &str) {
        self.language_id = language_id.to_string();
    }

    /// Normalizes existing line breaks, like the editor widget does.
    fn set_eol(&mut self, eol: Eol) {
        self.eol = eol;
        let normalized = eol.apply(&self.rope.to_string());
        self.rope = Rope::from_str(&normalized);
    }

    fn apply_display(&mut self, flags: &DisplayFlags) {
        self.display = *flags;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// The cursor sits after the last character.
    fn cursor_position(&self) -> (usize, usize) {
        let last = self.rope.len_lines().saturating_sub(1);
        let column = self
            .rope
            .get_line(last)
            .map_or(0, |line| line.len_chars());
        (last + 1, column + 1)
    }

    fn character_count(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn echoes_programmatic_changes(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_lines_use_eol() {
        let mut buffer = BufferSurface::new();
        buffer.set_eol(Eol::CrLf);
        assert!(buffer.append_line("one"));
        assert!(buffer.append_line("two"));
        assert_eq!(buffer.value(), "one\r\ntwo");
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_append_after_trailing_newline() {
        let mut buffer = BufferSurface::new();
        buffer.set_value("a\n");
        buffer.append_line("b");
        assert_eq!(buffer.value(), "a\nb");
    }

    #[test]
    fn test_read_only_refuses_edits() {
        let mut buffer = BufferSurface::new();
        buffer.set_value("fixed");
        buffer.apply_display(&DisplayFlags {
            read_only: true,
            ..Default::default()
        });
        assert!(!buffer.append_line("more"));
        assert_eq!(buffer.value(), "fixed");
    }

    #[test]
    fn test_set_eol_normalizes() {
        let mut buffer = BufferSurface::new();
        buffer.set_value("a\r\nb\nc");
        buffer.set_eol(Eol::Lf);
        assert_eq!(buffer.value(), "a\nb\nc");
    }

    #[test]
    fn test_cursor_and_counts() {
        let mut buffer = BufferSurface::new();
        assert_eq!(buffer.cursor_position(), (1, 1));
        buffer.set_value("ab\ncde");
        assert_eq!(buffer.cursor_position(), (2, 4));
        assert_eq!(buffer.character_count(), 6);
    }

    #[test]
    fn test_render_with_gutter() {
        let mut buffer = BufferSurface::new();
        buffer.set_value("x\ny\n");
        assert_eq!(buffer.render(), "x\ny\n");
        buffer.apply_display(&DisplayFlags {
            line_numbers: true,
            ..Default::default()
        });
        assert_eq!(buffer.render(), "   1  x\n   2  y\n");
    }
}
