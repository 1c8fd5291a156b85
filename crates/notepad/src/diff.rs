//! Side-by-side view of the last loaded or saved text against the buffer.
//! Lines are paired by position; there is no alignment step.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffView {
    pub language_id: String,
    pub original: String,
    pub modified: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow<'a> {
    /// 1-based row number.
    pub number: usize,
    pub original: Option<&'a str>,
    pub modified: Option<&'a str>,
}

impl DiffRow<'_> {
    pub fn changed(&self) -> bool {
        self.original != self.modified
    }
}

impl DiffView {
    pub fn new(language_id: &str, original: String, modified: String) -> Self {
        Self {
            language_id: language_id.to_string(),
            original,
            modified,
        }
    }

    pub fn set_language(&mut self, language_id: &str) {
        self.language_id = language_id.to_string();
    }

    pub fn rows(&self) -> Vec<DiffRow<'_>> {
        let mut left = self.original.lines();
        let mut right = self.modified.lines();
        let mut rows = Vec::new();
        loop {
            let (original, modified) = (left.next(), right.next());
            if original.is_none() && modified.is_none() {
                return rows;
            }
            rows.push(DiffRow {
                number: rows.len() + 1,
                original,
                modified,
            });
        }
    }

    pub fn has_changes(&self) -> bool {
        self.original != self.modified
    }

    /// Two text columns of `width` characters with a `|` marker on rows
    /// that differ.
    pub fn render_side_by_side(&self, width: usize) -> String {
        let mut out = String::new();
        for row in self.rows() {
            let marker = if row.changed() { '|' } else { ' ' };
            out.push_str(&format!(
                "{:>4} {:<width$} {} {}\n",
                row.number,
                clip(row.original.unwrap_or(""), width),
                marker,
                clip(row.modified.unwrap_or(""), width),
                width = width,
            ));
        }
        out
    }
}

fn clip(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}
