//! Notes: one free-form text blob per page, stored line by line

use crate::core::document::Page;

impl Page {
    pub fn notes_text(&self) -> String {
        self.notes.join("\n")
    }

    /// Replace the notes blob; returns false when nothing changed
    pub fn set_notes(&mut self, text: &str) -> bool {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(String::from).collect()
        };
        if lines == self.notes {
            return false;
        }
        self.notes = lines;
        true
    }
}

/// Rows the editor should show so the text never scrolls inside the widget
pub fn editor_rows(text: &str, min_rows: usize) -> usize {
    text.split('\n').count().max(min_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_stored_as_lines() {
        let mut page = Page::new(1, "Main");
        assert!(page.set_notes("milk\neggs\n"));
        assert_eq!(page.notes, vec!["milk", "eggs", ""]);
        assert_eq!(page.notes_text(), "milk\neggs\n");
        assert!(!page.set_notes("milk\neggs\n"));
    }

    #[test]
    fn test_clearing_notes() {
        let mut page = Page::new(1, "Main");
        page.set_notes("x");
        assert!(page.set_notes(""));
        assert!(page.notes.is_empty());
        assert_eq!(page.notes_text(), "");
    }

    #[test]
    fn test_editor_rows_grow() {
        assert_eq!(editor_rows("", 5), 5);
        assert_eq!(editor_rows("1\n2\n3\n4\n5\n6\n7", 5), 7);
    }
}
