//! Inline rename state shared by tab names, bookmark titles and widget titles
//!
//! `viewing -> begin -> editing -> commit | cancel -> viewing`. One editor
//! tracks at most one target, so starting a new edit abandons the old one.

/// What the user typed once an edit is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<K> {
    pub target: K,
    /// Trimmed input; may be empty, callers choose the fallback
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEditor<K> {
    target: Option<K>,
    /// Text bound to the inline input
    pub buffer: String,
    focus_pending: bool,
}

impl<K> Default for TitleEditor<K> {
    fn default() -> Self {
        Self {
            target: None,
            buffer: String::new(),
            focus_pending: false,
        }
    }
}

impl<K: PartialEq + Clone> TitleEditor<K> {
    pub fn begin(&mut self, target: K, current: &str) {
        self.target = Some(target);
        self.buffer = current.to_string();
        self.focus_pending = true;
    }

    pub fn is_editing(&self, target: &K) -> bool {
        self.target.as_ref() == Some(target)
    }

    pub fn target(&self) -> Option<&K> {
        self.target.as_ref()
    }

    /// True once per `begin`, so the input grabs focus a single time
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_pending)
    }

    pub fn commit(&mut self) -> Option<Committed<K>> {
        let target = self.target.take()?;
        let value = std::mem::take(&mut self.buffer).trim().to_string();
        self.focus_pending = false;
        Some(Committed { target, value })
    }

    /// Leave editing without saving
    pub fn cancel(&mut self) {
        self.target = None;
        self.buffer.clear();
        self.focus_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_returns_trimmed_value() {
        let mut editor = TitleEditor::default();
        editor.begin(3u64, "Work");
        assert!(editor.is_editing(&3));
        editor.buffer = "  Deep work ".to_string();
        let committed = editor.commit().unwrap();
        assert_eq!(committed.target, 3);
        assert_eq!(committed.value, "Deep work");
        assert!(editor.target().is_none());
        assert!(editor.commit().is_none());
    }

    #[test]
    fn test_cancel_discards_input() {
        let mut editor = TitleEditor::default();
        editor.begin("w1".to_string(), "Notes");
        editor.buffer.push_str(" draft");
        editor.cancel();
        assert!(!editor.is_editing(&"w1".to_string()));
        assert!(editor.commit().is_none());
    }

    #[test]
    fn test_single_target_at_a_time() {
        let mut editor = TitleEditor::default();
        editor.begin(1u64, "a");
        editor.begin(2u64, "b");
        assert!(!editor.is_editing(&1));
        assert!(editor.is_editing(&2));
        assert_eq!(editor.buffer, "b");
    }

    #[test]
    fn test_focus_requested_once() {
        let mut editor = TitleEditor::default();
        editor.begin(1u64, "a");
        assert!(editor.take_focus_request());
        assert!(!editor.take_focus_request());
    }
}
