//! Single-line rename input bound to a [`TitleEditor`]

use eframe::egui;

use crate::core::editing::{Committed, TitleEditor};

/// Result of one frame of an inline edit
pub enum InlineEdit<K> {
    Editing,
    Committed(Committed<K>),
    Cancelled,
}

/// What a key press did to a single-line field this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Submit,
    Cancel,
}

/// Enter and Escape only count for the field they took focus away from
pub fn field_key(response: &egui::Response, ui: &egui::Ui) -> Option<FieldKey> {
    let (enter, escape) = ui.input(|i| (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape)));
    key_outcome(response.lost_focus(), enter, escape)
}

fn key_outcome(lost_focus: bool, enter: bool, escape: bool) -> Option<FieldKey> {
    if !lost_focus {
        return None;
    }
    if escape {
        Some(FieldKey::Cancel)
    } else if enter {
        Some(FieldKey::Submit)
    } else {
        None
    }
}

/// Show the input for the editor's current target
///
/// Enter or clicking away commits, Escape cancels.
pub fn show<K: PartialEq + Clone>(ui: &mut egui::Ui, editor: &mut TitleEditor<K>, width: f32) -> InlineEdit<K> {
    let response = ui.add(egui::TextEdit::singleline(&mut editor.buffer).desired_width(width));
    if editor.take_focus_request() {
        response.request_focus();
    }

    if field_key(&response, ui) == Some(FieldKey::Cancel) {
        editor.cancel();
        return InlineEdit::Cancelled;
    }
    if response.lost_focus() {
        return match editor.commit() {
            Some(committed) => InlineEdit::Committed(committed),
            None => InlineEdit::Cancelled,
        };
    }
    InlineEdit::Editing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_ignored_by_fields_that_kept_focus() {
        assert_eq!(key_outcome(false, false, true), None);
        assert_eq!(key_outcome(false, true, false), None);
    }

    #[test]
    fn test_keys_on_field_that_lost_focus() {
        assert_eq!(key_outcome(true, false, true), Some(FieldKey::Cancel));
        assert_eq!(key_outcome(true, true, false), Some(FieldKey::Submit));
        assert_eq!(key_outcome(true, true, true), Some(FieldKey::Cancel));
        assert_eq!(key_outcome(true, false, false), None);
    }
}
