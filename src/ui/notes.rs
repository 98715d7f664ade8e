//! Notes widget body

use eframe::egui;

use crate::app::StartdeckApp;
use crate::widgets::notes::editor_rows;

const MIN_ROWS: usize = 5;

/// Free-form text shared by every notes widget on the page; saved on each edit
pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp) {
    let mut text = app.dashboard.document().current_page().notes_text();
    let rows = editor_rows(&text, MIN_ROWS);
    let response = ui.add(
        egui::TextEdit::multiline(&mut text)
            .hint_text("Write something...")
            .desired_rows(rows)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        app.dashboard.set_notes(&text);
    }
}
