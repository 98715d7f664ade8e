//! Bookmarks widget body

use eframe::egui;

use super::inline_edit::{self, InlineEdit};
use crate::app::StartdeckApp;
use crate::core::document::WidgetRef;
use crate::widgets::bookmarks::{favicon_url, Bookmark};

const FAVICON_SIZE: f32 = 16.0;

enum RowAction {
    Rename,
    Delete,
}

/// Add and manage toggles, laid out right to left in the card header
pub fn header_buttons(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let managing = app.views.bookmarks_managing.contains(&widget.id);
    let hint = if managing { "Done editing" } else { "Edit bookmarks" };
    if ui.selectable_label(managing, "\u{270F}").on_hover_text(hint).clicked() {
        if managing {
            app.views.bookmarks_managing.remove(&widget.id);
            app.bookmark_editor.cancel();
        } else {
            app.views.bookmarks_managing.insert(widget.id.clone());
        }
    }

    if ui.small_button("+").on_hover_text("Add bookmark").clicked() {
        let form = app.views.bookmark_forms.entry(widget.id.clone()).or_default();
        form.open = !form.open;
    }
}

pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let bookmarks: Vec<Bookmark> = app.dashboard.document().current_page().bookmarks.clone();
    let managing = app.views.bookmarks_managing.contains(&widget.id);
    let form_open = app.views.bookmark_forms.get(&widget.id).is_some_and(|f| f.open);

    if bookmarks.is_empty() && !form_open {
        ui.weak("No bookmarks yet. Use + to add one.");
    }

    for (index, bookmark) in bookmarks.iter().enumerate() {
        let key = (widget.id.clone(), index);
        ui.horizontal(|ui| {
            if app.config.show_favicons {
                if let Some(icon) = favicon_url(&bookmark.url) {
                    ui.add(egui::Image::new(icon).fit_to_exact_size(egui::vec2(FAVICON_SIZE, FAVICON_SIZE)));
                }
            }

            if app.bookmark_editor.is_editing(&key) {
                let width = ui.available_width() - 8.0;
                if let InlineEdit::Committed(done) = inline_edit::show(ui, &mut app.bookmark_editor, width) {
                    let result = app.dashboard.rename_bookmark(done.target.1, &done.value);
                    app.report("rename bookmark", result);
                }
                return;
            }

            if ui.link(bookmark.display_title()).on_hover_text(&bookmark.url).clicked() {
                if let Err(e) = open::that(&bookmark.url) {
                    tracing::error!("Failed to open {}: {}", bookmark.url, e);
                }
            }

            if !managing {
                return;
            }
            let action = ui
                .with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("\u{1F5D1}").on_hover_text("Delete").clicked() {
                        Some(RowAction::Delete)
                    } else if ui.small_button("\u{270F}").on_hover_text("Rename").clicked() {
                        Some(RowAction::Rename)
                    } else {
                        None
                    }
                })
                .inner;
            match action {
                Some(RowAction::Rename) => app.bookmark_editor.begin(key.clone(), &bookmark.title),
                Some(RowAction::Delete) => {
                    app.bookmark_editor.cancel();
                    let result = app.dashboard.delete_bookmark(index);
                    app.report("delete bookmark", result);
                }
                None => {}
            }
        });
    }

    if form_open {
        add_form(ui, app, widget);
    }
}

fn add_form(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let form = app.views.bookmark_forms.entry(widget.id.clone()).or_default();
    ui.add_space(4.0);

    let url = ui.add(
        egui::TextEdit::singleline(&mut form.url)
            .hint_text("https://example.com")
            .desired_width(f32::INFINITY),
    );
    let title = ui.add(
        egui::TextEdit::singleline(&mut form.title)
            .hint_text("Title (optional)")
            .desired_width(f32::INFINITY),
    );
    let submitted = (url.lost_focus() || title.lost_focus()) && ui.input(|i| i.key_pressed(egui::Key::Enter));

    let (save, cancel) = ui
        .horizontal(|ui| (ui.button("Save").clicked(), ui.button("Cancel").clicked()))
        .inner;

    if cancel {
        app.views.bookmark_forms.remove(&widget.id);
        return;
    }
    if save || submitted {
        let (url, title) = (form.url.clone(), form.title.clone());
        if app.add_bookmark(&url, &title) {
            app.views.bookmark_forms.remove(&widget.id);
        }
    }
}
