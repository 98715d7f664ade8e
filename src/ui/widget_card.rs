//! Framed widget card: drag handle, editable title, remove button and body

use eframe::egui;

use super::inline_edit::{self, InlineEdit};
use super::zone::DraggedWidget;
use super::{bookmarks, calculator, calendar, clock, notes, todo};
use crate::app::StartdeckApp;
use crate::core::document::WidgetRef;
use crate::widgets::WidgetKind;

pub struct WidgetCard;

impl WidgetCard {
    /// Show the card and return the rect it occupies
    pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) -> egui::Rect {
        egui::Frame::group(ui.style())
            .corner_radius(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                if !Self::header(ui, app, widget) {
                    return;
                }
                ui.separator();
                match widget.kind {
                    WidgetKind::Bookmarks => bookmarks::show(ui, app, widget),
                    WidgetKind::Notes => notes::show(ui, app),
                    WidgetKind::Calendar => calendar::show(ui, app, widget),
                    WidgetKind::Todo => todo::show(ui, app, widget),
                    WidgetKind::Clock => clock::show(ui),
                    WidgetKind::Calculator => calculator::show(ui, app, widget),
                }
            })
            .response
            .rect
    }

    /// Returns false once the widget has been removed
    fn header(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) -> bool {
        let mut keep = true;
        ui.horizontal(|ui| {
            let handle_id = egui::Id::new(("widget_drag", widget.id.as_str()));
            ui.dnd_drag_source(handle_id, DraggedWidget(widget.id.clone()), |ui| {
                ui.label("\u{2630}");
            })
            .response
            .on_hover_text("Drag to move");

            ui.label(widget.kind.icon());

            if app.widget_editor.is_editing(&widget.id) {
                if let InlineEdit::Committed(done) = inline_edit::show(ui, &mut app.widget_editor, 160.0) {
                    let result = app.dashboard.rename_widget(&done.target, &done.value);
                    app.report("rename widget", result);
                }
            } else {
                let title = ui
                    .add(
                        egui::Label::new(egui::RichText::new(widget.display_title()).strong())
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_text("Double-click to rename");
                if title.double_clicked() {
                    app.widget_editor.begin(widget.id.clone(), widget.display_title());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("\u{2715}").on_hover_text("Remove widget").clicked() {
                    let result = app.dashboard.remove_widget(&widget.id);
                    if app.report("remove widget", result).is_some() {
                        app.prune_widget_state();
                        keep = false;
                    }
                }
                if widget.kind == WidgetKind::Bookmarks {
                    bookmarks::header_buttons(ui, app, widget);
                }
            });
        });
        keep
    }
}
