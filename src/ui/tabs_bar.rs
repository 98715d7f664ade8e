//! Page tabs: switch, rename, reorder, add and delete

use eframe::egui;

use super::inline_edit::{self, InlineEdit};
use crate::app::StartdeckApp;
use crate::core::document::Page;

/// Horizontal strip of page tabs
pub struct TabsBar;

enum TabAction {
    Activate,
    Rename,
    MoveLeft,
    MoveRight,
    Delete,
}

impl TabsBar {
    /// Show the tab strip
    pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp) {
        let pages: Vec<Page> = app.dashboard.document().pages().to_vec();
        let current = app.dashboard.document().current();
        let closable = pages.len() > 1;

        ui.horizontal_wrapped(|ui| {
            for (index, page) in pages.iter().enumerate() {
                if app.tab_editor.is_editing(&page.id) {
                    if let InlineEdit::Committed(done) = inline_edit::show(ui, &mut app.tab_editor, 120.0) {
                        let result = app.dashboard.rename_page(done.target, &done.value);
                        app.report("rename page", result);
                    }
                    continue;
                }

                let Some(action) = Self::show_tab(ui, page, page.id == current, index, pages.len(), closable) else {
                    continue;
                };
                match action {
                    TabAction::Activate => app.activate_page(page.id),
                    TabAction::Rename => app.tab_editor.begin(page.id, &page.name),
                    TabAction::MoveLeft => {
                        let result = app.dashboard.reorder_pages(index, index - 1);
                        app.report("move page", result);
                    }
                    TabAction::MoveRight => {
                        let result = app.dashboard.reorder_pages(index, index + 1);
                        app.report("move page", result);
                    }
                    TabAction::Delete => app.confirm_delete = Some(page.id),
                }
            }

            if ui.button("+").on_hover_text("New page (Ctrl+T)").clicked() {
                app.dashboard.add_page();
            }
        });
    }

    fn show_tab(
        ui: &mut egui::Ui,
        page: &Page,
        active: bool,
        index: usize,
        count: usize,
        closable: bool,
    ) -> Option<TabAction> {
        let mut action = None;

        let response = ui
            .selectable_label(active, &page.name)
            .on_hover_text("Double-click to rename");
        if response.double_clicked() {
            action = Some(TabAction::Rename);
        } else if response.clicked() {
            action = Some(TabAction::Activate);
        }

        response.context_menu(|ui| {
            if ui.button("Rename").clicked() {
                action = Some(TabAction::Rename);
                ui.close();
            }
            if ui.add_enabled(index > 0, egui::Button::new("Move left")).clicked() {
                action = Some(TabAction::MoveLeft);
                ui.close();
            }
            if ui.add_enabled(index + 1 < count, egui::Button::new("Move right")).clicked() {
                action = Some(TabAction::MoveRight);
                ui.close();
            }
            if closable && ui.button("Delete").clicked() {
                action = Some(TabAction::Delete);
                ui.close();
            }
        });

        if closable && ui.small_button("\u{00D7}").on_hover_text("Delete page").clicked() {
            action = Some(TabAction::Delete);
        }

        action
    }
}
