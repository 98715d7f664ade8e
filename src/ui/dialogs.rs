//! Settings window, page delete confirmation and notices

use eframe::egui;

use crate::app::StartdeckApp;
use crate::core::store::Theme;

/// Floating windows drawn over the dashboard
pub struct Dialogs;

impl Dialogs {
    pub fn show(ctx: &egui::Context, app: &mut StartdeckApp) {
        Self::settings(ctx, app);
        Self::confirm_delete(ctx, app);
        Self::notice(ctx, app);
    }

    fn settings(ctx: &egui::Context, app: &mut StartdeckApp) {
        if !app.settings_open {
            return;
        }
        let mut open = true;
        let mut config_changed = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Appearance");
                ui.horizontal(|ui| {
                    let theme = app.dashboard.theme();
                    if ui.radio(theme == Theme::Light, "Light").clicked() {
                        app.dashboard.set_theme(Theme::Light);
                    }
                    if ui.radio(theme == Theme::Dark, "Dark").clicked() {
                        app.dashboard.set_theme(Theme::Dark);
                    }
                });
                config_changed |= ui
                    .checkbox(&mut app.config.show_favicons, "Show bookmark icons")
                    .changed();

                ui.separator();
                ui.heading("Bookmarks");
                config_changed |= ui
                    .checkbox(&mut app.config.fetch_titles, "Fetch page titles for new bookmarks")
                    .changed();

                ui.separator();
                ui.heading("Backup");
                ui.label("Export everything to a JSON file, or replace all data with one.");
                ui.horizontal(|ui| {
                    if ui.button("Export...").clicked() {
                        app.export_backup();
                    }
                    if ui.button("Import...").clicked() {
                        app.import_backup();
                    }
                });

                if let Some(path) = app.config.store_path() {
                    ui.separator();
                    ui.weak(format!("Data file: {}", path.display()));
                }

                ui.separator();
                ui.weak(concat!("Startdeck ", env!("CARGO_PKG_VERSION")));
            });

        if config_changed {
            if let Err(e) = app.config.save() {
                tracing::warn!("Failed to save config: {:#}", e);
            }
        }
        app.settings_open = open;
    }

    fn confirm_delete(ctx: &egui::Context, app: &mut StartdeckApp) {
        let Some(id) = app.confirm_delete else {
            return;
        };
        let name = match app.dashboard.document().page(id) {
            Some(page) => page.name.clone(),
            None => {
                app.confirm_delete = None;
                return;
            }
        };

        egui::Window::new("Delete page")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{}\" and all of its widgets?", name));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        app.confirm_delete = None;
                        app.delete_page(id);
                    }
                    if ui.button("Cancel").clicked() {
                        app.confirm_delete = None;
                    }
                });
            });
    }

    fn notice(ctx: &egui::Context, app: &mut StartdeckApp) {
        let Some(message) = app.notice.clone() else {
            return;
        };
        egui::Window::new("Startdeck")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    app.notice = None;
                }
            });
    }
}
