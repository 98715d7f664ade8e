//! The three widget columns of the current page, with drag and drop

use eframe::egui;

use super::widget_card::WidgetCard;
use crate::app::StartdeckApp;
use crate::core::document::{WidgetId, WidgetRef, ZONE_COUNT};
use crate::core::layout::{drop_index, Slot};
use crate::widgets::WidgetKind;

/// Payload carried while a widget card is dragged
#[derive(Debug, Clone)]
pub struct DraggedWidget(pub WidgetId);

/// One zone column
pub struct ZonePanel;

impl ZonePanel {
    /// Show every zone side by side
    pub fn show_all(ui: &mut egui::Ui, app: &mut StartdeckApp) {
        ui.spacing_mut().item_spacing.x = app.config.ui.zone_spacing;
        ui.columns(ZONE_COUNT, |columns| {
            for (zone, column) in columns.iter_mut().enumerate() {
                Self::show(column, app, zone);
            }
        });
    }

    /// Show one zone: its cards, then the add-widget control
    pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, zone: usize) {
        let widgets: Vec<WidgetRef> = app.dashboard.document().current_page().zone_widgets[zone].clone();
        let mut slots: Vec<(WidgetId, Slot)> = Vec::with_capacity(widgets.len());

        let frame = egui::Frame::default().inner_margin(4.0);
        let (_, dropped) = ui.dnd_drop_zone::<DraggedWidget, ()>(frame, |ui| {
            ui.set_min_width(ui.available_width());
            ui.set_min_height(80.0);

            for widget in &widgets {
                let rect = WidgetCard::show(ui, app, widget);
                slots.push((
                    widget.id.clone(),
                    Slot {
                        top: rect.top(),
                        height: rect.height(),
                    },
                ));
                ui.add_space(8.0);
            }

            Self::add_widget_menu(ui, app, zone);
        });

        if let Some(dragged) = dropped {
            let pointer_y = ui.ctx().pointer_interact_pos().map_or(f32::INFINITY, |p| p.y);
            let others: Vec<Slot> = slots
                .iter()
                .filter(|(id, _)| id != &dragged.0)
                .map(|(_, slot)| *slot)
                .collect();
            let index = drop_index(&others, pointer_y);
            let origin = app.dashboard.document().current_page().find_widget(&dragged.0);
            let result = match origin {
                Some((from_zone, from)) if from_zone == zone => app.dashboard.reorder(zone, from, index),
                _ => app.dashboard.move_widget(&dragged.0, zone, index),
            };
            app.report("move widget", result);
        }
    }

    fn add_widget_menu(ui: &mut egui::Ui, app: &mut StartdeckApp, zone: usize) {
        ui.menu_button("\u{2795} Add widget", |ui| {
            for kind in WidgetKind::ALL {
                if ui.button(format!("{} {}", kind.icon(), kind.default_title())).clicked() {
                    let result = app.dashboard.add_widget(zone, kind);
                    if let Some(id) = app.report("add widget", result) {
                        tracing::info!("Added {} widget {} to zone {}", kind, id, zone);
                    }
                    ui.close();
                }
            }
        });
    }
}
