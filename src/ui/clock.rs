//! Clock widget body

use eframe::egui;

use crate::widgets::clock::{ClockFace, TICK};

pub fn show(ui: &mut egui::Ui) {
    let face = ClockFace::now();
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(face.time).size(32.0).monospace());
        ui.label(face.date);
    });
    ui.ctx().request_repaint_after(TICK);
}
