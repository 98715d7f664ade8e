//! Calculator widget body: expression input plus an optional keypad

use eframe::egui;

use crate::app::{CalculatorState, StartdeckApp};
use crate::core::document::WidgetRef;
use crate::widgets::calculator::{calc_simple, display};

const KEYPAD_ROWS: [[char; 4]; 4] = [
    ['7', '8', '9', '/'],
    ['4', '5', '6', '*'],
    ['1', '2', '3', '-'],
    ['0', '.', '=', '+'],
];
const KEY_SIZE: egui::Vec2 = egui::vec2(36.0, 28.0);

pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let state = app.views.calculators.entry(widget.id.clone()).or_default();

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.input)
                .hint_text("2+3*4")
                .font(egui::TextStyle::Monospace)
                .desired_width(ui.available_width() - 36.0),
        );
        let label = if state.show_keypad { "\u{2328}" } else { "\u{1F522}" };
        if ui.selectable_label(state.show_keypad, label).on_hover_text("Keypad").clicked() {
            state.show_keypad = !state.show_keypad;
        }
    });

    if !state.input.trim().is_empty() {
        ui.monospace(display(calc_simple(&state.input)));
    }

    if state.show_keypad {
        ui.add_space(4.0);
        keypad(ui, &widget.id.to_string(), state);
    }
}

fn keypad(ui: &mut egui::Ui, salt: &str, state: &mut CalculatorState) {
    ui.label(egui::RichText::new(state.keypad.display()).monospace().size(20.0));
    egui::Grid::new(("keypad", salt)).spacing([4.0, 4.0]).show(ui, |ui| {
        for row in KEYPAD_ROWS {
            for key in row {
                if ui.add(egui::Button::new(key.to_string()).min_size(KEY_SIZE)).clicked() {
                    state.keypad.key(key);
                }
            }
            ui.end_row();
        }
    });
    if ui.button("C").on_hover_text("Clear").clicked() {
        state.keypad.clear();
    }
}
