//! Calendar widget body: month grid, day agenda and upcoming list

use chrono::{Local, NaiveDate};
use eframe::egui;

use crate::app::{CalendarState, EventDraft, StartdeckApp};
use crate::core::document::{WidgetId, WidgetRef};
use crate::widgets::calendar::{marker_color, EventBook, MonthView, WEEKDAYS};

const CELL_SIZE: egui::Vec2 = egui::vec2(30.0, 26.0);
const MAX_MARKERS: usize = 4;
const UPCOMING_LIMIT: usize = 3;

pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let today = Local::now().date_naive();
    let mut state = app
        .views
        .calendars
        .remove(&widget.id)
        .unwrap_or_else(|| CalendarState::new(today));
    let book = app
        .dashboard
        .document()
        .events(&widget.id)
        .cloned()
        .unwrap_or_default();

    ui.horizontal(|ui| {
        if ui.small_button("\u{25C0}").clicked() {
            state.view = state.view.prev();
        }
        ui.label(egui::RichText::new(state.view.title()).strong());
        if ui.small_button("\u{25B6}").clicked() {
            state.view = state.view.next();
        }
        if ui.small_button("Today").clicked() {
            state.view = MonthView::containing(today);
            state.selected = Some(today);
        }
    });

    month_grid(ui, &widget.id, &mut state, &book, today);
    ui.separator();

    match state.selected {
        Some(date) => day_agenda(ui, app, &widget.id, &mut state, &book, date),
        None => upcoming(ui, &book, today),
    }

    app.views.calendars.insert(widget.id.clone(), state);
}

fn month_grid(ui: &mut egui::Ui, id: &WidgetId, state: &mut CalendarState, book: &EventBook, today: NaiveDate) {
    egui::Grid::new(("calendar_grid", id.as_str()))
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            for day in WEEKDAYS {
                ui.weak(day);
            }
            ui.end_row();

            for (i, cell) in state.view.cells().into_iter().enumerate() {
                match cell {
                    Some(date) => {
                        let selected = state.selected == Some(date);
                        let mut text = egui::RichText::new(date.format("%-d").to_string());
                        if date == today {
                            text = text.strong().underline();
                        }
                        let response = ui.add(egui::Button::new(text).selected(selected).min_size(CELL_SIZE));
                        paint_markers(ui, response.rect, book.count_on(date));
                        if response.clicked() {
                            state.selected = if selected { None } else { Some(date) };
                            state.editing = None;
                            state.error = None;
                        }
                    }
                    None => {
                        ui.allocate_space(CELL_SIZE);
                    }
                }
                if i % 7 == 6 {
                    ui.end_row();
                }
            }
        });
}

fn paint_markers(ui: &egui::Ui, rect: egui::Rect, count: usize) {
    let shown = count.min(MAX_MARKERS);
    if shown == 0 {
        return;
    }
    let size = 4.0;
    let gap = 2.0;
    let width = shown as f32 * size + (shown - 1) as f32 * gap;
    let mut left = rect.center().x - width / 2.0;
    let top = rect.bottom() - size - 2.0;
    for index in 0..shown {
        let [r, g, b] = marker_color(index);
        let dot = egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(size, size));
        ui.painter().rect_filled(dot, 2.0, egui::Color32::from_rgb(r, g, b));
        left += size + gap;
    }
}

fn day_agenda(
    ui: &mut egui::Ui,
    app: &mut StartdeckApp,
    id: &WidgetId,
    state: &mut CalendarState,
    book: &EventBook,
    date: NaiveDate,
) {
    ui.label(egui::RichText::new(date.format("%A, %B %-d").to_string()).strong());

    let events = book.on(date);
    if events.is_empty() {
        ui.weak("No events");
    }

    for (index, event) in events {
        let editing = state
            .editing
            .as_ref()
            .is_some_and(|d| d.date == date && d.index == index);
        if editing {
            edit_row(ui, app, id, state);
            continue;
        }

        ui.horizontal(|ui| {
            if !event.time.is_empty() {
                ui.monospace(&event.time);
            }
            ui.label(&event.text);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("\u{1F5D1}").on_hover_text("Delete").clicked() {
                    let result = app.dashboard.delete_event(id, date, index);
                    app.report("delete event", result);
                    state.editing = None;
                }
                if ui.small_button("\u{270F}").on_hover_text("Edit").clicked() {
                    state.editing = Some(EventDraft {
                        date,
                        index,
                        text: event.text.clone(),
                        time: event.time.clone(),
                    });
                    state.error = None;
                }
            });
        });
    }

    ui.add_space(4.0);
    let submitted = ui
        .horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.new_time)
                    .hint_text("HH:MM")
                    .desired_width(48.0),
            );
            let text = ui.add(
                egui::TextEdit::singleline(&mut state.new_text)
                    .hint_text("New event")
                    .desired_width(ui.available_width() - 48.0),
            );
            let enter = text.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.button("Add").clicked() || enter
        })
        .inner;

    if submitted {
        match app.dashboard.add_event(id, date, &state.new_text, &state.new_time) {
            Ok(()) => {
                state.new_text.clear();
                state.new_time.clear();
                state.error = None;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }

    if let Some(ref error) = state.error {
        ui.colored_label(ui.visuals().error_fg_color, error);
    }
}

fn edit_row(ui: &mut egui::Ui, app: &mut StartdeckApp, id: &WidgetId, state: &mut CalendarState) {
    let Some(draft) = state.editing.as_mut() else {
        return;
    };
    let (save, cancel) = ui
        .horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut draft.time).hint_text("HH:MM").desired_width(48.0));
            ui.add(egui::TextEdit::singleline(&mut draft.text).desired_width(ui.available_width() - 90.0));
            (ui.small_button("Save").clicked(), ui.small_button("Cancel").clicked())
        })
        .inner;

    if cancel {
        state.editing = None;
        state.error = None;
    } else if save {
        let draft = draft.clone();
        match app
            .dashboard
            .update_event(id, draft.date, draft.index, &draft.text, &draft.time)
        {
            Ok(()) => {
                state.editing = None;
                state.error = None;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
    }
}

fn upcoming(ui: &mut egui::Ui, book: &EventBook, today: NaiveDate) {
    ui.label(egui::RichText::new("Upcoming").strong());
    let events = book.upcoming(today, UPCOMING_LIMIT);
    if events.is_empty() {
        ui.weak("Nothing scheduled. Pick a day to add an event.");
        return;
    }
    for (date, event) in events {
        ui.horizontal(|ui| {
            ui.weak(date.format("%b %-d").to_string());
            if !event.time.is_empty() {
                ui.monospace(&event.time);
            }
            ui.label(&event.text);
        });
    }
}
