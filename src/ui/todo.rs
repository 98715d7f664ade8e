//! Todo widget body

use eframe::egui;

use super::inline_edit::{field_key, FieldKey};
use crate::app::StartdeckApp;
use crate::core::document::WidgetRef;
use crate::widgets::todo::TodoItem;

enum ItemAction {
    Toggle,
    Edit,
    Delete,
    Save(String),
    Cancel,
}

pub fn show(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef) {
    let items: Vec<TodoItem> = app.dashboard.document().todos(&widget.id).to_vec();

    if items.is_empty() {
        ui.weak("Nothing to do");
    }

    let mut action = None;
    for (index, item) in items.iter().enumerate() {
        let row = if item.editing {
            edit_row(ui, app, widget, item)
        } else {
            view_row(ui, item)
        };
        if let Some(row) = row {
            action = Some((index, row));
        }
    }
    if let Some((index, action)) = action {
        apply(app, widget, index, action);
    }

    ui.add_space(4.0);
    quick_add(ui, app, widget, &items);
}

fn view_row(ui: &mut egui::Ui, item: &TodoItem) -> Option<ItemAction> {
    ui.horizontal(|ui| {
        let mut done = item.done;
        let mut action = None;
        if ui.checkbox(&mut done, "").changed() {
            action = Some(ItemAction::Toggle);
        }
        let mut text = egui::RichText::new(&item.text);
        if item.done {
            text = text.strikethrough().weak();
        }
        if ui
            .add(egui::Label::new(text).sense(egui::Sense::click()))
            .double_clicked()
        {
            action = Some(ItemAction::Edit);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("\u{1F5D1}").on_hover_text("Delete").clicked() {
                action = Some(ItemAction::Delete);
            }
            if ui.small_button("\u{270F}").on_hover_text("Edit").clicked() {
                action = Some(ItemAction::Edit);
            }
        });
        action
    })
    .inner
}

fn edit_row(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef, item: &TodoItem) -> Option<ItemAction> {
    let buffer = app
        .views
        .todo_edits
        .entry(widget.id.clone())
        .or_insert_with(|| item.text.clone());
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(buffer)
                .hint_text("What needs doing?")
                .desired_width(ui.available_width() - 90.0),
        );
        let key = field_key(&response, ui);
        if key == Some(FieldKey::Cancel) {
            return Some(ItemAction::Cancel);
        }
        if ui.small_button("Save").clicked() || key == Some(FieldKey::Submit) {
            return Some(ItemAction::Save(buffer.clone()));
        }
        if ui.small_button("Cancel").clicked() {
            return Some(ItemAction::Cancel);
        }
        None
    })
    .inner
}

fn apply(app: &mut StartdeckApp, widget: &WidgetRef, index: usize, action: ItemAction) {
    let id = &widget.id;
    let result = match action {
        ItemAction::Toggle => app.dashboard.with_todos(id, |list| list.toggle(index).map(|_| ())),
        ItemAction::Edit => {
            app.views.todo_edits.remove(id);
            app.dashboard.with_todos(id, |list| list.begin_edit(index))
        }
        ItemAction::Delete => {
            app.views.todo_edits.remove(id);
            app.dashboard.with_todos(id, |list| list.delete(index).map(|_| ()))
        }
        ItemAction::Save(text) => {
            let result = app.dashboard.with_todos(id, |list| list.save_edit(index, &text));
            if result.is_ok() {
                app.views.todo_edits.remove(id);
            }
            result
        }
        ItemAction::Cancel => {
            app.views.todo_edits.remove(id);
            app.dashboard.with_todos(id, |list| list.cancel_edit(index))
        }
    };
    app.report("update todo", result);
}

fn quick_add(ui: &mut egui::Ui, app: &mut StartdeckApp, widget: &WidgetRef, items: &[TodoItem]) {
    let draft = app.views.todo_drafts.entry(widget.id.clone()).or_default();
    let (submitted, blank) = ui
        .horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(draft)
                    .hint_text("Add a task")
                    .desired_width(ui.available_width() - 60.0),
            );
            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let blank = ui.small_button("+").on_hover_text("New item").clicked();
            (enter, blank)
        })
        .inner;
    let text = draft.clone();

    let any_done = items.iter().any(|item| item.done);
    let clear = any_done && ui.small_button("Clear completed").clicked();

    let id = &widget.id;
    if submitted && !text.trim().is_empty() {
        let result = app.dashboard.with_todos(id, |list| list.add(&text));
        if app.report("add todo", result).is_some() {
            app.views.todo_drafts.remove(id);
        }
    } else if blank {
        app.views.todo_edits.remove(id);
        let result = app.dashboard.with_todos(id, |list| Ok(list.add_item()));
        app.report("add todo", result);
    }
    if clear {
        let result = app.dashboard.with_todos(id, |list| Ok(list.clear_done()));
        if let Some(removed) = app.report("clear todos", result) {
            tracing::debug!("Cleared {} completed todo(s)", removed);
        }
    }
}
