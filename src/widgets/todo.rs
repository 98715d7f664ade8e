//! Todo list: ordered items with in-place editing

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::document::{Document, WidgetId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TodoError {
    #[error("todo text is empty")]
    EmptyText,
    #[error("no todo item at index {0}")]
    NotFound(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    /// Set while the item is open in the inline editor
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub editing: bool,
}

/// Operations over one widget's item list
pub struct TodoList<'a> {
    items: &'a mut Vec<TodoItem>,
}

impl<'a> TodoList<'a> {
    pub fn new(items: &'a mut Vec<TodoItem>) -> Self {
        Self { items }
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut TodoItem, TodoError> {
        self.items.get_mut(index).ok_or(TodoError::NotFound(index))
    }

    /// Close every open editor but `keep`, dropping drafts that never got text
    fn close_editors(&mut self, keep: Option<usize>) {
        for (index, mut item) in std::mem::take(&mut *self.items).into_iter().enumerate() {
            if Some(index) == keep {
                item.editing = true;
            } else if item.editing {
                if item.text.is_empty() {
                    continue;
                }
                item.editing = false;
            }
            self.items.push(item);
        }
    }

    /// Append a blank item already open for editing
    pub fn add_item(&mut self) -> usize {
        self.close_editors(None);
        self.items.push(TodoItem {
            editing: true,
            ..TodoItem::default()
        });
        self.items.len() - 1
    }

    /// Append a finished item
    pub fn add(&mut self, text: &str) -> Result<usize, TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        self.items.push(TodoItem {
            text: text.to_string(),
            ..TodoItem::default()
        });
        Ok(self.items.len() - 1)
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, TodoError> {
        let item = self.item_mut(index)?;
        item.done = !item.done;
        Ok(item.done)
    }

    /// Open an item for editing; any other open item is closed, a blank one removed
    pub fn begin_edit(&mut self, index: usize) -> Result<(), TodoError> {
        if index >= self.items.len() {
            return Err(TodoError::NotFound(index));
        }
        self.close_editors(Some(index));
        Ok(())
    }

    pub fn save_edit(&mut self, index: usize, text: &str) -> Result<(), TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        let item = self.item_mut(index)?;
        item.text = text.to_string();
        item.editing = false;
        Ok(())
    }

    /// Close the editor; an item that never got any text is dropped
    pub fn cancel_edit(&mut self, index: usize) -> Result<(), TodoError> {
        if self.item_mut(index)?.text.is_empty() {
            self.items.remove(index);
        } else {
            self.items[index].editing = false;
        }
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<TodoItem, TodoError> {
        if index >= self.items.len() {
            return Err(TodoError::NotFound(index));
        }
        Ok(self.items.remove(index))
    }

    /// Remove every completed item, returning how many went
    pub fn clear_done(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.done);
        before - self.items.len()
    }
}

impl Document {
    pub fn todos(&self, id: &WidgetId) -> &[TodoItem] {
        self.todo_lists.get(id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn todo_list_mut(&mut self, id: &WidgetId) -> TodoList<'_> {
        TodoList::new(self.todo_lists.entry(id.clone()).or_default())
    }
}
