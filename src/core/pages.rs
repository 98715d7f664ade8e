//! Page (tab) management

use std::collections::HashSet;

use thiserror::Error;

use super::document::{next_page_id, Document, Page, PageId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page {0} does not exist")]
    NotFound(PageId),
    #[error("the last remaining page cannot be deleted")]
    LastPage,
    #[error("page position {0} is out of range")]
    OutOfRange(usize),
}

impl Document {
    /// Append an empty page named after its position and switch to it
    pub fn add_page(&mut self) -> PageId {
        let used: HashSet<PageId> = self.pages.iter().map(|p| p.id).collect();
        let id = next_page_id(&used);
        let name = (self.pages.len() + 1).to_string();
        self.pages.push(Page::new(id, name));
        self.current = id;
        tracing::debug!("Added page {}", id);
        id
    }

    /// Rename a page; a blank name falls back to its 1-based position
    pub fn rename_page(&mut self, id: PageId, name: &str) -> Result<(), PageError> {
        let position = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(PageError::NotFound(id))?;
        let name = name.trim();
        self.pages[position].name = if name.is_empty() {
            (position + 1).to_string()
        } else {
            name.to_string()
        };
        Ok(())
    }

    /// Delete a page and the side tables of its widgets
    ///
    /// Deleting the active page activates the first remaining one.
    pub fn delete_page(&mut self, id: PageId) -> Result<Page, PageError> {
        let position = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or(PageError::NotFound(id))?;
        if self.pages.len() == 1 {
            return Err(PageError::LastPage);
        }

        let removed = self.pages.remove(position);
        for widget in removed.widgets() {
            self.drop_side_tables(&widget.id);
        }
        if self.current == id {
            self.current = self.pages[0].id;
        }
        tracing::debug!("Deleted page {} ('{}')", id, removed.name);
        Ok(removed)
    }

    pub fn set_active(&mut self, id: PageId) -> Result<(), PageError> {
        if self.page(id).is_none() {
            return Err(PageError::NotFound(id));
        }
        self.current = id;
        Ok(())
    }

    /// Move the page at position `from` to position `to`
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), PageError> {
        for index in [from, to] {
            if index >= self.pages.len() {
                return Err(PageError::OutOfRange(index));
            }
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetKind;

    #[test]
    fn test_add_page_becomes_active() {
        let mut doc = Document::seed();
        let id = doc.add_page();
        assert_eq!(doc.current(), id);
        assert_eq!(doc.pages().len(), 2);
        let page = doc.current_page();
        assert_eq!(page.name, "2");
        assert!(page.zone_widgets.iter().all(Vec::is_empty));

        let third = doc.add_page();
        assert_eq!(doc.page(third).unwrap().name, "3");
        assert_ne!(third, id);
    }

    #[test]
    fn test_add_page_after_max_id_takes_lowest_free() {
        let json = r#"{"pages": [{"id": 1, "name": "Main"}, {"id": 18446744073709551615, "name": "Far"}], "current": 1}"#;
        let mut doc = Document::from_json(json).unwrap();
        let id = doc.add_page();
        assert_eq!(id, 2);
        assert_eq!(doc.add_page(), 3);
        assert_eq!(doc.current(), 3);
        assert_eq!(doc.pages().len(), 4);
    }

    #[test]
    fn test_last_page_cannot_be_deleted() {
        let mut doc = Document::seed();
        let only = doc.current();
        assert_eq!(doc.delete_page(only), Err(PageError::LastPage));
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.current(), only);
    }

    #[test]
    fn test_deleting_active_page_falls_back_to_first() {
        let mut doc = Document::seed();
        let first = doc.current();
        doc.add_page();
        let third = doc.add_page();
        assert_eq!(doc.current(), third);

        doc.delete_page(third).unwrap();
        assert_eq!(doc.current(), first);
    }

    #[test]
    fn test_deleting_inactive_page_keeps_selection() {
        let mut doc = Document::seed();
        let first = doc.current();
        let second = doc.add_page();
        doc.delete_page(first).unwrap();
        assert_eq!(doc.current(), second);
        assert_eq!(doc.delete_page(first), Err(PageError::NotFound(first)));
    }

    #[test]
    fn test_delete_page_drops_widget_data() {
        let mut doc = Document::seed();
        doc.add_page();
        let todo = doc.add_widget(0, WidgetKind::Todo).unwrap();
        doc.todo_list_mut(&todo).add("gone soon").unwrap();
        let doomed = doc.current();
        doc.delete_page(doomed).unwrap();
        assert!(doc.todos(&todo).is_empty());
    }

    #[test]
    fn test_rename_page() {
        let mut doc = Document::seed();
        let second = doc.add_page();
        doc.rename_page(second, "  Work ").unwrap();
        assert_eq!(doc.page(second).unwrap().name, "Work");
        doc.rename_page(second, "   ").unwrap();
        assert_eq!(doc.page(second).unwrap().name, "2");
        assert_eq!(doc.rename_page(42, "x"), Err(PageError::NotFound(42)));
    }

    #[test]
    fn test_set_active_and_reorder() {
        let mut doc = Document::seed();
        let first = doc.current();
        let second = doc.add_page();
        doc.set_active(first).unwrap();
        assert_eq!(doc.current(), first);
        assert_eq!(doc.set_active(99), Err(PageError::NotFound(99)));

        doc.reorder_pages(1, 0).unwrap();
        let order: Vec<_> = doc.pages().iter().map(|p| p.id).collect();
        assert_eq!(order, vec![second, first]);
        assert_eq!(doc.current(), first);
        assert_eq!(doc.reorder_pages(0, 2), Err(PageError::OutOfRange(2)));
    }
}
