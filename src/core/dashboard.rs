//! The single owner of dashboard state
//!
//! Every successful mutation is written through to the store before the call
//! returns. A failed write is logged and the in-memory state stays current.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use super::backup::{self, Backup, BackupError};
use super::document::{Document, PageId, WidgetId, WidgetRef};
use super::layout::LayoutError;
use super::pages::PageError;
use super::store::{self, KeyValueStore, Theme};
use crate::widgets::bookmarks::BookmarkError;
use crate::widgets::calendar::{CalendarError, CalendarEvent};
use crate::widgets::todo::{TodoError, TodoList};
use crate::widgets::WidgetKind;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Bookmark(#[from] BookmarkError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Todo(#[from] TodoError),
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error("widget {id} is not a {expected} widget on this page")]
    WrongWidget { id: WidgetId, expected: WidgetKind },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

pub struct Dashboard<S: KeyValueStore> {
    document: Document,
    theme: Theme,
    store: S,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Load state from the store, falling back to the seed document
    pub fn open(store: S) -> Self {
        let document = store::load_document(&store);
        let theme = store::load_theme(&store);
        tracing::info!(
            "Loaded dashboard with {} page(s), theme {}",
            document.pages().len(),
            theme.name()
        );
        Self {
            document,
            theme,
            store,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        match store::save_document(&mut self.store, &self.document) {
            Ok(()) => tracing::debug!("Saved dashboard"),
            Err(e) => tracing::error!("Failed to save dashboard: {:#}", e),
        }
    }

    /// Run a document mutation and write through when it succeeds
    fn apply<T, E>(&mut self, f: impl FnOnce(&mut Document) -> Result<T, E>) -> DashboardResult<T>
    where
        E: Into<DashboardError>,
    {
        let value = f(&mut self.document).map_err(Into::into)?;
        self.persist();
        Ok(value)
    }

    fn expect_widget(&self, id: &WidgetId, expected: WidgetKind) -> DashboardResult<()> {
        match self.document.current_page().widget(id) {
            Some(widget) if widget.kind == expected => Ok(()),
            _ => Err(DashboardError::WrongWidget {
                id: id.clone(),
                expected,
            }),
        }
    }

    // Pages

    pub fn add_page(&mut self) -> PageId {
        let id = self.document.add_page();
        self.persist();
        id
    }

    pub fn rename_page(&mut self, id: PageId, name: &str) -> DashboardResult<()> {
        self.apply(|doc| doc.rename_page(id, name))
    }

    pub fn delete_page(&mut self, id: PageId) -> DashboardResult<()> {
        self.apply(|doc| doc.delete_page(id).map(|_| ()))
    }

    pub fn set_active(&mut self, id: PageId) -> DashboardResult<()> {
        self.apply(|doc| doc.set_active(id))
    }

    pub fn reorder_pages(&mut self, from: usize, to: usize) -> DashboardResult<()> {
        self.apply(|doc| doc.reorder_pages(from, to))
    }

    // Layout

    pub fn add_widget(&mut self, zone: usize, kind: WidgetKind) -> DashboardResult<WidgetId> {
        self.apply(|doc| doc.add_widget(zone, kind))
    }

    pub fn remove_widget(&mut self, id: &WidgetId) -> DashboardResult<WidgetRef> {
        self.apply(|doc| doc.remove_widget(id))
    }

    pub fn reorder(&mut self, zone: usize, from: usize, to: usize) -> DashboardResult<()> {
        self.apply(|doc| doc.reorder(zone, from, to))
    }

    pub fn move_widget(&mut self, id: &WidgetId, to_zone: usize, to_index: usize) -> DashboardResult<()> {
        self.apply(|doc| doc.move_widget(id, to_zone, to_index))
    }

    pub fn rename_widget(&mut self, id: &WidgetId, title: &str) -> DashboardResult<()> {
        self.apply(|doc| doc.rename_widget(id, title))
    }

    // Bookmarks and notes (current page)

    pub fn add_bookmark(&mut self, url: &str, title: &str) -> DashboardResult<usize> {
        self.apply(|doc| doc.current_page_mut().add_bookmark(url, title))
    }

    pub fn rename_bookmark(&mut self, index: usize, title: &str) -> DashboardResult<()> {
        self.apply(|doc| doc.current_page_mut().rename_bookmark(index, title))
    }

    pub fn delete_bookmark(&mut self, index: usize) -> DashboardResult<()> {
        self.apply(|doc| doc.current_page_mut().delete_bookmark(index).map(|_| ()))
    }

    /// Apply a fetched title to untitled bookmarks on a page, wherever it is
    pub fn fill_bookmark_title(&mut self, page: PageId, url: &str, title: &str) -> bool {
        let filled = self
            .document
            .page_mut(page)
            .map(|p| p.fill_missing_title(url, title))
            .unwrap_or(0);
        if filled > 0 {
            self.persist();
        }
        filled > 0
    }

    pub fn set_notes(&mut self, text: &str) {
        if self.document.current_page_mut().set_notes(text) {
            self.persist();
        }
    }

    // Calendar

    pub fn add_event(&mut self, widget: &WidgetId, date: NaiveDate, text: &str, time: &str) -> DashboardResult<()> {
        self.expect_widget(widget, WidgetKind::Calendar)?;
        self.apply(|doc| doc.events_mut(widget).add(date, text, time))
    }

    pub fn update_event(
        &mut self,
        widget: &WidgetId,
        date: NaiveDate,
        index: usize,
        text: &str,
        time: &str,
    ) -> DashboardResult<()> {
        self.expect_widget(widget, WidgetKind::Calendar)?;
        self.apply(|doc| doc.events_mut(widget).update(date, index, text, time))
    }

    pub fn delete_event(&mut self, widget: &WidgetId, date: NaiveDate, index: usize) -> DashboardResult<CalendarEvent> {
        self.expect_widget(widget, WidgetKind::Calendar)?;
        self.apply(|doc| doc.events_mut(widget).delete(date, index))
    }

    // Todo

    /// Run an operation on a todo widget's list
    pub fn with_todos<T>(
        &mut self,
        widget: &WidgetId,
        f: impl FnOnce(&mut TodoList<'_>) -> Result<T, TodoError>,
    ) -> DashboardResult<T> {
        self.expect_widget(widget, WidgetKind::Todo)?;
        self.apply(|doc| f(&mut doc.todo_list_mut(widget)))
    }

    // Theme

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = store::save_theme(&mut self.store, theme) {
            tracing::error!("Failed to save theme: {:#}", e);
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggled();
        self.set_theme(theme);
        theme
    }

    // Import / export

    /// Write `{ data, theme }` to a file
    pub fn export_to_file(&self, path: &Path) -> anyhow::Result<()> {
        backup::export_to_file(path, &self.document, self.theme)
    }

    /// Replace everything with a parsed backup
    pub fn restore(&mut self, backup: Backup) {
        self.document = backup.data;
        self.persist();
        self.set_theme(backup.theme);
        tracing::info!("Restored dashboard from backup");
    }

    /// Read and apply a backup file; on error nothing changes
    pub fn import_from_file(&mut self, path: &Path) -> DashboardResult<()> {
        let backup = backup::import_from_file(path)?;
        self.restore(backup);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{load_document, MemoryStore};

    fn dashboard() -> Dashboard<MemoryStore> {
        Dashboard::open(MemoryStore::default())
    }

    fn stored(dash: &Dashboard<MemoryStore>) -> Document {
        load_document(dash.store())
    }

    #[test]
    fn test_open_empty_store_gives_seed() {
        let dash = dashboard();
        assert_eq!(dash.document(), &Document::seed());
        assert_eq!(dash.theme(), Theme::Light);
    }

    #[test]
    fn test_mutations_write_through() {
        let mut dash = dashboard();
        let page = dash.add_page();
        dash.rename_page(page, "Work").unwrap();
        let notes = dash.add_widget(0, WidgetKind::Notes).unwrap();
        dash.set_notes("first\nsecond");
        dash.add_bookmark("https://example.com", "").unwrap();
        dash.rename_widget(&notes, "Scratch").unwrap();
        assert_eq!(&stored(&dash), dash.document());
        assert_eq!(stored(&dash).current_page().name, "Work");
    }

    #[test]
    fn test_fetched_title_lands_on_requesting_page() {
        let mut dash = dashboard();
        let first = dash.document().current();
        dash.add_bookmark("https://docs.rs", "").unwrap();
        dash.add_page();

        assert!(dash.fill_bookmark_title(first, "https://docs.rs", "Docs.rs"));
        assert!(!dash.fill_bookmark_title(first, "https://docs.rs", "Again"));
        let stored = stored(&dash);
        assert_eq!(stored.page(first).unwrap().bookmarks[0].title, "Docs.rs");
    }

    #[test]
    fn test_failed_operation_leaves_state() {
        let mut dash = dashboard();
        let before = dash.document().clone();
        let only = before.current();
        assert!(matches!(
            dash.delete_page(only),
            Err(DashboardError::Page(PageError::LastPage))
        ));
        assert_eq!(dash.document(), &before);
    }

    #[test]
    fn test_calendar_requires_calendar_widget() {
        let mut dash = dashboard();
        let todo = dash.add_widget(0, WidgetKind::Todo).unwrap();
        let calendar = dash.add_widget(1, WidgetKind::Calendar).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(matches!(
            dash.add_event(&todo, day, "x", ""),
            Err(DashboardError::WrongWidget { .. })
        ));
        dash.add_event(&calendar, day, "review", "14:00").unwrap();
        assert_eq!(stored(&dash).events(&calendar).unwrap().count_on(day), 1);
    }

    #[test]
    fn test_todo_operations() {
        let mut dash = dashboard();
        let todo = dash.add_widget(2, WidgetKind::Todo).unwrap();
        let index = dash.with_todos(&todo, |list| Ok(list.add_item())).unwrap();
        dash.with_todos(&todo, |list| list.save_edit(index, "ship")).unwrap();
        dash.with_todos(&todo, |list| list.toggle(index)).unwrap();
        let items = stored(&dash).todos(&todo).to_vec();
        assert_eq!(items.len(), 1);
        assert!(items[0].done);
    }

    #[test]
    fn test_theme_persisted() {
        let mut dash = dashboard();
        assert_eq!(dash.toggle_theme(), Theme::Dark);
        assert_eq!(store::load_theme(dash.store()), Theme::Dark);
    }

    #[test]
    fn test_import_replaces_everything() {
        let mut source = dashboard();
        source.add_page();
        source.add_widget(0, WidgetKind::Clock).unwrap();
        source.set_theme(Theme::Dark);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(backup::DEFAULT_FILE_NAME);
        source.export_to_file(&path).unwrap();

        let mut target = dashboard();
        target.add_bookmark("https://old.example", "old").unwrap();
        target.import_from_file(&path).unwrap();
        assert_eq!(target.document(), source.document());
        assert_eq!(target.theme(), Theme::Dark);
        assert_eq!(&stored(&target), source.document());
    }

    #[test]
    fn test_invalid_import_keeps_state() {
        let mut dash = dashboard();
        dash.add_page();
        let before = dash.document().clone();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        let result = dash.import_from_file(&path);
        assert!(matches!(
            result,
            Err(DashboardError::Backup(BackupError::Invalid(_)))
        ));
        let missing = dash.import_from_file(&dir.path().join("missing.json"));
        assert!(matches!(
            missing,
            Err(DashboardError::Backup(BackupError::Io(_)))
        ));
        assert_eq!(dash.document(), &before);
        assert_eq!(dash.theme(), Theme::Light);
    }
}
