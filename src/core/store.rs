//! Local key-value storage and the document/theme persistence on top of it

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::document::Document;

/// Key holding the whole document
pub const STORAGE_KEY: &str = "startpage_data_v2";
/// Key holding the theme name
pub const THEME_KEY: &str = "theme";

/// String-to-string storage with local-storage semantics
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Volatile store, used by tests and as a fallback when no data dir exists
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object on disk, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or start) the store file; an unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Ignoring unreadable store {}: {:#}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read store: {}", path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Store is not a JSON object of strings: {}", path.display()))?;
        Ok(entries)
    }

    /// Write to a sibling temp file, then rename over the store
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Light or dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Read the document; absent, corrupt or unreadable data yields the seed
pub fn load_document<S: KeyValueStore + ?Sized>(store: &S) -> Document {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Document::seed(),
        Err(e) => {
            tracing::warn!("Failed to read stored document: {:#}", e);
            return Document::seed();
        }
    };
    Document::from_json(&raw).unwrap_or_else(|| {
        tracing::warn!("Stored document is unusable, starting from defaults");
        Document::seed()
    })
}

pub fn save_document<S: KeyValueStore + ?Sized>(store: &mut S, document: &Document) -> Result<()> {
    let json = document.to_json().context("Failed to serialize document")?;
    store.set(STORAGE_KEY, &json)
}

pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(name)) => Theme::from_name(&name).unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!("Failed to read theme: {:#}", e);
            Theme::default()
        }
    }
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetKind;

    #[test]
    fn test_empty_store_yields_seed() {
        let store = MemoryStore::default();
        assert_eq!(load_document(&store), Document::seed());
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_corrupt_document_yields_seed() {
        let mut store = MemoryStore::default();
        store.set(STORAGE_KEY, "{\"pages\": [").unwrap();
        assert_eq!(load_document(&store), Document::seed());
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_document_round_trip() {
        let mut doc = Document::seed();
        let todo = doc.add_widget(1, WidgetKind::Todo).unwrap();
        doc.todo_list_mut(&todo).add("ship it").unwrap();
        doc.current_page_mut().add_bookmark("https://docs.rs", "Docs").unwrap();
        doc.current_page_mut().set_notes("line one\nline two");
        doc.add_page();
        doc.add_widget(2, WidgetKind::Clock).unwrap();

        let mut store = MemoryStore::default();
        save_document(&mut store, &doc).unwrap();
        assert_eq!(load_document(&store), doc);
    }

    #[test]
    fn test_stale_widget_pruned_on_load() {
        let mut store = MemoryStore::default();
        store
            .set(
                STORAGE_KEY,
                r#"{"pages":[{"id":1,"name":"Main","bookmarks":[],"notes":[],
                    "zoneWidgets":[[{"id":"w1","type":"clock"},{"id":"w2"}],[],[]]}],"current":1}"#,
            )
            .unwrap();
        let doc = load_document(&store);
        assert_eq!(doc.current_page().zone_widgets[0].len(), 1);
    }

    #[test]
    fn test_file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        save_theme(&mut store, Theme::Dark).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(load_theme(&reopened), Theme::Dark);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut store = FileStore::open(&path);
        store.set("a", "1").unwrap();
        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(FileStore::open(&path).get("a").unwrap(), None);
    }

    #[test]
    fn test_garbage_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json at all").unwrap();
        let store = FileStore::open(&path);
        assert_eq!(load_document(&store), Document::seed());
    }
}
