//! The persisted document: pages, layout zones, widget refs and side tables

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::widgets::bookmarks::Bookmark;
use crate::widgets::calendar::EventBook;
use crate::widgets::todo::TodoItem;
use crate::widgets::WidgetKind;

/// Number of layout columns on every page
pub const ZONE_COUNT: usize = 3;

/// Name of the page created on first launch
pub const DEFAULT_PAGE_NAME: &str = "Main";

pub type PageId = u64;

/// One past the largest id in use, or the lowest free id once that would overflow
pub(crate) fn next_page_id(used: &HashSet<PageId>) -> PageId {
    used.iter()
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
        .or_else(|| (1..=PageId::MAX).find(|id| !used.contains(id)))
        .unwrap_or_default()
}

/// Stable identity of a widget instance, assigned once at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("w{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Counter value this id was allocated from, if it is one of ours
    fn seq(&self) -> Option<u64> {
        self.0.strip_prefix('w')?.parse().ok()
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A widget placed in a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRef {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Custom title; `None` shows the kind's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WidgetRef {
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self {
            id,
            kind,
            title: None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .unwrap_or_else(|| self.kind.default_title())
    }
}

/// A named workspace with its own bookmarks, notes and zones
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub bookmarks: Vec<Bookmark>,
    /// Notes blob, one entry per line
    pub notes: Vec<String>,
    pub zone_widgets: [Vec<WidgetRef>; ZONE_COUNT],
}

impl Page {
    pub fn new(id: PageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bookmarks: Vec::new(),
            notes: Vec::new(),
            zone_widgets: Default::default(),
        }
    }

    /// Locate a widget as `(zone, index)`
    pub fn find_widget(&self, id: &WidgetId) -> Option<(usize, usize)> {
        self.zone_widgets.iter().enumerate().find_map(|(zone, widgets)| {
            widgets
                .iter()
                .position(|w| &w.id == id)
                .map(|index| (zone, index))
        })
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&WidgetRef> {
        self.find_widget(id)
            .map(|(zone, index)| &self.zone_widgets[zone][index])
    }

    pub fn widgets(&self) -> impl Iterator<Item = &WidgetRef> {
        self.zone_widgets.iter().flatten()
    }
}

/// The whole persisted state
///
/// Invariants: `pages` is never empty and `current` names one of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub(crate) pages: Vec<Page>,
    pub(crate) current: PageId,
    pub(crate) calendar_events: BTreeMap<WidgetId, EventBook>,
    pub(crate) todo_lists: BTreeMap<WidgetId, Vec<TodoItem>>,
    pub(crate) next_widget: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::seed()
    }
}

impl Document {
    /// Document used on first launch and whenever storage is unusable
    pub fn seed() -> Self {
        Self {
            pages: vec![Page::new(1, DEFAULT_PAGE_NAME)],
            current: 1,
            calendar_events: BTreeMap::new(),
            todo_lists: BTreeMap::new(),
            next_widget: 1,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current(&self) -> PageId {
        self.current
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub(crate) fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn current_index(&self) -> usize {
        self.pages
            .iter()
            .position(|p| p.id == self.current)
            .unwrap_or(0)
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_index()]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        let index = self.current_index();
        &mut self.pages[index]
    }

    pub(crate) fn allocate_widget_id(&mut self) -> WidgetId {
        let id = WidgetId::from_seq(self.next_widget);
        self.next_widget += 1;
        id
    }

    /// Forget everything stored for a widget that no longer exists
    pub(crate) fn drop_side_tables(&mut self, id: &WidgetId) {
        self.calendar_events.remove(id);
        self.todo_lists.remove(id);
    }

    /// Parse a stored document, repairing what can be repaired
    ///
    /// Returns `None` when the JSON is not an object with at least one page.
    pub fn from_json(json: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(json).ok()?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        let raw: RawDocument = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Stored document has an unexpected shape: {}", e);
                return None;
            }
        };
        raw.normalize()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Lenient on-disk shape, accepted from older builds and backups
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    pages: Option<Vec<RawPage>>,
    #[serde(default)]
    current: Option<PageId>,
    #[serde(default)]
    calendar_events: Option<BTreeMap<WidgetId, EventBook>>,
    #[serde(default)]
    todo_lists: Option<BTreeMap<WidgetId, Vec<TodoItem>>>,
    #[serde(default)]
    next_widget: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    #[serde(default)]
    id: Option<PageId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bookmarks: Option<Vec<Bookmark>>,
    #[serde(default)]
    notes: Option<Vec<String>>,
    #[serde(default)]
    zone_widgets: Option<Vec<Option<Vec<Value>>>>,
}

/// A widget ref as found on disk: a bare tag or `{ id?, type, title? }`
struct LooseRef {
    id: Option<WidgetId>,
    kind: WidgetKind,
    title: Option<String>,
}

impl LooseRef {
    fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(tag) => WidgetKind::from_tag(tag).map(|kind| Self {
                id: None,
                kind,
                title: None,
            }),
            Value::Object(map) => {
                let kind = map
                    .get("type")
                    .and_then(Value::as_str)
                    .and_then(WidgetKind::from_tag)?;
                let id = map
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| WidgetId(s.to_string()));
                let title = map
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from);
                Some(Self { id, kind, title })
            }
            _ => None,
        }
    }
}

impl RawDocument {
    fn normalize(self) -> Option<Document> {
        let raw_pages = self.pages.filter(|pages| !pages.is_empty())?;

        // First pass: resolve refs so the id counter can clear every id in use.
        let mut pages: Vec<(RawPageHeader, [Vec<LooseRef>; ZONE_COUNT])> = Vec::new();
        let mut pruned = 0usize;
        for raw in raw_pages {
            let mut zones: [Vec<LooseRef>; ZONE_COUNT] = Default::default();
            let raw_zones = raw.zone_widgets.unwrap_or_default();
            for (zone, entries) in raw_zones.into_iter().take(ZONE_COUNT).enumerate() {
                for value in entries.unwrap_or_default() {
                    match LooseRef::parse(&value) {
                        Some(loose) => zones[zone].push(loose),
                        None => pruned += 1,
                    }
                }
            }
            pages.push((
                RawPageHeader {
                    id: raw.id,
                    name: raw.name.unwrap_or_default(),
                    bookmarks: raw.bookmarks.unwrap_or_default(),
                    notes: raw.notes.unwrap_or_default(),
                },
                zones,
            ));
        }
        if pruned > 0 {
            tracing::info!("Pruned {} widget refs without a valid type", pruned);
        }

        let max_seq = pages
            .iter()
            .flat_map(|(_, zones)| zones.iter().flatten())
            .filter_map(|loose| loose.id.as_ref().and_then(WidgetId::seq))
            .max();
        let mut next_widget = self
            .next_widget
            .unwrap_or(1)
            .max(max_seq.map_or(1, |seq| seq + 1));

        let mut reserved_pages: HashSet<PageId> = pages.iter().filter_map(|(h, _)| h.id).collect();
        let mut seen_pages = HashSet::new();
        let mut seen_widgets = HashSet::new();
        let mut calendar_ids = HashSet::new();
        let mut todo_ids = HashSet::new();
        let mut out_pages = Vec::with_capacity(pages.len());

        for (position, (header, zones)) in pages.into_iter().enumerate() {
            let id = match header.id {
                Some(id) if seen_pages.insert(id) => id,
                _ => {
                    let id = next_page_id(&reserved_pages);
                    reserved_pages.insert(id);
                    seen_pages.insert(id);
                    id
                }
            };
            let name = match header.name.trim() {
                "" => (position + 1).to_string(),
                name => name.to_string(),
            };

            let mut page = Page {
                id,
                name,
                bookmarks: header.bookmarks,
                notes: header.notes,
                zone_widgets: Default::default(),
            };
            for (zone, refs) in zones.into_iter().enumerate() {
                for loose in refs {
                    let id = match loose.id {
                        Some(id) if seen_widgets.insert(id.clone()) => id,
                        _ => {
                            let id = WidgetId::from_seq(next_widget);
                            next_widget += 1;
                            seen_widgets.insert(id.clone());
                            id
                        }
                    };
                    match loose.kind {
                        WidgetKind::Calendar => {
                            calendar_ids.insert(id.clone());
                        }
                        WidgetKind::Todo => {
                            todo_ids.insert(id.clone());
                        }
                        _ => {}
                    }
                    page.zone_widgets[zone].push(WidgetRef {
                        id,
                        kind: loose.kind,
                        title: loose.title,
                    });
                }
            }
            out_pages.push(page);
        }

        let current = match self.current {
            Some(id) if out_pages.iter().any(|p| p.id == id) => id,
            _ => out_pages[0].id,
        };

        let mut calendar_events = self.calendar_events.unwrap_or_default();
        calendar_events.retain(|id, _| calendar_ids.contains(id));
        let mut todo_lists = self.todo_lists.unwrap_or_default();
        todo_lists.retain(|id, _| todo_ids.contains(id));

        Some(Document {
            pages: out_pages,
            current,
            calendar_events,
            todo_lists,
            next_widget,
        })
    }
}

struct RawPageHeader {
    id: Option<PageId>,
    name: String,
    bookmarks: Vec<Bookmark>,
    notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_document() {
        let doc = Document::seed();
        assert_eq!(doc.pages().len(), 1);
        let page = doc.current_page();
        assert_eq!(page.name, DEFAULT_PAGE_NAME);
        assert!(page.bookmarks.is_empty());
        assert!(page.notes.is_empty());
        assert!(page.zone_widgets.iter().all(Vec::is_empty));
        assert_eq!(doc.current(), page.id);
    }

    #[test]
    fn test_rejects_unusable_json() {
        assert!(Document::from_json("").is_none());
        assert!(Document::from_json("{not json").is_none());
        assert!(Document::from_json("[]").is_none());
        assert!(Document::from_json(r#"{"pages": []}"#).is_none());
        assert!(Document::from_json(r#"{"current": 1}"#).is_none());
    }

    #[test]
    fn test_reads_legacy_layout() {
        let json = r#"{
            "pages": [
                {"id": 1, "name": "Main", "bookmarks": [{"title": "", "url": "https://a.dev"}], "notes": ["x"],
                 "zoneWidgets": [["notes", {"type": "todo", "title": "Chores"}], [], ["clock"]]},
                {"id": 7, "name": "Work", "bookmarks": [], "notes": []}
            ],
            "current": 7
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.current(), 7);

        let main = doc.page(1).unwrap();
        assert_eq!(main.zone_widgets[0].len(), 2);
        assert_eq!(main.zone_widgets[0][0].kind, WidgetKind::Notes);
        assert_eq!(main.zone_widgets[0][1].display_title(), "Chores");
        assert_eq!(main.zone_widgets[2][0].kind, WidgetKind::Clock);

        // Pages saved before zones existed get three empty zones
        let work = doc.page(7).unwrap();
        assert!(work.zone_widgets.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_prunes_refs_without_type() {
        let json = r#"{
            "pages": [{"id": 1, "name": "Main", "zoneWidgets": [
                ["notes", {"title": "orphan"}, {"type": "weather"}, 42, null, ""],
                [{"type": "calendar"}]
            ]}],
            "current": 1
        }"#;
        let doc = Document::from_json(json).unwrap();
        let page = doc.current_page();
        assert_eq!(page.zone_widgets[0].len(), 1);
        assert_eq!(page.zone_widgets[0][0].kind, WidgetKind::Notes);
        assert_eq!(page.zone_widgets[1].len(), 1);
        assert!(page.zone_widgets[2].is_empty());
    }

    #[test]
    fn test_assigns_unique_widget_ids() {
        let json = r#"{
            "pages": [{"id": 1, "name": "Main", "zoneWidgets": [
                [{"id": "w4", "type": "notes"}, {"id": "w4", "type": "todo"}, "clock"]
            ]}],
            "current": 1
        }"#;
        let mut doc = Document::from_json(json).unwrap();
        let ids: Vec<_> = doc.current_page().widgets().map(|w| w.id.clone()).collect();
        assert_eq!(ids[0], WidgetId::from_seq(4));
        assert_ne!(ids[1], ids[0]);
        assert_ne!(ids[2], ids[1]);
        // The next allocation clears every id already present
        let fresh = doc.allocate_widget_id();
        assert!(!ids.contains(&fresh));
    }

    #[test]
    fn test_current_falls_back_to_first_page() {
        let json = r#"{"pages": [{"id": 3, "name": "A"}, {"id": 4, "name": "B"}], "current": 99}"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.current(), 3);
    }

    #[test]
    fn test_duplicate_page_ids_rekeyed() {
        let json = r#"{"pages": [{"id": 2, "name": "A"}, {"id": 2, "name": "B"}, {"name": ""}], "current": 2}"#;
        let doc = Document::from_json(json).unwrap();
        let ids: Vec<_> = doc.pages().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(doc.pages()[2].name, "3");
    }

    #[test]
    fn test_page_id_at_u64_max_does_not_overflow() {
        let json = r#"{"pages": [
            {"id": 18446744073709551615, "name": "A"},
            {"id": 18446744073709551615, "name": "B"},
            {"id": 1, "name": "C"},
            {"name": "D"}
        ], "current": 18446744073709551615}"#;
        let doc = Document::from_json(json).unwrap();
        let ids: Vec<_> = doc.pages().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![u64::MAX, 2, 1, 3]);
        assert_eq!(doc.current(), u64::MAX);
    }

    #[test]
    fn test_next_page_id() {
        assert_eq!(next_page_id(&HashSet::new()), 1);
        assert_eq!(next_page_id(&HashSet::from([1, 5])), 6);
        assert_eq!(next_page_id(&HashSet::from([2, u64::MAX])), 1);
        assert_eq!(next_page_id(&HashSet::from([1, 2, u64::MAX])), 3);
    }

    #[test]
    fn test_orphan_side_tables_dropped() {
        let json = r#"{
            "pages": [{"id": 1, "name": "Main", "zoneWidgets": [[{"id": "w1", "type": "todo"}]]}],
            "current": 1,
            "todoLists": {"w1": [{"text": "keep", "done": false}], "w9": [{"text": "gone", "done": true}]},
            "calendarEvents": {"w1": {"2024-01-01": [{"text": "wrong kind"}]}}
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.todo_lists.len(), 1);
        assert!(doc.todo_lists.contains_key(&WidgetId::from_seq(1)));
        assert!(doc.calendar_events.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{
            "pages": [{"id": 1, "name": "Main", "bookmarks": [{"title": "Docs", "url": "https://docs.rs"}],
                       "notes": ["a", "b"], "zoneWidgets": [["calendar"], ["todo", "notes"], ["clock"]]}],
            "current": 1
        }"#;
        let doc = Document::from_json(json).unwrap();
        let again = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(doc, again);
    }
}
