//! Widget registry and the per-type controllers

pub mod bookmarks;
pub mod calculator;
pub mod calendar;
pub mod clock;
pub mod notes;
pub mod todo;

use serde::{Deserialize, Serialize};

/// Every widget type a zone can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Bookmarks,
    Notes,
    Calendar,
    Todo,
    Clock,
    Calculator,
}

impl WidgetKind {
    /// All kinds, in the order the "add widget" menu lists them
    pub const ALL: [WidgetKind; 6] = [
        WidgetKind::Bookmarks,
        WidgetKind::Notes,
        WidgetKind::Calendar,
        WidgetKind::Todo,
        WidgetKind::Clock,
        WidgetKind::Calculator,
    ];

    /// Stored type tag
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Notes => "notes",
            Self::Calendar => "calendar",
            Self::Todo => "todo",
            Self::Clock => "clock",
            Self::Calculator => "calculator",
        }
    }

    /// Resolve a stored type tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag.trim())
    }

    /// Title shown when the user has not renamed the widget
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Bookmarks => "Bookmarks",
            Self::Notes => "Notes",
            Self::Calendar => "Calendar",
            Self::Todo => "Todo List",
            Self::Clock => "Clock",
            Self::Calculator => "Calculator",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Bookmarks => "\u{1F516}",
            Self::Notes => "\u{1F4DD}",
            Self::Calendar => "\u{1F4C5}",
            Self::Todo => "\u{2611}",
            Self::Clock => "\u{1F552}",
            Self::Calculator => "\u{1F5A9}",
        }
    }

    /// Whether the widget keeps a side table keyed by its instance id
    pub fn has_side_table(self) -> bool {
        matches!(self, Self::Calendar | Self::Todo)
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
