//! UI components for Startdeck

pub mod bookmarks;
pub mod calculator;
pub mod calendar;
pub mod clock;
pub mod dialogs;
pub mod inline_edit;
pub mod notes;
pub mod tabs_bar;
pub mod todo;
pub mod widget_card;
pub mod zone;
