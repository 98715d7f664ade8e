//! Main application state and UI coordination

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::NaiveDate;
use eframe::egui;

use crate::core::backup;
use crate::core::config::AppConfig;
use crate::core::dashboard::{Dashboard, DashboardResult};
use crate::core::document::{PageId, WidgetId};
use crate::core::editing::TitleEditor;
use crate::core::store::{FileStore, KeyValueStore, MemoryStore, Theme};
use crate::ui::{dialogs::Dialogs, tabs_bar::TabsBar, zone::ZonePanel};
use crate::widgets::bookmarks::{is_fetchable, TitleFetcher};
use crate::widgets::calculator::Keypad;
use crate::widgets::calendar::MonthView;

/// Storage backing the running app
pub type Store = Box<dyn KeyValueStore>;

const TITLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Add-bookmark form of one bookmarks widget
#[derive(Debug, Default)]
pub struct BookmarkForm {
    pub open: bool,
    pub url: String,
    pub title: String,
}

/// An event open in the calendar's inline editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub date: NaiveDate,
    /// Index within the stored list for `date`
    pub index: usize,
    pub text: String,
    pub time: String,
}

/// View state of one calendar widget
#[derive(Debug)]
pub struct CalendarState {
    pub view: MonthView,
    pub selected: Option<NaiveDate>,
    pub new_text: String,
    pub new_time: String,
    pub editing: Option<EventDraft>,
    /// Last validation message from the event form
    pub error: Option<String>,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: MonthView::containing(today),
            selected: None,
            new_text: String::new(),
            new_time: String::new(),
            editing: None,
            error: None,
        }
    }
}

/// Input state of one calculator widget
#[derive(Debug, Default)]
pub struct CalculatorState {
    pub input: String,
    pub keypad: Keypad,
    pub show_keypad: bool,
}

/// Per-widget view state, keyed by widget id
#[derive(Debug, Default)]
pub struct WidgetViews {
    pub bookmark_forms: HashMap<WidgetId, BookmarkForm>,
    /// Bookmarks widgets showing rename/delete controls
    pub bookmarks_managing: HashSet<WidgetId>,
    pub calendars: HashMap<WidgetId, CalendarState>,
    pub calculators: HashMap<WidgetId, CalculatorState>,
    /// Quick-add input per todo widget
    pub todo_drafts: HashMap<WidgetId, String>,
    /// Text of the item being edited, per todo widget
    pub todo_edits: HashMap<WidgetId, String>,
}

impl WidgetViews {
    /// Keep only entries of widgets in `live`
    pub fn retain(&mut self, live: &HashSet<WidgetId>) {
        self.bookmark_forms.retain(|id, _| live.contains(id));
        self.bookmarks_managing.retain(|id| live.contains(id));
        self.calendars.retain(|id, _| live.contains(id));
        self.calculators.retain(|id, _| live.contains(id));
        self.todo_drafts.retain(|id, _| live.contains(id));
        self.todo_edits.retain(|id, _| live.contains(id));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Main application state
pub struct StartdeckApp {
    /// Document, theme and write-through storage
    pub dashboard: Dashboard<Store>,
    /// Application configuration
    pub config: AppConfig,
    /// Background bookmark title lookups
    pub titles: TitleFetcher,
    /// Lookups in flight, by the page the bookmark was added to
    pending_titles: Vec<(PageId, String)>,
    /// Tab rename
    pub tab_editor: TitleEditor<PageId>,
    /// Widget header rename
    pub widget_editor: TitleEditor<WidgetId>,
    /// Bookmark rename, by widget and index on the current page
    pub bookmark_editor: TitleEditor<(WidgetId, usize)>,
    pub views: WidgetViews,
    /// Whether the settings window is open
    pub settings_open: bool,
    /// Page awaiting delete confirmation
    pub confirm_delete: Option<PageId>,
    /// Message shown in a modal until dismissed
    pub notice: Option<String>,
    applied_theme: Option<Theme>,
}

impl StartdeckApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let dashboard = Dashboard::open(Self::open_store(&config));

        Self {
            dashboard,
            config,
            titles: TitleFetcher::new(),
            pending_titles: Vec::new(),
            tab_editor: TitleEditor::default(),
            widget_editor: TitleEditor::default(),
            bookmark_editor: TitleEditor::default(),
            views: WidgetViews::default(),
            settings_open: false,
            confirm_delete: None,
            notice: None,
            applied_theme: None,
        }
    }

    fn open_store(config: &AppConfig) -> Store {
        match config.store_path() {
            Some(path) => {
                tracing::info!("Using store at: {}", path.display());
                Box::new(FileStore::open(path))
            }
            None => {
                tracing::warn!("No data directory available; changes will not outlive this session");
                Box::new(MemoryStore::default())
            }
        }
    }

    /// Log a failed operation and hand back its value on success
    pub fn report<T>(&self, action: &str, result: DashboardResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed to {}: {}", action, e);
                None
            }
        }
    }

    /// Save a bookmark on the current page, fetching its title when none was given
    pub fn add_bookmark(&mut self, url: &str, title: &str) -> bool {
        let result = self.dashboard.add_bookmark(url, title);
        if self.report("add bookmark", result).is_none() {
            return false;
        }
        let url = url.trim();
        if title.trim().is_empty() && self.config.fetch_titles && is_fetchable(url) {
            let page = self.dashboard.document().current();
            self.pending_titles.push((page, url.to_string()));
            self.titles.request(url);
        }
        true
    }

    fn poll_titles(&mut self, ctx: &egui::Context) {
        for fetch in self.titles.poll() {
            let Some(pos) = self.pending_titles.iter().position(|(_, url)| url == &fetch.url) else {
                continue;
            };
            let (page, url) = self.pending_titles.remove(pos);
            if !fetch.found {
                tracing::debug!("No title for {}, keeping the URL", url);
            }
            self.dashboard.fill_bookmark_title(page, &url, &fetch.title);
        }
        if !self.pending_titles.is_empty() {
            ctx.request_repaint_after(TITLE_POLL_INTERVAL);
        }
    }

    /// Drop view state belonging to widgets that no longer exist
    pub fn prune_widget_state(&mut self) {
        let live: HashSet<WidgetId> = self
            .dashboard
            .document()
            .pages()
            .iter()
            .flat_map(|page| page.widgets().map(|w| w.id.clone()))
            .collect();
        self.views.retain(&live);
        if self.widget_editor.target().is_some_and(|id| !live.contains(id)) {
            self.widget_editor.cancel();
        }
    }

    /// Switch pages; in-flight renames on the old page are abandoned
    pub fn activate_page(&mut self, id: PageId) {
        if id == self.dashboard.document().current() {
            return;
        }
        let result = self.dashboard.set_active(id);
        if self.report("switch page", result).is_some() {
            self.bookmark_editor.cancel();
            self.widget_editor.cancel();
        }
    }

    /// Delete a page after confirmation
    pub fn delete_page(&mut self, id: PageId) {
        match self.dashboard.delete_page(id) {
            Ok(()) => {
                self.bookmark_editor.cancel();
                self.prune_widget_state();
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Write a backup file chosen by the user
    pub fn export_backup(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(backup::DEFAULT_FILE_NAME);
        if let Some(ref dir) = self.config.last_export_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        match self.dashboard.export_to_file(&path) {
            Ok(()) => {
                self.config.remember_export(&path);
                if let Err(e) = self.config.save() {
                    tracing::warn!("Failed to save config: {:#}", e);
                }
            }
            Err(e) => {
                tracing::error!("Export failed: {:#}", e);
                self.notice = Some(format!("Export failed: {:#}", e));
            }
        }
    }

    /// Replace everything with a backup file chosen by the user
    pub fn import_backup(&mut self) {
        let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() else {
            return;
        };

        match self.dashboard.import_from_file(&path) {
            Ok(()) => {
                // Imported ids reuse w1, w2, ... for unrelated widgets
                self.tab_editor.cancel();
                self.widget_editor.cancel();
                self.bookmark_editor.cancel();
                self.views.clear();
                self.notice = Some("Settings imported successfully!".to_string());
            }
            Err(e) => {
                tracing::warn!("Rejected backup {}: {}", path.display(), e);
                self.notice = Some(format!("Invalid backup file: {}", e));
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.dashboard.toggle_theme();
        tracing::info!("Switched to {} theme", theme.name());
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let theme = self.dashboard.theme();
        if self.applied_theme == Some(theme) {
            return;
        }
        ctx.set_visuals(match theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        });
        self.applied_theme = Some(theme);
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Export...").clicked() {
                        self.export_backup();
                        ui.close();
                    }
                    if ui.button("Import...").clicked() {
                        self.import_backup();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let label = match self.dashboard.theme() {
                        Theme::Light => "Dark Theme",
                        Theme::Dark => "Light Theme",
                    };
                    if ui.button(label).clicked() {
                        self.toggle_theme();
                        ui.close();
                    }
                    if ui.button("New Page").clicked() {
                        self.dashboard.add_page();
                        ui.close();
                    }
                });

                if ui.button("Settings").clicked() {
                    self.settings_open = true;
                }
            });
        });
    }
}

impl eframe::App for StartdeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);
        self.poll_titles(ctx);

        // Handle keyboard shortcuts
        let (new_page, toggle_theme) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::T),
                i.modifiers.ctrl && i.key_pressed(egui::Key::D),
            )
        });
        if new_page {
            self.dashboard.add_page();
        }
        if toggle_theme {
            self.toggle_theme();
        }

        self.render_menu_bar(ctx);

        egui::TopBottomPanel::top("tabs_bar").show(ctx, |ui| {
            TabsBar::show(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("zones_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ZonePanel::show_all(ui, self);
                });
        });

        Dialogs::show(ctx, self);
    }
}
