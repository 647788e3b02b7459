use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{DefaultTerminal, Frame};
use std::ffi::OsString;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::clipboard::ClipboardBackend;
use crate::logging::FlashMessage;
use crate::models::{ClipboardHistory, KindFilter, SearchIndex};
use crate::storage::{Config, ConfigStorage, HistoryStorage};
use crate::ui::{self, PrefField, Theme, ToolAction, Toolbar};

/// How long the event loop waits for input before doing housekeeping
const TICK: Duration = Duration::from_millis(150);

/// Application mode determines which keybindings are active
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the history list
    #[default]
    Normal,
    /// Typing a fuzzy search query (activated with '/')
    Search,
    /// Keyboard focus on the toolbar buttons (activated with Tab)
    Toolbar,
    Help,
    About,
    Preferences,
    /// Confirmation dialog for clearing history
    Confirm,
}

/// Persistence handles the app writes through
pub struct Storage {
    pub history: Box<dyn HistoryStorage>,
    pub config: Box<dyn ConfigStorage>,
}

/// Main application state
pub struct App {
    pub mode: AppMode,

    /// Clipboard history (loaded from storage)
    pub history: ClipboardHistory,

    pub config: Config,

    theme: Theme,

    pub search_index: SearchIndex,

    storage: Storage,

    /// Clipboard backend for copying selected entries
    clipboard_backend: Box<dyn ClipboardBackend>,

    pub toolbar: Toolbar,

    /// Currently selected index in the visible list
    pub selected_index: usize,

    pub search_input: Input,

    /// Clip IDs matching the search query, best first
    pub search_results: Vec<u64>,

    pub kind_filter: KindFilter,

    /// Highlighted row in the preferences overlay
    pub prefs_selected: usize,

    help_scroll: usize,

    /// Error shown in a modal, dismissed by any key
    pub startup_error: Option<String>,

    /// List area height in terminal rows (updated each frame)
    list_height: u16,

    /// Top visible row of the clip list
    list_scroll_offset: usize,

    pub should_quit: bool,

    pub flash_messages: Vec<FlashMessage>,
    flash_rx: Option<Receiver<FlashMessage>>,

    /// Kept alive to maintain the watch on the history file
    _history_watcher: Option<RecommendedWatcher>,
    history_watch_rx: Option<Receiver<notify::Result<notify::Event>>>,
}

impl App {
    pub fn new(
        history: ClipboardHistory,
        config: Config,
        storage: Storage,
        clipboard_backend: Box<dyn ClipboardBackend>,
        flash_rx: Option<Receiver<FlashMessage>>,
    ) -> Self {
        let (theme, startup_error) = match Theme::load(&config.general.theme) {
            Ok(t) => (t, None),
            Err(e) => {
                log::error!("Failed to load theme '{}': {}", config.general.theme, e);
                (Theme::default(), Some(e.to_string()))
            }
        };

        let toolbar = Toolbar::new(config.general.track_changes);

        App {
            mode: AppMode::default(),
            history,
            config,
            theme,
            search_index: SearchIndex::new(),
            storage,
            clipboard_backend,
            toolbar,
            selected_index: 0,
            search_input: Input::default(),
            search_results: Vec::new(),
            kind_filter: KindFilter::All,
            prefs_selected: 0,
            help_scroll: 0,
            startup_error,
            list_height: 20, // Updated each frame
            list_scroll_offset: 0,
            should_quit: false,
            flash_messages: Vec::new(),
            flash_rx,
            _history_watcher: None,
            history_watch_rx: None,
        }
    }

    /// Reload history whenever a store process rewrites the history file
    pub fn watch_history(&mut self) -> Result<()> {
        let history_path = self.storage.history.path().clone();
        let dir = history_path
            .parent()
            .context("History file has no parent directory")?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        })
        .context("Failed to create history file watcher")?;

        // Watch the directory: saves replace the file via rename
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {:?}", dir))?;
        log::info!("Watching {:?} for history changes", dir);

        self._history_watcher = Some(watcher);
        self.history_watch_rx = Some(rx);
        Ok(())
    }

    /// Drain watcher events and reload if the history file changed
    pub fn check_history_reload(&mut self) {
        let Some(rx) = &self.history_watch_rx else {
            return;
        };
        let file_name: Option<OsString> = self
            .storage
            .history
            .path()
            .file_name()
            .map(|n| n.to_owned());

        let mut changed = false;
        while let Ok(res) = rx.try_recv() {
            match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Access(_)) {
                        continue;
                    }
                    if event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_owned()) == file_name)
                    {
                        changed = true;
                    }
                }
                Err(e) => log::warn!("History watch error: {}", e),
            }
        }

        if changed && let Err(e) = self.reload_history() {
            log::error!("Failed to reload history: {:#}", e);
        }
    }

    /// Replace in-memory history with what is on disk, keeping the selection
    pub fn reload_history(&mut self) -> Result<()> {
        let selected = self.selected_clip_id();
        self.history = self.storage.history.load()?;
        self.refresh_search();

        let visible = self.visible_clips();
        self.selected_index = selected
            .and_then(|id| visible.iter().position(|&v| v == id))
            .unwrap_or(0);
        log::debug!("Reloaded history, {} entries", self.history.len());
        Ok(())
    }

    fn save_history(&self) -> Result<()> {
        let _lock = self.storage.history.lock()?;
        self.storage.history.save(&self.history)
    }

    fn save_config(&self) -> Result<()> {
        self.storage.config.save(&self.config)
    }

    /// Poll flash message receiver and add to queue
    pub fn poll_flash_messages(&mut self) {
        if let Some(rx) = &self.flash_rx {
            while let Ok(msg) = rx.try_recv() {
                self.flash_messages.push(msg);
            }
        }
    }

    /// Remove expired flash messages (based on config duration)
    pub fn prune_flash_messages(&mut self) {
        let now = Instant::now();
        let duration = Duration::from_millis(self.config.general.flash_message_duration_ms);
        self.flash_messages
            .retain(|msg| now.duration_since(msg.timestamp) < duration);
    }

    /// Currently visible clip IDs: search results (or all history), then kind filter
    pub fn visible_clips(&self) -> Vec<u64> {
        let base: Vec<u64> = if self.search_input.value().is_empty() {
            self.history.entries().iter().map(|e| e.id).collect()
        } else {
            self.search_results.clone()
        };

        match self.kind_filter {
            KindFilter::All => base,
            filter => base
                .into_iter()
                .filter(|&id| {
                    self.history
                        .get_entry(id)
                        .is_some_and(|entry| filter.matches(entry))
                })
                .collect(),
        }
    }

    pub fn selected_clip_id(&self) -> Option<u64> {
        self.visible_clips().get(self.selected_index).copied()
    }

    fn half_page_size(&self) -> usize {
        (self.list_height as usize / 2).max(1)
    }

    fn full_page_size(&self) -> usize {
        (self.list_height as usize).max(1)
    }

    /// Re-run the search for the current query without moving the selection
    fn refresh_search(&mut self) {
        let query = self.search_input.value();
        if query.is_empty() {
            self.search_results.clear();
        } else {
            self.search_results = self
                .search_index
                .search(self.history.entries(), query)
                .into_iter()
                .map(|(id, _score)| id)
                .collect();
        }
    }

    /// Update search results after the query changed
    pub fn update_search_results(&mut self) {
        self.refresh_search();
        self.selected_index = 0;
    }

    fn clamp_selection(&mut self) {
        let visible_count = self.visible_clips().len();
        if self.selected_index >= visible_count {
            self.selected_index = visible_count.saturating_sub(1);
        }
    }

    /// Copy the highlighted entry back to the clipboard
    pub fn select_entry(&mut self) -> Result<()> {
        let Some(clip_id) = self.selected_clip_id() else {
            return Ok(());
        };
        let entry = self
            .history
            .get_entry(clip_id)
            .context("Clip not found in history")?;

        self.clipboard_backend.write_content(&entry.content)?;
        log::info!(
            "Copied clip {} to clipboard via {}",
            clip_id,
            self.clipboard_backend.name()
        );

        if self.config.general.exit_on_select {
            self.should_quit = true;
        }

        Ok(())
    }

    pub fn toggle_pin(&mut self) -> Result<()> {
        let Some(clip_id) = self.selected_clip_id() else {
            return Ok(());
        };
        self.history
            .toggle_pin(clip_id)
            .context("Clip not found in history")?;
        self.save_history()
    }

    pub fn delete_entry(&mut self) -> Result<()> {
        let Some(clip_id) = self.selected_clip_id() else {
            return Ok(());
        };
        self.history.remove_entry(clip_id);
        self.search_results.retain(|&id| id != clip_id);
        self.clamp_selection();
        self.save_history()
    }

    pub fn clear_all_unpinned(&mut self) -> Result<()> {
        let removed = self.history.clear_unpinned();
        log::info!("Cleared {} unpinned clips", removed);
        self.refresh_search();
        self.selected_index = 0;
        self.mode = AppMode::Normal;
        self.save_history()
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let visible_count = self.visible_clips().len();
        if visible_count > 0 {
            self.selected_index = (self.selected_index + n).min(visible_count - 1);
        }
    }

    pub fn jump_to_top(&mut self) {
        self.selected_index = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.selected_index = self.visible_clips().len().saturating_sub(1);
    }

    pub fn cycle_kind_filter(&mut self) {
        self.kind_filter = self.kind_filter.next();
        self.selected_index = 0;
    }

    pub fn clear_search(&mut self) {
        self.search_input.reset();
        self.search_results.clear();
        self.selected_index = 0;
    }

    /// Flip clipboard tracking and persist it for the store processes
    pub fn toggle_tracking(&mut self) -> Result<()> {
        let active = self.toolbar.toggle_track();
        self.config.general.track_changes = active;
        log::info!(
            "Clipboard tracking {}",
            if active { "enabled" } else { "disabled" }
        );
        self.save_config()
    }

    /// Run the action behind a toolbar button
    pub fn activate_tool(&mut self, action: ToolAction) -> Result<()> {
        match action {
            ToolAction::Quit => self.should_quit = true,
            ToolAction::About => self.mode = AppMode::About,
            ToolAction::Preferences => {
                self.prefs_selected = 0;
                self.mode = AppMode::Preferences;
            }
            ToolAction::Track => {
                if self.mode == AppMode::Toolbar {
                    self.mode = AppMode::Normal;
                }
                self.toggle_tracking()?;
            }
        }
        Ok(())
    }

    /// Change the highlighted preference by `delta` steps
    pub fn adjust_preference(&mut self, delta: i32) {
        if let Some(field) = PrefField::ALL.get(self.prefs_selected) {
            field.adjust(&mut self.config.general, delta);
        }
    }

    /// Apply edited preferences to the running app and persist them
    pub fn close_preferences(&mut self) -> Result<()> {
        self.mode = AppMode::Normal;
        let general = &self.config.general;

        self.toolbar.set_track_active(general.track_changes);

        match Theme::load(&general.theme) {
            Ok(theme) => self.theme = theme,
            Err(e) => self.startup_error = Some(e.to_string()),
        }

        if self.history.max_entries() != general.max_history {
            self.history.set_max_entries(general.max_history);
            self.refresh_search();
            self.clamp_selection();
            self.save_history()?;
        }

        self.save_config()
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // Any key dismisses the error modal
        if self.startup_error.is_some() {
            self.startup_error = None;
            return Ok(());
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key),
            AppMode::Toolbar => self.handle_toolbar_key(key),
            AppMode::Help => {
                self.handle_help_key(key);
                Ok(())
            }
            AppMode::About => {
                self.mode = AppMode::Normal;
                Ok(())
            }
            AppMode::Preferences => self.handle_preferences_key(key),
            AppMode::Confirm => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_down(self.half_page_size());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_up(self.half_page_size());
            }
            KeyCode::Home | KeyCode::Char('g') => self.jump_to_top(),
            KeyCode::End | KeyCode::Char('G') => self.jump_to_bottom(),
            KeyCode::PageUp => self.move_up(self.full_page_size()),
            KeyCode::PageDown => self.move_down(self.full_page_size()),

            KeyCode::Enter => self.select_entry()?,
            KeyCode::Char('p') => self.toggle_pin()?,
            KeyCode::Char('d') => self.delete_entry()?,
            KeyCode::Char('D') => self.mode = AppMode::Confirm,
            KeyCode::Char('/') => self.mode = AppMode::Search,
            KeyCode::Char('f') => self.cycle_kind_filter(),
            KeyCode::Char('c') => self.flash_messages.clear(),
            KeyCode::Char('?') => {
                self.help_scroll = 0;
                self.mode = AppMode::Help;
            }
            KeyCode::Tab => self.mode = AppMode::Toolbar,
            KeyCode::Esc => {
                // Esc clears search, then the kind filter, then quits
                if !self.search_input.value().is_empty() {
                    self.clear_search();
                } else if self.kind_filter != KindFilter::All {
                    self.kind_filter = KindFilter::All;
                    self.selected_index = 0;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char(c) => {
                if let Some(action) = self.toolbar.button_for_key(c).map(|b| b.action) {
                    self.activate_tool(action)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::Esc => {
                // Keep the query so the filtered list can be browsed
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => {
                self.mode = AppMode::Normal;
                self.select_entry()?;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_index.toggle_mode();
                self.update_search_results();
            }
            _ => {
                // tui-input handles characters, backspace, cursor movement, Ctrl-W etc.
                if self.search_input.handle_event(&Event::Key(key)).is_some() {
                    self.update_search_results();
                }
            }
        }
        Ok(())
    }

    fn handle_toolbar_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.toolbar.focus_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.toolbar.focus_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let action = self.toolbar.focused().action;
                self.activate_tool(action)?;
            }
            KeyCode::Esc | KeyCode::Tab => self.mode = AppMode::Normal,
            _ => {}
        }
        Ok(())
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.help_scroll += 1,
            KeyCode::Char('k') | KeyCode::Up => {
                self.help_scroll = self.help_scroll.saturating_sub(1);
            }
            _ => self.mode = AppMode::Normal,
        }
    }

    fn handle_preferences_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.prefs_selected + 1 < PrefField::ALL.len() {
                    self.prefs_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.prefs_selected = self.prefs_selected.saturating_sub(1);
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => self.adjust_preference(-1),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => self.adjust_preference(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.adjust_preference(1),
            KeyCode::Esc | KeyCode::Char('q') => self.close_preferences()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.clear_all_unpinned()?,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = AppMode::Normal,
            _ => {}
        }
        Ok(())
    }

    /// Main loop: draw, wait for input, apply background updates
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            self.poll_flash_messages();
            self.prune_flash_messages();
            self.check_history_reload();

            terminal
                .draw(|frame| self.draw(frame))
                .context("Failed to draw frame")?;

            if event::poll(TICK).context("Failed to poll terminal events")?
                && let Event::Key(key) = event::read().context("Failed to read terminal event")?
                && key.kind == KeyEventKind::Press
                && let Err(e) = self.handle_key(key)
            {
                // Surfaces as a flash message instead of tearing down the UI
                log::error!("{:#}", e);
            }
        }
        Ok(())
    }

    /// Render the TUI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        frame.render_widget(
            ratatui::widgets::Block::default().style(
                ratatui::style::Style::default()
                    .fg(self.theme.default_fg)
                    .bg(self.theme.default_bg),
            ),
            size,
        );

        let layout = ui::create_main_layout(size);

        ui::render_toolbar(
            frame,
            layout.toolbar,
            &self.toolbar,
            self.mode == AppMode::Toolbar,
            &self.theme,
        );

        // Header row, plus the search row when a query is shown
        let search_visible = self.mode == AppMode::Search || !self.search_input.value().is_empty();
        let chrome_rows = if search_visible { 2 } else { 1 };
        self.list_height = layout.clip_list.height.saturating_sub(chrome_rows);

        let visible_ids = self.visible_clips();
        self.list_scroll_offset = ui::clip_list::scroll_offset_for(
            self.selected_index,
            self.list_scroll_offset,
            self.list_height as usize,
            visible_ids.len(),
        );

        let visible_entries: Vec<&crate::models::ClipEntry> = visible_ids
            .iter()
            .filter_map(|&id| self.history.get_entry(id))
            .collect();

        ui::render_clip_list(
            frame,
            layout.clip_list,
            &visible_entries,
            ui::clip_list::ClipListRenderContext {
                selected: self.selected_index,
                scroll_offset: self.list_scroll_offset,
                total: self.history.len(),
                kind_filter: self.kind_filter,
                search_input: search_visible.then_some(&self.search_input),
                search_focused: self.mode == AppMode::Search,
                search_mode: self.search_index.mode(),
                theme: &self.theme,
            },
        );

        ui::render_divider(frame, layout.divider, &self.theme);

        let selected_entry = visible_entries.get(self.selected_index).copied();
        ui::render_preview(
            frame,
            layout.preview,
            selected_entry,
            self.config.general.show_preview_metadata,
            &self.theme,
        );

        ui::render_status_bar(
            frame,
            layout.status,
            ui::status::StatusContext {
                mode: self.mode,
                toolbar: &self.toolbar,
                flash: self.flash_messages.last(),
                search_mode: self.search_index.mode(),
            },
            &self.theme,
        );

        match self.mode {
            AppMode::Help => {
                self.help_scroll =
                    ui::render_help_overlay(frame, size, &self.theme, self.help_scroll);
            }
            AppMode::About => ui::render_about_overlay(frame, size, &self.theme),
            AppMode::Preferences => ui::render_preferences_overlay(
                frame,
                size,
                &self.config.general,
                self.prefs_selected,
                &self.theme,
            ),
            AppMode::Confirm => ui::render_confirm_overlay(frame, size, &self.theme),
            _ => {}
        }

        if let Some(ref error_msg) = self.startup_error {
            ui::render_error_modal(frame, size, error_msg, &self.theme);
        }
    }
}

/// Start the interactive UI on the current terminal
pub fn run(mut app: App) -> Result<()> {
    if let Err(e) = app.watch_history() {
        log::warn!("History changes will not be picked up live: {:#}", e);
    }

    let mut terminal = ratatui::try_init().context("Failed to initialize terminal")?;
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClipContent, ClipKind};
    use crate::storage::{BincodeHistoryStorage, TomlConfigStorage};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingBackend {
        written: Arc<Mutex<Vec<ClipContent>>>,
    }

    impl ClipboardBackend for RecordingBackend {
        fn write_text(&self, text: &str) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push(ClipContent::Text(text.to_string()));
            Ok(())
        }

        fn write_image(&self, data: &[u8], mime_type: &str) -> Result<()> {
            self.written.lock().unwrap().push(ClipContent::Image {
                data: data.to_vec(),
                mime_type: mime_type.to_string(),
            });
            Ok(())
        }

        fn write_files(&self, uri_list: &str) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .push(ClipContent::Text(uri_list.to_string()));
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(dir: &Path, texts: &[&str]) -> (App, RecordingBackend) {
        let mut history = ClipboardHistory::new(100);
        for t in texts {
            history.add_entry(ClipContent::Text(t.to_string()));
        }
        let storage = Storage {
            history: Box::new(BincodeHistoryStorage::new(dir.join("history.bin"), 100)),
            config: Box::new(TomlConfigStorage::new(dir.join("draobpilc.toml"))),
        };
        let backend = RecordingBackend::default();
        let app = App::new(
            history,
            Config::default(),
            storage,
            Box::new(backend.clone()),
            None,
        );
        (app, backend)
    }

    fn selected_text(app: &App) -> Option<String> {
        let id = app.selected_clip_id()?;
        match &app.history.get_entry(id)?.content {
            ClipContent::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["one", "two", "three"]);

        // Newest first
        assert_eq!(selected_text(&app).as_deref(), Some("three"));
        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(selected_text(&app).as_deref(), Some("one"));
        app.handle_key(key(KeyCode::Home)).unwrap();
        app.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_enter_copies_and_quits() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, backend) = test_app(dir.path(), &["one", "two"]);

        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(
            *backend.written.lock().unwrap(),
            vec![ClipContent::Text("one".into())]
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_filters_and_esc_clears() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["apple pie", "banana", "cherry"]);

        app.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.mode, AppMode::Search);
        for c in "ban".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(app.visible_clips().len(), 1);
        assert_eq!(selected_text(&app).as_deref(), Some("banana"));

        // Esc leaves search mode but keeps the filter
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.visible_clips().len(), 1);

        // Second Esc clears it, third quits
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.visible_clips().len(), 3);
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_kind_filter() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["text"]);
        app.history
            .add_entry(ClipContent::Files(vec![PathBuf::from("/tmp/x")]));

        app.handle_key(key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.kind_filter, KindFilter::Only(ClipKind::Text));
        assert_eq!(selected_text(&app).as_deref(), Some("text"));
        assert_eq!(app.visible_clips().len(), 1);
    }

    #[test]
    fn test_pin_delete_and_clear_persist() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["keep", "drop", "newest"]);

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.history.len(), 2);
        assert_eq!(selected_text(&app).as_deref(), Some("drop"));

        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        app.handle_key(key(KeyCode::Char('p'))).unwrap();
        app.handle_key(key(KeyCode::Char('D'))).unwrap();
        assert_eq!(app.mode, AppMode::Confirm);
        app.handle_key(key(KeyCode::Char('y'))).unwrap();

        assert_eq!(app.history.len(), 1);
        let on_disk = BincodeHistoryStorage::new(dir.path().join("history.bin"), 100)
            .load()
            .unwrap();
        assert_eq!(on_disk.len(), 1);
        assert!(on_disk.entries()[0].pinned);
    }

    #[test]
    fn test_actions_on_empty_history_do_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, backend) = test_app(dir.path(), &[]);

        for code in [KeyCode::Enter, KeyCode::Char('p'), KeyCode::Char('d')] {
            app.handle_key(key(code)).unwrap();
        }
        assert!(backend.written.lock().unwrap().is_empty());
        assert!(!app.should_quit);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!dir.path().join("history.bin").exists());

        // A search with no hits leaves nothing selected either
        let (mut app, backend) = test_app(dir.path(), &["apple"]);
        app.handle_key(key(KeyCode::Char('/'))).unwrap();
        for c in "zzz".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(backend.written.lock().unwrap().is_empty());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_track_toggle_updates_toolbar_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &[]);
        assert!(app.toolbar.is_track_active());

        app.handle_key(key(KeyCode::Char('t'))).unwrap();
        assert!(!app.toolbar.is_track_active());
        assert!(!app.toolbar.track_icon_classes().has(ui::toolbar::ACTIVE_CLASS));
        assert!(!app.config.general.track_changes);

        let saved = TomlConfigStorage::new(dir.path().join("draobpilc.toml"))
            .load()
            .unwrap();
        assert!(!saved.general.track_changes);
    }

    #[test]
    fn test_toolbar_focus_activates_buttons() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["x"]);

        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.mode, AppMode::Toolbar);
        app.handle_key(key(KeyCode::Right)).unwrap();
        assert_eq!(app.toolbar.focused().tooltip, "About");
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, AppMode::About);

        // Any key closes the about overlay
        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.mode, AppMode::Normal);

        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Left)).unwrap();
        assert_eq!(app.toolbar.focused().action, ToolAction::Quit);
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_preferences_apply_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let texts: Vec<String> = (0..30).map(|i| format!("clip {}", i)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let (mut app, _) = test_app(dir.path(), &refs);
        app.config.general.max_history = 60;

        app.handle_key(key(KeyCode::Char(','))).unwrap();
        assert_eq!(app.mode, AppMode::Preferences);

        let max_row = PrefField::ALL
            .iter()
            .position(|f| *f == PrefField::MaxHistory)
            .unwrap();
        for _ in 0..max_row {
            app.handle_key(key(KeyCode::Char('j'))).unwrap();
        }
        app.handle_key(key(KeyCode::Left)).unwrap();
        assert_eq!(app.config.general.max_history, 10);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.history.len(), 10);

        let saved = TomlConfigStorage::new(dir.path().join("draobpilc.toml"))
            .load()
            .unwrap();
        assert_eq!(saved.general.max_history, 10);
    }

    #[test]
    fn test_reload_keeps_selected_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["a", "b"]);
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(selected_text(&app).as_deref(), Some("a"));

        // Another process stores a new clip
        let mut history = app.history.clone();
        history.add_entry(ClipContent::Text("c".into()));
        BincodeHistoryStorage::new(dir.path().join("history.bin"), 100)
            .save(&history)
            .unwrap();

        app.reload_history().unwrap();
        assert_eq!(app.history.len(), 3);
        assert_eq!(selected_text(&app).as_deref(), Some("a"));
    }

    #[test]
    fn test_unknown_theme_shows_error_until_key() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["x"]);
        app.config.general.theme = "neon".into();
        app.mode = AppMode::Preferences;
        app.close_preferences().unwrap();
        assert!(app.startup_error.is_some());

        app.handle_key(key(KeyCode::Char('j'))).unwrap();
        assert!(app.startup_error.is_none());
    }

    #[test]
    fn test_draw_renders_without_panicking() {
        use ratatui::{Terminal, backend::TestBackend};

        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), &["first line\nsecond", "another"]);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        for mode in [
            AppMode::Normal,
            AppMode::Search,
            AppMode::Toolbar,
            AppMode::Help,
            AppMode::About,
            AppMode::Preferences,
            AppMode::Confirm,
        ] {
            app.mode = mode;
            terminal.draw(|f| app.draw(f)).unwrap();
        }

        // Tiny terminals must not panic either
        let mut tiny = Terminal::new(TestBackend::new(10, 3)).unwrap();
        app.mode = AppMode::Normal;
        tiny.draw(|f| app.draw(f)).unwrap();
    }
}
