use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::config::{Config, ConfigStore, FileConfigStore, FocusPreset};
use crate::error::Result;
use crate::scheduler::Millis;
use crate::search::{parse_targets, SearchTask, DEFAULT_TARGETS};
use crate::session::{FocusSession, SessionEvent, SessionSummary};

/// How long the completion summary stays up before returning home
pub const SUMMARY_DISMISS_MS: Millis = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AppState {
    Home,
    Search,
    Focus,
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub preset: FocusPreset,
    pub targets: Vec<char>,
    pub skip_warmup: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            preset: FocusPreset::default(),
            targets: DEFAULT_TARGETS.to_vec(),
            skip_warmup: false,
        }
    }
}

impl AppSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let targets = parse_targets(&cfg.targets).unwrap_or_else(|err| {
            warn!(%err, "falling back to default target letters");
            DEFAULT_TARGETS.to_vec()
        });
        Self {
            preset: cfg.preset(),
            targets,
            skip_warmup: cfg.skip_warmup,
        }
    }

    pub fn to_config(&self) -> Config {
        Config {
            duration_minutes: self.preset.minutes(),
            targets: self.targets.iter().collect(),
            skip_warmup: self.skip_warmup,
        }
    }
}

/// Result of handling a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub search: Option<SearchTask>,
    pub cursor: (usize, usize),
    pub session: Option<FocusSession>,
    pub summary: Option<SessionSummary>,
    /// Time of the last tick or key, used to animate the breathing circle
    pub now: Millis,
    summary_shown_at: Option<Millis>,
    config_store: Option<FileConfigStore>,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            state: AppState::Home,
            search: None,
            cursor: (0, 0),
            session: None,
            summary: None,
            now: 0,
            summary_shown_at: None,
            config_store: None,
        }
    }

    /// Persist settings through `store` whenever a session begins
    pub fn with_store(settings: AppSettings, store: FileConfigStore) -> Self {
        Self {
            config_store: Some(store),
            ..Self::new(settings)
        }
    }

    /// Leave the home screen: warm-up first unless it is skipped
    pub fn begin(&mut self, now: Millis) -> Result<()> {
        self.save_settings();
        if self.settings.skip_warmup {
            self.start_focus(now)
        } else {
            self.start_search()
        }
    }

    pub fn start_search(&mut self) -> Result<()> {
        self.search = Some(SearchTask::new(&self.settings.targets)?);
        self.cursor = (0, 0);
        self.state = AppState::Search;
        Ok(())
    }

    pub fn start_focus(&mut self, now: Millis) -> Result<()> {
        self.session = Some(FocusSession::start(self.settings.preset.minutes(), now)?);
        self.summary = None;
        self.now = now;
        self.state = AppState::Focus;
        Ok(())
    }

    pub fn end_focus(&mut self, now: Millis) {
        if let Some(session) = self.session.as_mut() {
            session.end_early();
            self.summary = session.summary().cloned();
        }
        self.show_summary(now);
    }

    pub fn dismiss_summary(&mut self) {
        self.session = None;
        self.search = None;
        self.summary_shown_at = None;
        self.state = AppState::Home;
    }

    /// Advance timers to `now`; returns the session events that fired
    pub fn on_tick(&mut self, now: Millis) -> Vec<SessionEvent> {
        self.now = now;
        match self.state {
            AppState::Focus => {
                let events = self
                    .session
                    .as_mut()
                    .map(|s| s.poll(now))
                    .unwrap_or_default();
                for event in &events {
                    if let SessionEvent::Completed(summary) = event {
                        self.summary = Some(summary.clone());
                        self.show_summary(now);
                    }
                }
                events
            }
            AppState::Summary => {
                if self
                    .summary_shown_at
                    .is_some_and(|shown| now.saturating_sub(shown) >= SUMMARY_DISMISS_MS)
                {
                    self.dismiss_summary();
                }
                Vec::new()
            }
            AppState::Home | AppState::Search => Vec::new(),
        }
    }

    /// Esc or Ctrl-C, which quit from any screen
    pub fn is_quit_key(key: &KeyEvent) -> bool {
        key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Millis) -> Result<AppAction> {
        self.now = now;
        if Self::is_quit_key(&key) {
            return Ok(AppAction::Quit);
        }

        match self.state {
            AppState::Home => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.settings.preset = self.settings.preset.prev();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.settings.preset = self.settings.preset.next();
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let idx = c as usize - '1' as usize;
                    self.settings.preset = FocusPreset::ALL[idx];
                }
                KeyCode::Char('w') => {
                    self.settings.skip_warmup = !self.settings.skip_warmup;
                }
                KeyCode::Enter => {
                    // settings can be edited directly, so a bad target set stays home
                    if let Err(err) = self.begin(now) {
                        warn!(%err, "cannot start a session with these settings");
                    }
                }
                _ => {}
            },
            AppState::Search => self.on_search_key(key.code, now)?,
            AppState::Focus => match key.code {
                KeyCode::Char('p') | KeyCode::Char(' ') => {
                    if let Some(session) = self.session.as_mut() {
                        session.toggle_pause(now);
                    }
                }
                KeyCode::Char('e') => self.end_focus(now),
                _ => {}
            },
            AppState::Summary => self.dismiss_summary(),
        }

        Ok(AppAction::Continue)
    }

    fn on_search_key(&mut self, code: KeyCode, now: Millis) -> Result<()> {
        let Some(task) = self.search.as_mut() else {
            return Ok(());
        };
        let grid = task.grid();
        let (row, col) = self.cursor;

        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                let row = row.saturating_sub(1);
                self.cursor = (row, col.min(grid.row_len(row).saturating_sub(1)));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let row = (row + 1).min(grid.row_count().saturating_sub(1));
                self.cursor = (row, col.min(grid.row_len(row).saturating_sub(1)));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = (row, col.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cursor = (row, (col + 1).min(grid.row_len(row).saturating_sub(1)));
            }
            KeyCode::Char(' ') => {
                task.toggle_cell(row, col)?;
            }
            KeyCode::Enter => {
                if task.is_complete() {
                    self.start_focus(now)?;
                } else {
                    task.toggle_cell(row, col)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn show_summary(&mut self, now: Millis) {
        self.summary_shown_at = Some(now);
        self.state = AppState::Summary;
    }

    fn save_settings(&self) {
        if let Some(store) = &self.config_store {
            if let Err(err) = store.save(&self.settings.to_config()) {
                warn!(%err, path = %store.path().display(), "failed to save config");
            }
        }
    }
}
