use crate::{
    city::{self, City},
    display::{self, Frame},
    input::{self, Action, EventSource, Mode},
    state::{Selection, SelectionError, Settings},
    surface::Surface,
};
use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use log::{info, trace, warn};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

/// All dashboard state. Everything in here is only touched from the event
/// loop, one event at a time.
#[derive(Debug)]
pub struct App {
    selection: Selection,
    settings: Settings,
    /// Card under the cursor
    cursor: usize,
    /// Present while the search box is open
    search: Option<Search>,
    /// A rejected action, shown until the user dismisses it
    notice: Option<String>,
    quit: bool,
}

/// Search box contents, and the catalog cities matching them
#[derive(Debug, Default)]
pub struct Search {
    query: String,
    results: Vec<&'static City>,
    highlighted: usize,
}

impl Search {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[&'static City] {
        &self.results
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    fn refresh(&mut self) {
        self.results = city::search(&self.query);
        self.highlighted = 0;
    }
}

impl App {
    pub fn new(selection: Selection, settings: Settings) -> Self {
        Self {
            selection,
            settings,
            cursor: 0,
            search: None,
            notice: None,
            quit: false,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn mode(&self) -> Mode {
        if self.notice.is_some() {
            Mode::Notice
        } else if self.search.is_some() {
            Mode::Search
        } else {
            Mode::Browse
        }
    }

    /// Build the frame to show at the given instant
    pub fn frame(&self, now: DateTime<Utc>) -> Frame {
        display::render(self, now)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = input::action(key, self.mode()) {
            trace!("Key {:?} -> {action:?}", key.code);
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::ToggleTheme => {
                self.settings.toggle_theme();
                info!("Theme set to {:?}", self.settings.theme);
            }
            Action::ToggleTimeFormat => {
                self.settings.toggle_time_format();
                info!("Time format set to {:?}", self.settings.time_format);
            }
            Action::SetTimeFormat(time_format) => {
                self.settings.time_format = time_format;
                info!("Time format set to {time_format:?}");
            }
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorDown => {
                self.cursor = (self.cursor + 1).min(self.selection.len() - 1);
            }
            Action::RemoveAtCursor => match self.selection.remove(self.cursor) {
                Ok(city) => {
                    info!("Removed {city}");
                    // Primary can't be removed, so there's always a card left
                    self.cursor = self.cursor.min(self.selection.len() - 1);
                }
                Err(error) => self.reject(error),
            },
            Action::PrimaryAtCursor => {
                match self.selection.set_primary(self.cursor) {
                    Ok(()) => info!(
                        "Primary city is now {}",
                        self.selection.primary()
                    ),
                    Err(error) => self.reject(error),
                }
            }
            Action::OpenSearch => self.search = Some(Search::default()),
            Action::CloseSearch => self.search = None,
            Action::Type(c) => {
                if let Some(search) = &mut self.search {
                    search.query.push(c);
                    search.refresh();
                }
            }
            Action::Erase => {
                if let Some(search) = &mut self.search {
                    search.query.pop();
                    search.refresh();
                }
            }
            Action::ResultUp => {
                if let Some(search) = &mut self.search {
                    search.highlighted = search.highlighted.saturating_sub(1);
                }
            }
            Action::ResultDown => {
                if let Some(search) = &mut self.search {
                    search.highlighted = (search.highlighted + 1)
                        .min(search.results.len().saturating_sub(1));
                }
            }
            Action::ConfirmSearch => self.confirm_search(),
            Action::Dismiss => self.notice = None,
        }
    }

    /// Add the highlighted search result. The search closes either way, unless
    /// there was nothing to pick.
    fn confirm_search(&mut self) {
        let Some(city) = self
            .search
            .as_ref()
            .and_then(|search| search.results.get(search.highlighted))
            .copied()
        else {
            return;
        };
        self.search = None;
        match self.selection.add(*city) {
            Ok(index) => info!("Added {city} at position {index}"),
            Err(error) => self.reject(error),
        }
    }

    /// Tell the user no. State is left as it was.
    fn reject(&mut self, error: SelectionError) {
        warn!("Rejected: {error}");
        self.notice = Some(error.to_string());
    }

    /// Run until the user quits or `stop` is set. Redraws once per
    /// [Surface::INTERVAL], and immediately after every key press. The surface
    /// is handed back even if startup or the loop fails.
    pub fn run<S: Surface>(
        mut self,
        surface: &mut S,
        events: &mut impl EventSource,
        stop: &AtomicBool,
    ) -> anyhow::Result<()> {
        info!("Starting surface {}", surface.name());
        let result = surface
            .on_start()
            .and_then(|()| self.event_loop(surface, events, stop));
        info!("Stopping surface {}", surface.name());
        let stopped = surface.on_stop();
        result.and(stopped)
    }

    fn event_loop<S: Surface>(
        &mut self,
        surface: &mut S,
        events: &mut impl EventSource,
        stop: &AtomicBool,
    ) -> anyhow::Result<()> {
        let mut next_tick = Instant::now();
        while !self.quit && !stop.load(Ordering::Relaxed) {
            if Instant::now() >= next_tick {
                surface.on_tick(&self.frame(Utc::now()))?;
                next_tick += S::INTERVAL;
                // If we fell behind, don't try to catch up
                if next_tick < Instant::now() {
                    next_tick = Instant::now() + S::INTERVAL;
                }
            }

            let timeout = next_tick.saturating_duration_since(Instant::now());
            if let Some(key) = events.next_key(timeout)? {
                self.handle_key(key);
                surface.on_tick(&self.frame(Utc::now()))?;
            }
        }
        Ok(())
    }
}
