//! Terminal application state and key handling.

use crate::clock::Clock;
use crate::config::{Config, ConfigStore, ThemeName};
use crate::effects::EffectRunner;
use crate::file_store::FileStore;
use crate::session_log::{SessionEntry, SessionLog};
use crate::store::{Confirmation, Decision, PendingSave, SessionLogStore};
use crate::timer::{Command, Ticker, TimerState, Transition, format_clock};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Timer,
    History,
    Help,
}

pub struct App<F: FileStore> {
    pub timer: TimerState,
    pub theme: ThemeName,
    pub view: View,
    /// Merge waiting for a yes/no answer.
    pub prompt: Option<PendingSave>,
    pub status: Option<String>,
    pub last_timer: Option<u64>,
    /// Snapshot for the history view, refreshed when the view opens.
    pub history: Option<SessionLog>,
    ticker: Ticker,
    store: SessionLogStore<F>,
    effects: EffectRunner,
    clock: Box<dyn Clock>,
    config: Config,
    config_store: Box<dyn ConfigStore>,
}

impl<F: FileStore> App<F> {
    pub fn new(
        config: Config,
        config_store: Box<dyn ConfigStore>,
        store: SessionLogStore<F>,
        effects: EffectRunner,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            timer: TimerState::Idle,
            theme: config.theme,
            view: View::Timer,
            prompt: None,
            status: None,
            last_timer: None,
            history: None,
            ticker: Ticker::default(),
            store,
            effects,
            clock,
            config,
            config_store,
        }
    }

    pub fn store(&self) -> &SessionLogStore<F> {
        &self.store
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns `true` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.prompt.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.answer(Confirmation::Accepted),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.answer(Confirmation::Declined)
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Esc => {
                if self.view == View::Timer {
                    self.quit();
                    return true;
                }
                self.view = View::Timer;
            }
            KeyCode::Char(' ') | KeyCode::Char('s') => {
                let command = match self.timer {
                    TimerState::Idle => Command::Start,
                    TimerState::Running { .. } => Command::Pause,
                    TimerState::Paused { .. } => Command::Resume,
                };
                self.apply(command, now);
            }
            KeyCode::Char('r') => {
                if self.timer != TimerState::Idle {
                    self.apply(Command::Reset, now);
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('h') => self.toggle_view(View::History),
            KeyCode::Char('?') => self.toggle_view(View::Help),
            _ => {}
        }
        false
    }

    /// Applies any ticks due at `now`.
    pub fn update(&mut self, now: Instant) {
        for _ in 0..self.ticker.due(now) {
            self.apply(Command::Tick, now);
        }
    }

    pub fn apply(&mut self, command: Command, now: Instant) {
        let Transition {
            state,
            effects,
            completed,
        } = match self.timer.apply(command) {
            Ok(t) => t,
            Err(e) => {
                debug!(error = %e, "ignored timer command");
                return;
            }
        };

        if command != Command::Tick {
            debug!(from = self.timer.name(), to = state.name(), "timer transition");
        }
        match (self.timer.is_running(), state.is_running()) {
            (false, true) => self.ticker.arm(now),
            (true, false) => self.ticker.cancel(),
            _ => {}
        }
        self.timer = state;
        self.effects.run_all(&effects);

        if let Some(seconds) = completed {
            self.last_timer = Some(seconds);
            self.record(seconds);
        }
    }

    fn record(&mut self, seconds: u64) {
        let entry = SessionEntry::new(self.clock.now(), seconds);
        match self.store.begin(entry) {
            Decision::ConfirmationPending(pending) => {
                self.prompt = Some(pending);
                self.status = None;
            }
            other => self.report(other),
        }
    }

    fn answer(&mut self, answer: Confirmation) {
        if let Some(pending) = self.prompt.take() {
            let decision = self.store.resolve(pending, answer);
            self.report(decision);
            if self.view == View::History {
                self.refresh_history();
            }
        }
    }

    fn report(&mut self, decision: Decision) {
        let last = self.last_timer.map(format_clock).unwrap_or_default();
        self.status = Some(match decision {
            Decision::Saved => format!("Session {last} saved"),
            Decision::Declined => format!("Session {last} discarded"),
            Decision::NoGrowth => "Session log unchanged".to_string(),
            Decision::ConfirmationPending(_) => "Waiting for confirmation".to_string(),
            Decision::Failed(e) => format!("Could not save session: {e}"),
        });
    }

    fn quit(&mut self) {
        if self.prompt.is_some() {
            self.answer(Confirmation::Declined);
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = self.theme;
        if let Err(e) = self.config_store.save(&self.config) {
            warn!(error = %e, "failed to save config");
        }
    }

    fn toggle_view(&mut self, view: View) {
        self.view = if self.view == view { View::Timer } else { view };
        if self.view == View::History {
            self.refresh_history();
        }
    }

    fn refresh_history(&mut self) {
        match self.store.load() {
            Ok(log) => self.history = Some(log),
            Err(e) => {
                self.history = None;
                self.status = Some(e.to_string());
            }
        }
    }
}
