//! Stopwatch state machine.
//!
//! Every transition consumes the current state and returns the next one
//! together with the side effects the caller should run. Nothing here touches
//! audio, notifications or storage.

use crate::effects::{Cue, Effect};
use crate::error::TimerError;
use std::fmt;
use std::time::{Duration, Instant};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub const LAST_TIMER_TITLE: &str = "Last Timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        seconds: u64,
    },
    Paused {
        seconds: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    Tick,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::Tick => "tick",
        }
    }
}

/// Result of applying a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TimerState,
    pub effects: Vec<Effect>,
    /// Seconds of the session that a reset just finished.
    pub completed: Option<u64>,
}

impl Transition {
    fn quiet(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            completed: None,
        }
    }
}

impl TimerState {
    pub fn seconds(&self) -> u64 {
        match *self {
            Self::Idle => 0,
            Self::Running { seconds } | Self::Paused { seconds } => seconds,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
            Self::Paused { .. } => "paused",
        }
    }

    pub fn apply(self, command: Command) -> Result<Transition, TimerError> {
        let next = match (self, command) {
            (Self::Idle, Command::Start) => Transition {
                state: Self::Running { seconds: 0 },
                effects: vec![Effect::PlayCue(Cue::Start)],
                completed: None,
            },
            (Self::Running { seconds }, Command::Pause) => Transition {
                state: Self::Paused { seconds },
                effects: vec![Effect::PlayCue(Cue::Pause)],
                completed: None,
            },
            (Self::Paused { seconds }, Command::Resume) => Transition {
                state: Self::Running { seconds },
                effects: vec![Effect::PlayCue(Cue::Start)],
                completed: None,
            },
            (Self::Running { seconds } | Self::Paused { seconds }, Command::Reset) => Transition {
                state: Self::Idle,
                effects: vec![
                    Effect::PlayCue(Cue::Reset),
                    Effect::Notify {
                        title: LAST_TIMER_TITLE.into(),
                        body: format!("Your last timer is {}.", format_clock(seconds)),
                    },
                ],
                completed: Some(seconds),
            },
            (Self::Running { seconds }, Command::Tick) => Transition::quiet(Self::Running {
                seconds: seconds.saturating_add(1),
            }),
            (from, command) => {
                return Err(TimerError::InvalidTransition {
                    from: from.name(),
                    command: command.name(),
                });
            }
        };
        Ok(next)
    }

    pub fn start(self) -> Result<Transition, TimerError> {
        self.apply(Command::Start)
    }

    pub fn pause(self) -> Result<Transition, TimerError> {
        self.apply(Command::Pause)
    }

    pub fn resume(self) -> Result<Transition, TimerError> {
        self.apply(Command::Resume)
    }

    pub fn reset(self) -> Result<Transition, TimerError> {
        self.apply(Command::Reset)
    }

    pub fn tick(self) -> Result<Transition, TimerError> {
        self.apply(Command::Tick)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_clock(self.seconds()))
    }
}

/// `mm:ss`, minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Schedules one tick per whole second while the timer runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ticker {
    next: Option<Instant>,
}

impl Ticker {
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + TICK_INTERVAL);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Number of ticks due at `now`; advances the schedule past them.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while now >= next {
            count += 1;
            next += TICK_INTERVAL;
        }
        self.next = Some(next);
        count
    }

    /// Time until the next tick, if armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next.map(|next| next.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let t = TimerState::Idle.start().unwrap();
        assert_eq!(t.state, TimerState::Running { seconds: 0 });
        assert_eq!(t.effects, vec![Effect::PlayCue(Cue::Start)]);

        let t = t.state.tick().unwrap().state.tick().unwrap();
        assert_eq!(t.state.seconds(), 2);
        assert!(t.effects.is_empty());

        let t = t.state.pause().unwrap();
        assert_eq!(t.state, TimerState::Paused { seconds: 2 });
        assert_eq!(t.effects, vec![Effect::PlayCue(Cue::Pause)]);

        let t = t.state.resume().unwrap();
        assert_eq!(t.state, TimerState::Running { seconds: 2 });
        assert_eq!(t.effects, vec![Effect::PlayCue(Cue::Start)]);
    }

    #[test]
    fn reset_reports_duration_and_notifies() {
        let t = TimerState::Paused { seconds: 125 }.reset().unwrap();
        assert_eq!(t.state, TimerState::Idle);
        assert_eq!(t.completed, Some(125));
        assert_eq!(
            t.effects,
            vec![
                Effect::PlayCue(Cue::Reset),
                Effect::Notify {
                    title: "Last Timer".into(),
                    body: "Your last timer is 02:05.".into(),
                },
            ]
        );
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert_eq!(
            TimerState::Idle.pause(),
            Err(TimerError::InvalidTransition {
                from: "idle",
                command: "pause"
            })
        );
        assert!(TimerState::Idle.reset().is_err());
        assert!(TimerState::Idle.tick().is_err());
        assert!(TimerState::Paused { seconds: 3 }.tick().is_err());
        assert!(TimerState::Running { seconds: 3 }.start().is_err());
        assert!(TimerState::Running { seconds: 3 }.resume().is_err());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(7505), "125:05");
        assert_eq!(TimerState::Running { seconds: 90 }.to_string(), "01:30");
    }

    #[test]
    fn ticker_counts_whole_seconds() {
        let t0 = Instant::now();
        let mut ticker = Ticker::default();
        assert_eq!(ticker.due(t0 + Duration::from_secs(5)), 0);

        ticker.arm(t0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(999)), 0);
        assert_eq!(ticker.due(t0 + Duration::from_millis(1000)), 1);
        assert_eq!(ticker.due(t0 + Duration::from_millis(3500)), 2);
        assert_eq!(
            ticker.remaining(t0 + Duration::from_millis(3500)),
            Some(Duration::from_millis(500))
        );

        ticker.cancel();
        assert!(!ticker.is_armed());
        assert_eq!(ticker.due(t0 + Duration::from_secs(10)), 0);
    }
}
