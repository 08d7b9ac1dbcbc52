//! Fire-and-forget side effects of timer transitions.

use notify_rust::{Notification, Urgency};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

pub const APP_NAME: &str = "sport-timer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Start,
    Pause,
    Reset,
}

impl Cue {
    /// Candidate players and sound files, first existing file wins.
    fn sources(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Start | Self::Pause => &[
                ("paplay", "/usr/share/sounds/freedesktop/stereo/bell.oga"),
                ("paplay", "/usr/share/sounds/freedesktop/stereo/message.oga"),
                ("aplay", "/usr/share/sounds/sound-icons/prompt.wav"),
                ("aplay", "/usr/share/sounds/generic.wav"),
            ],
            Self::Reset => &[
                ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
                ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
                ("aplay", "/usr/share/sounds/generic.wav"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PlayCue(Cue),
    Notify { title: String, body: String },
}

pub trait NotificationService {
    fn notify(&self, title: &str, body: &str);
}

pub trait AudioCue {
    fn play(&self, cue: Cue);
}

/// Desktop notifications through the platform notification daemon.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl NotificationService for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let (title, body) = (title.to_string(), body.to_string());
        std::thread::spawn(move || {
            let shown = Notification::new()
                .summary(&title)
                .body(&body)
                .appname(APP_NAME)
                .icon("alarm-clock")
                .urgency(Urgency::Normal)
                .show();
            if let Err(e) = shown {
                warn!(error = %e, "notification failed");
            }
        });
    }
}

/// Plays freedesktop sounds through `paplay`/`aplay` on a background thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAudio;

impl AudioCue for SystemAudio {
    fn play(&self, cue: Cue) {
        std::thread::spawn(move || {
            let Some((cmd, file)) = pick_source(cue.sources(), |p| p.exists()) else {
                debug!(?cue, "no sound file available");
                return;
            };
            run_player(cmd, file);
        });
    }
}

/// First source whose sound file exists.
fn pick_source(
    sources: &'static [(&'static str, &'static str)],
    exists: impl Fn(&Path) -> bool,
) -> Option<(&'static str, &'static str)> {
    sources.iter().copied().find(|(_, file)| exists(Path::new(file)))
}

/// Runs the player to completion so the child is reaped. Returns `true` on a
/// zero exit status.
fn run_player(cmd: &str, file: &str) -> bool {
    let status = Command::new(cmd)
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!(%status, player = cmd, "sound player exited with failure");
            false
        }
        Err(e) => {
            warn!(error = %e, player = cmd, "sound playback failed");
            false
        }
    }
}

/// Dispatches effects to the notification and audio collaborators.
pub struct EffectRunner {
    notifier: Box<dyn NotificationService>,
    audio: Box<dyn AudioCue>,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl EffectRunner {
    pub fn new(notifier: Box<dyn NotificationService>, audio: Box<dyn AudioCue>) -> Self {
        Self {
            notifier,
            audio,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }

    pub fn desktop() -> Self {
        Self::new(Box::new(DesktopNotifier), Box::new(SystemAudio))
    }

    pub fn run(&self, effect: &Effect) {
        match effect {
            Effect::PlayCue(cue) if self.sound_enabled => self.audio.play(*cue),
            Effect::Notify { title, body } if self.notifications_enabled => {
                self.notifier.notify(title, body)
            }
            skipped => debug!(?skipped, "effect disabled"),
        }
    }

    pub fn run_all(&self, effects: &[Effect]) {
        for effect in effects {
            self.run(effect);
        }
    }
}
