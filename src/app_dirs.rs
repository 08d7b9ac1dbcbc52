use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const SESSIONS_FILE: &str = "sessions.json";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "sport-timer.log";

/// Where the session log, config and log file live.
#[derive(Debug, Clone)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// Per-user data directory, or `./sport-timer` when none can be resolved.
    pub fn resolve() -> Self {
        let root = ProjectDirs::from("", "", "sport-timer")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("sport-timer"));
        Self { root }
    }

    pub fn at<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sessions(&self) -> PathBuf {
        self.root.join(SESSIONS_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn log(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_root() {
        let dirs = AppDirs::at("/tmp/st");
        assert_eq!(dirs.sessions(), PathBuf::from("/tmp/st/sessions.json"));
        assert_eq!(dirs.config(), PathBuf::from("/tmp/st/config.json"));
        assert_eq!(dirs.log(), PathBuf::from("/tmp/st/sport-timer.log"));
    }
}
