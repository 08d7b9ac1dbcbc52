// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod effects;
pub mod error;
pub mod file_store;
pub mod logging;
pub mod session_log;
pub mod store;
pub mod timer;
pub mod ui;

pub use error::{StoreError, TimerError};
pub use session_log::{SessionEntry, SessionLog};
pub use store::{Confirmation, ConfirmationChannel, Decision, PendingSave, SessionLogStore};
