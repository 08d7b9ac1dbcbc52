// End-to-end behavior of the session log against real files.

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sport_timer::error::ReadFailure;
use sport_timer::{
    Confirmation, Decision, PendingSave, SessionEntry, SessionLog, SessionLogStore, StoreError,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 14, 17, 45, 0).unwrap()
}

fn seed(path: &Path, entries: Vec<SessionEntry>) {
    fs::write(path, SessionLog::from(entries).to_json().unwrap()).unwrap();
}

fn accept(_: &PendingSave) -> Confirmation {
    Confirmation::Accepted
}

#[test]
fn first_session_creates_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    let store = SessionLogStore::open(&path);

    let mut prompts = 0;
    let decision = store.record_session(SessionEntry::new(t1(), 90), &mut |p: &PendingSave| {
        prompts += 1;
        assert_eq!(p.original_len(), 0);
        Confirmation::Accepted
    });

    assert_matches!(decision, Decision::Saved);
    assert_eq!(prompts, 1);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([{ "date": "2024-09-14T17:45:00Z", "duration": 90 }])
    );
}

#[test]
fn stale_entry_offsetting_new_one_is_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    seed(&path, vec![SessionEntry::new(t1() - Duration::days(8), 600)]);
    let store = SessionLogStore::open(&path);

    // one stale entry dropped, one added: same length, nothing offered
    let decision = store.record_session(SessionEntry::new(t1(), 30), &mut accept);
    assert_matches!(decision, Decision::NoGrowth);
    assert_eq!(store.load().unwrap().entries()[0].duration_seconds, 600);
}

#[test]
fn future_dated_entry_survives_and_blocks_growth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    seed(
        &path,
        vec![
            SessionEntry::new(t1() - Duration::days(7), 600),
            SessionEntry::new(t1() + Duration::days(1), 45),
        ],
    );
    let before = fs::read_to_string(&path).unwrap();
    let store = SessionLogStore::open(&path);

    // the week-old entry is dropped, the future one kept: no growth, file untouched
    let mut asked = false;
    let decision = store.record_session(SessionEntry::new(t1(), 30), &mut |_: &PendingSave| {
        asked = true;
        Confirmation::Accepted
    });
    assert_matches!(decision, Decision::NoGrowth);
    assert!(!asked);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn shrinking_merge_is_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    seed(&path, vec![]);
    let store = SessionLogStore::open(&path);

    assert_matches!(
        store.record_session(SessionEntry::new(t1() - Duration::days(8), 600), &mut accept),
        Decision::Saved
    );
    assert_matches!(
        store.record_session(SessionEntry::new(t1() - Duration::days(8) + Duration::hours(1), 20), &mut accept),
        Decision::Saved
    );

    // two stale entries are dropped and one is added: the log shrinks
    assert_matches!(
        store.record_session(SessionEntry::new(t1(), 30), &mut accept),
        Decision::NoGrowth
    );
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn missing_file_grows_to_exactly_the_new_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("sessions.json");
    let store = SessionLogStore::open(&path);

    assert_matches!(
        store.record_session(SessionEntry::new(t1(), 30), &mut accept),
        Decision::Saved
    );
    assert_eq!(store.load().unwrap().entries(), &[SessionEntry::new(t1(), 30)]);
}

#[test]
fn recent_entry_is_kept_before_the_new_one() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    let earlier = SessionEntry::new(t1() - Duration::hours(1), 300);
    seed(&path, vec![earlier.clone()]);
    let store = SessionLogStore::open(&path);

    let decision = store.record_session(SessionEntry::new(t1(), 45), &mut accept);

    assert_matches!(decision, Decision::Saved);
    assert_eq!(
        store.load().unwrap().entries(),
        &[earlier, SessionEntry::new(t1(), 45)]
    );
}

#[test]
fn corrupt_file_fails_before_prompting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    fs::write(&path, "[{\"date\": 12}").unwrap();
    let store = SessionLogStore::open(&path);

    let mut prompted = false;
    let decision = store.record_session(SessionEntry::new(t1(), 10), &mut |_: &PendingSave| {
        prompted = true;
        Confirmation::Accepted
    });

    assert_matches!(
        decision,
        Decision::Failed(StoreError::StorageRead {
            source: ReadFailure::Parse(_),
            ..
        })
    );
    assert!(!prompted);
    assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"date\": 12}");
}

#[test]
fn unreadable_path_is_a_read_error() {
    let dir = tempdir().unwrap();
    let store = SessionLogStore::open(dir.path());

    assert_matches!(
        store.record_session(SessionEntry::new(t1(), 10), &mut accept),
        Decision::Failed(StoreError::StorageRead {
            source: ReadFailure::Io(_),
            ..
        })
    );
}

#[test]
fn declining_leaves_the_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    seed(&path, vec![SessionEntry::new(t1() - Duration::hours(3), 120)]);
    let before = fs::read_to_string(&path).unwrap();
    let store = SessionLogStore::open(&path);

    let decision = store.record_session(SessionEntry::new(t1(), 60), &mut |_: &PendingSave| {
        Confirmation::Declined
    });

    assert_matches!(decision, Decision::Declined);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn two_phase_flow_matches_record_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    let store = SessionLogStore::open(&path);

    let pending = assert_matches!(
        store.begin(SessionEntry::new(t1(), 75)),
        Decision::ConfirmationPending(p) => p
    );
    assert!(!path.exists());

    assert_matches!(store.resolve(pending, Confirmation::Accepted), Decision::Saved);
    assert_eq!(store.load().unwrap().total_seconds(), 75);
}
