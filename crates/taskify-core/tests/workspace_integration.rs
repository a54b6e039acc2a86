//! Integration tests for the workspace: login gating and persistence across
//! separate opens of the same on-disk store.

use taskify_core::storage::{Config, Database, PersistentStore};
use taskify_core::timer::{ManualTicker, RecordingNotifier, TimerMode, TimerSettings, SETTINGS_KEY};
use taskify_core::{AuthError, TaskFilter, Workspace};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Workspace {
    let db = Database::open_at(dir.path().join("taskify.db")).unwrap();
    Workspace::with_store(Config::default(), PersistentStore::new(db))
}

#[test]
fn session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut ws = open(&dir);
        ws.session_mut()
            .register("Grace", "grace@example.com", "cobol1959")
            .unwrap();
    }
    let ws = open(&dir);
    let user = ws.session().current().unwrap();
    assert_eq!(user.email, "grace@example.com");
    assert_eq!(user.name, "Grace");
}

#[test]
fn logout_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut ws = open(&dir);
        ws.session_mut()
            .register("Grace", "grace@example.com", "cobol1959")
            .unwrap();
        ws.session_mut().logout();
    }
    let mut ws = open(&dir);
    assert!(matches!(ws.tasks(), Err(AuthError::NotAuthenticated)));

    ws.session_mut()
        .login("grace@example.com", "cobol1959")
        .unwrap();
    assert!(ws.tasks().is_ok());
}

#[test]
fn duplicate_email_and_wrong_password() {
    let dir = TempDir::new().unwrap();
    let mut ws = open(&dir);
    ws.session_mut()
        .register("Grace", "grace@example.com", "cobol1959")
        .unwrap();
    ws.session_mut().logout();

    let dup = ws
        .session_mut()
        .register("Other", "grace@example.com", "another99")
        .unwrap_err();
    assert!(matches!(dup, AuthError::EmailTaken));

    let wrong = ws
        .session_mut()
        .login("grace@example.com", "cobol1960")
        .unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(!ws.session().is_authenticated());
}

#[test]
fn tasks_and_diary_persist() {
    let dir = TempDir::new().unwrap();
    let (kept, done) = {
        let mut ws = open(&dir);
        ws.session_mut()
            .register("Grace", "grace@example.com", "cobol1959")
            .unwrap();
        let mut tasks = ws.tasks().unwrap();
        let kept = tasks.add("compile report").unwrap().id;
        let done = tasks.add("debug moth").unwrap().id;
        tasks.toggle(done);
        ws.diary().unwrap().write("Found the bug.");
        (kept, done)
    };

    let ws = open(&dir);
    let tasks = ws.tasks().unwrap();
    assert_eq!(tasks.items().len(), 2);
    let active: Vec<i64> = tasks.filtered(TaskFilter::Active).iter().map(|t| t.id).collect();
    assert_eq!(active, vec![kept]);
    assert!(tasks.get(done).unwrap().completed);

    let diary = ws.diary().unwrap();
    assert_eq!(diary.entries().len(), 1);
    assert_eq!(diary.entries()[0].content, "Found the bug.");
}

#[test]
fn timer_settings_persist_but_state_does_not() {
    let dir = TempDir::new().unwrap();
    {
        let mut ws = open(&dir);
        ws.session_mut()
            .register("Grace", "grace@example.com", "cobol1959")
            .unwrap();
        let timer = ws
            .focus_timer(ManualTicker::new(), RecordingNotifier::new())
            .unwrap();
        timer.skip();
        timer.update_settings(TimerSettings {
            short_break_duration: 7,
            ..TimerSettings::default()
        });
        assert_eq!(timer.state().mode, TimerMode::ShortBreak);
    }

    let ws = open(&dir);
    assert_eq!(ws.timer_settings().unwrap().short_break_duration, 7);
    let timer = ws
        .focus_timer(ManualTicker::new(), RecordingNotifier::new())
        .unwrap();
    let state = timer.state();
    assert_eq!(state.mode, TimerMode::Work);
    assert_eq!(state.completed_work_cycles, 0);
    assert!(!state.is_active);
    assert_eq!(state.remaining_secs, 25 * 60);
}

#[test]
fn corrupted_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let mut ws = open(&dir);
    ws.session_mut()
        .register("Grace", "grace@example.com", "cobol1959")
        .unwrap();
    ws.store().set(SETTINGS_KEY, r#"{"workDuration": "long"}"#);
    assert_eq!(ws.timer_settings().unwrap(), TimerSettings::default());
}
