//! End-to-end reminder behaviour over simulated days.

use chrono::{NaiveDate, NaiveDateTime};
use equilibrio_core::notify::{MemorySink, SinkCall};
use equilibrio_core::{
    BlockKind, ClockTime, Database, LockResolution, NotificationEngine, NotificationKind,
    NotificationLedger, Reminder, ReminderSession, Routine, RoutineStore, Settings, TimeBlock,
};

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn time(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn deep_work_routine() -> Routine {
    Routine::new("scenario", "Scenario").with_blocks(vec![
        TimeBlock::new(time("09:00"), "Deep Work", BlockKind::Sacred)
            .with_id("deep")
            .with_lock(),
        TimeBlock::new(time("10:00"), "Break", BlockKind::Break).with_id("break"),
    ])
}

fn settings_without_vitamin_d() -> Settings {
    let mut settings = Settings::default();
    settings.vitamin_d.enabled = false;
    settings
}

fn session_with(routine: Routine, settings: Settings) -> ReminderSession<MemorySink> {
    let db = Database::open_in_memory().unwrap();
    let mut store = RoutineStore::with_presets();
    let id = routine.id.clone();
    store.upsert(routine);
    store.select(&id).unwrap();
    store.save(&db).unwrap();
    ReminderSession::new(db, settings, MemorySink::new())
}

/// Poll every 10 seconds from `from` to `to` (inclusive), collecting reminders.
fn poll_range(
    engine: &NotificationEngine,
    routine: &Routine,
    settings: &Settings,
    ledger: &mut NotificationLedger,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Vec<(NaiveDateTime, Reminder)> {
    let mut out = Vec::new();
    let mut now = from;
    while now <= to {
        for r in engine.evaluate(now, Some(routine), settings, ledger) {
            out.push((now, r));
        }
        now += chrono::Duration::seconds(10);
    }
    out
}

#[test]
fn whole_day_fires_each_reminder_exactly_once() {
    let engine = NotificationEngine::new();
    let routine = deep_work_routine();
    let settings = settings_without_vitamin_d();
    let mut ledger = NotificationLedger::new();

    let fired = poll_range(
        &engine,
        &routine,
        &settings,
        &mut ledger,
        at(18, 0, 0),
        at(18, 23, 59),
    );

    let summary: Vec<_> = fired
        .iter()
        .map(|(now, r)| (ClockTime::of(*now).to_string(), r.kind(), r.block().unwrap().id.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("08:55".to_string(), NotificationKind::PreNotify, "deep".to_string()),
            ("09:00".to_string(), NotificationKind::BlockStart, "deep".to_string()),
            ("09:02".to_string(), NotificationKind::LateNudge, "deep".to_string()),
            ("09:55".to_string(), NotificationKind::PreNotify, "break".to_string()),
            ("10:00".to_string(), NotificationKind::BlockStart, "break".to_string()),
            ("10:02".to_string(), NotificationKind::LateNudge, "break".to_string()),
        ]
    );
}

#[test]
fn reminders_fire_again_the_next_day() {
    let engine = NotificationEngine::new();
    let routine = deep_work_routine();
    let settings = settings_without_vitamin_d();
    let mut ledger = NotificationLedger::new();

    let today = engine.evaluate(at(18, 9, 0), Some(&routine), &settings, &mut ledger);
    let again = engine.evaluate(at(18, 9, 0), Some(&routine), &settings, &mut ledger);
    let tomorrow = engine.evaluate(at(19, 9, 0), Some(&routine), &settings, &mut ledger);
    assert_eq!(today.len(), 1);
    assert!(again.is_empty());
    assert_eq!(tomorrow.len(), 1);
}

#[test]
fn vitamin_d_fires_once_when_enabled_and_never_when_disabled() {
    let engine = NotificationEngine::new();
    let mut settings = Settings::default();
    settings.vitamin_d.time = "12:30".into();
    let mut ledger = NotificationLedger::new();
    let empty = Routine::new("empty", "Empty");

    let fired = poll_range(&engine, &empty, &settings, &mut ledger, at(18, 12, 0), at(18, 13, 0));
    assert_eq!(fired.len(), 1);
    assert_eq!(ClockTime::of(fired[0].0).to_string(), "12:30");
    assert_eq!(fired[0].1.kind(), NotificationKind::VitaminD);

    settings.vitamin_d.enabled = false;
    let mut ledger = NotificationLedger::new();
    let fired = poll_range(&engine, &empty, &settings, &mut ledger, at(18, 12, 0), at(18, 13, 0));
    assert!(fired.is_empty());
}

#[test]
fn sacred_lock_scenario() {
    let mut session = session_with(deep_work_routine(), settings_without_vitamin_d());

    let pre = session.tick(at(18, 8, 55));
    assert!(matches!(&pre[..], [Reminder::PreNotify { block, .. }] if block.id == "deep"));

    let start = session.tick(at(18, 9, 0));
    assert!(matches!(&start[..], [Reminder::BlockStart { enter_lock: true, .. }]));
    assert!(session.lock().is_active());
    assert_eq!(session.lock().activity, "Deep Work");
    assert!(session
        .sink()
        .calls
        .contains(&SinkCall::EnterLock("Deep Work".into())));

    // The nudge targets a missed departure, so it fires while locked.
    let nudge = session.tick(at(18, 9, 2));
    assert!(matches!(&nudge[..], [Reminder::LateNudge { .. }]));
    assert!(session.lock().is_active());
}

#[test]
fn muted_start_toasts_without_alarm() {
    let mut settings = settings_without_vitamin_d();
    settings.sound.muted = true;
    let mut session = session_with(deep_work_routine(), settings);

    let start = session.tick(at(18, 10, 0));
    assert!(matches!(&start[..], [Reminder::BlockStart { play_alarm: false, .. }]));
    assert_eq!(session.sink().alarm_count(), 0);
    assert_eq!(session.sink().toasts().count(), 1);
}

#[test]
fn coinciding_reminders_fire_in_block_order() {
    let routine = Routine::new("close", "Close").with_blocks(vec![
        TimeBlock::new(time("14:00"), "First", BlockKind::Work).with_id("first"),
        TimeBlock::new(time("14:05"), "Second", BlockKind::Work).with_id("second"),
    ]);
    let engine = NotificationEngine::new();
    let mut ledger = NotificationLedger::new();
    let fired = engine.evaluate(
        at(18, 14, 0),
        Some(&routine),
        &settings_without_vitamin_d(),
        &mut ledger,
    );
    let order: Vec<_> = fired
        .iter()
        .map(|r| (r.kind(), r.block().unwrap().id.as_str()))
        .collect();
    assert_eq!(
        order,
        [
            (NotificationKind::BlockStart, "first"),
            (NotificationKind::PreNotify, "second"),
        ]
    );
}

#[test]
fn ledger_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("equilibrio.db");
    let settings = settings_without_vitamin_d();

    {
        let db = Database::open_at(&path).unwrap();
        let mut store = RoutineStore::with_presets();
        store.upsert(deep_work_routine());
        store.select("scenario").unwrap();
        store.save(&db).unwrap();
        let mut session = ReminderSession::new(db, settings.clone(), MemorySink::new());
        assert_eq!(session.tick(at(18, 9, 0)).len(), 1);
    }

    let mut session = ReminderSession::new(Database::open_at(&path).unwrap(), settings, MemorySink::new());
    assert!(session.lock().is_active());
    assert!(session.tick(at(18, 9, 0)).is_empty());
}

#[test]
fn malformed_block_is_skipped_but_others_fire() {
    let mut routine = deep_work_routine();
    routine.blocks[0].time = "9h".into();
    let engine = NotificationEngine::new();
    let mut ledger = NotificationLedger::new();
    let fired = poll_range(
        &engine,
        &routine,
        &settings_without_vitamin_d(),
        &mut ledger,
        at(18, 8, 0),
        at(18, 11, 0),
    );
    assert_eq!(fired.len(), 3);
    assert!(fired.iter().all(|(_, r)| r.block().unwrap().id == "break"));
}

fn fired_blocks(reminders: &[Reminder]) -> Vec<(NotificationKind, String)> {
    reminders
        .iter()
        .map(|r| (r.kind(), r.block().map(|b| b.id.clone()).unwrap_or_default()))
        .collect()
}

#[test]
fn running_session_follows_changes_from_another_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("equilibrio.db");
    let settings = settings_without_vitamin_d();

    let mut watcher =
        ReminderSession::new(Database::open_at(&path).unwrap(), settings.clone(), MemorySink::new());
    let start = watcher.tick(at(18, 8, 0));
    assert_eq!(fired_blocks(&start), [(NotificationKind::BlockStart, "mp-deep".to_string())]);
    assert!(watcher.lock().is_active());

    // `equilibrio lock late` in a second process.
    let mut cli = ReminderSession::new(Database::open_at(&path).unwrap(), settings, MemorySink::new());
    assert!(cli.lock().is_active());
    cli.resolve_lock(LockResolution::RunningLate);

    assert!(watcher.tick(at(18, 10, 0)).is_empty());
    assert!(!watcher.lock().is_active());
    assert_eq!(watcher.sink().calls.last(), Some(&SinkCall::ExitLock));
    assert_eq!(watcher.store().current().unwrap().blocks[0].time, "06:45");

    let shifted = watcher.tick(at(18, 10, 15));
    assert_eq!(fired_blocks(&shifted), [(NotificationKind::BlockStart, "mp-break".to_string())]);
}

#[test]
fn running_session_rereads_the_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("settings.toml");
    settings_without_vitamin_d().save_to(&file).unwrap();

    let mut session = ReminderSession::new(
        Database::open_in_memory().unwrap(),
        Settings::load_from(&file).unwrap(),
        MemorySink::new(),
    )
    .with_settings_file(&file);
    session.tick(at(18, 8, 0));
    assert_eq!(session.sink().alarm_count(), 1);

    // `equilibrio settings set sound.muted true` elsewhere.
    let mut edited = Settings::load_from(&file).unwrap();
    edited.sound.muted = true;
    edited.save_to(&file).unwrap();
    let start = session.tick(at(18, 10, 0));
    assert!(matches!(&start[..], [Reminder::BlockStart { play_alarm: false, .. }]));
    assert_eq!(session.sink().alarm_count(), 1);

    // An invalid hand edit is ignored and the last good settings stay.
    std::fs::write(&file, "[reminders]\nlead_time_minutes = -5\n").unwrap();
    let pre = session.tick(at(18, 10, 10));
    assert_eq!(fired_blocks(&pre), [(NotificationKind::PreNotify, "mp-work".to_string())]);
    assert!(session.settings().sound.muted);
}
