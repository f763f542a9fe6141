// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use schedctl_adapters::{FakeScheduler, SchedulerCall};
use schedctl_core::{FakeClock, LogonKind, TaskState, TriggerSpec, ValidationError};
use std::time::Duration;
use yare::parameterized;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn jobs() -> FolderPath {
    FolderPath::parse("\\Jobs").unwrap()
}

struct Setup {
    fake: FakeScheduler,
    clock: FakeClock,
    registry: TaskRegistry<FakeScheduler, FakeClock>,
}

fn setup_at(now: NaiveDateTime) -> Setup {
    let clock = FakeClock::at(now);
    let fake = FakeScheduler::with_clock(clock.clone());
    let registry = TaskRegistry::new(
        fake.clone(),
        TriggerFactory::new(clock.clone()),
        TaskDefinitionBuilder::new("tester"),
    );
    Setup {
        fake,
        clock,
        registry,
    }
}

fn setup() -> Setup {
    setup_at(at(2025, 1, 1, 8, 0))
}

fn job(name: &str) -> TaskParams {
    TaskParams::new(name, "/usr/bin/foo").with_folder(jobs())
}

fn sorted_names(tasks: &[RegisteredTask]) -> Vec<String> {
    let mut names: Vec<String> = tasks.iter().map(|t| t.name.clone()).collect();
    names.sort();
    names
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn daily_without_time_starts_within_default_delay() {
    let s = setup();
    let now = s.clock.now();

    let task = s.registry.register(&job("Soon"), "daily", None).unwrap();

    let next = task.next_run_time.unwrap();
    assert!(next >= now, "{next} is before {now}");
    assert!(next <= now + chrono::Duration::minutes(2), "{next} is too late");
}

#[test]
fn default_delay_is_configurable() {
    let clock = FakeClock::at(at(2025, 1, 1, 8, 0));
    let fake = FakeScheduler::with_clock(clock.clone());
    let registry = TaskRegistry::new(
        fake,
        TriggerFactory::new(clock).with_default_delay(Duration::from_secs(600)),
        TaskDefinitionBuilder::new("tester"),
    );

    let task = registry.register(&job("Later"), "once", None).unwrap();

    assert_eq!(task.next_run_time, Some(at(2025, 1, 1, 8, 10)));
}

#[test]
fn register_twice_matches_single_registration() {
    let once = setup();
    once.registry
        .register(&job("Nightly"), "daily", Some("2025-01-01T09:00:00"))
        .unwrap();
    let expected = once.fake.task(&jobs(), "Nightly").unwrap().definition;

    let twice = setup();
    for _ in 0..2 {
        twice
            .registry
            .register(&job("Nightly"), "daily", Some("2025-01-01T09:00:00"))
            .unwrap();
    }
    let actual = twice.fake.task(&jobs(), "Nightly").unwrap().definition;

    similar_asserts::assert_eq!(actual, expected);
    assert!(matches!(actual.trigger, Some(TriggerSpec::Daily { .. })));
    assert_eq!(twice.registry.list(&jobs()).unwrap().len(), 1);
}

#[test]
fn register_replaces_existing_definition() {
    let s = setup();
    s.registry
        .register(&job("Nightly"), "daily", Some("2025-01-01T09:00:00"))
        .unwrap();
    s.registry
        .register(
            &job("Nightly").with_arguments("--full"),
            "once",
            Some("2025-02-01T10:00:00"),
        )
        .unwrap();

    let task = s.fake.task(&jobs(), "Nightly").unwrap();
    assert_eq!(task.definition.action.arguments, "--full");
    assert_eq!(
        task.definition.trigger,
        Some(TriggerSpec::Once {
            run_at: at(2025, 2, 1, 10, 0)
        })
    );
}

#[test]
fn delete_removes_task_from_listing() {
    let s = setup();
    s.registry.register(&job("Keep"), "logon", None).unwrap();
    s.registry.register(&job("Drop"), "logon", None).unwrap();

    s.registry.delete("Drop", &jobs()).unwrap();

    let names = sorted_names(&s.registry.list(&jobs()).unwrap());
    assert_eq!(names, vec!["Keep".to_string()]);
}

#[test]
fn list_reads_fresh_records_each_call() {
    let s = setup();
    s.registry.register(&job("B"), "logon", None).unwrap();
    assert_eq!(sorted_names(&s.registry.list(&jobs()).unwrap()), vec!["B"]);

    s.registry.register(&job("A"), "logon", None).unwrap();
    s.registry.register(&job("C"), "logon", None).unwrap();
    assert_eq!(
        sorted_names(&s.registry.list(&jobs()).unwrap()),
        vec!["A", "B", "C"]
    );
}

#[parameterized(
    unsupported_kind = { TaskParams::new("Job", "/bin/x"), "weekly", None },
    empty_kind = { TaskParams::new("Job", "/bin/x"), "", None },
    bad_time = { TaskParams::new("Job", "/bin/x"), "daily", Some("tomorrow") },
    bad_time_with_logon = { TaskParams::new("Job", "/bin/x"), "logon", Some("09:00") },
    empty_name = { TaskParams::new("", "/bin/x"), "daily", None },
    separator_in_name = { TaskParams::new("a\\b", "/bin/x"), "daily", None },
    padded_name = { TaskParams::new(" Job ", "/bin/x"), "daily", None },
    empty_exe = { TaskParams::new("Job", ""), "daily", None },
    password_without_user = {
        TaskParams::new("Job", "/bin/x").with_logon(LogonKind::Password, None, Some("pw".into())),
        "daily",
        None
    },
)]
fn invalid_register_makes_no_service_calls(params: TaskParams, kind: &str, when: Option<&str>) {
    let s = setup();

    let err = s.registry.register(&params, kind, when).unwrap_err();

    assert!(matches!(err, RegistryError::Validation(_)), "{err}");
    assert_eq!(s.fake.call_count(), 0);
}

#[test]
fn unsupported_trigger_names_the_kind() {
    let s = setup();

    let err = s
        .registry
        .register(&job("Job"), "hourly", None)
        .unwrap_err();

    match err {
        RegistryError::Validation(ValidationError::UnsupportedTriggerKind(kind)) => {
            assert_eq!(kind, "hourly");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn daily_job_creates_folder_and_reports_next_run() {
    let s = setup_at(at(2024, 12, 31, 12, 0));
    assert!(!s.fake.has_folder(&jobs()));

    s.registry
        .register(&job("DailyJob"), "daily", Some("2025-01-01T09:00:00"))
        .unwrap();

    assert!(s.fake.has_folder(&jobs()));
    let tasks = s.registry.list(&jobs()).unwrap();
    let daily = tasks.iter().find(|t| t.name == "DailyJob").unwrap();
    assert_eq!(daily.next_run_time, Some(at(2025, 1, 1, 9, 0)));
    assert_eq!(daily.path, "\\Jobs\\DailyJob");
}

#[test]
fn once_in_the_past_still_registers() {
    let s = setup();

    let task = s
        .registry
        .register(&job("Missed"), "once", Some("2020-01-01T00:00:00"))
        .unwrap();

    assert_eq!(task.state, TaskState::Ready);
    assert_eq!(task.next_run_time, None);
    assert_eq!(
        s.fake.task(&jobs(), "Missed").unwrap().definition.trigger,
        Some(TriggerSpec::Once {
            run_at: at(2020, 1, 1, 0, 0)
        })
    );
}

#[test]
fn run_unregistered_task_is_not_found() {
    let s = setup();

    let err = s.registry.run("Ghost", &jobs()).unwrap_err();

    match err {
        RegistryError::NotFound { name, folder } => {
            assert_eq!(name, "Ghost");
            assert_eq!(folder, jobs());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn run_after_delete_is_not_found() {
    let s = setup();
    s.registry
        .register(&job("Job1"), "daily", Some("2025-01-01T09:00:00"))
        .unwrap();
    s.registry.delete("Job1", &jobs()).unwrap();

    let err = s.registry.run("Job1", &jobs()).unwrap_err();

    assert!(matches!(err, RegistryError::NotFound { .. }), "{err}");
}

#[test]
fn empty_name_fails_before_folder_lookup() {
    let s = setup();

    let err = s
        .registry
        .register(&TaskParams::new("", "/bin/x"), "daily", None)
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::EmptyName)
    ));
    assert!(s.fake.calls().is_empty());
    assert!(s.fake.created_folders().is_empty());
}

// =============================================================================
// Credentials and service failures
// =============================================================================

#[test]
fn interactive_logon_forwards_no_user() {
    let s = setup();
    s.registry.register(&job("Job"), "logon", None).unwrap();

    assert!(s.fake.calls().contains(&SchedulerCall::RegisterTask {
        folder: jobs(),
        name: "Job".to_string(),
        logon: LogonKind::Interactive,
        user_id: None,
    }));
}

#[test]
fn service_logon_defaults_to_system_account() {
    let s = setup();
    let params = job("Job").with_logon(LogonKind::ServiceAccount, None, None);

    s.registry.register(&params, "logon", None).unwrap();

    assert!(s.fake.calls().contains(&SchedulerCall::RegisterTask {
        folder: jobs(),
        name: "Job".to_string(),
        logon: LogonKind::ServiceAccount,
        user_id: Some("SYSTEM".to_string()),
    }));
}

#[test]
fn bad_password_is_an_authentication_error() {
    let s = setup();
    s.fake.add_account("svc", "right");
    let params = job("Job").with_logon(
        LogonKind::Password,
        Some("svc".to_string()),
        Some("wrong".to_string()),
    );

    let err = s.registry.register(&params, "daily", None).unwrap_err();

    assert!(matches!(err, RegistryError::Authentication { .. }), "{err}");
    assert!(s.fake.task(&jobs(), "Job").is_none());
}

#[test]
fn rejected_registration_carries_name_and_folder() {
    let s = setup();
    s.fake.reject_registrations("quota exceeded");

    let err = s.registry.register(&job("Job"), "daily", None).unwrap_err();

    assert!(matches!(err, RegistryError::Registration { .. }), "{err}");
    assert_eq!(err.task_name(), Some("Job"));
    assert_eq!(err.folder(), Some(&jobs()));
    assert!(err.to_string().contains("quota exceeded"));
}

#[test]
fn unavailable_service_is_a_connection_error() {
    let s = setup();
    s.fake.set_unavailable("service stopped");

    let err = s.registry.list(&FolderPath::root()).unwrap_err();

    assert!(matches!(err, RegistryError::Connection(_)), "{err}");
}

#[test]
fn denied_folder_creation_is_a_folder_error() {
    let s = setup();
    s.fake.deny_folder_creation();

    let err = s.registry.register(&job("Job"), "daily", None).unwrap_err();

    assert!(
        matches!(err, RegistryError::FolderResolution { ref path, .. } if *path == jobs()),
        "{err}"
    );
}

#[test]
fn run_requests_a_run() {
    let s = setup();
    s.registry.register(&job("Job"), "logon", None).unwrap();

    s.registry.run("Job", &jobs()).unwrap();

    let task = s.fake.task(&jobs(), "Job").unwrap();
    assert_eq!(task.run_count, 1);
    assert_eq!(task.state, TaskState::Running);
}

#[test]
fn run_disabled_task_is_a_service_error() {
    let s = setup();
    s.registry.register(&job("Job"), "logon", None).unwrap();
    s.fake.set_state(&jobs(), "Job", TaskState::Disabled);

    let err = s.registry.run("Job", &jobs()).unwrap_err();

    assert!(
        matches!(err, RegistryError::Service { operation: "run", .. }),
        "{err}"
    );
    assert!(err.to_string().contains("\\Jobs\\Job"));
}

#[test]
fn delete_missing_task_is_not_found() {
    let s = setup();

    let err = s.registry.delete("Ghost", &jobs()).unwrap_err();

    assert!(matches!(err, RegistryError::NotFound { .. }), "{err}");
    assert_eq!(err.to_string(), "task 'Ghost' not found in folder \\Jobs");
}

// =============================================================================
// Prepare
// =============================================================================

#[test]
fn prepare_makes_no_service_calls() {
    let s = setup();

    let prepared = s
        .registry
        .prepare(&job("Job"), "daily", Some("2025-01-01T09:00:00"))
        .unwrap();

    assert_eq!(prepared.path(), "\\Jobs\\Job");
    assert_eq!(prepared.definition.registration.author, "tester");
    assert_eq!(s.fake.call_count(), 0);
}

#[test]
fn prepared_task_never_serializes_password() {
    let s = setup();
    let params = job("Job").with_logon(
        LogonKind::Password,
        Some("svc".to_string()),
        Some("hunter2".to_string()),
    );

    let prepared = s.registry.prepare(&params, "daily", None).unwrap();
    let json = serde_json::to_string(&prepared).unwrap();

    assert!(json.contains("\"user_id\":\"svc\""), "{json}");
    assert!(!json.contains("hunter2"), "{json}");
    assert!(!format!("{prepared:?}").contains("hunter2"));
    assert!(!prepared.to_string().contains("hunter2"));
}

#[test]
fn submit_registers_prepared_task() {
    let s = setup();
    let prepared = s.registry.prepare(&job("Job"), "logon", None).unwrap();

    let task = s.registry.submit(&prepared).unwrap();

    assert_eq!(task.path, prepared.path());
    assert_eq!(
        s.fake.task(&jobs(), "Job").unwrap().definition,
        prepared.definition
    );
}
