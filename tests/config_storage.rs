#![forbid(unsafe_code)]
mod common;

use common::{anchor, at, config, d, leave, pilot, ENGINE_JSON};
use crewroster::{
    io, EngineConfig, Fleet, JsonStorage, LeaveEngine, LeaveStatus, Rank, ReferenceAnchor,
    RosterError, Storage,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_engine_config_from_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    fs::write(&path, ENGINE_JSON).unwrap();

    let config = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(config.periods_per_year(), 13);
    assert_eq!(config.active_anchor().unwrap().anchor, anchor());
    assert_eq!(config.staffing().min_captains, 10);

    let engine = LeaveEngine::from_config(&config).unwrap();
    let p = engine.calculator().period_for_date(d(2025, 10, 20)).unwrap();
    assert_eq!(p.code, "RP12/2025");
}

#[test]
fn refuses_to_compute_without_valid_configuration() {
    let missing_staffing = r#"{"periodsPerYear":13,"anchors":[{"version":1,"periodNumber":12,"year":2025,"periodStartDate":"2025-10-11"}]}"#;
    let no_anchor = r#"{"periodsPerYear":13,"anchors":[],"staffing":{"minCaptains":1,"minFirstOfficers":1}}"#;
    let out_of_range = r#"{"periodsPerYear":13,"anchors":[{"version":1,"periodNumber":14,"year":2025,"periodStartDate":"2025-10-11"}],"staffing":{"minCaptains":1,"minFirstOfficers":1}}"#;
    let bad_date = r#"{"periodsPerYear":13,"anchors":[{"version":1,"periodNumber":12,"year":2025,"periodStartDate":"NaN"}],"staffing":{"minCaptains":1,"minFirstOfficers":1}}"#;
    let unordered = r#"{"periodsPerYear":13,"anchors":[
        {"version":2,"periodNumber":12,"year":2025,"periodStartDate":"2025-10-11"},
        {"version":1,"periodNumber":1,"year":2025,"periodStartDate":"2024-12-07"}
    ],"staffing":{"minCaptains":1,"minFirstOfficers":1}}"#;

    for raw in [missing_staffing, no_anchor, out_of_range, bad_date, unordered] {
        assert!(
            matches!(
                EngineConfig::from_json(raw.as_bytes()),
                Err(RosterError::Configuration(_))
            ),
            "accepted: {raw}"
        );
    }

    let err = EngineConfig::load_from_file("/nonexistent/engine.json").unwrap_err();
    assert!(matches!(err, RosterError::Configuration(_)));
}

#[test]
fn anchor_migration_creates_a_new_version() {
    let original = config(10, 10);
    let redefined = ReferenceAnchor {
        period_number: 1,
        year: 2026,
        period_start_date: d(2026, 1, 3),
    };
    let migrated = original
        .migrate_anchor(redefined, "calendar realignment")
        .unwrap();

    assert_eq!(original.anchor_history().len(), 1);
    assert_eq!(migrated.anchor_history().len(), 2);
    let active = migrated.active_anchor().unwrap();
    assert_eq!(active.version, 2);
    assert_eq!(active.reason.as_deref(), Some("calendar realignment"));

    let calc = migrated.calculator().unwrap();
    assert_eq!(calc.period_for_date(d(2026, 1, 3)).unwrap().code, "RP1/2026");

    assert!(original.migrate_anchor(redefined, "  ").is_err());
    assert!(original.migrate_anchor(anchor(), "noop").is_err());
}

#[test]
fn migration_fails_cleanly_at_the_last_version() {
    let raw = format!(
        r#"{{"periodsPerYear":13,
            "anchors":[{{"version":{},"periodNumber":12,"year":2025,"periodStartDate":"2025-10-11"}}],
            "staffing":{{"minCaptains":1,"minFirstOfficers":1}}}}"#,
        u32::MAX
    );
    let config = EngineConfig::from_json(raw.as_bytes()).unwrap();
    let redefined = ReferenceAnchor {
        period_number: 1,
        year: 2026,
        period_start_date: d(2026, 1, 3),
    };

    let err = config.migrate_anchor(redefined, "calendar realignment").unwrap_err();
    assert_eq!(err, RosterError::Configuration("anchor version overflow".into()));
    assert_eq!(config.anchor_history().len(), 1);
}

#[test]
fn migrated_config_round_trips_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.json");
    let migrated = config(10, 10)
        .migrate_anchor(
            ReferenceAnchor {
                period_number: 2,
                year: 2026,
                period_start_date: d(2026, 1, 3),
            },
            "shift by one week",
        )
        .unwrap();
    migrated.save_to_file(&path).unwrap();
    assert_eq!(EngineConfig::load_from_file(&path).unwrap(), migrated);
}

#[test]
fn commit_rejects_stale_revision() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("fleet.json")).unwrap();

    let mut fleet = Fleet::default();
    fleet.pilots.push(pilot("a", Rank::Captain, 1));
    assert_eq!(storage.commit(&fleet, 0).unwrap(), 1);

    // deux lecteurs du même instantané
    let mut first = storage.load().unwrap();
    let mut second = storage.load().unwrap();
    first.leave_requests.push(leave(
        "r1",
        "a",
        d(2025, 10, 20),
        d(2025, 10, 21),
        LeaveStatus::Approved,
        at(2025, 9, 1, 9),
    ));
    second.leave_requests.push(leave(
        "r2",
        "a",
        d(2025, 10, 22),
        d(2025, 10, 23),
        LeaveStatus::Approved,
        at(2025, 9, 1, 9),
    ));

    assert_eq!(storage.commit(&first, first.revision).unwrap(), 2);
    let err = storage.commit(&second, second.revision).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RosterError>(),
        Some(&RosterError::StaleData {
            expected: 1,
            actual: 2
        })
    );

    let stored = storage.load().unwrap();
    assert_eq!(stored.revision, 2);
    assert_eq!(stored.leave_requests.len(), 1);
    assert_eq!(stored.leave_requests[0].id.as_str(), "r1");
}

#[test]
fn imports_pilots_and_leave_from_csv() {
    let dir = tempdir().unwrap();
    let pilots_csv = dir.path().join("pilots.csv");
    fs::write(
        &pilots_csv,
        "id,name,rank,seniority_number,active\n\
         p1,Kila Tau,Captain,3,yes\n\
         p2,Mary Oa,First Officer,12,\n\
         p3,John Api,FO,13,no\n",
    )
    .unwrap();
    let leave_csv = dir.path().join("leave.csv");
    fs::write(
        &leave_csv,
        "id,pilot_id,start_date,end_date,status,created_at\n\
         l1,p1,2025-10-20,2025-10-25,approved,2025-09-01T08:00:00Z\n\
         l2,p2,2025-11-01,2025-11-03,Pending,\n",
    )
    .unwrap();

    let pilots = io::import_pilots_csv(&pilots_csv).unwrap();
    assert_eq!(pilots.len(), 3);
    assert_eq!(pilots[1].rank, Rank::FirstOfficer);
    assert!(pilots[1].active);
    assert!(!pilots[2].active);

    let fallback = at(2025, 10, 1, 0);
    let requests = io::import_leave_csv(&leave_csv, fallback).unwrap();
    assert_eq!(requests[0].status, LeaveStatus::Approved);
    assert_eq!(requests[0].created_at, at(2025, 9, 1, 8));
    assert_eq!(requests[1].created_at, fallback);
    assert_eq!(requests[1].end_date, d(2025, 11, 3));
}

#[test]
fn leave_import_rejects_inverted_dates() {
    let dir = tempdir().unwrap();
    let leave_csv = dir.path().join("leave.csv");
    fs::write(
        &leave_csv,
        "id,pilot_id,start_date,end_date,status\nl1,p1,2025-10-25,2025-10-20,Pending\n",
    )
    .unwrap();
    let err = io::import_leave_csv(&leave_csv, at(2025, 10, 1, 0)).unwrap_err();
    assert!(format!("{err:#}").contains("invalid date range"));
}
