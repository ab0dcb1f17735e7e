#![forbid(unsafe_code)]
mod common;

use common::{at, calculator, d, engine, leave, pilot, range};
use crewroster::{io, Fleet, LeaveStatus, PilotId, Rank};
use std::fs;
use tempfile::tempdir;

fn fleet() -> Fleet {
    Fleet {
        revision: 3,
        pilots: vec![
            pilot("cpt-a", Rank::Captain, 5),
            pilot("cpt-b", Rank::Captain, 3),
            pilot("fo-x", Rank::FirstOfficer, 20),
        ],
        leave_requests: vec![leave(
            "b-1",
            "cpt-b",
            d(2025, 10, 22),
            d(2025, 10, 24),
            LeaveStatus::Approved,
            at(2025, 9, 2, 9),
        )],
    }
}

fn lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn conflicts_csv_lists_each_competing_request() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conflicts.csv");
    let report = engine(1, 1)
        .detect_conflicts(
            &fleet(),
            &PilotId::new("cpt-a"),
            &range(d(2025, 10, 20), d(2025, 10, 25)),
            None,
        )
        .unwrap();

    io::export_conflicts_csv(&path, &report).unwrap();
    assert_eq!(
        lines(&path),
        [
            "request_id,pilot,seniority_number,start_date,end_date,status,has_priority",
            "b-1,CPT-B,3,2025-10-22,2025-10-24,Approved,true",
        ]
    );
}

#[test]
fn availability_csv_has_one_row_per_rank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("availability.csv");
    let report = engine(1, 1)
        .check_availability(&fleet(), &range(d(2025, 10, 20), d(2025, 10, 25)), None)
        .unwrap();

    io::export_availability_csv(&path, &report).unwrap();
    assert_eq!(
        lines(&path),
        [
            "rank,total,on_leave,available,minimum,meets_minimum",
            "Captain,2,1,1,1,true",
            "FirstOfficer,1,0,1,1,true",
        ]
    );
}

#[test]
fn periods_csv_follows_range_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("periods.csv");
    let periods: Vec<_> = calculator()
        .periods_in_range(&range(d(2025, 11, 1), d(2025, 12, 10)))
        .unwrap()
        .collect();

    io::export_periods_csv(&path, &periods).unwrap();
    assert_eq!(
        lines(&path),
        [
            "code,number,year,start_date,end_date",
            "RP12/2025,12,2025,2025-10-11,2025-11-07",
            "RP13/2025,13,2025,2025-11-08,2025-12-05",
            "RP1/2026,1,2026,2025-12-06,2026-01-02",
        ]
    );
}

#[test]
fn fleet_json_export_reloads_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fleet-export.json");
    let fleet = fleet();

    io::export_fleet_json(&path, &fleet).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["revision"], 3);
    assert_eq!(json["leaveRequests"][0]["id"], "b-1");
    assert_eq!(json["leaveRequests"][0]["status"], "Approved");

    let reloaded: Fleet = serde_json::from_str(&raw).unwrap();
    assert_eq!(reloaded, fleet);
}
