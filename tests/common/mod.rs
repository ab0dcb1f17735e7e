#![allow(dead_code)]
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use crewroster::{
    DateRange, EngineConfig, LeaveEngine, LeaveRequest, LeaveRequestId, LeaveStatus,
    PeriodCalculator, Pilot, PilotId, Rank, ReferenceAnchor, StaffingPolicy,
};

pub const ENGINE_JSON: &str = r#"{
  "periodsPerYear": 13,
  "anchors": [
    { "version": 1, "periodNumber": 12, "year": 2025, "periodStartDate": "2025-10-11" }
  ],
  "staffing": { "minCaptains": 10, "minFirstOfficers": 10 }
}"#;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn at(y: i32, m: u32, day: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, h, 0, 0).unwrap()
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}

/// RP12/2025 commence le 2025-10-11.
pub fn anchor() -> ReferenceAnchor {
    ReferenceAnchor {
        period_number: 12,
        year: 2025,
        period_start_date: d(2025, 10, 11),
    }
}

pub fn calculator() -> PeriodCalculator {
    PeriodCalculator::new(anchor(), 13).unwrap()
}

pub fn config(min_captains: u32, min_first_officers: u32) -> EngineConfig {
    EngineConfig::new(
        13,
        anchor(),
        StaffingPolicy {
            min_captains,
            min_first_officers,
        },
    )
    .unwrap()
}

pub fn engine(min_captains: u32, min_first_officers: u32) -> LeaveEngine {
    LeaveEngine::from_config(&config(min_captains, min_first_officers)).unwrap()
}

pub fn pilot(id: &str, rank: Rank, seniority: i32) -> Pilot {
    Pilot::new(id.to_uppercase(), rank, seniority).with_id(PilotId::new(id))
}

pub fn leave(
    id: &str,
    pilot_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: LeaveStatus,
    created_at: DateTime<Utc>,
) -> LeaveRequest {
    let mut req = LeaveRequest::new(PilotId::new(pilot_id), range(start, end), created_at)
        .with_id(LeaveRequestId::new(id));
    req.status = status;
    req
}
