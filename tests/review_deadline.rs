#![forbid(unsafe_code)]
mod common;

use chrono::Duration;
use common::{at, calculator, d, engine, leave, pilot};
use crewroster::engine::{classify, classify_days};
use crewroster::{Fleet, LeaveStatus, Rank, ReviewState, Severity, TextAlert};

#[test]
fn window_boundaries() {
    assert_eq!(classify_days(23), ReviewState::OutsideWindow);
    assert_eq!(classify_days(22), ReviewState::Warning);
    assert_eq!(classify_days(8), ReviewState::Warning);
    assert_eq!(classify_days(7), ReviewState::Urgent);
    assert_eq!(classify_days(0), ReviewState::Urgent);
    assert_eq!(classify_days(-1), ReviewState::Overdue);

    assert_eq!(ReviewState::OutsideWindow.severity(), Severity::Info);
    assert_eq!(ReviewState::Overdue.severity(), Severity::Urgent);
}

#[test]
fn alert_fields_follow_next_period_start() {
    let next = calculator().period_for_date(d(2025, 11, 8)).unwrap();

    for (days, state) in [
        (23, ReviewState::OutsideWindow),
        (22, ReviewState::Warning),
        (7, ReviewState::Urgent),
        (-3, ReviewState::Overdue),
    ] {
        let now = next.start_date - Duration::days(days);
        let alert = classify(now, &next, &TextAlert).unwrap();
        assert_eq!(alert.state, state);
        assert_eq!(alert.days_until_roster_starts, days);
        assert_eq!(alert.review_deadline_date, d(2025, 10, 17));
        assert_eq!(alert.days_remaining_in_window, days.max(0));
        assert_eq!(alert.period_code, "RP13/2025");
    }
}

#[test]
fn overdue_is_reported_not_dropped() {
    let next = calculator().period_for_date(d(2025, 11, 8)).unwrap();
    let alert = classify(d(2025, 11, 10), &next, &TextAlert).unwrap();
    assert_eq!(alert.severity, Severity::Urgent);
    assert_eq!(alert.state, ReviewState::Overdue);
    insta::assert_snapshot!(
        alert.message.as_str(),
        @"RP13/2025 started 2025-11-08 (2 days ago) with unresolved leave requests"
    );
}

#[test]
fn engine_alert_uses_the_period_after_today() {
    let alert = engine(10, 10)
        .review_alert(d(2025, 10, 17), &TextAlert)
        .unwrap();
    assert_eq!(alert.days_until_roster_starts, 22);
    assert_eq!(alert.severity, Severity::Warning);
    insta::assert_snapshot!(
        alert.message.as_str(),
        @"RP13/2025 starts 2025-11-08 (in 22 days); review window open since 2025-10-17, finalize pending leave requests"
    );

    let json = serde_json::to_value(&alert).unwrap();
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["state"], "WARNING");
    assert_eq!(json["reviewDeadlineDate"], "2025-10-17");
}

#[test]
fn only_pending_requests_for_the_next_period_are_due() {
    let fleet = Fleet {
        revision: 0,
        pilots: vec![pilot("a", Rank::Captain, 1), pilot("b", Rank::FirstOfficer, 2)],
        leave_requests: vec![
            // période courante (RP12/2025) : déjà engagée
            leave(
                "current",
                "a",
                d(2025, 10, 20),
                d(2025, 10, 22),
                LeaveStatus::Pending,
                at(2025, 9, 1, 9),
            ),
            // à cheval RP12 / RP13
            leave(
                "straddle",
                "a",
                d(2025, 11, 5),
                d(2025, 11, 10),
                LeaveStatus::Pending,
                at(2025, 9, 2, 9),
            ),
            // RP13/2025
            leave(
                "next",
                "b",
                d(2025, 11, 20),
                d(2025, 11, 22),
                LeaveStatus::Pending,
                at(2025, 9, 1, 9),
            ),
            leave(
                "decided",
                "b",
                d(2025, 11, 9),
                d(2025, 11, 12),
                LeaveStatus::Approved,
                at(2025, 9, 1, 9),
            ),
            // RP1/2026 : pas encore dû
            leave(
                "later",
                "b",
                d(2025, 12, 8),
                d(2025, 12, 9),
                LeaveStatus::Pending,
                at(2025, 9, 1, 9),
            ),
        ],
    };

    let engine = engine(10, 10);
    assert_eq!(engine.pending_for_review(&fleet, d(2025, 10, 17)).unwrap().len(), 2);

    let summary = engine.review(&fleet, d(2025, 10, 17), &TextAlert).unwrap();
    let ids: Vec<&str> = summary.pending_request_ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, ["straddle", "next"]);
    assert_eq!(summary.alert.state, ReviewState::Warning);
}
