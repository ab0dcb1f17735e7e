use super::types::{ReviewAlert, ReviewState, ReviewSummary};
use crate::error::RosterError;
use crate::model::{shift_days, DateRange, Fleet, LeaveRequest, LeaveStatus};
use crate::period::{PeriodCalculator, RosterPeriod};
use chrono::NaiveDate;

/// Durée de la fenêtre de revue avant le début de la prochaine période.
pub const REVIEW_WINDOW_DAYS: i64 = 22;
/// En dessous (inclus), la revue devient urgente.
pub const URGENT_THRESHOLD_DAYS: i64 = 7;

/// Permet de customiser le texte de l'alerte (bannière, mail, etc.).
pub trait AlertRenderer {
    fn render(
        &self,
        state: ReviewState,
        next: &RosterPeriod,
        days_until: i64,
        window_opens: NaiveDate,
    ) -> String;
}

/// Texte court pour une bannière de tableau de bord.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextAlert;

impl AlertRenderer for TextAlert {
    fn render(
        &self,
        state: ReviewState,
        next: &RosterPeriod,
        days_until: i64,
        window_opens: NaiveDate,
    ) -> String {
        let code = &next.code;
        let start = next.start_date;
        match state {
            ReviewState::OutsideWindow => format!(
                "{code} starts {start} (in {days_until} days); review window opens {window_opens}"
            ),
            ReviewState::Warning => format!(
                "{code} starts {start} (in {days_until} days); review window open since {window_opens}, finalize pending leave requests"
            ),
            ReviewState::Urgent => format!(
                "{code} starts {start} (in {days_until} days); finalize pending leave requests now"
            ),
            ReviewState::Overdue => format!(
                "{code} started {start} ({} days ago) with unresolved leave requests",
                -days_until
            ),
        }
    }
}

pub fn classify_days(days_until: i64) -> ReviewState {
    if days_until < 0 {
        ReviewState::Overdue
    } else if days_until <= URGENT_THRESHOLD_DAYS {
        ReviewState::Urgent
    } else if days_until <= REVIEW_WINDOW_DAYS {
        ReviewState::Warning
    } else {
        ReviewState::OutsideWindow
    }
}

/// Classe `now` par rapport au début de `next`. Pur, sans horloge système.
pub fn classify(
    now: NaiveDate,
    next: &RosterPeriod,
    renderer: &dyn AlertRenderer,
) -> Result<ReviewAlert, RosterError> {
    let days_until = (next.start_date - now).num_days();
    let state = classify_days(days_until);
    let review_deadline_date = shift_days(next.start_date, -REVIEW_WINDOW_DAYS)?;

    #[cfg(feature = "logging")]
    if state == ReviewState::Overdue {
        tracing::warn!(
            period = %next.code,
            days_late = -days_until,
            "roster period started before review"
        );
    }

    Ok(ReviewAlert {
        severity: state.severity(),
        state,
        message: renderer.render(state, next, days_until, review_deadline_date),
        period_code: next.code.clone(),
        days_until_roster_starts: days_until,
        review_deadline_date,
        days_remaining_in_window: days_until.max(0),
    })
}

/// Demandes Pending qui chevauchent la période suivant celle de `now`.
///
/// Les demandes de la période courante sont déjà engagées ; celles au-delà
/// de la suivante ne sont pas encore dues.
pub(super) fn pending_for_review<'a>(
    calc: &PeriodCalculator,
    fleet: &'a Fleet,
    now: NaiveDate,
) -> Result<Vec<&'a LeaveRequest>, RosterError> {
    let next = calc.next_period(&calc.current_period(now)?)?;
    let window = DateRange::new(next.start_date, next.end_date)?;

    let mut due = Vec::new();
    for request in &fleet.leave_requests {
        if request.status == LeaveStatus::Pending && request.range()?.overlaps(&window) {
            due.push(request);
        }
    }
    due.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    Ok(due)
}

pub(super) fn review(
    calc: &PeriodCalculator,
    fleet: &Fleet,
    now: NaiveDate,
    renderer: &dyn AlertRenderer,
) -> Result<ReviewSummary, RosterError> {
    let next = calc.next_period(&calc.current_period(now)?)?;
    let alert = classify(now, &next, renderer)?;
    let pending_request_ids = pending_for_review(calc, fleet, now)?
        .into_iter()
        .map(|r| r.id.clone())
        .collect();
    Ok(ReviewSummary {
        alert,
        pending_request_ids,
    })
}
