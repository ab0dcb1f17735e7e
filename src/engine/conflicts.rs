use super::types::{ConflictReport, LeaveConflict};
use crate::error::RosterError;
use crate::model::{DateRange, Fleet, LeaveRequestId, Pilot, PilotId};
use crate::period::PeriodCalculator;
use std::collections::HashMap;

pub(super) fn detect_conflicts(
    calc: &PeriodCalculator,
    fleet: &Fleet,
    pilot: &Pilot,
    range: &DateRange,
    exclude: Option<&LeaveRequestId>,
) -> Result<ConflictReport, RosterError> {
    let roster_periods = calc.periods_in_range(range)?.map(|p| p.code).collect();

    let pilots: HashMap<&PilotId, &Pilot> = fleet.pilots.iter().map(|p| (&p.id, p)).collect();
    let mut conflicts = Vec::new();

    for request in &fleet.leave_requests {
        if !request.status.is_live()
            || request.pilot_id == pilot.id
            || exclude == Some(&request.id)
        {
            continue;
        }
        // pilote absent de l'instantané : rang inconnu
        let Some(other) = pilots.get(&request.pilot_id) else {
            continue;
        };
        if other.rank != pilot.rank {
            continue;
        }
        let Some(overlap) = request.range()?.intersection(range) else {
            continue;
        };

        conflicts.push(LeaveConflict {
            request_id: request.id.clone(),
            pilot_id: other.id.clone(),
            pilot_name: other.name.clone(),
            rank: other.rank,
            seniority_number: other.seniority_number,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
            created_at: request.created_at,
            overlap,
            has_priority: other.seniority_number < pilot.seniority_number,
        });
    }

    // ancienneté, puis date de création : l'unicité de l'ancienneté n'est pas garantie
    conflicts.sort_by(|a, b| {
        a.seniority_number
            .cmp(&b.seniority_number)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.request_id.cmp(&b.request_id))
    });

    Ok(ConflictReport::from_conflicts(conflicts, roster_periods))
}
