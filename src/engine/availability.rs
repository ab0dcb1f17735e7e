use super::types::{AvailabilityReport, RankAvailability, StaffingStatus};
use crate::config::StaffingPolicy;
use crate::error::RosterError;
use crate::model::{DateRange, Fleet, LeaveRequestId, LeaveStatus, Pilot, PilotId, Rank};
use std::collections::{HashMap, HashSet};

/// Quelles demandes comptent comme absence.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LeaveFilter<'a> {
    /// Ignorée même si Approved.
    pub exclude: Option<&'a LeaveRequestId>,
    /// Comptée comme si elle était déjà Approved.
    pub assume_approved: Option<&'a LeaveRequestId>,
}

impl LeaveFilter<'_> {
    fn counts(&self, id: &LeaveRequestId, status: LeaveStatus) -> bool {
        if self.exclude == Some(id) {
            return false;
        }
        status == LeaveStatus::Approved || self.assume_approved == Some(id)
    }
}

pub(super) fn check_availability(
    fleet: &Fleet,
    range: &DateRange,
    policy: &StaffingPolicy,
    filter: LeaveFilter<'_>,
) -> Result<AvailabilityReport, RosterError> {
    let active: HashMap<&PilotId, &Pilot> = fleet
        .pilots
        .iter()
        .filter(|p| p.active)
        .map(|p| (&p.id, p))
        .collect();

    let mut away: HashSet<&PilotId> = HashSet::new();
    for request in &fleet.leave_requests {
        if !filter.counts(&request.id, request.status) || !active.contains_key(&request.pilot_id) {
            continue;
        }
        if request.range()?.overlaps(range) {
            away.insert(&request.pilot_id);
        }
    }

    let per_rank = |rank: Rank| {
        let total = active.values().filter(|p| p.rank == rank).count();
        let on_leave = away
            .iter()
            .filter(|id| active.get(*id).is_some_and(|p| p.rank == rank))
            .count();
        RankAvailability::compute(
            u32::try_from(total).unwrap_or(u32::MAX),
            u32::try_from(on_leave).unwrap_or(u32::MAX),
            policy.minimum_for(rank),
        )
    };

    let captains = per_rank(Rank::Captain);
    let first_officers = per_rank(Rank::FirstOfficer);
    let overall_status = if captains.meets_minimum && first_officers.meets_minimum {
        StaffingStatus::Sufficient
    } else {
        StaffingStatus::Insufficient
    };

    Ok(AvailabilityReport {
        range: *range,
        captains,
        first_officers,
        overall_status,
    })
}
