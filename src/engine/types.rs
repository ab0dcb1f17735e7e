use crate::model::{DateRange, LeaveRequestId, LeaveStatus, PilotId, Rank};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Demande concurrente, même rang, dates qui se chevauchent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveConflict {
    pub request_id: LeaveRequestId,
    pub pilot_id: PilotId,
    pub pilot_name: String,
    pub rank: Rank,
    pub seniority_number: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    /// Jours communs avec l'intervalle demandé.
    pub overlap: DateRange,
    /// Le pilote concurrent est plus ancien que le demandeur.
    pub has_priority: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeniorityComparison {
    pub pilot_name: String,
    pub seniority_number: i32,
    pub has_priority: bool,
    pub request_status: LeaveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflict_count: usize,
    pub conflicts: Vec<LeaveConflict>,
    pub seniority_comparison: Vec<SeniorityComparison>,
    /// Codes des périodes couvertes par l'intervalle demandé.
    pub roster_periods: Vec<String>,
}

impl ConflictReport {
    pub(crate) fn from_conflicts(
        conflicts: Vec<LeaveConflict>,
        roster_periods: Vec<String>,
    ) -> Self {
        let seniority_comparison = conflicts
            .iter()
            .map(|c| SeniorityComparison {
                pilot_name: c.pilot_name.clone(),
                seniority_number: c.seniority_number,
                has_priority: c.has_priority,
                request_status: c.status,
            })
            .collect();
        Self {
            has_conflicts: !conflicts.is_empty(),
            conflict_count: conflicts.len(),
            conflicts,
            seniority_comparison,
            roster_periods,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankAvailability {
    pub total: u32,
    pub on_leave: u32,
    pub available: u32,
    pub minimum: u32,
    pub meets_minimum: bool,
    /// Pilotes manquants pour atteindre le minimum (0 si atteint).
    pub shortfall: u32,
}

impl RankAvailability {
    pub(crate) fn compute(total: u32, on_leave: u32, minimum: u32) -> Self {
        let available = total.saturating_sub(on_leave);
        Self {
            total,
            on_leave,
            available,
            minimum,
            meets_minimum: available >= minimum,
            shortfall: minimum.saturating_sub(available),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffingStatus {
    Sufficient,
    Insufficient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub range: DateRange,
    pub captains: RankAvailability,
    pub first_officers: RankAvailability,
    pub overall_status: StaffingStatus,
}

impl AvailabilityReport {
    pub fn for_rank(&self, rank: Rank) -> &RankAvailability {
        match rank {
            Rank::Captain => &self.captains,
            Rank::FirstOfficer => &self.first_officers,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        self.overall_status == StaffingStatus::Sufficient
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Urgent,
}

/// État dérivé de la fenêtre de revue, recalculé à chaque appel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Plus de 22 jours avant la prochaine période.
    OutsideWindow,
    /// 8 à 22 jours.
    Warning,
    /// 0 à 7 jours.
    Urgent,
    /// La prochaine période a déjà commencé.
    Overdue,
}

impl ReviewState {
    pub fn severity(self) -> Severity {
        match self {
            ReviewState::OutsideWindow => Severity::Info,
            ReviewState::Warning => Severity::Warning,
            ReviewState::Urgent | ReviewState::Overdue => Severity::Urgent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAlert {
    pub severity: Severity,
    pub state: ReviewState,
    pub message: String,
    pub period_code: String,
    pub days_until_roster_starts: i64,
    pub review_deadline_date: NaiveDate,
    pub days_remaining_in_window: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub alert: ReviewAlert,
    /// Demandes Pending visant la prochaine période, par date de début.
    pub pending_request_ids: Vec<LeaveRequestId>,
}
