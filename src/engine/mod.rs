mod availability;
mod conflicts;
mod review;
mod types;

pub use review::{
    classify, classify_days, AlertRenderer, TextAlert, REVIEW_WINDOW_DAYS, URGENT_THRESHOLD_DAYS,
};
pub use types::{
    AvailabilityReport, ConflictReport, LeaveConflict, RankAvailability, ReviewAlert, ReviewState,
    ReviewSummary, SeniorityComparison, Severity, StaffingStatus,
};

use crate::config::{EngineConfig, StaffingPolicy};
use crate::error::RosterError;
use crate::model::{DateRange, Fleet, LeaveRequest, LeaveRequestId, Pilot, PilotId};
use crate::period::PeriodCalculator;
use availability::LeaveFilter;
use chrono::NaiveDate;

/// Moteur d'éligibilité des congés : calcul pur sur un instantané `Fleet`.
///
/// Ne lit jamais l'horloge et ne modifie rien ; partageable entre threads.
#[derive(Debug, Clone, Copy)]
pub struct LeaveEngine {
    calculator: PeriodCalculator,
    policy: StaffingPolicy,
}

impl LeaveEngine {
    pub fn new(calculator: PeriodCalculator, policy: StaffingPolicy) -> Self {
        Self { calculator, policy }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, RosterError> {
        Ok(Self::new(config.calculator()?, config.staffing()))
    }

    pub fn calculator(&self) -> &PeriodCalculator {
        &self.calculator
    }

    pub fn policy(&self) -> &StaffingPolicy {
        &self.policy
    }

    /// Demandes concurrentes du même rang, triées par ancienneté.
    #[cfg_attr(
        feature = "logging",
        tracing::instrument(level = "debug", skip(self, fleet), fields(pilot = %pilot_id.as_str()))
    )]
    pub fn detect_conflicts(
        &self,
        fleet: &Fleet,
        pilot_id: &PilotId,
        range: &DateRange,
        exclude: Option<&LeaveRequestId>,
    ) -> Result<ConflictReport, RosterError> {
        let pilot = fleet.require_pilot(pilot_id)?;
        self.detect_conflicts_for(fleet, pilot, range, exclude)
    }

    /// Variante pour un pilote qui n'est pas (encore) dans l'instantané.
    pub fn detect_conflicts_for(
        &self,
        fleet: &Fleet,
        pilot: &Pilot,
        range: &DateRange,
        exclude: Option<&LeaveRequestId>,
    ) -> Result<ConflictReport, RosterError> {
        conflicts::detect_conflicts(&self.calculator, fleet, pilot, range, exclude)
    }

    /// Conflits d'une demande existante, elle-même exclue.
    pub fn conflicts_for_request(
        &self,
        fleet: &Fleet,
        request_id: &LeaveRequestId,
    ) -> Result<ConflictReport, RosterError> {
        let request = fleet.require_request(request_id)?;
        let pilot = fleet.require_pilot(&request.pilot_id)?;
        self.detect_conflicts_for(fleet, pilot, &request.range()?, Some(request_id))
    }

    /// Effectif disponible par rang sur `range`, avec la politique configurée.
    #[cfg_attr(
        feature = "logging",
        tracing::instrument(level = "debug", skip(self, fleet, range), fields(range = %range))
    )]
    pub fn check_availability(
        &self,
        fleet: &Fleet,
        range: &DateRange,
        exclude: Option<&LeaveRequestId>,
    ) -> Result<AvailabilityReport, RosterError> {
        self.check_availability_with(fleet, range, &self.policy, exclude)
    }

    pub fn check_availability_with(
        &self,
        fleet: &Fleet,
        range: &DateRange,
        policy: &StaffingPolicy,
        exclude: Option<&LeaveRequestId>,
    ) -> Result<AvailabilityReport, RosterError> {
        availability::check_availability(
            fleet,
            range,
            policy,
            LeaveFilter {
                exclude,
                assume_approved: None,
            },
        )
    }

    /// Effectif sur les dates de la demande si elle était approuvée.
    pub fn project_approval(
        &self,
        fleet: &Fleet,
        request_id: &LeaveRequestId,
    ) -> Result<AvailabilityReport, RosterError> {
        let request = fleet.require_request(request_id)?;
        availability::check_availability(
            fleet,
            &request.range()?,
            &self.policy,
            LeaveFilter {
                exclude: None,
                assume_approved: Some(request_id),
            },
        )
    }

    /// Alerte de revue pour la période suivant celle de `now`.
    pub fn review_alert(
        &self,
        now: NaiveDate,
        renderer: &dyn AlertRenderer,
    ) -> Result<ReviewAlert, RosterError> {
        let next = self
            .calculator
            .next_period(&self.calculator.current_period(now)?)?;
        review::classify(now, &next, renderer)
    }

    pub fn pending_for_review<'a>(
        &self,
        fleet: &'a Fleet,
        now: NaiveDate,
    ) -> Result<Vec<&'a LeaveRequest>, RosterError> {
        review::pending_for_review(&self.calculator, fleet, now)
    }

    #[cfg_attr(
        feature = "logging",
        tracing::instrument(level = "debug", skip(self, fleet, renderer))
    )]
    pub fn review(
        &self,
        fleet: &Fleet,
        now: NaiveDate,
        renderer: &dyn AlertRenderer,
    ) -> Result<ReviewSummary, RosterError> {
        review::review(&self.calculator, fleet, now, renderer)
    }
}
