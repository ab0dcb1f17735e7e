#![forbid(unsafe_code)]
//! Crewroster — moteur de périodes de roster et d'éligibilité des congés.
//!
//! - Périodes fixes de 28 jours, ancre versionnée injectée au démarrage.
//! - Conflits de congés par rang, classés par ancienneté.
//! - Effectif minimum par rang, seuils configurés.
//! - Échéance de revue avant la prochaine période.
//! - Calcul pur : `now`/`today` toujours passés en paramètre, aucune BD.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
#[cfg(feature = "logging")]
pub mod logging;
pub mod model;
pub mod period;
pub mod storage;

pub use config::{AnchorVersion, EngineConfig, StaffingPolicy};
pub use engine::{
    AlertRenderer, AvailabilityReport, ConflictReport, LeaveConflict, LeaveEngine,
    RankAvailability, ReviewAlert, ReviewState, ReviewSummary, SeniorityComparison, Severity,
    StaffingStatus, TextAlert,
};
pub use error::RosterError;
pub use model::{
    parse_date, DateRange, Fleet, LeaveRequest, LeaveRequestId, LeaveStatus, Pilot, PilotId, Rank,
};
pub use period::{PeriodCalculator, PeriodOverview, PeriodRange, ReferenceAnchor, RosterPeriod};
pub use storage::{JsonStorage, Storage};
