use chrono::NaiveDate;
use thiserror::Error;

/// Erreurs du moteur de roster.
///
/// Aucune opération ne renvoie de résultat partiel : soit la valeur complète,
/// soit une de ces erreurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("invalid date {input:?}: {reason}")]
    InvalidDate { input: String, reason: String },
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid roster period code: {0}")]
    InvalidPeriodCode(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("stale data: expected revision {expected}, found {actual}")]
    StaleData { expected: u64, actual: u64 },
    #[error("unknown pilot: {0}")]
    UnknownPilot(String),
    #[error("unknown leave request: {0}")]
    UnknownRequest(String),
    #[error("invalid leave transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl RosterError {
    pub(crate) fn invalid_date<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
}
