use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Durée fixe d'une période de roster.
pub const PERIOD_LENGTH_DAYS: i64 = 28;

/// Point d'ancrage de tout le calcul de périodes.
///
/// Valeur immuable chargée au démarrage ; un changement passe par une
/// nouvelle version (voir `config::EngineConfig::migrate_anchor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAnchor {
    pub period_number: u32,
    pub year: i32,
    pub period_start_date: NaiveDate,
}

/// Période de roster de 28 jours, `[start_date, end_date]` inclus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPeriod {
    pub code: String,
    pub number: u32,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RosterPeriod {
    pub(crate) fn new(number: u32, year: i32, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            code: period_code(number, year),
            number,
            year,
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn length_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Jours restants de `today` à `end_date` inclus ; 0 une fois terminée,
    /// la durée complète tant qu'elle n'a pas commencé.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        if today > self.end_date {
            0
        } else if today < self.start_date {
            self.length_days()
        } else {
            (self.end_date - today).num_days() + 1
        }
    }

    pub fn overview(&self, today: NaiveDate) -> PeriodOverview {
        PeriodOverview {
            period: self.clone(),
            days_remaining: self.days_remaining(today),
        }
    }
}

/// Forme exposée aux consommateurs : la période et ses jours restants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOverview {
    #[serde(flatten)]
    pub period: RosterPeriod,
    pub days_remaining: i64,
}

pub fn period_code(number: u32, year: i32) -> String {
    format!("RP{number}/{year}")
}
