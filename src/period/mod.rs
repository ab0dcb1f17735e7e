//! Conversion date <-> période de roster.
//!
//! Cycle strict : périodes de 28 jours contiguës, numérotées `1..=periods_per_year`
//! puis report sur l'année de roster suivante. L'année de roster dérive donc
//! par rapport à l'année civile ; aucun cas particulier en fin d'année.

mod range;
mod types;

pub use range::PeriodRange;
pub use types::{period_code, PeriodOverview, ReferenceAnchor, RosterPeriod, PERIOD_LENGTH_DAYS};

use crate::error::RosterError;
use crate::model::{shift_days, DateRange};
use chrono::NaiveDate;

/// Calculateur sans état, copiable, sûr entre threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCalculator {
    anchor: ReferenceAnchor,
    periods_per_year: u32,
}

impl PeriodCalculator {
    pub fn new(anchor: ReferenceAnchor, periods_per_year: u32) -> Result<Self, RosterError> {
        if periods_per_year == 0 {
            return Err(RosterError::config("periods_per_year must be > 0"));
        }
        if anchor.period_number == 0 || anchor.period_number > periods_per_year {
            return Err(RosterError::config(format!(
                "anchor period number {} outside 1..={periods_per_year}",
                anchor.period_number
            )));
        }
        Ok(Self {
            anchor,
            periods_per_year,
        })
    }

    pub fn anchor(&self) -> ReferenceAnchor {
        self.anchor
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// Période contenant `date` : `start_date <= date <= end_date`.
    #[cfg_attr(feature = "logging", tracing::instrument(level = "trace", skip(self)))]
    pub fn period_for_date(&self, date: NaiveDate) -> Result<RosterPeriod, RosterError> {
        self.period_at(self.offset_index(date))
    }

    pub fn current_period(&self, today: NaiveDate) -> Result<RosterPeriod, RosterError> {
        self.period_for_date(today)
    }

    pub fn next_period(&self, period: &RosterPeriod) -> Result<RosterPeriod, RosterError> {
        self.period_for_date(shift_days(period.end_date, 1)?)
    }

    pub fn previous_period(&self, period: &RosterPeriod) -> Result<RosterPeriod, RosterError> {
        self.period_for_date(shift_days(period.start_date, -1)?)
    }

    /// Périodes couvertes par `range` (au moins une).
    pub fn periods_in_range(&self, range: &DateRange) -> Result<PeriodRange, RosterError> {
        let first = self.offset_index(range.start);
        let last = self.offset_index(range.end);
        // valide les deux bornes avant d'itérer
        self.period_at(first)?;
        self.period_at(last)?;
        Ok(PeriodRange {
            calc: *self,
            next_index: first,
            last_index: last,
        })
    }

    /// `count` périodes à partir de celle qui contient `today`.
    pub fn future_periods(
        &self,
        count: usize,
        today: NaiveDate,
    ) -> Result<Vec<RosterPeriod>, RosterError> {
        let count = i64::try_from(count).map_err(|_| {
            RosterError::invalid_date(today.to_string(), format!("{count} periods out of range"))
        })?;
        let first = self.offset_index(today);
        (0..count)
            .map(|k| self.period_at(first + k))
            .collect()
    }

    /// Inverse de `RosterPeriod::code` : `RP13/2025`.
    pub fn period_by_code(&self, code: &str) -> Result<RosterPeriod, RosterError> {
        let invalid = || RosterError::InvalidPeriodCode(code.to_string());
        let trimmed = code.trim();
        let body = trimmed
            .get(..2)
            .filter(|prefix| prefix.eq_ignore_ascii_case("RP"))
            .map(|_| &trimmed[2..])
            .ok_or_else(invalid)?;
        let (number, year) = body.split_once('/').ok_or_else(invalid)?;
        let number: u32 = number.trim().parse().map_err(|_| invalid())?;
        let year: i64 = year.trim().parse().map_err(|_| invalid())?;
        if number == 0 || number > self.periods_per_year {
            return Err(invalid());
        }

        let per_year = i64::from(self.periods_per_year);
        let sequence = year
            .checked_sub(i64::from(self.anchor.year))
            .and_then(|delta| delta.checked_mul(per_year))
            .and_then(|s| s.checked_add(i64::from(number) - 1))
            .ok_or_else(invalid)?;
        let index = sequence - (i64::from(self.anchor.period_number) - 1);
        self.period_at(index).map_err(|_| invalid())
    }

    /// Nombre de périodes entières entre l'ancre et `date` (division plancher).
    fn offset_index(&self, date: NaiveDate) -> i64 {
        let offset = (date - self.anchor.period_start_date).num_days();
        offset.div_euclid(PERIOD_LENGTH_DAYS)
    }

    /// Période d'indice `index` relatif à l'ancre.
    pub(crate) fn period_at(&self, index: i64) -> Result<RosterPeriod, RosterError> {
        let out_of_range = || {
            RosterError::invalid_date(
                self.anchor.period_start_date.to_string(),
                format!("period index {index} out of range"),
            )
        };
        let days = index.checked_mul(PERIOD_LENGTH_DAYS).ok_or_else(out_of_range)?;
        let start = shift_days(self.anchor.period_start_date, days)?;
        let end = shift_days(start, PERIOD_LENGTH_DAYS - 1)?;

        let per_year = i64::from(self.periods_per_year);
        let sequence = (i64::from(self.anchor.period_number) - 1)
            .checked_add(index)
            .ok_or_else(out_of_range)?;
        let number = u32::try_from(sequence.rem_euclid(per_year) + 1).map_err(|_| out_of_range())?;
        let year = i32::try_from(i64::from(self.anchor.year) + sequence.div_euclid(per_year))
            .map_err(|_| out_of_range())?;

        Ok(RosterPeriod::new(number, year, start, end))
    }
}
