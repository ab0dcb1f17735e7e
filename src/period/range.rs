use super::{PeriodCalculator, RosterPeriod};

/// Périodes touchées par un intervalle, dans l'ordre, sans doublon.
///
/// `Clone` permet de reparcourir la séquence depuis le début.
#[derive(Debug, Clone)]
pub struct PeriodRange {
    pub(super) calc: PeriodCalculator,
    pub(super) next_index: i64,
    pub(super) last_index: i64,
}

impl Iterator for PeriodRange {
    type Item = RosterPeriod;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index > self.last_index {
            return None;
        }
        // bornes déjà calculées avec succès : les indices intermédiaires aussi
        let period = self.calc.period_at(self.next_index).ok()?;
        self.next_index += 1;
        Some(period)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.last_index - self.next_index + 1).unwrap_or(0);
        (left, Some(left))
    }
}

impl ExactSizeIterator for PeriodRange {}

impl std::iter::FusedIterator for PeriodRange {}
