use crate::error::RosterError;
use crate::model::Rank;
use crate::period::{PeriodCalculator, ReferenceAnchor};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Effectif minimum disponible par rang. Toujours configuré, jamais deviné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingPolicy {
    pub min_captains: u32,
    pub min_first_officers: u32,
}

impl StaffingPolicy {
    pub fn minimum_for(&self, rank: Rank) -> u32 {
        match rank {
            Rank::Captain => self.min_captains,
            Rank::FirstOfficer => self.min_first_officers,
        }
    }
}

/// Une version de l'ancre. La plus haute version est l'ancre active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorVersion {
    pub version: u32,
    #[serde(flatten)]
    pub anchor: ReferenceAnchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Configuration du moteur, chargée une fois au démarrage.
///
/// Immuable : `migrate_anchor` produit une nouvelle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    periods_per_year: u32,
    anchors: Vec<AnchorVersion>,
    staffing: StaffingPolicy,
}

impl EngineConfig {
    pub fn new(
        periods_per_year: u32,
        anchor: ReferenceAnchor,
        staffing: StaffingPolicy,
    ) -> Result<Self, RosterError> {
        let config = Self {
            periods_per_year,
            anchors: vec![AnchorVersion {
                version: 1,
                anchor,
                reason: None,
            }],
            staffing,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.periods_per_year == 0 {
            return Err(RosterError::config("periodsPerYear must be > 0"));
        }
        if self.anchors.is_empty() {
            return Err(RosterError::config("at least one reference anchor is required"));
        }
        for pair in self.anchors.windows(2) {
            if pair[1].version <= pair[0].version {
                return Err(RosterError::config(format!(
                    "anchor versions must be strictly increasing ({} then {})",
                    pair[0].version, pair[1].version
                )));
            }
        }
        for entry in &self.anchors {
            PeriodCalculator::new(entry.anchor, self.periods_per_year).map_err(|err| {
                RosterError::config(format!("anchor version {}: {err}", entry.version))
            })?;
        }
        Ok(())
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    pub fn staffing(&self) -> StaffingPolicy {
        self.staffing
    }

    pub fn anchor_history(&self) -> &[AnchorVersion] {
        &self.anchors
    }

    pub fn active_anchor(&self) -> Result<&AnchorVersion, RosterError> {
        self.anchors
            .last()
            .ok_or_else(|| RosterError::config("no reference anchor configured"))
    }

    pub fn calculator(&self) -> Result<PeriodCalculator, RosterError> {
        let active = self.active_anchor()?;
        PeriodCalculator::new(active.anchor, self.periods_per_year)
    }

    /// Nouvelle configuration avec `anchor` en version suivante ; l'historique est conservé.
    pub fn migrate_anchor<R: Into<String>>(
        &self,
        anchor: ReferenceAnchor,
        reason: R,
    ) -> Result<EngineConfig, RosterError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(RosterError::config("anchor migration requires a reason"));
        }
        let current = self.active_anchor()?;
        if current.anchor == anchor {
            return Err(RosterError::config("anchor migration does not change the anchor"));
        }
        let version = current
            .version
            .checked_add(1)
            .ok_or_else(|| RosterError::config("anchor version overflow"))?;
        let mut next = self.clone();
        next.anchors.push(AnchorVersion {
            version,
            anchor,
            reason: Some(reason),
        });
        next.validate()?;
        Ok(next)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, RosterError> {
        let config: EngineConfig = serde_json::from_slice(data)
            .map_err(|err| RosterError::config(format!("parsing engine config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| {
            RosterError::config(format!("reading engine config {}: {err}", path.display()))
        })?;
        Self::from_json(&data)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
