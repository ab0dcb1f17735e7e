use crate::error::RosterError;
use crate::model::Fleet;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Frontière de persistance de l'instantané.
///
/// Le moteur ne fait que lire ; c'est ici que se joue le compare-and-swap
/// qui protège une approbation contre une écriture concurrente.
pub trait Storage {
    /// Charge l'instantané depuis un support.
    fn load(&self) -> anyhow::Result<Fleet>;
    /// Sauvegarde de manière atomique, sans contrôle de révision.
    fn save(&self, fleet: &Fleet) -> anyhow::Result<()>;
    /// Sauvegarde si la révision stockée vaut toujours `expected_revision` ;
    /// renvoie la nouvelle révision, ou `RosterError::StaleData`.
    fn commit(&self, fleet: &Fleet, expected_revision: u64) -> anyhow::Result<u64>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Instantané vide si le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Fleet> {
        if !self.path.exists() {
            return Ok(Fleet::default());
        }
        self.load()
    }

    fn write_atomic(&self, fleet: &Fleet) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(fleet)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Fleet> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let fleet: Fleet = serde_json::from_slice(&data).with_context(|| "parsing fleet.json")?;
        Ok(fleet)
    }

    fn save(&self, fleet: &Fleet) -> anyhow::Result<()> {
        self.write_atomic(fleet)
    }

    fn commit(&self, fleet: &Fleet, expected_revision: u64) -> anyhow::Result<u64> {
        let actual = self.load_or_default()?.revision;
        if actual != expected_revision {
            #[cfg(feature = "logging")]
            tracing::warn!(expected_revision, actual, "stale fleet snapshot");
            return Err(RosterError::StaleData {
                expected: expected_revision,
                actual,
            }
            .into());
        }
        let mut next = fleet.clone();
        next.revision = expected_revision + 1;
        self.write_atomic(&next)?;
        Ok(next.revision)
    }
}
