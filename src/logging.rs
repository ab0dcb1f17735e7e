//! Initialisation des logs (feature `logging`).
//!
//! `RUST_LOG` filtre les niveaux, `info` par défaut,
//! par exemple `RUST_LOG=crewroster=debug`.

use tracing_subscriber::{fmt, EnvFilter};

/// Installe le subscriber global. Sans effet s'il y en a déjà un.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

