//! Application context - wires everything together

use anyhow::Context;
use auditcalc_guidance::StaticGuidance;
use auditcalc_materiality::{MaterialityConfig, MaterialityService, SqliteLedger};
use auditcalc_sampling::SamplingEngine;
use std::path::{Path, PathBuf};

/// Environment variable overriding the ledger path from the config file
pub const DB_ENV_VAR: &str = "AUDITCALC_DB";

/// Application context - engines, guidance and the (lazily opened) ledger
pub struct AppContext {
    pub config: MaterialityConfig,
    pub guidance: StaticGuidance,
    pub sampling: SamplingEngine,
    /// Print machine-readable JSON instead of text
    pub json: bool,
    db_path: PathBuf,
    service: Option<MaterialityService<SqliteLedger>>,
}

impl AppContext {
    /// Create a new application context.
    ///
    /// The ledger path is taken from `db`, then `AUDITCALC_DB`, then the config.
    pub fn new(
        db: Option<PathBuf>,
        config_path: Option<&Path>,
        json: bool,
    ) -> Result<Self, anyhow::Error> {
        let config = match config_path {
            Some(path) => MaterialityConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MaterialityConfig::default(),
        };

        let db_path = db
            .or_else(|| std::env::var(DB_ENV_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| config.ledger_path.clone());

        Self::from_config(config, db_path, json)
    }

    /// Create a context from an already loaded config
    pub fn from_config(
        config: MaterialityConfig,
        db_path: PathBuf,
        json: bool,
    ) -> Result<Self, anyhow::Error> {
        let guidance = match &config.guidance_path {
            Some(path) => StaticGuidance::from_file(path)
                .with_context(|| format!("Failed to load guidance {}", path.display()))?,
            None => StaticGuidance::with_defaults(),
        };

        tracing::debug!(
            db = %db_path.display(),
            guidance_entries = guidance.entry_count(),
            "Context ready"
        );

        Ok(Self {
            config,
            guidance,
            sampling: SamplingEngine::new(),
            json,
            db_path,
            service: None,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Materiality service over the SQLite ledger, opened on first use
    pub fn service(&mut self) -> Result<&MaterialityService<SqliteLedger>, anyhow::Error> {
        if self.service.is_none() {
            let db_path = self.db_path();
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            tracing::debug!(db = %db_path.display(), "Opening ledger");
            let ledger = SqliteLedger::new(db_path)
                .with_context(|| format!("Failed to open ledger {}", db_path.display()))?;
            self.service = Some(MaterialityService::new(ledger, self.config.advisory.clone()));
        }

        self.service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Ledger not available"))
    }
}
