use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::phenotype::PhenotypeError;

/// Application-level constants
pub const APP_NAME: &str = "OSA Phenotyper";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of recommendations surfaced in the patient summary.
pub const DEFAULT_PATIENT_STEP_LIMIT: usize = 5;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "osa_phenotyper_lib=info,osa_phenotyper=info"
}

/// Report presentation settings. Clinical thresholds are fixed and not part
/// of this configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub patient_step_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            patient_step_limit: DEFAULT_PATIENT_STEP_LIMIT,
        }
    }
}

impl ReportConfig {
    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, PhenotypeError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            PhenotypeError::ConfigLoad(path.display().to_string(), e.to_string())
        })?;
        serde_json::from_str(&json).map_err(|e| {
            PhenotypeError::ConfigParse(path.display().to_string(), e.to_string())
        })
    }
}
