use crate::expiry::DEFAULT_ALERT_THRESHOLD_DAYS;
use crate::resolver::SimilarityRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub const DEFAULT_ENVIRONMENTS: [&str; 3] = ["CAMARAPROD", "CAMARARESP", "CAMARATEST"];

pub const DEFAULT_KEYSTORES: [&str; 2] = ["DSkeystore", "SSLkeystore"];

pub const DEFAULT_MANIFEST_MARKER: &str = "plugwas";

/// Audit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditConfig {
    /// Project root; relative paths below are resolved against it.
    pub root: PathBuf,
    /// Folder under `root` holding one export folder per environment.
    pub processed_dir: String,
    /// Inventory workbook, relative to `root`.
    pub workbook: String,
    /// Where the run report (cell instructions + diffs) is written.
    pub plan_file: String,
    /// Days before expiry at which a certificate is flagged.
    pub alert_threshold_days: i64,
    /// Environments to audit, matched against sheet names.
    pub environments: Vec<String>,
    /// Keystore categories of AIPAC sheets.
    pub keystores: Vec<String>,
    /// Substring identifying an environment's path → hash manifest file.
    pub manifest_marker: String,
    pub similarity: SimilarityRules,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            processed_dir: "PROCESADOS".to_string(),
            workbook: "REPORTE_AUDITORIA.xlsx".to_string(),
            plan_file: "PLAN_AUDITORIA.json".to_string(),
            alert_threshold_days: DEFAULT_ALERT_THRESHOLD_DAYS,
            environments: DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            keystores: DEFAULT_KEYSTORES.iter().map(|s| s.to_string()).collect(),
            manifest_marker: DEFAULT_MANIFEST_MARKER.to_string(),
            similarity: SimilarityRules::default(),
        }
    }
}

impl AuditConfig {
    pub fn processed_root(&self) -> PathBuf {
        self.root.join(&self.processed_dir)
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.root.join(&self.workbook)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.root.join(&self.plan_file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environments.iter().all(|e| e.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "at least one environment is required".to_string(),
            ));
        }
        if self.keystores.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("keystore names cannot be empty".to_string()));
        }
        if self.manifest_marker.trim().is_empty() {
            return Err(ConfigError::Invalid("manifestMarker cannot be empty".to_string()));
        }
        if self.alert_threshold_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "alertThresholdDays must be >= 0, got {}",
                self.alert_threshold_days
            )));
        }
        if self.similarity.min_contained_len == 0 {
            return Err(ConfigError::Invalid(
                "similarity.minContainedLen must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the configuration file
pub fn read_config(path: &Path) -> Result<Option<AuditConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let config: AuditConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(Some(config))
}
