use anyhow::{bail, Context, Result};
use cert_audit::config::{read_config, AuditConfig};
use cert_audit::grid::Grid;
use cert_audit::reconciliation::{ReconciliationEngine, ReconciliationReport};
use cert_audit::utils::today;
use cert_audit::workbook::load_workbook;
use chrono::NaiveDate;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "cert-audit.json";

/// Certificate inventory audit - reconcile the inventory workbook against
/// certificate exports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project root holding the workbook and the exports folder
    #[arg(short, long, env = "CERT_AUDIT_ROOT")]
    root: Option<PathBuf>,

    /// Configuration file (defaults to cert-audit.json under the root)
    #[arg(short, long, env = "CERT_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Inventory workbook, relative to the root
    #[arg(short, long, env = "CERT_AUDIT_WORKBOOK")]
    workbook: Option<String>,

    /// Days before expiry at which a certificate is flagged
    #[arg(long, env = "CERT_AUDIT_ALERT_DAYS")]
    alert_days: Option<i64>,

    /// Comma-separated environments to audit.
    /// Example: --environments=CAMARAPROD,CAMARATEST
    #[arg(long, env = "CERT_AUDIT_ENVIRONMENTS", value_delimiter = ',')]
    environments: Option<Vec<String>>,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long, env = "CERT_AUDIT_TODAY")]
    today: Option<NaiveDate>,

    /// Where to write the audit plan, relative to the root
    #[arg(long, env = "CERT_AUDIT_PLAN_OUT")]
    plan_out: Option<String>,
}

impl Args {
    /// CLI flags over the config file over defaults.
    fn into_config(self) -> Result<(AuditConfig, NaiveDate)> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let config_path = self
            .config
            .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));

        let mut config = match read_config(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
        {
            Some(config) => {
                info!(config = %config_path.display(), "Configuration loaded");
                config
            }
            None => AuditConfig::default(),
        };

        config.root = root;
        if let Some(workbook) = self.workbook {
            config.workbook = workbook;
        }
        if let Some(days) = self.alert_days {
            config.alert_threshold_days = days;
        }
        if let Some(environments) = self.environments {
            config.environments = environments
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(plan_out) = self.plan_out {
            config.plan_file = plan_out;
        }
        config.validate()?;

        Ok((config, self.today.unwrap_or_else(today)))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, today) = Args::parse().into_config()?;

    let workbook_path = config.workbook_path();
    if !workbook_path.is_file() {
        bail!("Workbook not found: {}", workbook_path.display());
    }
    let processed_root = config.processed_root();
    if !processed_root.is_dir() {
        warn!(folder = %processed_root.display(), "Exports folder not found, only expiry dates will be checked");
    }

    info!(
        today = %today,
        alert_days = config.alert_threshold_days,
        environments = %config.environments.join(", "),
        "Starting audit"
    );

    let sheets = load_workbook(&workbook_path)?;
    let plan_path = config.plan_path();
    let mut engine = ReconciliationEngine::new(config, today);
    for sheet in &sheets {
        engine.process_sheet(sheet as &dyn Grid);
    }
    let report = engine.finish();

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&plan_path, json)
        .with_context(|| format!("Failed to write {}", plan_path.display()))?;
    info!(plan = %plan_path.display(), instructions = report.instructions.len(), "Audit plan written");

    log_summary(&report);
    Ok(())
}

fn log_summary(report: &ReconciliationReport) {
    let alerts: Vec<_> = report.alerts().collect();
    if !alerts.is_empty() {
        info!("Expiry alerts ({}):", alerts.len());
        for alert in alerts {
            info!("  {}", alert.text);
        }
    }

    let updates: Vec<_> = report.updates().collect();
    if !updates.is_empty() {
        info!("Updated fields ({}):", updates.len());
        for update in updates {
            info!("  {}", update.text);
        }
    }

    if !report.has_differences() {
        info!("No differences found");
    }

    let coverage = &report.coverage;
    info!("Export coverage:");
    info!("  Aliases looked up: {}", coverage.total);
    info!(
        "  Resolved:          {} ({:.1}%)",
        coverage.resolved, report.coverage_percentage
    );
    info!("  Not found:         {}", coverage.not_found);

    if !report.diagnostics.is_empty() {
        warn!(count = report.diagnostics.len(), "Run completed with diagnostics");
    }
}
