//! Expiry classification relative to a reference date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of days before expiry at which a certificate is flagged.
pub const DEFAULT_ALERT_THRESHOLD_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    /// Valid beyond the alert threshold.
    Vigente,
    /// Expires within the alert threshold (today included).
    ProximoAVencer,
    /// Already expired.
    Vencido,
    /// No usable date.
    Indeterminado,
}

impl ExpiryStatus {
    /// Vencido and ProximoAVencer are flagged and reported; the others are not.
    pub fn is_alert(&self) -> bool {
        matches!(self, ExpiryStatus::Vencido | ExpiryStatus::ProximoAVencer)
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Vigente => write!(f, "VIGENTE"),
            ExpiryStatus::ProximoAVencer => write!(f, "PROXIMO A VENCER"),
            ExpiryStatus::Vencido => write!(f, "VENCIDO"),
            ExpiryStatus::Indeterminado => write!(f, "INDETERMINADO"),
        }
    }
}

/// Outcome of classifying one expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub status: ExpiryStatus,
    /// `expiry - today` in whole days; `None` when there is no date.
    pub days_remaining: Option<i64>,
    pub expiry: Option<NaiveDate>,
}

impl Evaluation {
    /// Human-readable status line, e.g. `VENCIDO hace 3 dias (2024-12-29)`.
    pub fn describe(&self) -> String {
        match (self.status, self.days_remaining, self.expiry) {
            (ExpiryStatus::Vencido, Some(days), Some(date)) => {
                format!("VENCIDO hace {} dias ({})", days.abs(), date)
            }
            (ExpiryStatus::ProximoAVencer, Some(days), Some(date)) => {
                format!("PROXIMO A VENCER en {} dias ({})", days, date)
            }
            (ExpiryStatus::Vigente, Some(days), Some(date)) => {
                format!("vigente ({} dias restantes, {})", days, date)
            }
            _ => "fecha no parseable".to_string(),
        }
    }
}

/// Classify `expiry` against `today`.
pub fn evaluate(expiry: Option<NaiveDate>, today: NaiveDate, alert_threshold_days: i64) -> Evaluation {
    let Some(date) = expiry else {
        return Evaluation {
            status: ExpiryStatus::Indeterminado,
            days_remaining: None,
            expiry: None,
        };
    };

    let days = (date - today).num_days();
    let status = if days < 0 {
        ExpiryStatus::Vencido
    } else if days <= alert_threshold_days {
        ExpiryStatus::ProximoAVencer
    } else {
        ExpiryStatus::Vigente
    };

    Evaluation {
        status,
        days_remaining: Some(days),
        expiry: Some(date),
    }
}
