//! Conservation alerts and their review state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertId, UploadId};

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Endangered,
    Invasive,
    NovelSpecies,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Endangered => write!(f, "endangered"),
            Self::Invasive => write!(f, "invasive"),
            Self::NovelSpecies => write!(f, "novel_species"),
        }
    }
}

/// Alert severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Review status of an alert.
///
/// ```text
/// active ──▶ validated
///    └─────▶ rejected
/// ```
///
/// Both review outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Validated,
    Rejected,
}

impl AlertStatus {
    /// Whether a reviewer may move an alert from `self` to `next`.
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Validated) | (Self::Active, Self::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Validated => write!(f, "validated"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A conservation alert raised for an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub upload_id: UploadId,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub species_name: String,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Create a new `active` alert.
    pub fn new(
        upload_id: UploadId,
        alert_type: AlertType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        species_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AlertId::new(),
            upload_id,
            alert_type,
            severity,
            title: title.into(),
            description: description.into(),
            species_name: species_name.into(),
            status: AlertStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
