//! Line items recorded under a work record.
//!
//! Applications, activities, and product usages are unique per
//! (work record, definition) pair and written with upsert semantics;
//! findings are plain rows and may repeat.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{
    ActivityDefId, ApplicationDefId, FindingDefId, FindingId, ProductDefId, WorkRecordId,
};

/// A treatment performed during the visit. At most one row per
/// (work record, application).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformedApplication {
    pub work_record_id: WorkRecordId,
    pub application_id: ApplicationDefId,
}

/// Status flags on a corrective/preventive activity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityFlags {
    pub checked: bool,
    pub installed: bool,
    pub added: bool,
    pub secured: bool,
    pub relocated: bool,
    pub renewed: bool,
}

/// A corrective/preventive activity recorded during the visit. At most one
/// row per (work record, activity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLine {
    pub work_record_id: WorkRecordId,
    pub activity_id: ActivityDefId,
    pub flags: ActivityFlags,
}

/// How heavy an observed pest sign was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Heavy,
    Infestation,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Heavy => f.write_str("heavy"),
            Self::Infestation => f.write_str("infestation"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "heavy" => Ok(Self::Heavy),
            "infestation" => Ok(Self::Infestation),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Who reported the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedBy {
    Customer,
    #[default]
    Company,
}

impl fmt::Display for DetectedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Company => f.write_str("company"),
        }
    }
}

impl FromStr for DetectedBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "company" => Ok(Self::Company),
            other => Err(format!("unknown detector: {other}")),
        }
    }
}

/// A pest sign observed during the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub work_record_id: WorkRecordId,
    pub finding_id: FindingDefId,
    pub severity: Severity,
    pub detected_by: DetectedBy,
}

impl Finding {
    /// Record a new observation of `finding_id` on `work_record_id`.
    #[must_use]
    pub fn new(
        work_record_id: WorkRecordId,
        finding_id: FindingDefId,
        severity: Severity,
        detected_by: DetectedBy,
    ) -> Self {
        Self {
            id: FindingId::new(),
            work_record_id,
            finding_id,
            severity,
            detected_by,
        }
    }
}

/// A chemical/bait usage row. At most one row per (work record, product).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductUsage {
    pub work_record_id: WorkRecordId,
    pub product_id: ProductDefId,
    pub quantity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_severity_to_low() {
        assert_eq!(Severity::default(), Severity::Low);
    }

    #[test]
    fn should_default_detector_to_company() {
        assert_eq!(DetectedBy::default(), DetectedBy::Company);
    }

    #[test]
    fn should_roundtrip_severity_through_display_and_from_str() {
        for severity in [Severity::Low, Severity::Heavy, Severity::Infestation] {
            let parsed: Severity = severity.to_string().parse().unwrap();
            assert_eq!(parsed, severity);
        }
    }

    #[test]
    fn should_assign_fresh_id_to_each_finding() {
        let wr = WorkRecordId::new();
        let def = FindingDefId::new();
        let a = Finding::new(wr, def, Severity::Low, DetectedBy::Company);
        let b = Finding::new(wr, def, Severity::Low, DetectedBy::Company);
        assert_ne!(a.id, b.id);
    }
}
