//! Work record — a field technician's completed visit.
//!
//! A work record may close exactly one service request; the form number is
//! derived from that request's codes and the visit date, and stays empty for
//! records that close nothing. Once the end time is set the record's station
//! counts become read-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{CustomerId, FacilityId, RequestId, TeamId, UserId, WorkRecordId};
use crate::request::RequestCodes;
use crate::time::{Date, TimeOfDay};

/// Progress of the visit itself, driven by the start/finish operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkProgress {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for WorkProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not_started"),
            Self::InProgress => f.write_str("in_progress"),
            Self::Completed => f.write_str("completed"),
        }
    }
}

impl FromStr for WorkProgress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown work progress: {other}")),
        }
    }
}

/// Which machines and equipment were used during the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquipmentFlags {
    pub knapsack_sprayer: bool,
    pub atomizer: bool,
    pub sprayer: bool,
    pub thermal_fogger: bool,
    pub vehicle_ulv: bool,
    pub electric_ulv: bool,
    pub nail_gun: bool,
}

/// A visit row as listed for report aggregation: id plus visit date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRecordVisit {
    pub id: WorkRecordId,
    pub date: Date,
}

/// A field work record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRecord {
    pub id: WorkRecordId,
    pub date: Date,
    pub technician_id: UserId,
    pub team_id: Option<TeamId>,
    /// Optional direct links, used when the record closes no request.
    pub customer_id: Option<CustomerId>,
    pub facility_id: Option<FacilityId>,
    pub started_at: Option<TimeOfDay>,
    pub ended_at: Option<TimeOfDay>,
    pub progress: WorkProgress,
    pub observation_visit_required: bool,
    pub out_of_contract_work: bool,
    pub equipment: EquipmentFlags,
    pub recommendations: String,
    pub note: String,
    /// The request this record closes (1:1 across all work records).
    pub closing_request_id: Option<RequestId>,
    /// Derived `{customer}-{facility}-{YYYYMMDD}`; empty without a closing
    /// request.
    pub form_number: String,
}

impl WorkRecord {
    /// Create a builder for constructing a [`WorkRecord`].
    #[must_use]
    pub fn builder(technician_id: UserId) -> WorkRecordBuilder {
        WorkRecordBuilder {
            technician_id,
            ..WorkRecordBuilder::default()
        }
    }

    /// Whether the station-count ledger for this record is read-only.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Reset then re-derive the form number. `codes` must be the closing
    /// request's codes, or `None` when no request is closed. A closing
    /// request without a facility also yields an empty form number.
    pub fn refresh_form_number(&mut self, codes: Option<&RequestCodes>) {
        self.form_number.clear();
        if let Some(codes) = codes {
            if let Some(facility_code) = &codes.facility_code {
                self.form_number = format!(
                    "{}-{}-{}",
                    codes.customer_code,
                    facility_code,
                    self.date.format("%Y%m%d")
                );
            }
        }
    }

    /// Mark the visit started, stamping the start time if not already set.
    pub fn start(&mut self, at: TimeOfDay) {
        self.progress = WorkProgress::InProgress;
        if self.started_at.is_none() {
            self.started_at = Some(at);
        }
    }

    /// Mark the visit finished, stamping the end time if not already set.
    /// From this point on the record's station counts are locked.
    pub fn finish(&mut self, at: TimeOfDay) {
        self.progress = WorkProgress::Completed;
        if self.ended_at.is_none() {
            self.ended_at = Some(at);
        }
    }
}

/// Step-by-step builder for [`WorkRecord`].
#[derive(Debug, Default)]
pub struct WorkRecordBuilder {
    id: Option<WorkRecordId>,
    date: Option<Date>,
    technician_id: UserId,
    team_id: Option<TeamId>,
    customer_id: Option<CustomerId>,
    facility_id: Option<FacilityId>,
    observation_visit_required: bool,
    out_of_contract_work: bool,
    equipment: EquipmentFlags,
    recommendations: Option<String>,
    note: Option<String>,
    closing_request_id: Option<RequestId>,
}

impl WorkRecordBuilder {
    #[must_use]
    pub fn id(mut self, id: WorkRecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn team_id(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    #[must_use]
    pub fn customer_id(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    #[must_use]
    pub fn facility_id(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    #[must_use]
    pub fn observation_visit_required(mut self, flag: bool) -> Self {
        self.observation_visit_required = flag;
        self
    }

    #[must_use]
    pub fn out_of_contract_work(mut self, flag: bool) -> Self {
        self.out_of_contract_work = flag;
        self
    }

    #[must_use]
    pub fn equipment(mut self, equipment: EquipmentFlags) -> Self {
        self.equipment = equipment;
        self
    }

    #[must_use]
    pub fn recommendations(mut self, recommendations: impl Into<String>) -> Self {
        self.recommendations = Some(recommendations.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn closing_request_id(mut self, closing_request_id: RequestId) -> Self {
        self.closing_request_id = Some(closing_request_id);
        self
    }

    /// Consume the builder and return a [`WorkRecord`].
    ///
    /// The form number starts empty; the work-record service derives it at
    /// save time from the closing request's codes.
    #[must_use]
    pub fn build(self) -> WorkRecord {
        WorkRecord {
            id: self.id.unwrap_or_default(),
            date: self.date.unwrap_or_else(crate::time::today),
            technician_id: self.technician_id,
            team_id: self.team_id,
            customer_id: self.customer_id,
            facility_id: self.facility_id,
            started_at: None,
            ended_at: None,
            progress: WorkProgress::NotStarted,
            observation_visit_required: self.observation_visit_required,
            out_of_contract_work: self.out_of_contract_work,
            equipment: self.equipment,
            recommendations: self.recommendations.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            closing_request_id: self.closing_request_id,
            form_number: String::new(),
        }
    }
}
