//! Service request — a customer's ask for a visit, closed by a work record.
//!
//! Status rules:
//! - a request starts pending; saving it with both a planned date and a
//!   planned team promotes it to scheduled (unless already done);
//! - only the closing action — a work record save that references the
//!   request — ever sets done;
//! - recomputation (after a rebind or a work-record delete) downgrades to
//!   scheduled or pending, never back to done.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SanitrackError, ValidationError};
use crate::id::{CustomerId, FacilityId, RequestId, RequestTypeId, TeamId};
use crate::time::Date;

/// Lifecycle state of a [`ServiceRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Scheduled,
    Done,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Scheduled => f.write_str("scheduled"),
            Self::Done => f.write_str("done"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// The customer/facility codes of a request, as needed for deriving a work
/// record's form number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCodes {
    pub customer_code: String,
    /// Absent when the request was raised customer-wide.
    pub facility_code: Option<String>,
}

/// A service request raised by or for a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    pub customer_id: CustomerId,
    pub facility_id: Option<FacilityId>,
    pub date: Date,
    pub request_type_id: RequestTypeId,
    pub description: String,
    pub status: RequestStatus,
    pub planned_date: Option<Date>,
    pub planned_team_id: Option<TeamId>,
    /// Optional link to another request this one relates to.
    pub related_request_id: Option<RequestId>,
}

impl ServiceRequest {
    /// Create a builder for constructing a [`ServiceRequest`].
    #[must_use]
    pub fn builder(customer_id: CustomerId, request_type_id: RequestTypeId) -> ServiceRequestBuilder {
        ServiceRequestBuilder {
            customer_id,
            request_type_id,
            ..ServiceRequestBuilder::default()
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when `description` is empty.
    pub fn validate(&self) -> Result<(), SanitrackError> {
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        Ok(())
    }

    /// Whether both planning fields are filled in.
    #[must_use]
    pub fn is_planned(&self) -> bool {
        self.planned_date.is_some() && self.planned_team_id.is_some()
    }

    /// Save-time normalisation: a planned request becomes scheduled unless
    /// it is already done. Applied on every save.
    pub fn normalize_status(&mut self) {
        if self.is_planned() && self.status != RequestStatus::Done {
            self.status = RequestStatus::Scheduled;
        }
    }

    /// The closing action — the only operation that sets [`RequestStatus::Done`].
    /// Invoked after a work record referencing this request persists.
    pub fn close(&mut self) {
        self.status = RequestStatus::Done;
    }

    /// Recompute status after the closing work record unlinked or vanished.
    /// Downgrades to scheduled or pending; never restores done.
    pub fn recompute_status(&mut self) {
        self.status = if self.is_planned() {
            RequestStatus::Scheduled
        } else {
            RequestStatus::Pending
        };
    }
}

/// Step-by-step builder for [`ServiceRequest`].
#[derive(Debug, Default)]
pub struct ServiceRequestBuilder {
    id: Option<RequestId>,
    customer_id: CustomerId,
    facility_id: Option<FacilityId>,
    date: Option<Date>,
    request_type_id: RequestTypeId,
    description: Option<String>,
    planned_date: Option<Date>,
    planned_team_id: Option<TeamId>,
    related_request_id: Option<RequestId>,
}

impl ServiceRequestBuilder {
    #[must_use]
    pub fn id(mut self, id: RequestId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn facility_id(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    #[must_use]
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn planned_date(mut self, planned_date: Date) -> Self {
        self.planned_date = Some(planned_date);
        self
    }

    #[must_use]
    pub fn planned_team_id(mut self, planned_team_id: TeamId) -> Self {
        self.planned_team_id = Some(planned_team_id);
        self
    }

    #[must_use]
    pub fn related_request_id(mut self, related_request_id: RequestId) -> Self {
        self.related_request_id = Some(related_request_id);
        self
    }

    /// Consume the builder, validate, and return a [`ServiceRequest`].
    ///
    /// The status starts pending and is immediately normalised, so a request
    /// created with both planning fields is scheduled from the start.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if `description` is missing or
    /// empty.
    pub fn build(self) -> Result<ServiceRequest, SanitrackError> {
        let mut request = ServiceRequest {
            id: self.id.unwrap_or_default(),
            customer_id: self.customer_id,
            facility_id: self.facility_id,
            date: self.date.unwrap_or_else(crate::time::today),
            request_type_id: self.request_type_id,
            description: self.description.unwrap_or_default(),
            status: RequestStatus::Pending,
            planned_date: self.planned_date,
            planned_team_id: self.planned_team_id,
            related_request_id: self.related_request_id,
        };
        request.validate()?;
        request.normalize_status();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ServiceRequest {
        ServiceRequest::builder(CustomerId::new(), RequestTypeId::new())
            .description("Rodent sighting near dock")
            .build()
            .unwrap()
    }

    #[test]
    fn should_start_pending_without_planning_fields() {
        assert_eq!(request().status, RequestStatus::Pending);
    }

    #[test]
    fn should_start_scheduled_when_created_with_date_and_team() {
        let req = ServiceRequest::builder(CustomerId::new(), RequestTypeId::new())
            .description("Monthly visit")
            .planned_date(Date::from_ymd_opt(2024, 1, 10).unwrap())
            .planned_team_id(TeamId::new())
            .build()
            .unwrap();
        assert_eq!(req.status, RequestStatus::Scheduled);
    }

    #[test]
    fn should_not_schedule_with_only_planned_date() {
        let req = ServiceRequest::builder(CustomerId::new(), RequestTypeId::new())
            .description("Monthly visit")
            .planned_date(Date::from_ymd_opt(2024, 1, 10).unwrap())
            .build()
            .unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn should_promote_to_scheduled_on_normalize_when_planned() {
        let mut req = request();
        req.planned_date = Some(Date::from_ymd_opt(2024, 1, 10).unwrap());
        req.planned_team_id = Some(TeamId::new());
        req.normalize_status();
        assert_eq!(req.status, RequestStatus::Scheduled);
    }

    #[test]
    fn should_not_downgrade_done_on_normalize() {
        let mut req = request();
        req.close();
        req.planned_date = Some(Date::from_ymd_opt(2024, 1, 10).unwrap());
        req.planned_team_id = Some(TeamId::new());
        req.normalize_status();
        assert_eq!(req.status, RequestStatus::Done);
    }

    #[test]
    fn should_recompute_to_scheduled_when_planned() {
        let mut req = request();
        req.close();
        req.planned_date = Some(Date::from_ymd_opt(2024, 1, 10).unwrap());
        req.planned_team_id = Some(TeamId::new());
        req.recompute_status();
        assert_eq!(req.status, RequestStatus::Scheduled);
    }

    #[test]
    fn should_recompute_to_pending_when_not_planned() {
        let mut req = request();
        req.close();
        req.recompute_status();
        assert_eq!(req.status, RequestStatus::Pending);
    }

    #[test]
    fn should_roundtrip_status_through_display_and_from_str() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Scheduled,
            RequestStatus::Done,
        ] {
            let text = status.to_string();
            let parsed: RequestStatus = text.parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
