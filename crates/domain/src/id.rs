//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`User`](crate::user::User).
    UserId
);

define_id!(
    /// Unique identifier for a [`Customer`](crate::customer::Customer).
    CustomerId
);

define_id!(
    /// Unique identifier for a [`Facility`](crate::facility::Facility).
    FacilityId
);

define_id!(
    /// Unique identifier for a [`Zone`](crate::zone::Zone).
    ZoneId
);

define_id!(
    /// Unique identifier for a [`Station`](crate::station::Station).
    StationId
);

define_id!(
    /// Unique identifier for a [`Team`](crate::team::Team).
    TeamId
);

define_id!(
    /// Unique identifier for a [`ContactCategory`](crate::contact::ContactCategory).
    ContactCategoryId
);

define_id!(
    /// Unique identifier for a [`Contact`](crate::contact::Contact).
    ContactId
);

define_id!(
    /// Unique identifier for a [`RequestType`](crate::lookup::RequestType).
    RequestTypeId
);

define_id!(
    /// Unique identifier for an [`ApplicationDef`](crate::lookup::ApplicationDef).
    ApplicationDefId
);

define_id!(
    /// Unique identifier for an [`ActivityDef`](crate::lookup::ActivityDef).
    ActivityDefId
);

define_id!(
    /// Unique identifier for a [`FindingDef`](crate::lookup::FindingDef).
    FindingDefId
);

define_id!(
    /// Unique identifier for a [`ProductDef`](crate::lookup::ProductDef).
    ProductDefId
);

define_id!(
    /// Unique identifier for a [`ServiceRequest`](crate::request::ServiceRequest).
    RequestId
);

define_id!(
    /// Unique identifier for a [`WorkRecord`](crate::work_record::WorkRecord).
    WorkRecordId
);

define_id!(
    /// Unique identifier for a [`Finding`](crate::work_items::Finding) row.
    FindingId
);

define_id!(
    /// Unique identifier for an [`ActivityReport`](crate::report::ActivityReport).
    ReportId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = StationId::new();
        let b = StationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = WorkRecordId::new();
        let text = id.to_string();
        let parsed: WorkRecordId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_return_error_when_parsing_invalid_uuid() {
        let result = CustomerId::from_str("not-a-uuid");
        assert!(result.is_err());
    }

    #[test]
    fn should_wrap_existing_uuid_when_using_from_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let id = FacilityId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }
}
