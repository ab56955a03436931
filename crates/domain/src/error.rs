//! Common error types used across the workspace.
//!
//! Every error kind here is local and recoverable by the caller with
//! corrected input; nothing in the core is fatal to the process. Each layer
//! defines its own typed errors and converts via `#[from]`.

/// Top-level error enum for the sanitrack core.
#[derive(Debug, thiserror::Error)]
pub enum SanitrackError {
    /// Input rejected before persistence.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A composite-key or derived-code collision.
    #[error("uniqueness violation")]
    Uniqueness(#[from] UniquenessViolation),

    /// Write attempted against a ledger whose work record has ended.
    #[error("record locked")]
    Locked(#[from] LockedRecordError),

    /// Delete blocked because the entity is still referenced.
    #[error("referential integrity violation")]
    ReferentialIntegrity(#[from] ReferentialIntegrityError),

    /// Opaque failure in the persistence adapter.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant failures, rejected before persistence.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A business code field was left empty.
    #[error("code must not be empty")]
    EmptyCode,

    /// A name field was left empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A request description was left empty.
    #[error("description must not be empty")]
    EmptyDescription,

    /// A contact must belong to a customer or a facility.
    #[error("contact must reference a customer or a facility")]
    ContactWithoutOwner,

    /// The facility on a record belongs to a different customer.
    #[error("facility does not belong to the selected customer")]
    FacilityCustomerMismatch,

    /// A report date range with the end before the start.
    #[error("end date must not precede start date")]
    InvertedDateRange,

    /// An inactive product was selected for a new usage row.
    #[error("product is not selectable for new records")]
    ProductNotSelectable,
}

/// A lookup by id that found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"Customer"`.
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}

/// A save that would collide with an existing unique key.
#[derive(Debug, thiserror::Error)]
#[error("{entity} with key {key:?} already exists")]
pub struct UniquenessViolation {
    /// Entity kind that collided.
    pub entity: &'static str,
    /// The offending key (business code, composite pair, …).
    pub key: String,
}

/// Ledger write against a work record whose end time is already set.
#[derive(Debug, thiserror::Error)]
#[error("work record {work_record} has ended; its station counts are read-only")]
pub struct LockedRecordError {
    /// The locked work record.
    pub work_record: String,
}

/// Delete blocked because rows still reference the entity.
#[derive(Debug, thiserror::Error)]
#[error("{entity} is still referenced and cannot be deleted")]
pub struct ReferentialIntegrityError {
    /// Entity kind whose deletion was blocked.
    pub entity: &'static str,
}
