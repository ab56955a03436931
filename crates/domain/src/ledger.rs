//! Station-count ledger — per-(work record, station) consumption entries.
//!
//! Exactly one row per pair, written with upsert semantics. Report consumers
//! receive consumption as a binary Var/Yok value, never a numeric count.

use serde::{Deserialize, Serialize};

use crate::id::{StationId, WorkRecordId};

/// One consumption observation at one station during one visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationCount {
    pub work_record_id: WorkRecordId,
    pub station_id: StationId,
    pub consumption_present: bool,
    pub note: String,
}

impl StationCount {
    /// Create a new ledger entry.
    #[must_use]
    pub fn new(
        work_record_id: WorkRecordId,
        station_id: StationId,
        consumption_present: bool,
        note: impl Into<String>,
    ) -> Self {
        Self {
            work_record_id,
            station_id,
            consumption_present,
            note: note.into(),
        }
    }

    /// The binary label report generators print: "Var" (present) or "Yok"
    /// (absent).
    #[must_use]
    pub fn consumption_label(&self) -> &'static str {
        if self.consumption_present { "Var" } else { "Yok" }
    }
}

/// Entry-coverage summary for a facility or zone under one work record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total: u64,
    pub entered: u64,
    pub remaining: u64,
}

impl LedgerSummary {
    /// Build a summary from the station total and the entered count.
    #[must_use]
    pub fn new(total: u64, entered: u64) -> Self {
        Self {
            total,
            entered,
            remaining: total.saturating_sub(entered),
        }
    }
}
