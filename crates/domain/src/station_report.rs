//! Cross-period station report — pure aggregation over ledger entries.
//!
//! Builds the per-station × per-visit-date consumption matrix and derives
//! the ratio and change statistics report consumers render. All inputs are
//! plain rows fetched by the report service; no IO happens here.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::id::{StationId, WorkRecordId, ZoneId};
use crate::ledger::StationCount;
use crate::work_record::WorkRecordVisit;

/// A station as it appears in the report, with its zone label precomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStation {
    pub station_id: StationId,
    pub zone_id: ZoneId,
    /// Rendered zone label, e.g. `"C1-F1-Z1 Warehouse"`.
    pub zone_label: String,
    pub station_code: String,
    pub station_name: String,
}

/// Report header lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    /// `"{customer name} - {facility name}"`.
    pub customer_facility: String,
    /// Facility address, falling back to the customer address, else `"—"`.
    pub address: String,
}

/// One matrix row: a station and its consumption flag per visit date.
/// `None` means no ledger entry was recorded for that visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub zone_label: String,
    pub station_code: String,
    pub station_name: String,
    pub cells: Vec<Option<bool>>,
}

/// First-vs-last-date change statistics for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneChangeStats {
    pub zone_label: String,
    pub station_total: usize,
    /// Literal present-station counts at the first and last visit date.
    pub first_present: usize,
    pub last_present: usize,
    /// Percentage change of the present count; `None` when the first-date
    /// count is zero (not a ratio).
    pub present_change_pct: Option<f64>,
    /// Stations whose present/absent status flipped between the first and
    /// last date. Missing entries count as absent.
    pub flipped: usize,
    pub flipped_pct: Option<f64>,
}

/// The assembled cross-period report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationReport {
    pub header: ReportHeader,
    /// One formatted date per visit, in visit order (`%d.%m.%Y`).
    pub date_headers: Vec<String>,
    pub rows: Vec<ReportRow>,
    /// Facility-wide present/total ratio per visit date; `None` when the
    /// facility has no stations.
    pub overall_ratios: Vec<Option<f64>>,
    /// Per-zone present/total ratios per visit date, keyed by zone label.
    pub zone_ratios: BTreeMap<String, Vec<Option<f64>>>,
    /// Per-zone change statistics; empty with fewer than two visit dates.
    pub zone_stats: Vec<ZoneChangeStats>,
}

/// Assemble the report from the fetched rows.
///
/// `visits` must be ordered by date ascending; `stations` are expected in
/// display order (zone code, then station code).
#[must_use]
pub fn build(
    header: ReportHeader,
    visits: &[WorkRecordVisit],
    stations: &[ReportStation],
    entries: &[StationCount],
) -> StationReport {
    let cell_map: HashMap<(WorkRecordId, StationId), bool> = entries
        .iter()
        .map(|e| ((e.work_record_id, e.station_id), e.consumption_present))
        .collect();

    let date_headers = visits
        .iter()
        .map(|v| v.date.format("%d.%m.%Y").to_string())
        .collect();

    let rows: Vec<ReportRow> = stations
        .iter()
        .map(|station| ReportRow {
            zone_label: station.zone_label.clone(),
            station_code: station.station_code.clone(),
            station_name: station.station_name.clone(),
            cells: visits
                .iter()
                .map(|v| cell_map.get(&(v.id, station.station_id)).copied())
                .collect(),
        })
        .collect();

    let overall_ratios = ratios_for(&rows, visits.len());

    let mut by_zone: BTreeMap<String, Vec<&ReportRow>> = BTreeMap::new();
    for row in &rows {
        by_zone.entry(row.zone_label.clone()).or_default().push(row);
    }

    let zone_ratios = by_zone
        .iter()
        .map(|(label, zone_rows)| (label.clone(), ratios_for_refs(zone_rows, visits.len())))
        .collect();

    let zone_stats = if visits.len() < 2 {
        Vec::new()
    } else {
        by_zone
            .iter()
            .map(|(label, zone_rows)| change_stats(label, zone_rows, visits.len()))
            .collect()
    };

    StationReport {
        header,
        date_headers,
        rows,
        overall_ratios,
        zone_ratios,
        zone_stats,
    }
}

fn ratios_for(rows: &[ReportRow], dates: usize) -> Vec<Option<f64>> {
    let refs: Vec<&ReportRow> = rows.iter().collect();
    ratios_for_refs(&refs, dates)
}

#[allow(clippy::cast_precision_loss)]
fn ratios_for_refs(rows: &[&ReportRow], dates: usize) -> Vec<Option<f64>> {
    (0..dates)
        .map(|col| {
            if rows.is_empty() {
                return None;
            }
            let present = rows
                .iter()
                .filter(|row| row.cells[col] == Some(true))
                .count();
            Some(present as f64 / rows.len() as f64)
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn change_stats(label: &str, rows: &[&ReportRow], dates: usize) -> ZoneChangeStats {
    let last = dates - 1;
    let present_at =
        |col: usize| rows.iter().filter(|row| row.cells[col] == Some(true)).count();
    let first_present = present_at(0);
    let last_present = present_at(last);

    let flipped = rows
        .iter()
        .filter(|row| {
            row.cells[0].unwrap_or(false) != row.cells[last].unwrap_or(false)
        })
        .count();

    let present_change_pct = if first_present == 0 {
        None
    } else {
        Some(
            (last_present as f64 - first_present as f64) / first_present as f64 * 100.0,
        )
    };
    let flipped_pct = if rows.is_empty() {
        None
    } else {
        Some(flipped as f64 / rows.len() as f64 * 100.0)
    };

    ZoneChangeStats {
        zone_label: label.to_string(),
        station_total: rows.len(),
        first_present,
        last_present,
        present_change_pct,
        flipped,
        flipped_pct,
    }
}
