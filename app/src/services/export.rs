//! Data export
//!
//! Supports two formats:
//! - CSV: weight history, oldest first, for spreadsheets
//! - JSON: the full persisted snapshot, loadable by any snapshot store

use serde::Serialize;

use bw_diet_shared::{PersistedSnapshot, ProfileState, WeightEntry};

use crate::error::AppResult;

/// CSV export row for weight data
#[derive(Debug, Clone, Serialize)]
pub struct WeightCsvRow {
    pub id: String,
    pub date: String,
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub note: String,
}

impl From<&WeightEntry> for WeightCsvRow {
    fn from(entry: &WeightEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            date: entry.recorded_at.to_rfc3339(),
            weight_kg: entry.weight,
            body_fat_percent: entry.body_fat,
            muscle_mass_kg: entry.muscle_mass,
            note: entry.note.clone().unwrap_or_default(),
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Weight history as CSV, oldest entry first
    pub fn weight_csv(state: &ProfileState) -> AppResult<String> {
        let rows: Vec<WeightCsvRow> = state
            .ledger()
            .entries()
            .iter()
            .rev()
            .map(WeightCsvRow::from)
            .collect();
        Self::to_csv(&rows)
    }

    /// The persisted snapshot as pretty JSON
    pub fn snapshot_json(state: &ProfileState) -> AppResult<String> {
        Ok(PersistedSnapshot::capture(state).to_json(true)?)
    }

    /// Convert rows to a CSV string with a header line
    fn to_csv<T: Serialize>(rows: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in rows {
            wtr.serialize(row)?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_weight_csv_is_oldest_first() {
        let mut state = ProfileState::new();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
        state.add_weight_entry_at(71.0, Some("first, with comma".to_string()), None, start);
        state.add_weight_entry_at(70.4, None, Some(22.5), start + Duration::days(1));

        let csv = ExportService::weight_csv(&state).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,date,weight_kg,body_fat_percent,muscle_mass_kg,note");
        assert!(lines[1].contains("2024-06-01T07:00:00+00:00,71.0,,,\"first, with comma\""));
        assert!(lines[2].contains("2024-06-02T07:00:00+00:00,70.4,22.5,,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_history_exports_nothing() {
        let csv = ExportService::weight_csv(&ProfileState::new()).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_snapshot_json_round_trips() {
        let mut state = ProfileState::new();
        state.add_weight_entry_at(71.0, None, None, Utc::now());
        let json = ExportService::snapshot_json(&state).unwrap();
        let restored = PersistedSnapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, state);
    }
}
