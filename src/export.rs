// 📤 CSV Export - one row per profile and era with the derived metrics

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::dataset::{self, ExpenseCategory, Profile};
use crate::metrics::EraMetrics;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub profile: Profile,
    pub year: u16,
    pub income: f64,
    pub house_price: f64,
    pub ratio: f64,
    pub severity: String,
    pub monthly_housing: f64,
    pub monthly_tax: f64,
    pub monthly_food: f64,
    pub monthly_transport: f64,
    pub monthly_other: f64,
}

fn round_pence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ExportRow {
    pub fn new(profile: Profile, metrics: &EraMetrics) -> Self {
        ExportRow {
            profile,
            year: metrics.year,
            income: metrics.income,
            house_price: metrics.house_price,
            ratio: metrics.ratio,
            severity: metrics.severity.as_str().to_string(),
            monthly_housing: round_pence(metrics.monthly(ExpenseCategory::Housing)),
            monthly_tax: round_pence(metrics.monthly(ExpenseCategory::Tax)),
            monthly_food: round_pence(metrics.monthly(ExpenseCategory::Food)),
            monthly_transport: round_pence(metrics.monthly(ExpenseCategory::Transport)),
            monthly_other: round_pence(metrics.monthly(ExpenseCategory::Other)),
        }
    }
}

/// Rows for the given profiles, eras in chronological order
pub fn rows(profiles: &[Profile]) -> Vec<ExportRow> {
    profiles
        .iter()
        .flat_map(|&profile| {
            EraMetrics::all(dataset::get(profile))
                .into_iter()
                .map(move |m| ExportRow::new(profile, &m))
        })
        .collect()
}

pub fn write_csv<W: Write>(writer: W, rows: &[ExportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row).context("Failed to serialize export row")?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Write the CSV to `path`, returning the number of data rows
pub fn export_to_file(path: &Path, profiles: &[Profile]) -> Result<usize> {
    let rows = rows(profiles);
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file {:?}", path))?;
    write_csv(file, &rows)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_for_both_profiles() {
        let rows = rows(&Profile::ALL);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].profile, Profile::Single);
        assert_eq!(rows[0].year, 1965);
        assert_eq!(rows[2].monthly_housing, 1225.0);
        assert_eq!(rows[5].profile, Profile::Couple);
        assert_eq!(rows[5].ratio, 4.1);
        assert_eq!(rows[5].severity, "medium");
    }

    #[test]
    fn test_csv_header_and_body() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows(&[Profile::Couple])).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("profile,year,income,house_price,ratio,severity,monthly_housing,monthly_tax,monthly_food,monthly_transport,monthly_other")
        );
        assert_eq!(lines.count(), 3);
        assert!(text.contains("couple,2025,70000.0,285000.0,4.1,medium,"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eras.csv");

        let count = export_to_file(&path, &[Profile::Single]).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[2][0], "single");
        assert_eq!(&records[2][1], "2025");
    }
}
