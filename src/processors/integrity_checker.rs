use crate::error::Result;
use crate::models::{MeasurementFrame, Operator};
use serde::Serialize;
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub missing_location_records: usize,
    pub missing_power_records: usize,
    pub out_of_range_records: usize,
    pub unknown_operator_records: usize,
    pub operator_counts: BTreeMap<Operator, usize>,
    pub unknown_operators: BTreeMap<String, usize>,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Count rows the analysis cannot fully use. Nothing is dropped.
    pub fn check_integrity(&self, frame: &MeasurementFrame) -> Result<IntegrityReport> {
        let measurements = frame.measurements()?;
        let mut report = IntegrityReport {
            total_records: measurements.len(),
            ..Default::default()
        };

        for measurement in &measurements {
            let mut usable = true;

            if !measurement.has_location() {
                report.missing_location_records += 1;
                usable = false;
            } else if measurement.validate().is_err() {
                report.out_of_range_records += 1;
                usable = false;
            }

            if measurement.total_power.is_none() {
                report.missing_power_records += 1;
                usable = false;
            }

            match measurement.known_operator() {
                Some(op) => *report.operator_counts.entry(op).or_default() += 1,
                None => {
                    report.unknown_operator_records += 1;
                    let label = measurement
                        .operator
                        .clone()
                        .unwrap_or_else(|| "<missing>".to_string());
                    *report.unknown_operators.entry(label).or_default() += 1;
                    usable = false;
                }
            }

            if usable {
                report.valid_records += 1;
            }
        }

        if report.unknown_operator_records > 0 {
            tracing::warn!(
                rows = report.unknown_operator_records,
                labels = report.unknown_operators.len(),
                "Rows with unknown operators will not be plotted"
            );
        }

        Ok(report)
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let pct = |count: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * count as f64 / report.total_records as f64
            }
        };

        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Fully Usable Records: {} ({:.1}%)\n",
            report.valid_records,
            pct(report.valid_records)
        ));
        summary.push_str(&format!(
            "Missing Location: {} ({:.1}%)\n",
            report.missing_location_records,
            pct(report.missing_location_records)
        ));
        summary.push_str(&format!(
            "Out-of-range Coordinates: {}\n",
            report.out_of_range_records
        ));
        summary.push_str(&format!(
            "Missing Power: {} ({:.1}%)\n",
            report.missing_power_records,
            pct(report.missing_power_records)
        ));

        summary.push_str("\nRecords per Operator:\n");
        for (op, count) in &report.operator_counts {
            summary.push_str(&format!("  {:<10} {}\n", op.label(), count));
        }

        if !report.unknown_operators.is_empty() {
            summary.push_str(&format!(
                "\nUnknown Operators ({} records):\n",
                report.unknown_operator_records
            ));
            for (label, count) in report.unknown_operators.iter().take(10) {
                summary.push_str(&format!("  {:<10} {}\n", label, count));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
