use super::quality::{memory_mb, quality_score, reduction_percent};
use crate::cleaner::CleaningLog;
use crate::error::Result;
use crate::utils::format_number;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Quality score before and after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityImprovement {
    pub original_score: f64,
    pub final_score: f64,
    /// `final_score - original_score`
    pub improvement: f64,
}

/// Memory footprint before and after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryReduction {
    pub original_mb: f64,
    pub final_mb: f64,
    pub reduction_percent: f64,
}

/// Before/after summary of a cleaning pass.
///
/// `rows_removed` and `columns_removed` are `original - final` and are
/// reported as-is, including negative values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Local time the report was built, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    pub original_shape: (usize, usize),
    pub final_shape: (usize, usize),
    pub rows_removed: i64,
    pub columns_removed: i64,
    pub missing_values_handled: usize,
    pub duplicates_removed: usize,
    pub operations_performed: Vec<String>,
    pub quality_improvement: QualityImprovement,
    pub memory_reduction: MemoryReduction,
}

impl CleaningReport {
    /// Flat key-value document with nested objects for the paired metrics.
    pub fn to_document(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Plain-text rendering for download.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let quality = &self.quality_improvement;
        let memory = &self.memory_reduction;

        out.push_str("DATA CLEANING REPORT\n");
        out.push_str("====================\n\n");
        out.push_str(&format!("Generated: {}\n\n", self.timestamp));

        out.push_str(&format!(
            "Original shape: {} rows x {} columns\n",
            format_number(self.original_shape.0 as i64),
            format_number(self.original_shape.1 as i64)
        ));
        out.push_str(&format!(
            "Final shape: {} rows x {} columns\n",
            format_number(self.final_shape.0 as i64),
            format_number(self.final_shape.1 as i64)
        ));
        out.push_str(&format!("Rows removed: {}\n", format_number(self.rows_removed)));
        out.push_str(&format!(
            "Columns removed: {}\n",
            format_number(self.columns_removed)
        ));
        out.push_str(&format!(
            "Missing values handled: {}\n",
            format_number(self.missing_values_handled as i64)
        ));
        out.push_str(&format!(
            "Duplicates removed: {}\n\n",
            format_number(self.duplicates_removed as i64)
        ));

        out.push_str(&format!(
            "Quality score: {:.1} -> {:.1} ({:+.1})\n",
            quality.original_score, quality.final_score, quality.improvement
        ));
        out.push_str(&format!(
            "Memory: {:.2} MB -> {:.2} MB ({:.1}% reduction)\n\n",
            memory.original_mb, memory.final_mb, memory.reduction_percent
        ));

        out.push_str("Operations performed:\n");
        if self.operations_performed.is_empty() {
            out.push_str("  (none)\n");
        }
        for (i, op) in self.operations_performed.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, op));
        }

        out
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds [`CleaningReport`]s and writes reports and cleaned datasets.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Aggregate a before/after report. Performs no cleaning.
    pub fn build_report(
        original: &DataFrame,
        cleaned: &DataFrame,
        log: &CleaningLog,
    ) -> Result<CleaningReport> {
        let original_score = quality_score(original)?;
        let final_score = quality_score(cleaned)?;

        let original_mb = memory_mb(original);
        let final_mb = memory_mb(cleaned);

        let report = CleaningReport {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            original_shape: original.shape(),
            final_shape: cleaned.shape(),
            rows_removed: original.height() as i64 - cleaned.height() as i64,
            columns_removed: original.width() as i64 - cleaned.width() as i64,
            missing_values_handled: log.missing_values_handled,
            duplicates_removed: log.duplicates_removed,
            operations_performed: log.operations.clone(),
            quality_improvement: QualityImprovement {
                original_score,
                final_score,
                improvement: final_score - original_score,
            },
            memory_reduction: MemoryReduction {
                original_mb,
                final_mb,
                reduction_percent: reduction_percent(original_mb, final_mb),
            },
        };

        info!(
            "Report built: quality {:.1} -> {:.1}, {} operations",
            original_score,
            final_score,
            report.operations_performed.len()
        );

        Ok(report)
    }

    /// Write the report as pretty JSON to `<output_dir>/<base>_report.json`.
    pub fn write_report_to_file(&self, report: &CleaningReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(&report.to_document()?)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the text rendering to `<output_dir>/<base>_report.txt`.
    pub fn write_text_report(&self, report: &CleaningReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.txt", base_name));
        fs::write(&report_path, report.render_text())?;

        info!("Text report saved: {}", report_path.display());
        Ok(report_path)
    }

    /// Write the cleaned dataset to `<output_dir>/<base>_cleaned.csv`.
    pub fn write_cleaned_csv(&self, df: &DataFrame, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}_cleaned.csv", base_name));
        let mut file = File::create(&output_path)?;
        let mut df = df.clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut df)?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }
}
