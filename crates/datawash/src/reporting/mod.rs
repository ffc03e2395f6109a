//! Report generation module.
//!
//! This module compares an original and a cleaned dataset and aggregates the
//! cleaning log into a [`CleaningReport`]: shapes, removal counts, a quality
//! score for both sides and the memory delta.
//!
//! # Example
//!
//! ```rust,ignore
//! use datawash::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(&original_df, &result.data, &result.log)?;
//! println!("{}", report.render_text());
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "customers")?;
//! ```

mod generator;
mod quality;

pub use generator::{CleaningReport, MemoryReduction, QualityImprovement, ReportGenerator};
pub use quality::{memory_mb, quality_score, reduction_percent};
