//! Core data types for findings, per-package verdicts, and scan payloads.
//!
//! - [`VulnerabilityFinding`] - One advisory matched for a package version
//! - [`TyposquattingVerdict`] - Near-miss check against trusted names
//! - [`PackageAnalysisResult`] - Per-package record with a [`PackageStatus`]
//! - [`ScanStats`] - Aggregate counts over a scan
//! - [`ScanOutcome`] - What a successful scan hands to presentation layers
//!
//! # Example
//!
//! ```
//! use deprisk::model::{ScanOutcome, ScanReport};
//!
//! let report = ScanReport::new(Vec::new());
//! assert_eq!(report.stats.total_scanned, 0);
//!
//! let json = serde_json::to_string(&ScanOutcome::empty()).unwrap();
//! assert_eq!(json, r#"{"message":"no dependencies found"}"#);
//! ```

mod finding;
mod result;

pub use finding::*;
pub use result::*;
