//! Dependency manifest risk analysis.
//!
//! Given a `package.json`-style manifest, every declared dependency is checked
//! against an advisory database and against a corpus of trusted package
//! names, then classified as SAFE, VULNERABLE, or SUSPICIOUS.
//!
//! ```no_run
//! use deprisk::{checker::OsvClient, ScanOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = ScanOrchestrator::new(OsvClient::new());
//!     let outcome = orchestrator
//!         .scan(r#"{"dependencies": {"lodash": "^4.17.15"}}"#)
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod output;
pub mod scan;

pub use config::Config;
pub use error::ScanError;
pub use model::{PackageAnalysisResult, PackageStatus, ScanOutcome, ScanReport, ScanStats};
pub use scan::ScanOrchestrator;
