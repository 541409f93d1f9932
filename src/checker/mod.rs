mod osv;

pub use osv::{OsvClient, OSV_QUERY_URL};

use crate::model::VulnerabilityFinding;
use anyhow::Result;
use async_trait::async_trait;

/// Ecosystem every advisory query is keyed by.
pub const ECOSYSTEM: &str = "npm";

/// Findings from one advisory lookup.
///
/// `failed` is set when the source could not be consulted; `findings` is
/// then empty, exactly as for a package with no known advisories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub findings: Vec<VulnerabilityFinding>,
    pub failed: bool,
}

impl Lookup {
    pub fn found(findings: Vec<VulnerabilityFinding>) -> Self {
        Self {
            findings,
            failed: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            findings: Vec::new(),
            failed: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// An external advisory database keyed by (name, version).
#[async_trait]
pub trait AdvisorySource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Queries the source once. Fails on transport errors, non-success
    /// responses, or bodies that cannot be decoded.
    async fn query(&self, name: &str, version: &str) -> Result<Vec<VulnerabilityFinding>>;

    /// Like [`query`](Self::query), but never fails: an error yields no
    /// findings and a [`Lookup`] marked as failed.
    async fn lookup(&self, name: &str, version: &str) -> Lookup {
        match self.query(name, version).await {
            Ok(findings) => Lookup::found(findings),
            Err(e) => {
                tracing::warn!(
                    source = self.name(),
                    package = name,
                    version,
                    error = %e,
                    "advisory lookup failed, treating as no findings"
                );
                Lookup::failed()
            }
        }
    }
}
