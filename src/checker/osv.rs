use crate::model::VulnerabilityFinding;
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ECOSYSTEM;

/// Single-package query endpoint of OSV.dev.
pub const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";

pub struct OsvClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OsvClient {
    pub fn new() -> Self {
        Self::with_endpoint(OSV_QUERY_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for OsvClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OsvPackage<'a> {
    name: &'a str,
    ecosystem: &'a str,
}

#[derive(Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

#[derive(Deserialize)]
struct OsvResponse {
    vulns: Option<Vec<OsvVuln>>,
}

#[derive(Deserialize)]
struct OsvVuln {
    id: String,
    summary: Option<String>,
    details: Option<String>,
    severity: Option<Vec<OsvSeverity>>,
    references: Option<Vec<OsvReference>>,
}

#[derive(Deserialize)]
struct OsvSeverity {
    score: Option<String>,
}

#[derive(Deserialize)]
struct OsvReference {
    url: Option<String>,
}

impl From<OsvVuln> for VulnerabilityFinding {
    fn from(vuln: OsvVuln) -> Self {
        let severity_score = vuln
            .severity
            .and_then(|list| list.into_iter().next())
            .and_then(|s| s.score)
            .filter(|s| !s.is_empty());
        let link = vuln
            .references
            .and_then(|list| list.into_iter().next())
            .and_then(|r| r.url)
            .filter(|u| !u.is_empty());

        VulnerabilityFinding::new(
            vuln.id,
            vuln.summary.filter(|s| !s.is_empty()),
            vuln.details.filter(|s| !s.is_empty()),
            severity_score,
            link,
        )
    }
}

#[async_trait]
impl super::AdvisorySource for OsvClient {
    fn name(&self) -> &'static str {
        "OSV.dev"
    }

    async fn query(&self, name: &str, version: &str) -> Result<Vec<VulnerabilityFinding>> {
        let query = OsvQuery {
            package: OsvPackage {
                name,
                ecosystem: ECOSYSTEM,
            },
            version,
        };

        tracing::debug!(package = name, version, endpoint = %self.endpoint, "querying advisories");

        let response = self.client.post(&self.endpoint).json(&query).send().await?;

        if !response.status().is_success() {
            bail!("advisory source returned status {}", response.status());
        }

        let body: OsvResponse = response.json().await?;

        Ok(body
            .vulns
            .unwrap_or_default()
            .into_iter()
            .map(VulnerabilityFinding::from)
            .collect())
    }
}
