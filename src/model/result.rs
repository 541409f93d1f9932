use serde::{Deserialize, Serialize};

use super::{TyposquattingVerdict, VulnerabilityFinding};

/// Informational message returned when a manifest declares no dependencies.
pub const NO_DEPENDENCIES_MESSAGE: &str = "no dependencies found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageStatus {
    Safe,
    Vulnerable,
    Suspicious,
    Unknown,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Safe => "SAFE",
            PackageStatus::Vulnerable => "VULNERABLE",
            PackageStatus::Suspicious => "SUSPICIOUS",
            PackageStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAnalysisResult {
    pub package_name: String,
    pub version: String,
    pub vulnerabilities: Vec<VulnerabilityFinding>,
    pub status: PackageStatus,
    pub typosquatting: TyposquattingVerdict,
    /// Set when the advisory lookup failed and `vulnerabilities` is empty
    /// only because the source could not be reached.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub lookup_failed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_scanned: usize,
    pub vulnerable_count: usize,
    pub suspicious_count: usize,
    pub safe_count: usize,
}

impl ScanStats {
    pub fn from_results(results: &[PackageAnalysisResult]) -> Self {
        let count = |status: PackageStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total_scanned: results.len(),
            vulnerable_count: count(PackageStatus::Vulnerable),
            suspicious_count: count(PackageStatus::Suspicious),
            safe_count: count(PackageStatus::Safe),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub results: Vec<PackageAnalysisResult>,
    pub stats: ScanStats,
}

impl ScanReport {
    pub fn new(results: Vec<PackageAnalysisResult>) -> Self {
        let stats = ScanStats::from_results(&results);
        Self { results, stats }
    }

    /// True when nothing was flagged as vulnerable or suspicious.
    pub fn is_clean(&self) -> bool {
        self.stats.vulnerable_count == 0 && self.stats.suspicious_count == 0
    }
}

/// Successful result of a scan: either a full report or the
/// no-dependencies informational message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanOutcome {
    Report(ScanReport),
    Empty { message: String },
}

impl ScanOutcome {
    pub fn empty() -> Self {
        ScanOutcome::Empty {
            message: NO_DEPENDENCIES_MESSAGE.to_string(),
        }
    }

    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            ScanOutcome::Report(report) => Some(report),
            ScanOutcome::Empty { .. } => None,
        }
    }
}

/// Error payload handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}
