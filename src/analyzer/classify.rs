use crate::model::{PackageStatus, TyposquattingVerdict, VulnerabilityFinding};

/// Combines both risk signals into a single verdict.
///
/// Known vulnerabilities take precedence over a typosquatting match.
/// [`PackageStatus::Unknown`] is never produced here.
pub fn classify(findings: &[VulnerabilityFinding], typo: &TyposquattingVerdict) -> PackageStatus {
    if !findings.is_empty() {
        PackageStatus::Vulnerable
    } else if typo.is_suspicious {
        PackageStatus::Suspicious
    } else {
        PackageStatus::Safe
    }
}
