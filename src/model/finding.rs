use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "Unknown security bug";
const DEFAULT_DESCRIPTION: &str = "No details.";
const DEFAULT_SEVERITY: &str = "UNKNOWN";
const FALLBACK_LINK_BASE: &str = "https://osv.dev/vulnerability/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingSource {
    #[serde(rename = "advisory-db")]
    AdvisoryDb,
}

/// A single advisory matched for a (name, version) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityFinding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity_score: String,
    pub link: String,
    pub source: FindingSource,
}

impl VulnerabilityFinding {
    /// Builds a finding, substituting the fixed defaults for absent fields.
    pub fn new(
        id: impl Into<String>,
        title: Option<String>,
        description: Option<String>,
        severity_score: Option<String>,
        link: Option<String>,
    ) -> Self {
        let id = id.into();
        let link = link.unwrap_or_else(|| format!("{}{}", FALLBACK_LINK_BASE, id));
        Self {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            severity_score: severity_score.unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
            link,
            source: FindingSource::AdvisoryDb,
            id,
        }
    }
}

/// Outcome of the typosquatting check for one package name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TyposquattingVerdict {
    pub is_suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

impl TyposquattingVerdict {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn suspicious(target: impl Into<String>, distance: usize) -> Self {
        Self {
            is_suspicious: true,
            target_package: Some(target.into()),
            distance: Some(distance),
        }
    }
}
