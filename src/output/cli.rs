use crate::model::{PackageAnalysisResult, PackageStatus, ScanOutcome, ScanReport};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Advisories")]
    advisories: String,
    #[tabled(rename = "Looks Like")]
    looks_like: String,
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Link")]
    link: String,
}

pub fn print_cli_table(outcome: &ScanOutcome) -> Result<()> {
    print!("{}", render_table(outcome, Utc::now())?);
    Ok(())
}

pub(crate) fn render_table(outcome: &ScanOutcome, scanned_at: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();
    writeln!(out)?;
    writeln!(
        out,
        "Scan completed at: {}",
        scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    let report = match outcome {
        ScanOutcome::Report(report) => report,
        ScanOutcome::Empty { message } => {
            writeln!(out, "{}", capitalize(message))?;
            return Ok(out);
        }
    };

    writeln!(out, "Scanned {} packages:", report.stats.total_scanned)?;
    writeln!(out)?;

    let rows: Vec<PackageRow> = report.results.iter().map(package_row).collect();
    writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;

    let findings: Vec<FindingRow> = report
        .results
        .iter()
        .flat_map(|r| {
            r.vulnerabilities.iter().map(move |v| FindingRow {
                package: r.package_name.clone(),
                id: v.id.clone(),
                severity: truncate(&v.severity_score, 24),
                title: truncate(&v.title, 50),
                link: v.link.clone(),
            })
        })
        .collect();

    if !findings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Found {} advisories:", findings.len())?;
        writeln!(out)?;
        writeln!(out, "{}", Table::new(findings).with(Style::rounded()))?;
    }

    let unchecked: Vec<&str> = report
        .results
        .iter()
        .filter(|r| r.lookup_failed)
        .map(|r| r.package_name.as_str())
        .collect();
    if !unchecked.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "Warning: advisory lookup failed for {}; reported as having no advisories.",
            unchecked.join(", ")
        )?;
    }

    writeln!(out)?;
    write_summary(&mut out, report)?;
    Ok(out)
}

fn package_row(result: &PackageAnalysisResult) -> PackageRow {
    let advisories = match (result.vulnerabilities.len(), result.lookup_failed) {
        (_, true) => "?".to_string(),
        (0, false) => "-".to_string(),
        (n, false) => n.to_string(),
    };
    let looks_like = match (
        &result.typosquatting.target_package,
        result.typosquatting.distance,
    ) {
        (Some(target), Some(distance)) => format!("{} ({})", target, distance),
        (Some(target), None) => target.clone(),
        _ => "-".to_string(),
    };

    PackageRow {
        status: format_status(result.status),
        name: truncate(&result.package_name, 40),
        version: format_version(&result.version),
        advisories,
        looks_like,
    }
}

fn write_summary(out: &mut String, report: &ScanReport) -> std::fmt::Result {
    let stats = &report.stats;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Total scanned: {}", stats.total_scanned)?;
    writeln!(out, "  Vulnerable:    {}", stats.vulnerable_count)?;
    writeln!(out, "  Suspicious:    {}", stats.suspicious_count)?;
    writeln!(out, "  Safe:          {}", stats.safe_count)
}

fn format_status(status: PackageStatus) -> String {
    match status {
        PackageStatus::Vulnerable => "\x1b[31mVULNERABLE\x1b[0m".to_string(),
        PackageStatus::Suspicious => "\x1b[33mSUSPICIOUS\x1b[0m".to_string(),
        PackageStatus::Safe => "\x1b[32mSAFE\x1b[0m".to_string(),
        PackageStatus::Unknown => "UNKNOWN".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn format_version(version: &str) -> String {
    if version.is_empty() {
        "-".to_string()
    } else {
        version.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TyposquattingVerdict, VulnerabilityFinding};
    use chrono::TimeZone;

    fn scanned_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-package-name", 10), "a-very-...");
    }

    #[test]
    fn test_render_empty() {
        let text = render_table(&ScanOutcome::empty(), scanned_at()).unwrap();
        assert!(text.contains("Scan completed at: 2024-03-01 12:00:00 UTC"));
        assert!(text.contains("No dependencies found"));
    }

    #[test]
    fn test_render_report() {
        let report = ScanReport::new(vec![
            PackageAnalysisResult {
                package_name: "lodash".to_string(),
                version: "4.17.15".to_string(),
                vulnerabilities: vec![VulnerabilityFinding::new(
                    "GHSA-p6mc-m468-83gw",
                    Some("Prototype Pollution in lodash".to_string()),
                    None,
                    None,
                    None,
                )],
                status: PackageStatus::Vulnerable,
                typosquatting: TyposquattingVerdict::clean(),
                lookup_failed: false,
            },
            PackageAnalysisResult {
                package_name: "reac".to_string(),
                version: "18.2.0".to_string(),
                vulnerabilities: Vec::new(),
                status: PackageStatus::Suspicious,
                typosquatting: TyposquattingVerdict::suspicious("react", 1),
                lookup_failed: true,
            },
        ]);
        let text = render_table(&ScanOutcome::Report(report), scanned_at()).unwrap();

        assert!(text.contains("Scanned 2 packages"));
        assert!(text.contains("GHSA-p6mc-m468-83gw"));
        assert!(text.contains("react (1)"));
        assert!(text.contains("advisory lookup failed for reac"));
        assert!(text.contains("Vulnerable:    1"));
        assert!(text.contains("Suspicious:    1"));
    }
}
