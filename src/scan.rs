//! Scan orchestration.
//!
//! [`ScanOrchestrator::scan`] parses a manifest, fans out one task per
//! dependency, joins them all, and aggregates the verdicts. Results are
//! returned in manifest order regardless of which lookup finishes first.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::analyzer::{classify, normalize, TyposquatDetector};
use crate::checker::{AdvisorySource, Lookup};
use crate::config::IgnoreConfig;
use crate::error::ScanError;
use crate::manifest::{DependencyDeclaration, Manifest};
use crate::model::{PackageAnalysisResult, ScanOutcome, ScanReport};

pub struct ScanOrchestrator {
    source: Arc<dyn AdvisorySource>,
    detector: Arc<TyposquatDetector>,
    ignore: Arc<IgnoreConfig>,
}

impl ScanOrchestrator {
    pub fn new(source: impl AdvisorySource + 'static) -> Self {
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn AdvisorySource>) -> Self {
        Self {
            source,
            detector: Arc::new(TyposquatDetector::new()),
            ignore: Arc::new(IgnoreConfig::default()),
        }
    }

    pub fn with_detector(mut self, detector: TyposquatDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = Arc::new(ignore);
        self
    }

    /// Runs a full scan over `manifest_text`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::EmptyManifest`] or
    /// [`ScanError::InvalidManifestFormat`] before any lookup is made, and
    /// [`ScanError::InternalScanFailure`] if a per-package task dies.
    pub async fn scan(&self, manifest_text: &str) -> Result<ScanOutcome, ScanError> {
        let manifest = Manifest::parse(manifest_text)?;

        let dependencies: Vec<DependencyDeclaration> = manifest
            .dependencies()?
            .into_iter()
            .filter(|dep| {
                let ignored = self.ignore.should_ignore_package(&dep.name);
                if ignored {
                    debug!(package = %dep.name, "skipping ignored package");
                }
                !ignored
            })
            .collect();

        if dependencies.is_empty() {
            info!("manifest declares no dependencies");
            return Ok(ScanOutcome::empty());
        }

        info!(
            count = dependencies.len(),
            source = self.source.name(),
            "scanning dependencies"
        );

        let handles: Vec<_> = dependencies
            .into_iter()
            .map(|dep| {
                let source = Arc::clone(&self.source);
                let detector = Arc::clone(&self.detector);
                let ignore = Arc::clone(&self.ignore);
                tokio::spawn(async move { analyze(source.as_ref(), &detector, &ignore, dep).await })
            })
            .collect();

        // join_all keeps input order, so results line up with the manifest
        let mut results = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!(error = %e, "package analysis task failed");
                    return Err(ScanError::InternalScanFailure(e.to_string()));
                }
            }
        }

        let report = ScanReport::new(results);
        info!(
            total = report.stats.total_scanned,
            vulnerable = report.stats.vulnerable_count,
            suspicious = report.stats.suspicious_count,
            safe = report.stats.safe_count,
            "scan finished"
        );

        Ok(ScanOutcome::Report(report))
    }
}

async fn analyze(
    source: &dyn AdvisorySource,
    detector: &TyposquatDetector,
    ignore: &IgnoreConfig,
    dep: DependencyDeclaration,
) -> PackageAnalysisResult {
    let version = normalize(&dep.raw_version_spec);

    let Lookup {
        findings: mut vulnerabilities,
        failed: lookup_failed,
    } = source.lookup(&dep.name, &version).await;
    vulnerabilities.retain(|f| !ignore.should_ignore_vulnerability(&f.id));

    let typosquatting = detector.detect(&dep.name);
    let status = classify(&vulnerabilities, &typosquatting);

    debug!(package = %dep.name, %version, %status, "package analyzed");

    PackageAnalysisResult {
        package_name: dep.name,
        version,
        vulnerabilities,
        status,
        typosquatting,
        lookup_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PackageStatus, ScanStats, VulnerabilityFinding};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Default)]
    struct StubSource {
        findings: HashMap<(String, String), Vec<VulnerabilityFinding>>,
        failing: Vec<String>,
        delays_ms: HashMap<String, u64>,
        panicking: Vec<String>,
    }

    impl StubSource {
        fn with_finding(mut self, name: &str, version: &str, id: &str) -> Self {
            self.findings
                .entry((name.to_string(), version.to_string()))
                .or_default()
                .push(VulnerabilityFinding::new(id, None, None, None, None));
            self
        }

        fn failing(mut self, name: &str) -> Self {
            self.failing.push(name.to_string());
            self
        }

        fn delayed(mut self, name: &str, ms: u64) -> Self {
            self.delays_ms.insert(name.to_string(), ms);
            self
        }

        fn panicking(mut self, name: &str) -> Self {
            self.panicking.push(name.to_string());
            self
        }
    }

    #[async_trait]
    impl AdvisorySource for StubSource {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn query(&self, name: &str, version: &str) -> anyhow::Result<Vec<VulnerabilityFinding>> {
            if let Some(ms) = self.delays_ms.get(name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.panicking.iter().any(|n| n == name) {
                panic!("stub source blew up on {}", name);
            }
            if self.failing.iter().any(|n| n == name) {
                anyhow::bail!("connection refused");
            }
            Ok(self
                .findings
                .get(&(name.to_string(), version.to_string()))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn report(outcome: ScanOutcome) -> ScanReport {
        match outcome {
            ScanOutcome::Report(report) => report,
            ScanOutcome::Empty { message } => panic!("expected report, got {}", message),
        }
    }

    #[tokio::test]
    async fn test_vulnerable_and_suspicious() {
        let source = StubSource::default().with_finding("lodash", "4.17.15", "GHSA-p6mc-m468-83gw");
        let outcome = ScanOrchestrator::new(source)
            .scan(r#"{"dependencies":{"lodash":"4.17.15","reac":"18.2.0"}}"#)
            .await
            .unwrap();
        let report = report(outcome);

        assert_eq!(report.results.len(), 2);
        let lodash = &report.results[0];
        assert_eq!(lodash.package_name, "lodash");
        assert_eq!(lodash.status, PackageStatus::Vulnerable);
        assert_eq!(lodash.vulnerabilities.len(), 1);

        let reac = &report.results[1];
        assert_eq!(reac.package_name, "reac");
        assert_eq!(reac.status, PackageStatus::Suspicious);
        assert_eq!(reac.typosquatting.target_package.as_deref(), Some("react"));

        assert_eq!(
            report.stats,
            ScanStats {
                total_scanned: 2,
                vulnerable_count: 1,
                suspicious_count: 1,
                safe_count: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_versions_are_normalized_before_lookup() {
        let source = StubSource::default().with_finding("axios", "0.21.0", "GHSA-4w2v-q235-vp99");
        let report = report(
            ScanOrchestrator::new(source)
                .scan(r#"{"dependencies":{"axios":"^0.21.0"}}"#)
                .await
                .unwrap(),
        );
        assert_eq!(report.results[0].version, "0.21.0");
        assert_eq!(report.results[0].status, PackageStatus::Vulnerable);
    }

    #[tokio::test]
    async fn test_empty_dependencies_is_not_an_error() {
        let outcome = ScanOrchestrator::new(StubSource::default())
            .scan(r#"{"dependencies":{}}"#)
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::empty());
    }

    #[tokio::test]
    async fn test_non_json_is_invalid() {
        let err = ScanOrchestrator::new(StubSource::default())
            .scan("dependencies: lodash")
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidManifestFormat(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_block_others() {
        let source = StubSource::default()
            .failing("express")
            .with_finding("moment", "2.29.1", "GHSA-8hfj-j24r-96c4");
        let report = report(
            ScanOrchestrator::new(source)
                .scan(r#"{"dependencies":{"express":"4.18.0","moment":"2.29.1","chalk":"5.3.0"}}"#)
                .await
                .unwrap(),
        );

        assert_eq!(report.results.len(), 3);
        let express = &report.results[0];
        assert_eq!(express.status, PackageStatus::Safe);
        assert!(express.vulnerabilities.is_empty());
        assert!(express.lookup_failed);

        assert_eq!(report.results[1].status, PackageStatus::Vulnerable);
        assert!(!report.results[1].lookup_failed);
        assert_eq!(report.results[2].status, PackageStatus::Safe);
    }

    #[tokio::test]
    async fn test_order_is_manifest_order_not_completion_order() {
        let source = StubSource::default()
            .delayed("first", 60)
            .delayed("second", 30)
            .delayed("third", 0);
        let report = report(
            ScanOrchestrator::new(source)
                .scan(
                    r#"{"dependencies":{"first":"1.0.0","second":"1.0.0"},
                        "devDependencies":{"third":"1.0.0"}}"#,
                )
                .await
                .unwrap(),
        );
        let names: Vec<_> = report.results.iter().map(|r| r.package_name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_dev_dependency_overwrites_regular() {
        let source = StubSource::default().with_finding("lodash", "4.17.15", "GHSA-p6mc-m468-83gw");
        let report = report(
            ScanOrchestrator::new(source)
                .scan(
                    r#"{"dependencies":{"lodash":"4.17.15"},
                        "devDependencies":{"lodash":"4.17.21"}}"#,
                )
                .await
                .unwrap(),
        );
        assert_eq!(report.stats.total_scanned, 1);
        assert_eq!(report.results[0].version, "4.17.21");
        assert_eq!(report.results[0].status, PackageStatus::Safe);
    }

    #[tokio::test]
    async fn test_task_panic_is_internal_failure() {
        let source = StubSource::default().panicking("boom");
        let err = ScanOrchestrator::new(source)
            .scan(r#"{"dependencies":{"chalk":"5.0.0","boom":"1.0.0"}}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InternalScanFailure(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_ignore_config() {
        let source = StubSource::default()
            .with_finding("lodash", "4.17.15", "GHSA-p6mc-m468-83gw")
            .with_finding("minimist", "1.2.0", "GHSA-vh95-rmgr-6w4m");
        let ignore = IgnoreConfig {
            packages: vec!["@types/*".to_string()],
            vulnerabilities: vec!["GHSA-p6mc-m468-83gw".to_string()],
        };
        let report = report(
            ScanOrchestrator::new(source)
                .with_ignore(ignore)
                .scan(
                    r#"{"dependencies":{"lodash":"4.17.15","minimist":"1.2.0"},
                        "devDependencies":{"@types/node":"20.0.0"}}"#,
                )
                .await
                .unwrap(),
        );
        assert_eq!(report.stats.total_scanned, 2);
        assert_eq!(report.results[0].status, PackageStatus::Safe);
        assert_eq!(report.results[1].status, PackageStatus::Vulnerable);
    }

    #[tokio::test]
    async fn test_all_ignored_is_empty() {
        let ignore = IgnoreConfig {
            packages: vec!["left-pad".to_string()],
            vulnerabilities: Vec::new(),
        };
        let outcome = ScanOrchestrator::new(StubSource::default())
            .with_ignore(ignore)
            .scan(r#"{"dependencies":{"left-pad":"1.3.0"}}"#)
            .await
            .unwrap();
        assert_eq!(outcome, ScanOutcome::empty());
    }

    #[tokio::test]
    async fn test_lookup_degrades_to_empty() {
        let source = StubSource::default().failing("express");
        let lookup = source.lookup("express", "4.18.0").await;
        assert!(lookup.is_empty());
        assert!(lookup.failed);
    }

    /// Source with its own fallback: when the primary query fails it serves
    /// findings from a local mirror.
    struct MirrorSource {
        mirror: HashMap<String, Vec<VulnerabilityFinding>>,
    }

    #[async_trait]
    impl AdvisorySource for MirrorSource {
        fn name(&self) -> &'static str {
            "mirror"
        }

        async fn query(&self, _name: &str, _version: &str) -> anyhow::Result<Vec<VulnerabilityFinding>> {
            anyhow::bail!("primary advisory source unavailable")
        }

        async fn lookup(&self, name: &str, _version: &str) -> Lookup {
            match self.mirror.get(name) {
                Some(findings) => Lookup::found(findings.clone()),
                None => Lookup::failed(),
            }
        }
    }

    #[tokio::test]
    async fn test_scan_uses_source_lookup() {
        let mut mirror = HashMap::new();
        mirror.insert(
            "lodash".to_string(),
            vec![VulnerabilityFinding::new("GHSA-p6mc-m468-83gw", None, None, None, None)],
        );
        let report = report(
            ScanOrchestrator::new(MirrorSource { mirror })
                .scan(r#"{"dependencies":{"lodash":"4.17.15","chalk":"5.3.0"}}"#)
                .await
                .unwrap(),
        );

        let lodash = &report.results[0];
        assert_eq!(lodash.status, PackageStatus::Vulnerable);
        assert_eq!(lodash.vulnerabilities.len(), 1);
        assert!(!lodash.lookup_failed);

        let chalk = &report.results[1];
        assert_eq!(chalk.status, PackageStatus::Safe);
        assert!(chalk.lookup_failed);
    }
}
