use crate::application::dto::ScanRequest;
use crate::application::factories::ScannerFactory;
use crate::application::scanners::Scanner;
use crate::compliance::domain::{
    ManifestPayload, RepositoryFragments, RepositoryRef, ScanFragment, ScanReport,
    ScannerMessage,
};
use crate::compliance::policies::Cutoff;
use crate::ports::outbound::{ProgressReporter, SourceControlClient};
use crate::shared::error::ScanError;
use crate::shared::Result;
use chrono::{SecondsFormat, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

#[cfg(test)]
mod tests;

/// RunScanUseCase - Orchestrates one compliance scan
///
/// The run has two fan-out phases separated by a barrier: the manifest
/// scanner runs for every repository first, then every other scanner runs
/// with that repository's manifest fragment as context. Each phase scans at
/// most `request.concurrency` repositories at a time.
///
/// # Type Parameters
/// * `PR` - ProgressReporter implementation
pub struct RunScanUseCase<PR> {
    source_control: Arc<dyn SourceControlClient>,
    scanner_factory: ScannerFactory,
    progress_reporter: PR,
}

impl<PR> RunScanUseCase<PR>
where
    PR: ProgressReporter,
{
    /// Creates a new RunScanUseCase with injected dependencies
    pub fn new(
        source_control: Arc<dyn SourceControlClient>,
        scanner_factory: ScannerFactory,
        progress_reporter: PR,
    ) -> Self {
        Self {
            source_control,
            scanner_factory,
            progress_reporter,
        }
    }

    /// Executes the scan
    ///
    /// # Arguments
    /// * `request` - Organizations, whitelist, scanners and pool size
    ///
    /// # Returns
    /// The assembled report. Per-repository and per-scanner failures are
    /// warnings inside it, never errors.
    ///
    /// # Errors
    /// Returns `ScanError::NoOrganizations` before any network call when the
    /// organization list is empty, and configuration errors from scanner creation.
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanReport> {
        // Step 1: Refuse to run without organizations
        if request.organizations.is_empty() {
            return Err(ScanError::NoOrganizations.into());
        }

        let started_at = Utc::now();
        let clock = Instant::now();
        let cutoff = Cutoff::one_month_before(started_at);

        // Step 2: Create the scanner registry, manifest first
        let mut scanners = self.scanner_factory.create_all(&request.scanners, cutoff)?;

        // Step 3: Resolve repositories
        let repositories = self.resolve_repositories(&request).await?;

        // Step 4: Initialize every scanner before the first scan
        let init_failures = self.initialize_scanners(&mut scanners).await;

        let Some(((manifest_scanner, scanners_after), (manifest_failure, failures_after))) =
            scanners.split_first().zip(init_failures.split_first())
        else {
            anyhow::bail!("Scanner registry is empty");
        };

        let keys = repository_keys(&repositories);
        let fragments: DashMap<String, RepositoryFragments> = DashMap::new();

        // Step 5: Phase 1, manifest scan of every repository
        self.progress_reporter
            .start_phase(manifest_scanner.name(), repositories.len());
        self.run_manifest_phase(
            manifest_scanner.as_ref(),
            manifest_failure.as_deref(),
            &repositories,
            &keys,
            &fragments,
            request.concurrency,
        )
        .await;
        self.progress_reporter
            .finish_phase("✅ Manifest scan complete");

        // Step 6: Phase 2, remaining scanners with the manifest as context
        if !scanners_after.is_empty() {
            self.progress_reporter
                .start_phase("security and CI", repositories.len());
            self.run_context_phase(
                scanners_after,
                failures_after,
                &repositories,
                &keys,
                &fragments,
                request.concurrency,
            )
            .await;
            self.progress_reporter.finish_phase("✅ Scanners complete");
        }

        // Step 7: Assemble the report
        let report = ScanReport {
            scan_date: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            scan_start_utc_time: started_at.timestamp_millis(),
            scan_elapsed_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            orgs: request.organizations.clone(),
            repo_whitelist: request.repository_whitelist.clone(),
            scanners: scanners.iter().map(|s| s.name().to_string()).collect(),
            repos: fragments.into_iter().collect::<BTreeMap<_, _>>(),
        };

        let warnings = report.warning_count();
        self.progress_reporter.report(&format!(
            "📊 Scanned {} repository(ies) with {} scanner(s), {} warning(s)",
            report.repos.len(),
            report.scanners.len(),
            warnings
        ));
        Ok(report)
    }

    async fn resolve_repositories(&self, request: &ScanRequest) -> Result<Vec<RepositoryRef>> {
        self.progress_reporter.report(&format!(
            "🔍 Resolving repositories in {} organization(s)",
            request.organizations.len()
        ));

        let repositories = self
            .source_control
            .list_repositories(&request.organizations, &request.repository_whitelist)
            .await?;

        self.progress_reporter.report(&format!(
            "✅ Found {} repository(ies) to scan",
            repositories.len()
        ));
        Ok(repositories)
    }

    /// Returns one entry per scanner: `Some(reason)` when initialization failed.
    async fn initialize_scanners(&self, scanners: &mut [Box<dyn Scanner>]) -> Vec<Option<String>> {
        let mut failures = Vec::with_capacity(scanners.len());
        for scanner in scanners.iter_mut() {
            match scanner.initialize().await {
                Ok(()) => failures.push(None),
                Err(e) => {
                    let reason = format!("{:#}", e);
                    self.progress_reporter.report_warning(&format!(
                        "Scanner '{}' failed to initialize: {}",
                        scanner.name(),
                        reason
                    ));
                    failures.push(Some(reason));
                }
            }
        }
        failures
    }

    async fn run_manifest_phase(
        &self,
        scanner: &dyn Scanner,
        init_failure: Option<&str>,
        repositories: &[RepositoryRef],
        keys: &[String],
        fragments: &DashMap<String, RepositoryFragments>,
        concurrency: usize,
    ) {
        stream::iter(repositories.iter().zip(keys))
            .map(|(repo, key)| async move {
                let fragment = run_scanner(scanner, init_failure, repo, None).await;
                fragments
                    .entry(key.clone())
                    .or_default()
                    .insert(fragment.scanner_name().to_string(), fragment);
                self.progress_reporter.advance(repo.full_name());
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<()>>()
            .await;
    }

    async fn run_context_phase(
        &self,
        scanners: &[Box<dyn Scanner>],
        init_failures: &[Option<String>],
        repositories: &[RepositoryRef],
        keys: &[String],
        fragments: &DashMap<String, RepositoryFragments>,
        concurrency: usize,
    ) {
        stream::iter(repositories.iter().zip(keys))
            .map(|(repo, key)| async move {
                // Clone so no map guard is held across the scans
                let manifest: Option<ManifestPayload> = fragments
                    .get(key)
                    .and_then(|repo_fragments| {
                        repo_fragments
                            .values()
                            .find_map(|fragment| fragment.manifest().cloned())
                    });

                let results = join_all(scanners.iter().zip(init_failures).map(
                    |(scanner, failure)| {
                        run_scanner(scanner.as_ref(), failure.as_deref(), repo, manifest.as_ref())
                    },
                ))
                .await;

                let mut entry = fragments.entry(key.clone()).or_default();
                for fragment in results {
                    entry.insert(fragment.scanner_name().to_string(), fragment);
                }
                drop(entry);
                self.progress_reporter.advance(repo.full_name());
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<()>>()
            .await;
    }
}

/// Runs one scanner, turning every failure into the empty fragment plus a warning.
async fn run_scanner(
    scanner: &dyn Scanner,
    init_failure: Option<&str>,
    repo: &RepositoryRef,
    manifest: Option<&ManifestPayload>,
) -> ScanFragment {
    if let Some(reason) = init_failure {
        let mut fragment = scanner.empty_fragment();
        fragment.push_message(ScannerMessage::warning(format!(
            "Scanner initialization failed: {}",
            reason
        )));
        return fragment;
    }

    match scanner.scan(repo, manifest).await {
        Ok(fragment) => fragment,
        Err(e) => {
            tracing::warn!(
                repo = %repo.full_name(),
                scanner = scanner.name(),
                error = %format!("{:#}", e),
                "Scan failed"
            );
            let mut fragment = scanner.empty_fragment();
            fragment.push_message(ScannerMessage::warning(format!("Scan failed: {:#}", e)));
            fragment
        }
    }
}

/// Report keys: the repository name, or `owner/name` when two organizations
/// share a repository name.
fn repository_keys(repositories: &[RepositoryRef]) -> Vec<String> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for repo in repositories {
        *name_counts.entry(repo.name()).or_default() += 1;
    }

    repositories
        .iter()
        .map(|repo| {
            if name_counts.get(repo.name()).copied().unwrap_or(0) > 1 {
                repo.full_name().to_string()
            } else {
                repo.name().to_string()
            }
        })
        .collect()
}
