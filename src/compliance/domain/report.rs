use super::fragment::ScanFragment;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fragments of one repository, keyed by scanner name.
pub type RepositoryFragments = BTreeMap<String, ScanFragment>;

/// The consolidated snapshot produced by one run.
///
/// Field names and nesting are consumed downstream and must stay stable.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Run start, RFC 3339 UTC
    pub scan_date: String,
    /// Run start, milliseconds since the epoch
    pub scan_start_utc_time: i64,
    pub scan_elapsed_ms: u64,
    pub orgs: Vec<String>,
    pub repo_whitelist: Vec<String>,
    /// Names of the scanners that ran, in execution order
    pub scanners: Vec<String>,
    pub repos: BTreeMap<String, RepositoryFragments>,
}

impl ScanReport {
    pub fn repository(&self, name: &str) -> Option<&RepositoryFragments> {
        self.repos.get(name)
    }

    pub fn fragment(&self, repository: &str, scanner: &str) -> Option<&ScanFragment> {
        self.repos.get(repository).and_then(|r| r.get(scanner))
    }

    pub fn warning_count(&self) -> usize {
        self.repos
            .values()
            .flat_map(|fragments| fragments.values())
            .map(|fragment| fragment.warnings().count())
            .sum()
    }
}
