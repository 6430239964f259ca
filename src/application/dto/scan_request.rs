use crate::application::scanners::ScannerKind;

/// Smallest worker pool the use case runs with
const MIN_CONCURRENCY: usize = 1;

/// ScanRequest - Internal request DTO for the scan use case
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Organizations whose repositories are scanned
    pub organizations: Vec<String>,
    /// When non-empty, only these repository names are scanned
    pub repository_whitelist: Vec<String>,
    /// Scanners to run after the manifest scanner, in order
    pub scanners: Vec<ScannerKind>,
    /// Upper bound on repositories scanned at the same time
    pub concurrency: usize,
}

impl ScanRequest {
    pub fn new(
        organizations: Vec<String>,
        repository_whitelist: Vec<String>,
        scanners: Vec<ScannerKind>,
        concurrency: usize,
    ) -> Self {
        Self {
            organizations,
            repository_whitelist,
            scanners,
            concurrency: concurrency.max(MIN_CONCURRENCY),
        }
    }
}
