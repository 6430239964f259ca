/// Scanners - per-repository units of work run by the scan use case
mod ci_build_scanner;
mod composition_scanner;
mod manifest_scanner;
mod scanner;
mod static_analysis_scanner;

#[cfg(test)]
pub(crate) mod test_support;

pub use ci_build_scanner::CiBuildScanner;
pub use composition_scanner::CompositionScanner;
pub use manifest_scanner::ManifestScanner;
pub use scanner::{Scanner, ScannerKind};
pub use static_analysis_scanner::StaticAnalysisScanner;
