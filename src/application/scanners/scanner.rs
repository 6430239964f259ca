use crate::compliance::domain::{ManifestPayload, RepositoryRef, ScanFragment};
use crate::shared::error::ScanError;
use crate::shared::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Identifies one scanner variant.
///
/// The identifier doubles as the fragment key in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerKind {
    Manifest,
    StaticAnalysis,
    Composition,
    CiBuild,
}

impl ScannerKind {
    pub fn identifier(self) -> &'static str {
        match self {
            ScannerKind::Manifest => "manifest",
            ScannerKind::StaticAnalysis => "veracode",
            ScannerKind::Composition => "veracode_sca",
            ScannerKind::CiBuild => "jenkins",
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ScannerKind {
    type Err = ScanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manifest" => Ok(ScannerKind::Manifest),
            "veracode" => Ok(ScannerKind::StaticAnalysis),
            "veracode_sca" => Ok(ScannerKind::Composition),
            "jenkins" => Ok(ScannerKind::CiBuild),
            _ => Err(ScanError::UnknownScanner {
                name: s.to_string(),
            }),
        }
    }
}

/// Scanner - one unit of per-repository work
///
/// `initialize` is awaited exactly once, before the first `scan` call is
/// dispatched. After that the scanner is only borrowed immutably, so scans of
/// different repositories may run concurrently.
#[async_trait]
pub trait Scanner: Send + Sync {
    fn kind(&self) -> ScannerKind;

    fn name(&self) -> &'static str {
        self.kind().identifier()
    }

    /// One-time setup such as resolving remote identifiers
    ///
    /// # Errors
    /// An error leaves the scanner registered; every repository then gets the
    /// empty fragment plus a warning.
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// The fragment reported when a scan cannot produce one
    fn empty_fragment(&self) -> ScanFragment;

    /// Scans one repository
    ///
    /// # Arguments
    /// * `repo` - Repository to scan
    /// * `manifest` - The repository's manifest fragment payload; `None` only
    ///   for the manifest scanner itself
    async fn scan(
        &self,
        repo: &RepositoryRef,
        manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment>;
}
