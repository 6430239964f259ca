use crate::application::dto::ScannerSettings;
use crate::application::scanners::{
    CiBuildScanner, CompositionScanner, ManifestScanner, Scanner, ScannerKind,
    StaticAnalysisScanner,
};
use crate::compliance::policies::Cutoff;
use crate::ports::outbound::{CiServerClient, SecurityPlatformClient, SourceControlClient};
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::sync::Arc;

/// Collaborators shared by every scanner of a run
///
/// Optional clients are absent when their credentials were not configured.
#[derive(Clone)]
pub struct ScannerDependencies {
    pub source_control: Arc<dyn SourceControlClient>,
    pub ci_server: Option<Arc<dyn CiServerClient>>,
    pub security_platform: Option<Arc<dyn SecurityPlatformClient>>,
}

/// Factory for creating scanners from their identifiers
///
/// The registry maps each [`ScannerKind`] to a constructor. The manifest
/// scanner is always created first because every other scanner consumes its fragment.
pub struct ScannerFactory {
    dependencies: ScannerDependencies,
    settings: ScannerSettings,
}

impl ScannerFactory {
    pub fn new(dependencies: ScannerDependencies, settings: ScannerSettings) -> Self {
        Self {
            dependencies,
            settings,
        }
    }

    /// Creates one scanner
    ///
    /// # Errors
    /// Returns `ScanError::MissingCredentials` if the scanner's client is not configured
    pub fn create(&self, kind: ScannerKind, cutoff: Cutoff) -> Result<Box<dyn Scanner>> {
        let scanner: Box<dyn Scanner> = match kind {
            ScannerKind::Manifest => Box::new(ManifestScanner::new(
                Arc::clone(&self.dependencies.source_control),
                self.settings.manifest_filename.clone(),
                self.settings.dockerfile_path.clone(),
            )),
            ScannerKind::StaticAnalysis => Box::new(StaticAnalysisScanner::new(
                self.security_platform(kind)?,
                cutoff,
                self.settings.static_profile_base_url.clone(),
            )),
            ScannerKind::Composition => Box::new(CompositionScanner::new(
                self.security_platform(kind)?,
                cutoff,
                self.settings.sca_workspace.clone(),
            )),
            ScannerKind::CiBuild => {
                let ci_server = self.dependencies.ci_server.clone().ok_or_else(|| {
                    ScanError::MissingCredentials {
                        scanner: kind.to_string(),
                        hint: "Set --jenkins-user and --jenkins-token (or JENKINS_USER / JENKINS_TOKEN)"
                            .to_string(),
                    }
                })?;
                Box::new(CiBuildScanner::new(ci_server))
            }
        };
        Ok(scanner)
    }

    /// Creates the manifest scanner followed by each requested scanner
    ///
    /// Requested kinds keep their order; duplicates and explicit `manifest`
    /// entries are dropped.
    pub fn create_all(&self, kinds: &[ScannerKind], cutoff: Cutoff) -> Result<Vec<Box<dyn Scanner>>> {
        let mut ordered = vec![ScannerKind::Manifest];
        for kind in kinds {
            if !ordered.contains(kind) {
                ordered.push(*kind);
            }
        }

        ordered
            .into_iter()
            .map(|kind| self.create(kind, cutoff))
            .collect()
    }

    fn security_platform(&self, kind: ScannerKind) -> Result<Arc<dyn SecurityPlatformClient>> {
        self.dependencies.security_platform.clone().ok_or_else(|| {
            ScanError::MissingCredentials {
                scanner: kind.to_string(),
                hint: "Set --veracode-api-id and --veracode-api-key (or VERACODE_API_ID / VERACODE_API_KEY)"
                    .to_string(),
            }
            .into()
        })
    }
}
