use super::scanner::{Scanner, ScannerKind};
use crate::compliance::domain::{
    ApplicationQuery, ApplicationRecord, ComponentManifest, FragmentPayload, ManifestPayload,
    RepositoryRef, ScanFragment, ScannerMessage, StaticComponentRecord, StaticScanPayload,
};
use crate::compliance::policies::{classify_static_scan, parse_remote_timestamp, Cutoff};
use crate::ports::outbound::SecurityPlatformClient;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// StaticAnalysisScanner reports the static-analysis posture of each declared component
pub struct StaticAnalysisScanner {
    platform: Arc<dyn SecurityPlatformClient>,
    cutoff: Cutoff,
    profile_base_url: String,
}

impl StaticAnalysisScanner {
    pub fn new(
        platform: Arc<dyn SecurityPlatformClient>,
        cutoff: Cutoff,
        profile_base_url: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            cutoff,
            profile_base_url: profile_base_url.into(),
        }
    }

    async fn check_component(
        &self,
        repo: &RepositoryRef,
        component: &ComponentManifest,
        messages: &mut Vec<ScannerMessage>,
    ) -> StaticComponentRecord {
        let Some(app_name) = component.security_app_name() else {
            return StaticComponentRecord::missing(&component.name, None);
        };
        let mut record = StaticComponentRecord::missing(&component.name, Some(app_name.to_string()));

        let applications = match self
            .platform
            .search_applications(&ApplicationQuery::by_name(app_name))
            .await
        {
            Ok(applications) => applications,
            Err(e) => {
                let message = format!("Application search failed for '{}': {:#}", app_name, e);
                tracing::warn!(repo = %repo.full_name(), scanner = self.name(), "{}", message);
                messages.push(ScannerMessage::warning(message));
                return record;
            }
        };

        // The platform's name search is a wildcard match
        let wanted = app_name.to_lowercase();
        let Some(application) = applications
            .iter()
            .find(|app| app.profile.name.to_lowercase() == wanted)
        else {
            tracing::debug!(repo = %repo.full_name(), app = app_name, "No matching application");
            return record;
        };

        self.fill_record(&mut record, application, messages);
        record
    }

    fn fill_record(
        &self,
        record: &mut StaticComponentRecord,
        application: &ApplicationRecord,
        messages: &mut Vec<ScannerMessage>,
    ) {
        let Some(scan) = application.latest_static_scan() else {
            return;
        };

        let scanned_at = parse_remote_timestamp(&scan.modified_date).unwrap_or_else(|| {
            messages.push(ScannerMessage::warning(format!(
                "Unreadable scan date '{}' for '{}'",
                scan.modified_date, application.profile.name
            )));
            DateTime::<Utc>::MIN_UTC
        });

        record.veracode_status = classify_static_scan(
            &self.cutoff,
            Some(scanned_at),
            &application.profile.policies,
        );
        record.veracode_app_name_actual = Some(application.profile.name.clone());
        record.last_static_scan_date = Some(scan.modified_date.clone());
        record.last_static_scan_result = scan.status.clone();
        record.last_compliance_check = application.last_policy_compliance_check_date.clone();
        record.veracode_app_profile_url =
            Some(format!("{}{}", self.profile_base_url, application.app_profile_url));
    }
}

#[async_trait]
impl Scanner for StaticAnalysisScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::StaticAnalysis
    }

    fn empty_fragment(&self) -> ScanFragment {
        ScanFragment::new(
            self.name(),
            FragmentPayload::StaticAnalysis(StaticScanPayload::default()),
        )
    }

    async fn scan(
        &self,
        repo: &RepositoryRef,
        manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment> {
        let mut messages = Vec::new();
        let mut components = Vec::new();

        for component in manifest.map(|m| m.components()).unwrap_or_default() {
            components.push(self.check_component(repo, component, &mut messages).await);
        }

        Ok(ScanFragment::new(
            self.name(),
            FragmentPayload::StaticAnalysis(StaticScanPayload { components }),
        )
        .with_messages(messages))
    }
}
