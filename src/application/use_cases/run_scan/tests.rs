use super::*;
use crate::application::dto::ScannerSettings;
use crate::application::factories::ScannerDependencies;
use crate::application::scanners::test_support::{
    repo, FakeSecurityPlatform, FakeSourceControl, RecordingReporter,
};
use crate::application::scanners::ScannerKind;
use crate::compliance::domain::{
    ApplicationProfile, ApplicationRecord, ApplicationScan, FragmentPayload, MessageLevel,
    StaticScanStatus,
};
use async_trait::async_trait;

const MANIFEST: &str = "components:\n  - name: API\n    veracode_app: billing-api\n";

fn use_case(
    source_control: Arc<FakeSourceControl>,
    platform: Option<Arc<FakeSecurityPlatform>>,
) -> RunScanUseCase<RecordingReporter> {
    let dependencies = ScannerDependencies {
        source_control: source_control.clone(),
        ci_server: None,
        security_platform: platform.map(|p| p as Arc<dyn crate::ports::outbound::SecurityPlatformClient>),
    };
    RunScanUseCase::new(
        source_control,
        ScannerFactory::new(dependencies, ScannerSettings::default()),
        RecordingReporter::default(),
    )
}

fn request(scanners: Vec<ScannerKind>) -> ScanRequest {
    ScanRequest::new(vec!["acme".to_string()], vec![], scanners, 4)
}

fn fresh_application() -> ApplicationRecord {
    ApplicationRecord {
        profile: ApplicationProfile {
            name: "billing-api".to_string(),
            policies: vec![],
        },
        scans: vec![ApplicationScan {
            scan_type: "STATIC".to_string(),
            modified_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: Some("PUBLISHED".to_string()),
        }],
        ..ApplicationRecord::default()
    }
}

#[tokio::test]
async fn test_empty_organizations_fail_before_any_call() {
    let source_control = Arc::new(FakeSourceControl::healthy("acme", vec![repo("billing")]));
    let use_case = use_case(source_control.clone(), None);

    let err = use_case
        .execute(ScanRequest::new(vec![], vec![], vec![], 4))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::NoOrganizations)
    ));
    assert_eq!(source_control.call_count(), 0);
}

#[tokio::test]
async fn test_every_repository_has_every_scanner() {
    let source_control = Arc::new(
        FakeSourceControl::healthy("acme", vec![repo("billing"), repo("ledger"), repo("web")])
            .with_file("billing", "manifest.yml", MANIFEST),
    );
    let platform = Arc::new(FakeSecurityPlatform {
        applications: vec![fresh_application()],
        ..FakeSecurityPlatform::default()
    });
    let use_case = use_case(source_control, Some(platform));

    let report = use_case
        .execute(request(vec![ScannerKind::StaticAnalysis]))
        .await
        .unwrap();

    assert_eq!(report.scanners, vec!["manifest", "veracode"]);
    assert_eq!(report.repos.len(), 3);
    for fragments in report.repos.values() {
        assert_eq!(fragments.len(), 2);
        assert!(fragments.contains_key("manifest"));
        assert!(fragments.contains_key("veracode"));
    }
    assert_eq!(report.orgs, vec!["acme"]);
    assert!(report.repo_whitelist.is_empty());
}

#[tokio::test]
async fn test_context_phase_sees_manifest_components() {
    let source_control = Arc::new(
        FakeSourceControl::healthy("acme", vec![repo("billing")])
            .with_file("billing", "manifest.yml", MANIFEST),
    );
    let platform = Arc::new(FakeSecurityPlatform {
        applications: vec![fresh_application()],
        ..FakeSecurityPlatform::default()
    });
    let use_case = use_case(source_control, Some(platform));

    let report = use_case
        .execute(request(vec![ScannerKind::StaticAnalysis]))
        .await
        .unwrap();

    let fragment = report.fragment("billing", "veracode").unwrap();
    match fragment.payload() {
        FragmentPayload::StaticAnalysis(payload) => {
            assert_eq!(payload.components.len(), 1);
            assert_eq!(
                payload.components[0].veracode_status,
                StaticScanStatus::Compliant
            );
        }
        other => panic!("unexpected payload {:?}", other),
    }
}

#[tokio::test]
async fn test_phase_one_completes_before_phase_two() {
    let source_control = Arc::new(FakeSourceControl::healthy(
        "acme",
        vec![repo("a"), repo("b"), repo("c"), repo("d")],
    ));
    let platform = Arc::new(FakeSecurityPlatform::default());
    let use_case = use_case(source_control, Some(platform));

    use_case
        .execute(request(vec![ScannerKind::Composition]))
        .await
        .unwrap();

    let messages = use_case.progress_reporter.messages();
    let phase_two = messages
        .iter()
        .position(|m| m.starts_with("start security"))
        .unwrap();
    let manifest_done = messages[..phase_two]
        .iter()
        .filter(|m| m.starts_with("done "))
        .count();
    assert_eq!(manifest_done, 4);
}

#[tokio::test]
async fn test_whitelist_skips_unknown_and_failing_lookups() {
    let mut host = FakeSourceControl::healthy("acme", vec![repo("billing"), repo("ledger")]);
    host.failing_orgs.insert("broken".to_string());
    let use_case = use_case(Arc::new(host), None);

    let report = use_case
        .execute(ScanRequest::new(
            vec!["acme".to_string(), "broken".to_string()],
            vec!["billing".to_string(), "missing".to_string()],
            vec![],
            2,
        ))
        .await
        .unwrap();

    assert_eq!(report.repos.keys().collect::<Vec<_>>(), vec!["billing"]);
    assert_eq!(report.repo_whitelist, vec!["billing", "missing"]);
}

#[tokio::test]
async fn test_all_organizations_are_enumerated() {
    let mut host = FakeSourceControl::healthy("acme", vec![repo("billing")]);
    host.org_repos.insert(
        "globex".to_string(),
        vec![RepositoryRef::new("globex", "billing", "main", true)],
    );
    host.org_repos.insert(
        "initech".to_string(),
        vec![RepositoryRef::new("initech", "tps", "trunk", false)],
    );
    let use_case = use_case(Arc::new(host), None);

    let report = use_case
        .execute(ScanRequest::new(
            vec!["acme".to_string(), "globex".to_string(), "initech".to_string()],
            vec![],
            vec![],
            4,
        ))
        .await
        .unwrap();

    let keys: Vec<&String> = report.repos.keys().collect();
    assert_eq!(keys, vec!["acme/billing", "globex/billing", "tps"]);
}

#[tokio::test]
async fn test_missing_credentials_fail_the_run() {
    let use_case = use_case(Arc::new(FakeSourceControl::default()), None);
    let err = use_case
        .execute(request(vec![ScannerKind::StaticAnalysis]))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::MissingCredentials { .. })
    ));
}

#[tokio::test]
async fn test_report_timing_fields() {
    let before = Utc::now().timestamp_millis();
    let use_case = use_case(Arc::new(FakeSourceControl::healthy("acme", vec![])), None);
    let report = use_case.execute(request(vec![])).await.unwrap();

    assert!(report.scan_start_utc_time >= before);
    assert!(report.scan_date.ends_with('Z'));
    assert!(report.repos.is_empty());
    assert_eq!(report.scanners, vec!["manifest"]);
}

struct FailingScanner;

#[async_trait]
impl Scanner for FailingScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::CiBuild
    }

    fn empty_fragment(&self) -> ScanFragment {
        ScanFragment::new(
            self.name(),
            FragmentPayload::CiBuild(Default::default()),
        )
    }

    async fn scan(
        &self,
        repo: &RepositoryRef,
        _manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment> {
        anyhow::bail!("CI host unreachable for {}", repo.name())
    }
}

#[tokio::test]
async fn test_scan_failure_becomes_empty_fragment_with_warning() {
    let fragment = run_scanner(&FailingScanner, None, &repo("billing"), None).await;

    assert_eq!(fragment.scanner_name(), "jenkins");
    assert_eq!(fragment.messages().len(), 1);
    assert_eq!(fragment.messages()[0].level, MessageLevel::Warning);
    assert!(fragment.messages()[0]
        .message
        .contains("CI host unreachable for billing"));
}

#[tokio::test]
async fn test_initialization_failure_skips_scan() {
    let fragment = run_scanner(
        &FailingScanner,
        Some("token rejected"),
        &repo("billing"),
        None,
    )
    .await;
    assert_eq!(
        fragment.messages()[0].message,
        "Scanner initialization failed: token rejected"
    );
}

#[test]
fn test_repository_keys_disambiguate_shared_names() {
    let repos = vec![
        RepositoryRef::new("acme", "api", "main", false),
        RepositoryRef::new("globex", "api", "main", false),
        RepositoryRef::new("acme", "web", "main", false),
    ];
    assert_eq!(
        repository_keys(&repos),
        vec!["acme/api", "globex/api", "web"]
    );
}
