pub mod ci_build;
pub mod compliance_record;
pub mod fragment;
pub mod manifest;
pub mod report;
pub mod repository;
pub mod security_platform;

pub use ci_build::{BuildSummary, CiBuildPayload, CoverageSummary, LastSuccessfulBuild, TestCounts};
pub use compliance_record::{
    CompositionComponentRecord, CompositionScanPayload, CompositionScanStatus,
    StaticComponentRecord, StaticScanPayload, StaticScanStatus,
};
pub use fragment::{FragmentPayload, MessageLevel, ScanFragment, ScannerMessage};
pub use manifest::{
    ComponentManifest, DockerfileInfo, GithubInfo, ManifestPayload, RepositoryManifest,
    Technology, TechnologyKind,
};
pub use report::{RepositoryFragments, ScanReport};
pub use repository::{
    BranchGovernance, BranchProtection, CommitStatus, PullRequestCounts, RepositoryRef,
};
pub use security_platform::{
    ApplicationProfile, ApplicationQuery, ApplicationRecord, ApplicationScan, PolicyResult,
    ScaProject, Workspace,
};
