//! sbom-scanner - fleet compliance auditor
//!
//! This library scans every repository of one or more source-control
//! organizations and assembles a single JSON report of manifest data, branch
//! governance, CI build health and security-scan posture, following hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`compliance`): Report types, status policies and the request signer
//! - **Application Layer** (`application`): Scanners, factories and the scan use case
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_scanner::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let github = Arc::new(GithubClient::new(
//!     "https://api.github.com",
//!     "https://raw.githubusercontent.com",
//!     std::env::var("GITHUB_TOKEN").ok(),
//!     &HttpSettings::default(),
//! )?);
//! let dependencies = ScannerDependencies {
//!     source_control: github.clone(),
//!     ci_server: None,
//!     security_platform: None,
//! };
//!
//! // Create use case
//! let use_case = RunScanUseCase::new(
//!     github,
//!     ScannerFactory::new(dependencies, ScannerSettings::default()),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = ScanRequest::new(vec!["acme".to_string()], vec![], vec![], 4);
//! let report = use_case.execute(request).await?;
//!
//! // Present output
//! StdoutPresenter::new().present(&report)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod compliance;
pub mod config;
pub mod logging;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        render_report, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::network::{
        GithubClient, HttpSettings, JenkinsClient, VeracodeClient,
    };
    pub use crate::application::dto::{ScanRequest, ScannerSettings};
    pub use crate::application::factories::{
        PresenterFactory, PresenterType, ScannerDependencies, ScannerFactory,
    };
    pub use crate::application::scanners::{Scanner, ScannerKind};
    pub use crate::application::use_cases::RunScanUseCase;
    pub use crate::compliance::domain::*;
    pub use crate::compliance::policies::{
        classify_composition_scan, classify_static_scan, parse_remote_timestamp, Cutoff,
    };
    pub use crate::compliance::services::{DockerfileInspector, RequestSigner};
    pub use crate::ports::outbound::{
        CiServerClient, OutputPresenter, ProgressReporter, SecurityPlatformClient,
        SourceControlClient,
    };
    pub use crate::shared::error::{ExitCode, ScanError};
    pub use crate::shared::Result;
}
