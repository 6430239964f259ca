/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces the scan core uses to reach the
/// source-control host, the CI host, the security platform and the console.
pub mod ci_server;
pub mod output_presenter;
pub mod progress_reporter;
pub mod security_platform;
pub mod source_control;

pub use ci_server::CiServerClient;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use security_platform::SecurityPlatformClient;
pub use source_control::SourceControlClient;
