/// Mock implementations for testing
mod mock_ci_server;
mod mock_progress_reporter;
mod mock_security_platform;
mod mock_source_control;

pub use mock_ci_server::MockCiServer;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_security_platform::MockSecurityPlatform;
pub use mock_source_control::MockSourceControl;
