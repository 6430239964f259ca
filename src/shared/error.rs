use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish configuration mistakes
/// from runtime failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the report was written (possibly with warnings inside it)
    Success = 0,
    /// The run was refused before scanning (no organizations, bad config, bad API key)
    ConfigurationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Unclassified application error (I/O, unexpected failure in the top-level run)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Classifies an error bubbling out of the top-level run.
    pub fn from_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<ScanError>() {
            Some(scan_error) if scan_error.is_configuration_error() => {
                ExitCode::ConfigurationError
            }
            _ => ExitCode::ApplicationError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ConfigurationError => write!(f, "Configuration Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Classified failures that abort a scan run.
///
/// Collaborator fetch failures never appear here: they are recorded as
/// warnings on the enclosing fragment and the run continues.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No organizations to scan\n\n💡 Hint: Pass --organizations or set `organizations` in the config file")]
    NoOrganizations,

    #[error("Invalid security platform API key: {details}\n\n💡 Hint: The API key must be the hex-encoded secret issued with the API id")]
    InvalidApiKey { details: String },

    #[error("Unknown scanner '{name}'\n\n💡 Hint: Known scanners are manifest, veracode, veracode_sca and jenkins")]
    UnknownScanner { name: String },

    #[error("Scanner '{scanner}' is enabled but its credentials are missing\n\n💡 Hint: {hint}")]
    MissingCredentials { scanner: String, hint: String },

    #[error("Invalid config file: {path}\nDetails: {details}")]
    ConfigFile { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },
}

impl ScanError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ScanError::NoOrganizations
                | ScanError::InvalidApiKey { .. }
                | ScanError::UnknownScanner { .. }
                | ScanError::MissingCredentials { .. }
                | ScanError::ConfigFile { .. }
        )
    }
}
