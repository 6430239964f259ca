use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
use crate::ports::outbound::OutputPresenter;
use std::path::{Path, PathBuf};

/// Output path that selects stdout instead of a file
pub const STDOUT_TARGET: &str = "-";

/// Presenter type enumeration for factory pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterType {
    Stdout,
    File(PathBuf),
}

impl PresenterType {
    /// `-` writes to stdout, anything else is a file path.
    pub fn from_output(path: &Path) -> Self {
        if path == Path::new(STDOUT_TARGET) {
            PresenterType::Stdout
        } else {
            PresenterType::File(path.to_path_buf())
        }
    }
}

/// Factory for creating report presenters
pub struct PresenterFactory;

impl PresenterFactory {
    pub fn create(presenter_type: PresenterType) -> Box<dyn OutputPresenter> {
        match presenter_type {
            PresenterType::Stdout => Box::new(StdoutPresenter::new()),
            PresenterType::File(path) => Box::new(FileSystemWriter::new(path)),
        }
    }
}
