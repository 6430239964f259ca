/// Filesystem adapters for report output
mod file_writer;

pub use file_writer::{render_report, FileSystemWriter, StdoutPresenter};
