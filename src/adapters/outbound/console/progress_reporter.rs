use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Mutex;

const BAR_TEMPLATE: &str =
    "   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) - {msg}";

/// StderrProgressReporter adapter for reporting progress to stderr
///
/// Renders one indicatif bar per scan phase. Messages go to stderr so they
/// never interleave with a report written to stdout.
pub struct StderrProgressReporter {
    progress_bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: Mutex::new(None),
            hidden: false,
        }
    }

    #[cfg(test)]
    fn without_bars() -> Self {
        Self {
            progress_bar: Mutex::new(None),
            hidden: true,
        }
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        let pb = if self.hidden {
            ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(total as u64)
        };
        // The template is a constant, so a parse failure falls back to the default bar
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    }

    fn current_bar(&self) -> Option<ProgressBar> {
        self.progress_bar
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.progress_bar.lock().ok().and_then(|mut guard| guard.take())
    }

    fn print(&self, message: &str) {
        match self.current_bar() {
            Some(pb) => pb.suspend(|| eprintln!("{}", message)),
            None => eprintln!("{}", message),
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        self.print(message);
    }

    fn start_phase(&self, phase: &str, total: usize) {
        if let Some(previous) = self.take_bar() {
            previous.finish_and_clear();
        }
        eprintln!(
            "🔍 Running {} on {} repository(ies)...",
            phase.bold(),
            total
        );

        let pb = self.create_progress_bar(total);
        if let Ok(mut guard) = self.progress_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn advance(&self, repository: &str) {
        if let Some(pb) = self.current_bar() {
            pb.set_message(repository.to_string());
            pb.inc(1);
        }
    }

    fn finish_phase(&self, message: &str) {
        if let Some(pb) = self.take_bar() {
            pb.finish_and_clear();
        }
        eprintln!("{}", message.green());
    }

    fn report_warning(&self, message: &str) {
        self.print(&format!("⚠️  {}", message.yellow()));
    }
}
