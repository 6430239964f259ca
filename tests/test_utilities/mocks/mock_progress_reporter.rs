use sbom_scanner::prelude::*;

/// Mock ProgressReporter for testing that captures messages
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    pub messages: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.get_messages()
            .into_iter()
            .filter(|m| m.starts_with("Warning: "))
            .collect()
    }

    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(message.to_string());
    }

    fn start_phase(&self, phase: &str, total: usize) {
        self.push(format!("Phase: {} ({})", phase, total));
    }

    fn advance(&self, repository: &str) {
        self.push(format!("Done: {}", repository));
    }

    fn finish_phase(&self, message: &str) {
        self.push(format!("Completed: {}", message));
    }

    fn report_warning(&self, message: &str) {
        self.push(format!("Warning: {}", message));
    }
}
