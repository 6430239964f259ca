use super::ci_build::CiBuildPayload;
use super::compliance_record::{CompositionScanPayload, StaticScanPayload};
use super::manifest::ManifestPayload;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// A note attached to a fragment, surfaced to readers of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerMessage {
    pub level: MessageLevel,
    pub message: String,
}

impl ScannerMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            message: message.into(),
        }
    }
}

/// Scanner-specific fields, flattened next to `scanner_name` and `messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FragmentPayload {
    Manifest(ManifestPayload),
    StaticAnalysis(StaticScanPayload),
    Composition(CompositionScanPayload),
    CiBuild(CiBuildPayload),
}

/// Result of one scanner for one repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFragment {
    scanner_name: String,
    messages: Vec<ScannerMessage>,
    #[serde(flatten)]
    payload: FragmentPayload,
}

impl ScanFragment {
    pub fn new(scanner_name: impl Into<String>, payload: FragmentPayload) -> Self {
        Self {
            scanner_name: scanner_name.into(),
            messages: Vec::new(),
            payload,
        }
    }

    pub fn with_messages(mut self, messages: Vec<ScannerMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn push_message(&mut self, message: ScannerMessage) {
        self.messages.push(message);
    }

    pub fn scanner_name(&self) -> &str {
        &self.scanner_name
    }

    pub fn messages(&self) -> &[ScannerMessage] {
        &self.messages
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ScannerMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
    }

    pub fn payload(&self) -> &FragmentPayload {
        &self.payload
    }

    pub fn manifest(&self) -> Option<&ManifestPayload> {
        match &self.payload {
            FragmentPayload::Manifest(payload) => Some(payload),
            _ => None,
        }
    }
}
