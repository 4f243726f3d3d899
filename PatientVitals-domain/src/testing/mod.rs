// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use patient_vitals_data::repository::tests::{patient_record, MockPatientInfoRepository};

use std::sync::{Arc, Mutex};

use crate::services::alert::NotifierTrait;

/// Notifier that records every message it is asked to send
///
/// Clones share the same record, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create a new recording notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of messages sent so far
    pub fn count(&self) -> usize {
        self.messages().len()
    }
}

impl NotifierTrait for RecordingNotifier {
    fn send(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
