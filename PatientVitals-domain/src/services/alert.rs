use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

/// Sink for alert messages
///
/// Delivery is fire-and-forget: an implementation that cannot deliver deals
/// with the failure itself instead of reporting it to the caller.
pub trait NotifierTrait {
    /// Deliver one alert message
    fn send(&self, message: &str);
}

impl<T: NotifierTrait + ?Sized> NotifierTrait for &T {
    fn send(&self, message: &str) {
        (**self).send(message)
    }
}

impl<T: NotifierTrait + ?Sized> NotifierTrait for Arc<T> {
    fn send(&self, message: &str) {
        (**self).send(message)
    }
}

/// Notifier that emits alerts as `tracing` warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifierTrait for LoggingNotifier {
    fn send(&self, message: &str) {
        warn!(target: "patient_vitals::alert", "{}", message);
    }
}

/// Notifier that writes one line per alert to a writer
#[derive(Debug)]
pub struct WriterNotifier<W: Write> {
    writer: Mutex<W>,
}

impl WriterNotifier<io::Stdout> {
    /// Notifier printing alerts to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterNotifier<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take back the underlying writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> NotifierTrait for WriterNotifier<W> {
    fn send(&self, message: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = writeln!(writer, "{}", message).and_then(|_| writer.flush()) {
            error!("Failed to deliver alert: {}", e);
        }
    }
}
