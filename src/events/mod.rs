#[derive(Debug, Clone, PartialEq)]
pub enum ConversionEvent {
    LogEntry(String),
    ProgressUpdate(f32),
    Completed,
}

pub type EventSender = tokio::sync::mpsc::UnboundedSender<ConversionEvent>;
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<ConversionEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Worker-side handle onto the event queue.
///
/// A closed queue means the foreground went away (window closed mid-run); the
/// worker keeps going until its next cancel check, so send failures are only
/// traced.
#[derive(Clone)]
pub struct EventEmitter {
    sender: EventSender,
}

impl EventEmitter {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    pub fn log(&self, message: impl Into<String>) {
        self.send(ConversionEvent::LogEntry(message.into()));
    }

    pub fn progress(&self, percent: f32) {
        self.send(ConversionEvent::ProgressUpdate(percent));
    }

    pub fn completed(&self) {
        self.send(ConversionEvent::Completed);
    }

    fn send(&self, event: ConversionEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::debug!("Event queue closed, dropping {:?}", e.0);
        }
    }
}
