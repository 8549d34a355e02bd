use crate::constants::{LOG_TIME_FORMAT, MAX_LOG_LINES};
use crate::events::{ConversionEvent, EventReceiver};
use crate::state::RunState;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Debug, Clone)]
pub struct LogLine {
    pub seq: u64,
    pub at: DateTime<Local>,
    pub message: String,
}

impl LogLine {
    pub fn render(&self) -> String {
        format!("{} - {}", self.at.format(LOG_TIME_FORMAT), self.message)
    }
}

/// Log shown to the user. Oldest lines are dropped past `capacity`.
#[derive(Debug, Clone)]
pub struct LogTranscript {
    lines: VecDeque<LogLine>,
    capacity: usize,
    next_seq: u64,
}

impl Default for LogTranscript {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }
}

impl LogTranscript {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            seq: self.next_seq,
            at: Local::now(),
            message: message.into(),
        });
        self.next_seq += 1;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Lines with a sequence number of at least `seq`, for incremental printing.
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().filter(move |line| line.seq >= seq)
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing attached; no polling needed.
    Idle,
    /// Run still active; poll again after the interval.
    Pending,
    /// A terminal event was applied during this poll.
    Finished,
}

/// Foreground side of the event queue. Owns everything the user sees about a run.
#[derive(Default)]
pub struct ProgressRelay {
    receiver: Option<EventReceiver>,
    log: LogTranscript,
    progress: f32,
}

impl ProgressRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts listening to a new run: clears the previous transcript and progress.
    pub fn attach(&mut self, receiver: EventReceiver) {
        self.receiver = Some(receiver);
        self.log.clear();
        self.progress = 0.0;
    }

    pub fn log(&self) -> &LogTranscript {
        &self.log
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Appends a line that originates on the foreground, e.g. a stop request.
    pub fn note(&mut self, message: impl Into<String>) {
        self.log.push(message);
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.progress = 0.0;
    }

    /// Applies every queued event in order without blocking.
    pub fn poll(&mut self, state: &mut RunState) -> PollOutcome {
        let Some(receiver) = self.receiver.as_mut() else {
            return PollOutcome::Idle;
        };

        loop {
            match receiver.try_recv() {
                Ok(ConversionEvent::LogEntry(message)) => self.log.push(message),
                Ok(ConversionEvent::ProgressUpdate(percent)) => {
                    self.progress = percent.clamp(0.0, 100.0);
                }
                Ok(ConversionEvent::Completed) => {
                    state.finish();
                    self.receiver = None;
                    return PollOutcome::Finished;
                }
                Err(TryRecvError::Empty) => {
                    if state.is_running() {
                        return PollOutcome::Pending;
                    }
                    tracing::debug!("Run no longer active, detaching relay");
                    self.receiver = None;
                    return PollOutcome::Idle;
                }
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Worker exited without a completion event");
                    self.log.push("conversion worker exited unexpectedly");
                    state.finish();
                    self.receiver = None;
                    return PollOutcome::Finished;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{create_event_channel, EventEmitter};
    use uuid::Uuid;

    fn running_state() -> RunState {
        let mut state = RunState::new();
        state.begin(Uuid::new_v4()).unwrap();
        state
    }

    fn messages(relay: &ProgressRelay) -> Vec<String> {
        relay.log().lines().map(|l| l.message.clone()).collect()
    }

    #[test]
    fn test_idle_without_receiver() {
        let mut relay = ProgressRelay::new();
        let mut state = RunState::new();
        assert_eq!(relay.poll(&mut state), PollOutcome::Idle);
    }

    #[test]
    fn test_pending_while_running_and_empty() {
        let (_tx, rx) = create_event_channel();
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();

        assert_eq!(relay.poll(&mut state), PollOutcome::Pending);
        assert!(state.is_running());
    }

    #[test]
    fn test_applies_events_in_order_and_finishes() {
        let (tx, rx) = create_event_channel();
        let emitter = EventEmitter::new(tx);
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();

        emitter.log("found 2 files");
        emitter.progress(50.0);
        emitter.log("converted: a.heic -> a.jpg");
        assert_eq!(relay.poll(&mut state), PollOutcome::Pending);
        assert_eq!(relay.progress(), 50.0);
        assert_eq!(
            messages(&relay),
            vec!["found 2 files", "converted: a.heic -> a.jpg"]
        );

        emitter.progress(100.0);
        emitter.log("done: converted 2/2");
        emitter.completed();
        assert_eq!(relay.poll(&mut state), PollOutcome::Finished);
        assert_eq!(relay.progress(), 100.0);
        assert!(!state.is_running());
        assert_eq!(relay.poll(&mut state), PollOutcome::Idle);
    }

    #[test]
    fn test_events_after_completed_are_not_applied() {
        let (tx, rx) = create_event_channel();
        let emitter = EventEmitter::new(tx);
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();

        emitter.completed();
        emitter.log("late");
        assert_eq!(relay.poll(&mut state), PollOutcome::Finished);
        assert!(relay.log().is_empty());
    }

    #[test]
    fn test_progress_is_clamped() {
        let (tx, rx) = create_event_channel();
        let emitter = EventEmitter::new(tx);
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();

        emitter.progress(180.0);
        relay.poll(&mut state);
        assert_eq!(relay.progress(), 100.0);

        emitter.progress(-3.0);
        relay.poll(&mut state);
        assert_eq!(relay.progress(), 0.0);
    }

    #[test]
    fn test_disconnect_without_completed_finishes_run() {
        let (tx, rx) = create_event_channel();
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();

        EventEmitter::new(tx).log("found 1 files");
        assert_eq!(relay.poll(&mut state), PollOutcome::Finished);
        assert!(!state.is_running());
        assert_eq!(
            messages(&relay),
            vec!["found 1 files", "conversion worker exited unexpectedly"]
        );
    }

    #[test]
    fn test_stops_when_state_not_running() {
        let (_tx, rx) = create_event_channel();
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = RunState::new();

        assert_eq!(relay.poll(&mut state), PollOutcome::Idle);
        // detached: a later event is never read
        assert_eq!(relay.poll(&mut running_state()), PollOutcome::Idle);
    }

    #[test]
    fn test_attach_resets_previous_run() {
        let (tx, rx) = create_event_channel();
        let mut relay = ProgressRelay::new();
        relay.attach(rx);
        let mut state = running_state();
        let emitter = EventEmitter::new(tx);
        emitter.progress(40.0);
        emitter.log("old");
        relay.poll(&mut state);

        let (_tx2, rx2) = create_event_channel();
        relay.attach(rx2);
        assert_eq!(relay.progress(), 0.0);
        assert!(relay.log().is_empty());
    }

    #[test]
    fn test_transcript_is_bounded() {
        let mut log = LogTranscript::with_capacity(3);
        for i in 0..5 {
            log.push(format!("line {}", i));
        }
        let kept: Vec<_> = log.lines().map(|l| l.message.as_str()).collect();
        assert_eq!(kept, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(log.next_seq(), 5);
        assert_eq!(log.since(4).count(), 1);
    }

    #[test]
    fn test_render_has_time_prefix() {
        let mut log = LogTranscript::default();
        log.push("hello");
        let rendered = log.lines().next().unwrap().render();
        // HH:MM:SS - hello
        assert_eq!(rendered.len(), "00:00:00 - hello".len());
        assert!(rendered.ends_with(" - hello"));
        assert_eq!(&rendered[2..3], ":");
    }
}
