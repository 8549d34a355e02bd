use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Cooperative stop signal shared between the foreground and one worker.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunPhase {
    Idle,
    Converting {
        run_id: Uuid,
        start_time: Instant,
    },
    Finished {
        run_id: Uuid,
        duration: Duration,
        stopped: bool,
    },
}

impl Default for RunPhase {
    fn default() -> Self {
        RunPhase::Idle
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunState {
    phase: RunPhase,
    cancel: CancelFlag,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, RunPhase::Converting { .. })
    }

    pub fn cancel_requested(&self) -> bool {
        self.is_running() && self.cancel.is_cancelled()
    }

    pub fn run_id(&self) -> Option<Uuid> {
        match self.phase {
            RunPhase::Converting { run_id, .. } | RunPhase::Finished { run_id, .. } => Some(run_id),
            RunPhase::Idle => None,
        }
    }

    /// Enters the converting phase and hands back the flag for the new worker.
    /// Returns `None` while another run is still active.
    pub fn begin(&mut self, run_id: Uuid) -> Option<CancelFlag> {
        if self.is_running() {
            return None;
        }
        self.cancel = CancelFlag::new();
        self.phase = RunPhase::Converting {
            run_id,
            start_time: Instant::now(),
        };
        Some(self.cancel.clone())
    }

    pub fn request_cancel(&self) -> bool {
        if self.is_running() {
            self.cancel.cancel();
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self) {
        if let RunPhase::Converting { run_id, start_time } = self.phase {
            self.phase = RunPhase::Finished {
                run_id,
                duration: start_time.elapsed(),
                stopped: self.cancel.is_cancelled(),
            };
        }
    }

    /// Drops a run that never got a worker, straight back to idle.
    pub fn abandon(&mut self) {
        self.phase = RunPhase::Idle;
    }

    pub fn reset_to_idle(&mut self) {
        if !self.is_running() {
            self.phase = RunPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let state = RunState::new();
        assert_eq!(*state.phase(), RunPhase::Idle);
        assert!(!state.is_running());
        assert!(!state.cancel_requested());
        assert!(state.run_id().is_none());
    }

    #[test]
    fn test_only_one_run_at_a_time() {
        let mut state = RunState::new();
        assert!(state.begin(Uuid::new_v4()).is_some());
        assert!(state.begin(Uuid::new_v4()).is_none());

        state.finish();
        assert!(!state.is_running());
        assert!(state.begin(Uuid::new_v4()).is_some());
    }

    #[test]
    fn test_cancel_reaches_worker_flag() {
        let mut state = RunState::new();
        let flag = state.begin(Uuid::new_v4()).unwrap();
        assert!(!flag.is_cancelled());

        assert!(state.request_cancel());
        assert!(flag.is_cancelled());
        assert!(state.cancel_requested());

        state.finish();
        match state.phase() {
            RunPhase::Finished { stopped, .. } => assert!(*stopped),
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[test]
    fn test_new_run_gets_fresh_flag() {
        let mut state = RunState::new();
        let first = state.begin(Uuid::new_v4()).unwrap();
        state.request_cancel();
        state.finish();

        let second = state.begin(Uuid::new_v4()).unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let state = RunState::new();
        assert!(!state.request_cancel());
    }

    #[test]
    fn test_reset_keeps_active_run() {
        let mut state = RunState::new();
        let run_id = Uuid::new_v4();
        state.begin(run_id);
        state.reset_to_idle();
        assert_eq!(state.run_id(), Some(run_id));

        state.finish();
        state.reset_to_idle();
        assert_eq!(*state.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_abandoned_run_returns_to_idle() {
        let mut state = RunState::new();
        state.begin(Uuid::new_v4()).unwrap();
        state.abandon();

        assert_eq!(*state.phase(), RunPhase::Idle);
        assert_eq!(state.run_id(), None);
        assert!(state.begin(Uuid::new_v4()).is_some());
    }
}
