use crate::codec::{ImageDecoder, ImageEncoder};
use crate::events::{EventEmitter, EventSender};
use crate::state::CancelFlag;
use serde::Serialize;
use std::any::Any;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use uuid::Uuid;

pub mod worker;

pub use worker::ConversionWorker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub quality: u8,
}

/// Failures that end a run early. The run still finishes with `Completed`.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("cannot list input directory {path}: {reason}")]
    ListInput { path: String, reason: String },
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl RunError {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        RunError::Panicked(message)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub converted: usize,
    pub failed: Vec<String>,
    pub cancelled: bool,
    pub aborted: Option<String>,
}

impl BatchSummary {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            total: 0,
            converted: 0,
            failed: Vec::new(),
            cancelled: false,
            aborted: None,
        }
    }
}

/// A batch running on its own thread.
pub struct ConversionTask {
    pub run_id: Uuid,
    handle: Option<JoinHandle<BatchSummary>>,
}

impl ConversionTask {
    pub fn spawn<D, E>(
        run_id: Uuid,
        request: ConversionRequest,
        decoder: D,
        encoder: E,
        cancel_flag: CancelFlag,
        sender: EventSender,
    ) -> std::io::Result<Self>
    where
        D: ImageDecoder + 'static,
        E: ImageEncoder + 'static,
    {
        let worker = ConversionWorker::new(run_id, decoder, encoder, cancel_flag, EventEmitter::new(sender));

        let handle = thread::Builder::new()
            .name(format!("heic2jpg-{}", run_id))
            .spawn(move || worker.run(&request))?;

        Ok(Self {
            run_id,
            handle: Some(handle),
        })
    }

    /// Blocks until the worker thread exits.
    pub fn join(mut self) -> Option<BatchSummary> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(summary) => Some(summary),
            Err(_) => {
                tracing::error!("Worker thread for run {} panicked", self.run_id);
                None
            }
        }
    }
}
