use crate::codec::{HeifDecoder, ImageDecoder, ImageEncoder, JpegFileEncoder};
use crate::config::AppConfig;
use crate::conversion::{BatchSummary, ConversionTask};
use crate::events::create_event_channel;
use crate::platform;
use crate::relay::{PollOutcome, ProgressRelay};
use crate::services::{DirectoryError, ValidationService};
use crate::state::{RunPhase, RunState};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StartError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("A conversion is already running")]
    AlreadyRunning,
    #[error("Failed to start conversion thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub struct HeicConverterApp {
    pub input_dir: String,
    pub output_dir: String,
    pub quality: u8,
    pub poll_interval: Duration,
    pub error: Option<String>,
    pub state: RunState,
    pub relay: ProgressRelay,
    pub last_summary: Option<BatchSummary>,
    /// Set when a run finished and the user has not yet been asked about
    /// opening the output folder.
    pub completion_prompt_pending: bool,
    conversion_task: Option<ConversionTask>,
    validation: ValidationService,
}

impl Default for HeicConverterApp {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl HeicConverterApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            input_dir: config.input_dir.to_string_lossy().to_string(),
            output_dir: config.output_dir.to_string_lossy().to_string(),
            quality: config.quality,
            poll_interval: config.poll_interval,
            error: None,
            state: RunState::new(),
            relay: ProgressRelay::new(),
            last_summary: None,
            completion_prompt_pending: false,
            conversion_task: None,
            validation: ValidationService::new(),
        }
    }

    pub fn is_converting(&self) -> bool {
        self.state.is_running()
    }

    pub fn select_input(&mut self) {
        let mut dialog = rfd::FileDialog::new().set_title("Select a folder with HEIC files");
        if !self.input_dir.is_empty() {
            dialog = dialog.set_directory(&self.input_dir);
        }

        if let Some(path) = dialog.pick_folder() {
            self.input_dir = path.to_string_lossy().to_string();
            self.error = None;
        }
    }

    pub fn select_output(&mut self) {
        let mut dialog = rfd::FileDialog::new().set_title("Select the JPG output folder");
        if !self.output_dir.is_empty() {
            dialog = dialog.set_directory(&self.output_dir);
        }

        if let Some(path) = dialog.pick_folder() {
            self.output_dir = path.to_string_lossy().to_string();
            self.error = None;
        }
    }

    pub fn start_conversion(&mut self) -> Result<Uuid, StartError> {
        self.start_with(HeifDecoder::new(), JpegFileEncoder::new())
    }

    /// Validates the folders, then hands the batch to a background worker.
    /// Nothing is spawned when validation fails.
    pub fn start_with<D, E>(&mut self, decoder: D, encoder: E) -> Result<Uuid, StartError>
    where
        D: ImageDecoder + 'static,
        E: ImageEncoder + 'static,
    {
        let result = self.try_start(decoder, encoder);
        match &result {
            Ok(run_id) => {
                tracing::info!("Conversion {} started", run_id);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("Conversion not started: {}", e);
                self.error = Some(e.to_string());
            }
        }
        result
    }

    fn try_start<D, E>(&mut self, decoder: D, encoder: E) -> Result<Uuid, StartError>
    where
        D: ImageDecoder + 'static,
        E: ImageEncoder + 'static,
    {
        if self.state.is_running() {
            return Err(StartError::AlreadyRunning);
        }

        let request = self.validation.build_request(
            PathBuf::from(self.input_dir.trim()),
            PathBuf::from(self.output_dir.trim()),
            self.quality,
        )?;

        let run_id = Uuid::new_v4();
        let cancel_flag = self.state.begin(run_id).ok_or(StartError::AlreadyRunning)?;
        let (sender, receiver) = create_event_channel();

        match ConversionTask::spawn(run_id, request, decoder, encoder, cancel_flag, sender) {
            Ok(task) => {
                self.relay.attach(receiver);
                self.conversion_task = Some(task);
                self.last_summary = None;
                self.completion_prompt_pending = false;
                Ok(run_id)
            }
            Err(e) => {
                self.state.abandon();
                Err(StartError::Spawn(e))
            }
        }
    }

    pub fn stop_conversion(&mut self) {
        if self.state.request_cancel() {
            tracing::info!("Stop requested for run {:?}", self.state.run_id());
            self.relay.note("stop requested by user");
        }
    }

    /// Drains pending worker events. Returns how long to wait before the next
    /// poll, or `None` once no run is active.
    pub fn update_status(&mut self) -> Option<Duration> {
        match self.relay.poll(&mut self.state) {
            PollOutcome::Pending => Some(self.poll_interval),
            PollOutcome::Finished => {
                self.collect_finished_task();
                self.completion_prompt_pending = true;
                None
            }
            PollOutcome::Idle => None,
        }
    }

    fn collect_finished_task(&mut self) {
        let Some(task) = self.conversion_task.take() else {
            return;
        };

        // Completed is the worker's last send, so the thread is exiting.
        self.last_summary = task.join();
        if let Some(summary) = &self.last_summary {
            tracing::info!(
                "Conversion {} collected: {}/{} converted",
                summary.run_id,
                summary.converted,
                summary.total
            );
        }
    }

    pub fn status_text(&self) -> String {
        match self.state.phase() {
            RunPhase::Idle => "Ready".to_string(),
            RunPhase::Converting { .. } if self.state.cancel_requested() => "Stopping...".to_string(),
            RunPhase::Converting { .. } => "Converting...".to_string(),
            RunPhase::Finished {
                duration, stopped, ..
            } => {
                let verb = if *stopped {
                    "Conversion stopped"
                } else {
                    "Conversion finished"
                };
                match &self.last_summary {
                    Some(summary) => format!(
                        "{}: {}/{} converted in {:.1}s",
                        verb,
                        summary.converted,
                        summary.total,
                        duration.as_secs_f32()
                    ),
                    None => verb.to_string(),
                }
            }
        }
    }

    pub fn can_start(&self) -> bool {
        !self.is_converting() && !self.input_dir.trim().is_empty() && !self.output_dir.trim().is_empty()
    }

    pub fn open_output_dir(&mut self) {
        let dir = PathBuf::from(self.output_dir.trim());
        if let Err(e) = platform::open_folder(&dir) {
            tracing::warn!("{:#}", e);
            self.error = Some(e.to_string());
        }
    }

    /// Clears the transcript and returns to the idle state between runs.
    pub fn clear(&mut self) {
        if self.is_converting() {
            return;
        }
        self.relay.clear();
        self.state.reset_to_idle();
        self.last_summary = None;
        self.error = None;
        self.completion_prompt_pending = false;
    }
}
