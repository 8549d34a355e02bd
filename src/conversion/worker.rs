use super::{BatchSummary, ConversionRequest, RunError};
use crate::codec::{ImageDecoder, ImageEncoder};
use crate::events::EventEmitter;
use crate::services::file_service::{display_name, FileService};
use crate::state::CancelFlag;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use uuid::Uuid;

enum FileOutcome {
    Converted(String),
    Failed(String),
}

/// Runs one batch on the calling thread, narrating it through `events`.
pub struct ConversionWorker<D, E> {
    run_id: Uuid,
    decoder: D,
    encoder: E,
    files: FileService,
    cancel: CancelFlag,
    events: EventEmitter,
}

impl<D: ImageDecoder, E: ImageEncoder> ConversionWorker<D, E> {
    pub fn new(run_id: Uuid, decoder: D, encoder: E, cancel: CancelFlag, events: EventEmitter) -> Self {
        Self {
            run_id,
            decoder,
            encoder,
            files: FileService::new(),
            cancel,
            events,
        }
    }

    /// Always ends with exactly one `Completed` event, whatever happens inside
    /// the batch, including a panicking codec.
    pub fn run(&self, request: &ConversionRequest) -> BatchSummary {
        tracing::info!(
            "Run {} started: {:?} -> {:?} at quality {}",
            self.run_id,
            request.input_directory,
            request.output_directory,
            request.quality
        );

        let mut summary = BatchSummary::new(self.run_id);
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run_batch(request, &mut summary)))
            .unwrap_or_else(|payload| Err(RunError::from_panic(payload)));

        if let Err(e) = result {
            tracing::error!("Run {} aborted: {}", self.run_id, e);
            self.events.log(format!("conversion aborted: {}", e));
            summary.aborted = Some(e.to_string());
        }

        tracing::info!(
            "Run {} finished: {}/{} converted, {} failed, cancelled: {}",
            self.run_id,
            summary.converted,
            summary.total,
            summary.failed.len(),
            summary.cancelled
        );
        self.events.completed();
        summary
    }

    fn run_batch(&self, request: &ConversionRequest, summary: &mut BatchSummary) -> Result<(), RunError> {
        let files = self
            .files
            .list_eligible_files(&request.input_directory)
            .map_err(|e| RunError::ListInput {
                path: request.input_directory.display().to_string(),
                reason: e.to_string(),
            })?;

        summary.total = files.len();
        if files.is_empty() {
            self.events.log("no files found");
            return Ok(());
        }

        self.events.log(format!("found {} files", files.len()));

        for path in &files {
            if self.cancel.is_cancelled() {
                self.events.log("cancelled");
                summary.cancelled = true;
                break;
            }

            let name = display_name(path);
            match self.convert_one(path, request) {
                FileOutcome::Converted(output_name) => {
                    summary.converted += 1;
                    self.events.progress(percent(summary.converted, summary.total));
                    self.events.log(format!("converted: {} -> {}", name, output_name));
                }
                FileOutcome::Failed(reason) => {
                    tracing::warn!("Run {}: {} failed: {}", self.run_id, name, reason);
                    self.events.log(format!("failed: {}: {}", name, reason));
                    summary.failed.push(name);
                }
            }
        }

        self.events.log(format!(
            "done: converted {}/{}",
            summary.converted, summary.total
        ));
        Ok(())
    }

    fn convert_one(&self, path: &Path, request: &ConversionRequest) -> FileOutcome {
        let output = self.files.output_path_for(path, &request.output_directory);
        tracing::debug!("Run {}: converting {:?} -> {:?}", self.run_id, path, output);

        let image = match self.decoder.decode(path) {
            Ok(image) => image,
            Err(e) => return FileOutcome::Failed(e.to_string()),
        };

        match self.encoder.encode(&image, request.quality, &output) {
            Ok(()) => FileOutcome::Converted(display_name(&output)),
            Err(e) => FileOutcome::Failed(e.to_string()),
        }
    }
}

fn percent(done: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (done as f32 / total as f32 * 100.0).min(100.0)
}
