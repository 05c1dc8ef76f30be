use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::{EngineError, EngineResult};
use crate::metrics::{RECORDINGS_TOTAL, RECORDING_BYTES_TOTAL, RECORDING_CHUNKS_TOTAL};
use crate::models::{RecordingSession, RecordingStatus, StopOutcome};
use crate::store::RecordingStore;
use crate::utils::locks::KeyedLocks;
use crate::utils::retry::{retry_with_config, RetryConfig};

/// Ingests streamed proctoring video for a session: chunks are appended to
/// a per-recording file in the order they arrive. A recording failure is a
/// local fault that seals the recording and never touches the candidate's
/// exam session.
pub struct RecordingService {
    store: Arc<dyn RecordingStore>,
    recordings_dir: PathBuf,
    locks: KeyedLocks,
}

impl RecordingService {
    pub fn new(store: Arc<dyn RecordingStore>, recordings_dir: PathBuf) -> Self {
        Self {
            store,
            recordings_dir,
            locks: KeyedLocks::new(),
        }
    }

    /// Allocates a unique storage target and opens the recording.
    pub async fn start_recording(
        &self,
        exam_id: &str,
        session_id: &str,
    ) -> EngineResult<RecordingSession> {
        tokio::fs::create_dir_all(&self.recordings_dir).await?;

        let file_name = format!(
            "{}_{}_{}.webm",
            exam_id,
            session_id,
            Utc::now().timestamp_millis()
        );
        let file_path = self.recordings_dir.join(&file_name);
        // Touch the file so stopping an empty recording can still stat it.
        tokio::fs::File::create(&file_path).await?;

        let recording = RecordingSession::new(exam_id, session_id, file_name, file_path);
        self.put_with_retry(&recording).await?;

        RECORDINGS_TOTAL.with_label_values(&["started"]).inc();
        tracing::info!(
            recording_id = %recording.id,
            session_id,
            file = %recording.file_path.display(),
            "recording started"
        );
        Ok(recording)
    }

    /// Appends one chunk as received. Sequence numbers are recorded for the
    /// audit trail only; out-of-order or duplicate numbers are not
    /// reordered or rejected. Returns the updated chunk count.
    pub async fn append_chunk(
        &self,
        recording_id: &str,
        sequence_number: u64,
        bytes: &[u8],
    ) -> EngineResult<u64> {
        let _guard = self.locks.acquire(recording_id).await;

        let mut recording = self.fetch(recording_id).await?;
        if recording.status != RecordingStatus::Recording {
            return Err(EngineError::conflict(format!(
                "recording {} is not accepting chunks",
                recording_id
            )));
        }

        let write = retry_with_config(RetryConfig::default(), || {
            append_bytes(&recording.file_path, bytes)
        })
        .await;
        match write {
            Ok(()) => {
                recording.chunks_received += 1;
                recording.file_size_bytes += bytes.len() as u64;
                self.put_with_retry(&recording).await?;

                RECORDING_CHUNKS_TOTAL.inc();
                RECORDING_BYTES_TOTAL.inc_by(bytes.len() as u64);
                tracing::debug!(
                    recording_id,
                    sequence_number,
                    chunk_bytes = bytes.len(),
                    chunks_received = recording.chunks_received,
                    "chunk appended"
                );
                Ok(recording.chunks_received)
            }
            Err(err) => {
                // Seal the recording: the fault is recorded on the entity
                // and surfaced, not swallowed.
                recording.status = RecordingStatus::Failed;
                recording.error_message = Some(err.to_string());
                recording.ended_at = Some(Utc::now());
                self.put_with_retry(&recording).await?;

                RECORDINGS_TOTAL.with_label_values(&["failed"]).inc();
                tracing::error!(
                    recording_id,
                    sequence_number,
                    error = %err,
                    "chunk append failed, recording sealed as failed"
                );
                Err(EngineError::Io(err))
            }
        }
    }

    /// Seals a recording and reports its final figures. Idempotent on an
    /// already-completed recording: returns the stored values.
    pub async fn stop_recording(&self, recording_id: &str) -> EngineResult<StopOutcome> {
        let _guard = self.locks.acquire(recording_id).await;

        let mut recording = self.fetch(recording_id).await?;
        match recording.status {
            RecordingStatus::Completed => {
                return Ok(StopOutcome {
                    duration_seconds: recording.duration_seconds.unwrap_or(0),
                    total_size_bytes: recording.file_size_bytes,
                });
            }
            RecordingStatus::Failed => {
                return Err(EngineError::conflict(format!(
                    "recording {} already failed",
                    recording_id
                )));
            }
            RecordingStatus::Recording => {}
        }

        // Measure the final size from storage; fall back to the running
        // total if the file cannot be statted.
        let total_size = match tokio::fs::metadata(&recording.file_path).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                tracing::warn!(recording_id, error = %err, "could not stat recording file");
                recording.file_size_bytes
            }
        };

        let ended_at = Utc::now();
        let duration_seconds = (ended_at - recording.started_at).num_seconds().max(0);

        recording.file_size_bytes = total_size;
        recording.ended_at = Some(ended_at);
        recording.duration_seconds = Some(duration_seconds);
        recording.status = RecordingStatus::Completed;
        self.put_with_retry(&recording).await?;

        RECORDINGS_TOTAL.with_label_values(&["completed"]).inc();
        tracing::info!(
            recording_id,
            duration_seconds,
            total_size,
            chunks = recording.chunks_received,
            "recording completed"
        );
        Ok(StopOutcome {
            duration_seconds,
            total_size_bytes: total_size,
        })
    }

    pub async fn get_recording(&self, recording_id: &str) -> EngineResult<RecordingSession> {
        self.fetch(recording_id).await
    }

    async fn fetch(&self, recording_id: &str) -> EngineResult<RecordingSession> {
        self.store
            .get_recording(recording_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("recording {}", recording_id)))
    }

    async fn put_with_retry(&self, recording: &RecordingSession) -> EngineResult<()> {
        retry_with_config(RetryConfig::default(), || async move {
            self.store.put_recording(recording).await
        })
        .await
    }
}

async fn append_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}
