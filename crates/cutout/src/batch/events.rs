use std::path::Path;

use tracing::{error, info, warn};

use crate::{batch::BatchSummary, error::CutoutError};

/// Progress notifications emitted by a batch run
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Started {
        input_dir: &'a Path,
        output_dir: &'a Path,
        files: usize,
        threshold: u8,
    },
    NoEligibleFiles {
        input_dir: &'a Path,
    },
    FileStarted {
        path: &'a Path,
        index: usize,
        total: usize,
    },
    /// The file could not be read or decoded
    FileUnreadable {
        path: &'a Path,
        error: &'a CutoutError,
    },
    /// The file decoded but segmentation or extraction failed
    FileFailed {
        path: &'a Path,
        error: &'a CutoutError,
    },
    SubjectSaved {
        serial: u32,
        path: &'a Path,
        width: u32,
        height: u32,
    },
    SaveFailed {
        serial: u32,
        error: &'a CutoutError,
    },
    NothingExtracted {
        path: &'a Path,
    },
    FileFinished {
        path: &'a Path,
        subjects: usize,
    },
    Finished(&'a BatchSummary),
}

/// Receives batch events; has no say over control flow
pub trait EventSink {
    fn notify(&mut self, event: &BatchEvent<'_>);
}

impl<F> EventSink for F
where
    F: FnMut(&BatchEvent<'_>),
{
    fn notify(&mut self, event: &BatchEvent<'_>) {
        self(event)
    }
}

/// Renders events as `tracing` log lines
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn notify(&mut self, event: &BatchEvent<'_>) {
        match event {
            BatchEvent::Started { input_dir, output_dir, files, threshold } => {
                info!("Found {} image(s) in {:?}, writing to {:?}", files, input_dir, output_dir);
                info!("Threshold setting: {}", threshold);
            }
            BatchEvent::NoEligibleFiles { input_dir } => {
                warn!("No image files found in {:?}", input_dir);
            }
            BatchEvent::FileStarted { path, index, total } => {
                info!("[{}/{}] Processing {:?}", index, total, path);
            }
            BatchEvent::FileUnreadable { path, error } => {
                error!("Could not read {:?}: {}", path, error);
            }
            BatchEvent::FileFailed { path, error } => {
                error!("Could not process {:?}: {}", path, error);
            }
            BatchEvent::SubjectSaved { serial, path, width, height } => {
                info!("Saved subject {} ({}x{}) -> {:?}", serial, width, height, path);
            }
            BatchEvent::SaveFailed { serial, error } => {
                error!("Failed to save subject {}: {}", serial, error);
            }
            BatchEvent::NothingExtracted { path } => {
                warn!("No subjects extracted from {:?}", path);
            }
            BatchEvent::FileFinished { path, subjects } => {
                info!("Extracted {} subject(s) from {:?}", subjects, path);
            }
            BatchEvent::Finished(summary) => {
                info!(
                    "✅ Done: {} subject(s) from {} of {} file(s), {} failed",
                    summary.subjects_saved,
                    summary.files_processed,
                    summary.files_found,
                    summary.files_failed
                );
            }
        }
    }
}
