pub mod events;
pub mod source;
pub mod store;

pub use events::{BatchEvent, EventSink, TracingSink};
pub use source::{ImageSource, IMAGE_EXTENSIONS};
pub use store::SubjectStore;

use std::path::PathBuf;

use serde::Serialize;

use crate::{
    config::BatchConfig,
    error::Result,
    extractor::Extractor,
    numbering::{Numbering, NumberingMode, SerialCounter},
    pipeline::{builder::SegmenterBuilder, Segmenter},
    types::RawImage,
};

/// Totals for one batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub files_found: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub subjects_saved: usize,
    pub saved: Vec<PathBuf>,
}

/// Drives segmentation and extraction over a directory of images.
///
/// Images are handled one at a time, to completion. A file that cannot be
/// decoded, or a subject that cannot be written, is reported and skipped.
pub struct BatchRunner {
    config: BatchConfig,
    segmenter: Segmenter,
    extractor: Extractor,
}

impl BatchRunner {
    /// Validate the configuration and build the processing stages
    pub fn new(config: BatchConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = SegmenterBuilder::from_params(&config.segment)?;
        let extractor = Extractor::new(config.min_area);
        Ok(Self {
            config,
            segmenter,
            extractor,
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Process every eligible file in the input directory
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<BatchSummary> {
        let source = ImageSource::new(&self.config.input_dir);
        let files = source.scan()?;

        let mut summary = BatchSummary {
            files_found: files.len(),
            ..BatchSummary::default()
        };

        if files.is_empty() {
            sink.notify(&BatchEvent::NoEligibleFiles {
                input_dir: source.dir(),
            });
            sink.notify(&BatchEvent::Finished(&summary));
            return Ok(summary);
        }

        let store = SubjectStore::create(&self.config.output_dir)?;
        sink.notify(&BatchEvent::Started {
            input_dir: source.dir(),
            output_dir: store.dir(),
            files: files.len(),
            threshold: self.config.threshold,
        });

        let mut counter = SerialCounter::new();
        for (i, path) in files.iter().enumerate() {
            let path = path.as_path();
            sink.notify(&BatchEvent::FileStarted {
                path,
                index: i + 1,
                total: files.len(),
            });

            let image = match ImageSource::load(path) {
                Ok(image) => image,
                Err(error) => {
                    sink.notify(&BatchEvent::FileUnreadable { path, error: &error });
                    summary.files_failed += 1;
                    continue;
                }
            };

            let numbering = match self.config.numbering {
                NumberingMode::Batch => Numbering::Shared(&mut counter),
                NumberingMode::PerImage => Numbering::per_image(),
            };

            let saved = match self.process_image(&image, &store, numbering, sink) {
                Ok(saved) => saved,
                Err(error) => {
                    sink.notify(&BatchEvent::FileFailed { path, error: &error });
                    summary.files_failed += 1;
                    continue;
                }
            };

            summary.files_processed += 1;
            if saved.is_empty() {
                sink.notify(&BatchEvent::NothingExtracted { path });
            } else {
                sink.notify(&BatchEvent::FileFinished {
                    path,
                    subjects: saved.len(),
                });
            }
            summary.subjects_saved += saved.len();
            summary.saved.extend(saved);
        }

        sink.notify(&BatchEvent::Finished(&summary));
        Ok(summary)
    }

    fn process_image(
        &self,
        image: &RawImage,
        store: &SubjectStore,
        numbering: Numbering<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<PathBuf>> {
        let mask = self.segmenter.segment(image)?;
        let mut saved = Vec::new();

        for subject in self.extractor.extract(image, &mask, numbering)? {
            match store.save(&subject) {
                Ok(path) => {
                    sink.notify(&BatchEvent::SubjectSaved {
                        serial: subject.serial,
                        path: path.as_path(),
                        width: subject.width(),
                        height: subject.height(),
                    });
                    saved.push(path);
                }
                Err(error) => sink.notify(&BatchEvent::SaveFailed {
                    serial: subject.serial,
                    error: &error,
                }),
            }
        }

        Ok(saved)
    }
}

/// Run a batch with the given configuration, logging progress through `tracing`
pub fn run_batch(config: BatchConfig) -> Result<BatchSummary> {
    BatchRunner::new(config)?.run(&mut TracingSink)
}
