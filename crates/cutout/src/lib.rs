//! # Cutout
//!
//! Extracts stickers, sprites and other cut-out figures from scanned or
//! photographed sheets and saves each one as a numbered, transparent PNG.
//!
//! ## How it works
//!
//! - **Segmenter**: grayscale, Gaussian blur, inverted adaptive threshold and a
//!   morphological closing turn a colour image into a binary foreground mask.
//! - **Extractor**: outer contours of the mask are filtered by area, cropped
//!   out of the source image and given an alpha channel from the filled contour.
//! - **Batch**: scans a directory, runs both stages on each image and writes
//!   `001.png`, `002.png`, ... into an output directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cutout::{Extractor, Numbering, Segmenter};
//!
//! let image = image::open("sheet.png")?.to_rgb8();
//! let mask = Segmenter::default().segment(&image)?;
//!
//! for subject in Extractor::new(1000.0).extract(&image, &mask, Numbering::per_image())? {
//!     subject.image.save(format!("{:03}.png", subject.serial))?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Batch Processing
//!
//! ```rust,no_run
//! use cutout::{BatchConfig, BatchRunner, TracingSink};
//!
//! let config = BatchConfig {
//!     input_dir: "scans".into(),
//!     ..BatchConfig::default()
//! };
//! let summary = BatchRunner::new(config)?.run(&mut TracingSink)?;
//! println!("saved {} subjects", summary.subjects_saved);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod numbering;
pub mod extractor;
pub mod config;
pub mod batch;

// Re-exports for convenience
pub use error::{CutoutError, Result};
pub use types::{BinaryMask, BoundingBox, RawImage, Region, Subject};
pub use traits::*;
pub use pipeline::{Segmenter, builder::SegmenterBuilder};
pub use numbering::{Numbering, NumberingMode, SerialCounter};
pub use extractor::{Extractor, Subjects};
pub use config::{BatchConfig, SegmentParams};
pub use batch::{BatchEvent, BatchRunner, BatchSummary, EventSink, TracingSink, run_batch};

/// Segment `image` with default parameters and collect its subjects, numbered from 1.
pub fn extract_subjects(image: &RawImage, min_area: f64) -> Result<Vec<Subject>> {
    let mask = Segmenter::default().segment(image)?;
    let subjects = Extractor::new(min_area)
        .extract(image, &mask, Numbering::per_image())?
        .collect();
    Ok(subjects)
}
