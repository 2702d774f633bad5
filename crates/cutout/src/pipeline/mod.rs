pub mod builder;

use image::GrayImage;
use crate::{
    error::{CutoutError, Result},
    traits::ImagePreprocessor,
    types::{BinaryMask, RawImage},
};

/// Turns a colour image into a binary foreground mask.
///
/// The image is converted to luminance and then run through each stage in
/// order. With the default stages that is: Gaussian blur, inverted adaptive
/// threshold, morphological closing. Whatever the stages produce, any
/// non-zero pixel of the final image is reported as 255.
pub struct Segmenter {
    stages: Vec<Box<dyn ImagePreprocessor>>,
}

impl Segmenter {
    /// Create a new segmenter builder
    pub fn builder() -> builder::SegmenterBuilder {
        builder::SegmenterBuilder::new()
    }

    /// Create a segmenter with the given stages
    pub fn new(stages: Vec<Box<dyn ImagePreprocessor>>) -> Self {
        Self { stages }
    }

    /// Segment a colour image. Deterministic for a given stage list.
    pub fn segment(&self, image: &RawImage) -> Result<BinaryMask> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CutoutError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let luma = image::imageops::grayscale(image);
        self.segment_luma(&luma)
    }

    /// Run the stages on an already single-channel image
    pub fn segment_luma(&self, image: &GrayImage) -> Result<BinaryMask> {
        let mut processed = image.clone();
        for stage in &self.stages {
            processed = stage.preprocess(&processed)?;
        }
        Ok(imageproc::contrast::threshold(&processed, 0))
    }

    /// Get information about the segmenter configuration
    pub fn info(&self) -> String {
        let names: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        format!("Segmenter: grayscale -> {}", names.join(" -> "))
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        builder::SegmenterBuilder::build_default()
    }
}
