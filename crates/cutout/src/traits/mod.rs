use image::GrayImage;
use crate::{error::Result, types::Region};

/// Trait for single-channel image processing stages (blur, threshold, morphology)
pub trait ImagePreprocessor: Send + Sync {
    /// Produce the next image of the segmentation chain
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;

    /// Short human-readable stage name
    fn name(&self) -> &'static str;
}

/// Trait for region discovery on a binary mask
pub trait ContourExtractor: Send + Sync {
    /// Find connected foreground regions, in discovery order
    fn extract_regions(&self, mask: &GrayImage) -> Result<Vec<Region>>;
}
