use crate::{
    algorithms::{
        AdaptiveThresholdPreprocessor, ClosingPreprocessor, GaussianBlurPreprocessor,
        ThresholdMethod,
    },
    config::SegmentParams,
    error::Result,
    pipeline::Segmenter,
    traits::ImagePreprocessor,
};

/// Builder for creating segmenters with a fluent API
pub struct SegmenterBuilder {
    stages: Vec<Box<dyn ImagePreprocessor>>,
}

impl SegmenterBuilder {
    /// Create a new, empty segmenter builder
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the chain
    pub fn add_stage<P>(mut self, stage: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append a Gaussian blur with the given standard deviation
    pub fn with_blur(self, sigma: f32) -> Self {
        self.add_stage(GaussianBlurPreprocessor { sigma })
    }

    /// Append an inverted adaptive threshold
    pub fn with_adaptive_threshold(
        self,
        block_size: u32,
        bias: i32,
        method: ThresholdMethod,
    ) -> Result<Self> {
        let threshold = AdaptiveThresholdPreprocessor::new(block_size, bias, method)?;
        Ok(self.add_stage(threshold))
    }

    /// Append a morphological closing
    pub fn with_closing(self, radius: u8) -> Self {
        self.add_stage(ClosingPreprocessor { radius })
    }

    pub fn build(self) -> Segmenter {
        Segmenter::new(self.stages)
    }

    /// Build the standard blur -> threshold -> close chain from parameters
    pub fn from_params(params: &SegmentParams) -> Result<Segmenter> {
        Ok(Segmenter::builder()
            .with_blur(params.blur_sigma)
            .with_adaptive_threshold(params.block_size, params.bias, params.method)?
            .with_closing(params.close_radius)
            .build())
    }

    /// Build the standard chain with default parameters
    pub fn build_default() -> Segmenter {
        Self::new()
            .add_stage(GaussianBlurPreprocessor::default())
            .add_stage(AdaptiveThresholdPreprocessor::default())
            .add_stage(ClosingPreprocessor::default())
            .build()
    }
}

impl Default for SegmenterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
