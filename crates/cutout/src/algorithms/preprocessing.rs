use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use crate::{
    error::{CutoutError, Result},
    traits::ImagePreprocessor,
};

/// Standard deviation of a Gaussian kernel `size` pixels wide (odd), using
/// the usual rule `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size.saturating_sub(1)) as f32 * 0.5 - 1.0) + 0.8
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    /// Equivalent of a 5x5 Gaussian kernel
    fn default() -> Self {
        Self {
            sigma: sigma_for_kernel(5),
        }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.sigma <= 0.0 {
            return Ok(image.clone());
        }
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }

    fn name(&self) -> &'static str {
        "gaussian_blur"
    }
}

/// How the local threshold of a neighbourhood is computed
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdMethod {
    /// Gaussian-weighted neighbourhood mean
    #[default]
    Gaussian,
    /// Plain neighbourhood mean over a `block_size` square
    Mean,
}

/// Inverted adaptive threshold.
///
/// A pixel becomes foreground (255) when it is at least `bias` darker than the
/// weighted mean of its `block_size` neighbourhood, so dark subjects on a
/// light background come out set. Image borders replicate edge pixels.
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdPreprocessor {
    pub block_size: u32,
    pub bias: i32,
    pub method: ThresholdMethod,
}

impl Default for AdaptiveThresholdPreprocessor {
    fn default() -> Self {
        Self {
            block_size: 11,
            bias: 2,
            method: ThresholdMethod::Gaussian,
        }
    }
}

impl AdaptiveThresholdPreprocessor {
    pub fn new(block_size: u32, bias: i32, method: ThresholdMethod) -> Result<Self> {
        if block_size < 3 || block_size % 2 == 0 {
            return Err(CutoutError::InvalidConfig(format!(
                "block_size must be odd and at least 3, got {block_size}"
            )));
        }
        Ok(Self { block_size, bias, method })
    }

    fn local_mean(&self, image: &GrayImage) -> GrayImage {
        match self.method {
            ThresholdMethod::Gaussian => {
                imageproc::filter::gaussian_blur_f32(image, sigma_for_kernel(self.block_size))
            }
            ThresholdMethod::Mean => {
                let radius = self.block_size / 2;
                imageproc::filter::box_filter(image, radius, radius)
            }
        }
    }
}

impl ImagePreprocessor for AdaptiveThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let local_mean = self.local_mean(image);

        Ok(GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let value = image.get_pixel(x, y)[0] as i32;
            let mean = local_mean.get_pixel(x, y)[0] as i32;
            if value <= mean - self.bias {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        }))
    }

    fn name(&self) -> &'static str {
        match self.method {
            ThresholdMethod::Gaussian => "adaptive_threshold(gaussian)",
            ThresholdMethod::Mean => "adaptive_threshold(mean)",
        }
    }
}

/// Morphological closing (dilate, then erode) with a `(2r + 1)` square structuring element
#[derive(Debug, Clone)]
pub struct ClosingPreprocessor {
    pub radius: u8,
}

impl Default for ClosingPreprocessor {
    fn default() -> Self {
        Self { radius: 2 }
    }
}

impl ImagePreprocessor for ClosingPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.radius == 0 {
            return Ok(image.clone());
        }
        Ok(imageproc::morphology::close(image, Norm::LInf, self.radius))
    }

    fn name(&self) -> &'static str {
        "closing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ContourExtractor;

    fn dark_square_on_white(size: u32, x0: u32, side: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (x0..x0 + side).contains(&x) && (x0..x0 + side).contains(&y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }

    #[test]
    fn adaptive_threshold_ignores_flat_images() {
        let flat = GrayImage::from_pixel(40, 40, Luma([90u8]));
        let out = AdaptiveThresholdPreprocessor::default()
            .preprocess(&flat)
            .unwrap();
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn adaptive_threshold_marks_dark_edges_as_foreground() {
        let img = dark_square_on_white(60, 20, 20);
        let out = AdaptiveThresholdPreprocessor::default()
            .preprocess(&img)
            .unwrap();

        // Dark pixel next to the light background
        assert_eq!(out.get_pixel(20, 30)[0], 255);
        // Light background pixel
        assert_eq!(out.get_pixel(5, 5)[0], 0);
        // Output is strictly binary
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn adaptive_threshold_rejects_even_block() {
        assert!(AdaptiveThresholdPreprocessor::new(10, 2, ThresholdMethod::Gaussian).is_err());
        assert!(AdaptiveThresholdPreprocessor::new(1, 2, ThresholdMethod::Mean).is_err());
        assert!(AdaptiveThresholdPreprocessor::new(15, 3, ThresholdMethod::Mean).is_ok());
    }

    #[test]
    fn mean_threshold_marks_dark_edges_as_foreground() {
        let img = dark_square_on_white(60, 20, 20);
        let out = AdaptiveThresholdPreprocessor::new(11, 2, ThresholdMethod::Mean)
            .unwrap()
            .preprocess(&img)
            .unwrap();
        assert_eq!(out.get_pixel(20, 30)[0], 255);
        assert_eq!(out.get_pixel(5, 5)[0], 0);
    }

    #[test]
    fn kernel_sigma_follows_size() {
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-6);
        assert!((sigma_for_kernel(11) - 2.0).abs() < 1e-6);
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn closing_fills_single_pixel_gap() {
        let mut img = GrayImage::new(20, 20);
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img.put_pixel(10, 10, Luma([0u8]));

        let out = ClosingPreprocessor::default().preprocess(&img).unwrap();
        assert_eq!(out.get_pixel(10, 10)[0], 255);
    }

    #[test]
    fn default_closing_bridges_three_pixel_gap() {
        let mut img = GrayImage::new(80, 40);
        for y in 10..30 {
            for x in (10..30).chain(33..53) {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }

        let out = ClosingPreprocessor::default().preprocess(&img).unwrap();
        for x in 30..33 {
            assert_eq!(out.get_pixel(x, 20)[0], 255, "gap column {x} left open");
        }

        let regions = crate::algorithms::ExternalContourExtractor
            .extract_regions(&out)
            .unwrap();
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn zero_sigma_blur_is_identity() {
        let img = dark_square_on_white(16, 4, 4);
        let out = GaussianBlurPreprocessor { sigma: 0.0 }.preprocess(&img).unwrap();
        assert_eq!(out, img);
    }
}
