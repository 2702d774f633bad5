use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::{sigma_for_kernel, ThresholdMethod},
    error::{CutoutError, Result},
    numbering::NumberingMode,
};

pub const DEFAULT_OUTPUT_DIR: &str = "extracted_images";
pub const DEFAULT_THRESHOLD: u8 = 20;
pub const DEFAULT_MIN_AREA: f64 = 1000.0;

const MAX_FILTER_RADIUS: u32 = 15;
const MAX_BLUR_SIGMA: f32 = 10.0;

/// Segmentation parameters
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SegmentParams {
    /// Gaussian blur standard deviation; the default matches a 5x5 kernel, 0 disables the blur
    pub blur_sigma: f32,
    /// Side of the adaptive threshold neighbourhood (odd, >= 3)
    pub block_size: u32,
    /// How much darker than its neighbourhood mean a pixel must be to count as foreground
    pub bias: i32,
    /// Weighting of the neighbourhood mean
    pub method: ThresholdMethod,
    /// Closing radius; 2 gives a 5x5 square structuring element
    pub close_radius: u8,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            blur_sigma: sigma_for_kernel(5),
            block_size: 11,
            bias: 2,
            method: ThresholdMethod::Gaussian,
            close_radius: 2,
        }
    }
}

/// Everything a batch run needs to know
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned (non-recursively) for source images
    pub input_dir: PathBuf,
    /// Directory the numbered subjects are written to; created if missing
    pub output_dir: PathBuf,
    /// Binarization sensitivity. Informational only, reported at batch start
    pub threshold: u8,
    /// Regions with a smaller enclosed area are discarded
    pub min_area: f64,
    pub numbering: NumberingMode,
    pub segment: SegmentParams,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            threshold: DEFAULT_THRESHOLD,
            min_area: DEFAULT_MIN_AREA,
            numbering: NumberingMode::default(),
            segment: SegmentParams::default(),
        }
    }
}

impl BatchConfig {
    /// Check every field once, before any image is touched
    pub fn validate(&self) -> Result<()> {
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(CutoutError::InvalidConfig(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        let seg = &self.segment;
        if seg.block_size < 3 || seg.block_size % 2 == 0 {
            return Err(CutoutError::InvalidConfig(format!(
                "segment.block_size must be odd and at least 3, got {}",
                seg.block_size
            )));
        }
        if !seg.blur_sigma.is_finite() || !(0.0..=MAX_BLUR_SIGMA).contains(&seg.blur_sigma) {
            return Err(CutoutError::InvalidConfig(format!(
                "segment.blur_sigma must be between 0 and {MAX_BLUR_SIGMA}, got {}",
                seg.blur_sigma
            )));
        }
        if seg.close_radius as u32 > MAX_FILTER_RADIUS {
            return Err(CutoutError::InvalidConfig(format!(
                "segment.close_radius must be at most {MAX_FILTER_RADIUS}, got {}",
                seg.close_radius
            )));
        }
        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BatchConfig)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(CutoutError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save configuration, picking the format from the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CutoutError::UnsupportedFileFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }
}
