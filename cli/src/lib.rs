use std::path::{Path, PathBuf};

use clap::Args;
use cutout::{BatchConfig, CutoutError, NumberingMode, algorithms::ThresholdMethod};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Cutout(#[from] CutoutError),
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),
}

/// Options for the `extract` command. Anything given here overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory containing the source images
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,
    /// Directory the numbered subjects are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Minimum enclosed area (in pixels) for a region to be kept
    #[arg(short, long)]
    pub min_area: Option<f64>,
    /// Binarization sensitivity (informational)
    #[arg(short, long)]
    pub threshold: Option<u8>,
    /// Number subjects across the whole batch or restart for each image
    #[arg(long)]
    pub numbering: Option<NumberingMode>,
    /// Adaptive threshold neighbourhood size (odd)
    #[arg(long)]
    pub block_size: Option<u32>,
    /// Adaptive threshold bias
    #[arg(long, allow_hyphen_values = true)]
    pub bias: Option<i32>,
    /// Neighbourhood weighting for the adaptive threshold (gaussian or mean)
    #[arg(long)]
    pub method: Option<ThresholdMethod>,
}

impl ExtractArgs {
    /// Load the config file (if any) and lay the command-line values on top
    pub fn resolve(&self) -> Result<BatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => BatchConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut BatchConfig) {
        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(min_area) = self.min_area {
            config.min_area = min_area;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(numbering) = self.numbering {
            config.numbering = numbering;
        }
        if let Some(block_size) = self.block_size {
            config.segment.block_size = block_size;
        }
        if let Some(bias) = self.bias {
            config.segment.bias = bias;
        }
        if let Some(method) = self.method {
            config.segment.method = method;
        }
    }
}

pub fn load_config(path: &Path) -> Result<BatchConfig, CliError> {
    if !path.exists() {
        return Err(CliError::ConfigNotFound(path.to_path_buf()));
    }
    Ok(BatchConfig::from_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ExtractArgs {
            input_dir: Some("scans".into()),
            min_area: Some(42.0),
            numbering: Some(NumberingMode::PerImage),
            bias: Some(-3),
            method: Some(ThresholdMethod::Mean),
            ..ExtractArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("scans"));
        assert_eq!(config.output_dir, PathBuf::from("extracted_images"));
        assert_eq!(config.threshold, 20);
        assert_eq!(config.min_area, 42.0);
        assert_eq!(config.numbering, NumberingMode::PerImage);
        assert_eq!(config.segment.bias, -3);
        assert_eq!(config.segment.method, ThresholdMethod::Mean);
    }

    #[test]
    fn invalid_override_fails_validation() {
        let args = ExtractArgs {
            block_size: Some(6),
            ..ExtractArgs::default()
        };
        assert!(matches!(args.resolve(), Err(CliError::Cutout(CutoutError::InvalidConfig(_)))));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = ExtractArgs {
            config: Some("/definitely/not/here.toml".into()),
            ..ExtractArgs::default()
        };
        assert!(matches!(args.resolve(), Err(CliError::ConfigNotFound(_))));
    }
}
