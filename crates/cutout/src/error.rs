use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutoutError {
    #[error("Failed to decode image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    DimensionMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CutoutError>;
