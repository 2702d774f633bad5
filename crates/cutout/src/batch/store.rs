use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::Result, types::Subject};

/// Writes subjects as `NNN.png` files into one directory
#[derive(Debug, Clone)]
pub struct SubjectStore {
    dir: PathBuf,
}

impl SubjectStore {
    /// Use `dir` as the output directory, creating it and any missing parents
    pub fn create<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, serial: u32) -> PathBuf {
        self.dir.join(file_name(serial))
    }

    /// Encode the subject as an RGBA PNG and return where it went
    pub fn save(&self, subject: &Subject) -> Result<PathBuf> {
        let path = self.path_for(subject.serial);
        subject
            .image
            .save_with_format(&path, image::ImageFormat::Png)?;
        Ok(path)
    }
}

/// Zero-padded to three digits; larger serials just grow wider
pub fn file_name(serial: u32) -> String {
    format!("{serial:03}.png")
}
