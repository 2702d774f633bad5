use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::Result, types::RawImage};

/// File extensions picked up by a directory scan, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Non-recursive directory of source images
#[derive(Debug, Clone)]
pub struct ImageSource {
    dir: PathBuf,
}

impl ImageSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Eligible files directly inside the directory, sorted by file name
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Read a file and decode it to RGB
    pub fn load(path: &Path) -> Result<RawImage> {
        let bytes = fs::read(path)?;
        let image = image::load_from_memory(&bytes)?;
        Ok(image.to_rgb8())
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a/sticker.PNG")));
        assert!(is_supported_image(Path::new("scan.JpEg")));
        assert!(is_supported_image(Path::new("x.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("README")));
        assert!(!is_supported_image(Path::new("archive.png.zip")));
    }

    #[test]
    fn scan_is_sorted_and_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "c.txt", "d.bmp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("e.png"), b"").unwrap();

        let names: Vec<String> = ImageSource::new(dir.path())
            .scan()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "d.bmp"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSource::new(dir.path().join("absent")).scan().is_err());
    }

    #[test]
    fn corrupt_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();
        assert!(ImageSource::load(&path).is_err());
    }
}
