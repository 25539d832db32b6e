use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::errors::{Result, VitrineError};

/// Decoded equirectangular radiance image (linear RGB).
#[derive(Debug, Clone, PartialEq)]
pub struct EquirectImage {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<Vec3>,
}

impl EquirectImage {
    pub fn new(width: u32, height: u32, texels: Vec<Vec3>) -> Result<Self> {
        Self {
            width,
            height,
            texels,
        }
        .validated()
    }

    /// Rejects empty images and texel counts that do not match the extent.
    pub fn validated(self) -> Result<Self> {
        let expected = (self.width as usize) * (self.height as usize);
        if expected == 0 || self.texels.len() != expected {
            return Err(VitrineError::ImageDecodeError(format!(
                "equirect image {}x{} has {} texels",
                self.width,
                self.height,
                self.texels.len()
            )));
        }
        Ok(self)
    }

    /// Builds an image by evaluating `f(x, y)` for every texel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Vec3) -> Self {
        let texels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            texels,
        }
    }

    #[inline]
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Vec3 {
        self.texels[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

/// Something that yields the environment image. `load` runs on a loader thread.
pub trait EnvironmentSource: Send + 'static {
    fn uri(&self) -> String;

    fn load(self: Box<Self>) -> Result<EquirectImage>;
}

/// Radiance `.hdr` file on disk.
pub struct HdrFileSource {
    path: PathBuf,
}

impl HdrFileSource {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl EnvironmentSource for HdrFileSource {
    fn uri(&self) -> String {
        self.path.display().to_string()
    }

    fn load(self: Box<Self>) -> Result<EquirectImage> {
        let img = image::ImageReader::open(&self.path)?
            .with_guessed_format()?
            .decode()?;
        let width = img.width();
        let height = img.height();
        let rgb32f = img.into_rgb32f();
        let texels = rgb32f.pixels().map(|p| Vec3::from(p.0)).collect();
        EquirectImage::new(width, height, texels)
    }
}

/// An already decoded image, handed out as if it had been loaded.
pub struct MemoryEnvironmentSource {
    uri: String,
    image: EquirectImage,
}

impl MemoryEnvironmentSource {
    #[must_use]
    pub fn new(uri: impl Into<String>, image: EquirectImage) -> Self {
        Self {
            uri: uri.into(),
            image,
        }
    }
}

impl EnvironmentSource for MemoryEnvironmentSource {
    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn load(self: Box<Self>) -> Result<EquirectImage> {
        self.image.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_texel_count_is_rejected() {
        assert!(EquirectImage::new(2, 2, vec![Vec3::ONE; 3]).is_err());
        assert!(EquirectImage::new(0, 2, Vec::new()).is_err());
        assert!(EquirectImage::new(2, 1, vec![Vec3::ONE; 2]).is_ok());
    }

    #[test]
    fn memory_source_validates_its_image() {
        let empty = Box::new(MemoryEnvironmentSource::new(
            "empty",
            EquirectImage::from_fn(0, 4, |_, _| Vec3::ONE),
        ));
        assert!(matches!(empty.load(), Err(VitrineError::ImageDecodeError(_))));

        let mut short = EquirectImage::from_fn(4, 2, |_, _| Vec3::ONE);
        short.texels.pop();
        let short = Box::new(MemoryEnvironmentSource::new("short", short));
        assert!(short.load().is_err());
    }

    #[test]
    fn missing_hdr_file_is_an_io_error() {
        let source = Box::new(HdrFileSource::new("does/not/exist.hdr"));
        assert!(matches!(source.load(), Err(VitrineError::IoError(_))));
    }

    #[test]
    fn from_fn_is_row_major() {
        let img = EquirectImage::from_fn(3, 2, |x, y| Vec3::new(x as f32, y as f32, 0.0));
        assert_eq!(img.texel(2, 1), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(img.texels.len(), 6);
    }
}
