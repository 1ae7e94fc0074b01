//! Image files as command bitmaps
//!
//! Decodes any format the `image` crate is built with and flattens it to
//! row-major RGB8.

use std::io;
use std::path::Path;

use image::ImageError;
use log::debug;
use tftlink_protocol::{Bitmap, ImageSource};

/// Image loading errors
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    /// The file could not be opened or read
    #[error("cannot open image {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file is not a decodable image
    #[error("cannot decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: ImageError,
    },
    /// A dimension does not fit the 16-bit width/height fields
    #[error("image {path} is {width}x{height}, larger than 65535 pixels on a side")]
    TooLarge { path: String, width: u32, height: u32 },
}

/// Loads images from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl FileImageSource {
    /// Load and flatten the image at `path`
    pub fn load_path(path: &Path) -> Result<Bitmap, ImageLoadError> {
        let display = path.display().to_string();

        let decoded = image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => ImageLoadError::Open {
                path: display.clone(),
                source,
            },
            source => ImageLoadError::Decode {
                path: display.clone(),
                source,
            },
        })?;

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let too_large = || ImageLoadError::TooLarge {
            path: display.clone(),
            width,
            height,
        };
        let w = u16::try_from(width).map_err(|_| too_large())?;
        let h = u16::try_from(height).map_err(|_| too_large())?;

        debug!("Loaded {} ({}x{})", display, w, h);
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Ok(Bitmap::new(w, h, pixels))
    }
}

impl ImageSource for FileImageSource {
    type Error = ImageLoadError;

    fn load(&mut self, path: &str) -> Result<Bitmap, ImageLoadError> {
        Self::load_path(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tftlink-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_bmp() {
        let path = scratch_path("load.bmp");
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let bitmap = FileImageSource.load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((bitmap.width, bitmap.height), (3, 2));
        assert_eq!(bitmap.pixels.len(), 6);
        assert_eq!(bitmap.pixels[0], [255, 0, 0]);
        assert_eq!(bitmap.pixels[5], [0, 0, 255]);
        assert_eq!(bitmap.pixels[1], [0, 0, 0]);
    }

    #[test]
    fn test_missing_file() {
        let path = scratch_path("missing.bmp");
        match FileImageSource.load(path.to_str().unwrap()) {
            Err(ImageLoadError::Open { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_an_image() {
        let path = scratch_path("garbage.bmp");
        std::fs::write(&path, b"definitely not a bitmap").unwrap();
        let result = FileImageSource.load(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ImageLoadError::Decode { .. })));
    }
}
