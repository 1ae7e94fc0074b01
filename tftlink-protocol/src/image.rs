//! Image source abstraction
//!
//! The protocol does not know about file formats. Image commands are built
//! from a decoded [`Bitmap`] supplied by an [`ImageSource`].

use alloc::vec::Vec;

/// Decoded image: dimensions plus row-major RGB pixels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Row-major `[r, g, b]` triples
    pub pixels: Vec<[u8; 3]>,
}

impl Bitmap {
    /// Create a bitmap from row-major pixels
    pub fn new(width: u16, height: u16, pixels: Vec<[u8; 3]>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a bitmap filled with one color
    pub fn filled(width: u16, height: u16, rgb: [u8; 3]) -> Self {
        let count = usize::from(width) * usize::from(height);
        Self::new(width, height, alloc::vec![rgb; count])
    }
}

/// Loads images by path
///
/// Implemented by the host with a real decoder; tests use in-memory sources.
pub trait ImageSource {
    /// Error type for load failures
    type Error;

    /// Load and decode the image at `path`
    fn load(&mut self, path: &str) -> Result<Bitmap, Self::Error>;
}
