//! Channels and image sources for tests

use std::io;
use std::thread;
use std::time::Duration;

use tftlink_hal::SerialTx;
use tftlink_protocol::{Bitmap, ImageSource};

use crate::image_source::ImageLoadError;

/// Records every write and flush
#[derive(Debug, Default)]
pub struct RecordingChannel {
    bytes: Vec<u8>,
    write_sizes: Vec<usize>,
    flushes: usize,
}

impl RecordingChannel {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_sizes(&self) -> &[usize] {
        &self.write_sizes
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl SerialTx for RecordingChannel {
    type Error = io::Error;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(data);
        self.write_sizes.push(data.len());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Accepts data a few bytes at a time, sleeping between pieces
#[derive(Debug)]
pub struct SlowChannel {
    piece: usize,
    bytes: Vec<u8>,
}

impl SlowChannel {
    pub fn new(piece: usize) -> Self {
        Self {
            piece,
            bytes: Vec::new(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl SerialTx for SlowChannel {
    type Error = io::Error;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        for piece in data.chunks(self.piece) {
            thread::sleep(Duration::from_millis(1));
            self.bytes.extend_from_slice(piece);
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Fails its first `n` writes, then accepts everything
#[derive(Debug)]
pub struct FailingChannel {
    failures_left: usize,
    accepted: Vec<u8>,
}

impl FailingChannel {
    pub fn new(failures: usize) -> Self {
        Self {
            failures_left: failures,
            accepted: Vec::new(),
        }
    }

    pub fn accepted(&self) -> &[u8] {
        &self.accepted
    }
}

impl SerialTx for FailingChannel {
    type Error = io::Error;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        self.accepted.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serves one bitmap for any path, or fails if empty
#[derive(Debug, Default)]
pub struct MemoryImages {
    bitmap: Option<Bitmap>,
    pub requested: Vec<String>,
}

impl MemoryImages {
    pub fn with(bitmap: Bitmap) -> Self {
        Self {
            bitmap: Some(bitmap),
            requested: Vec::new(),
        }
    }
}

impl ImageSource for MemoryImages {
    type Error = ImageLoadError;

    fn load(&mut self, path: &str) -> Result<Bitmap, ImageLoadError> {
        self.requested.push(path.to_string());
        self.bitmap.clone().ok_or_else(|| ImageLoadError::Open {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })
    }
}
