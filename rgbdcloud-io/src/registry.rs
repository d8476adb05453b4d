//! Extension-keyed registry of frame writers and readers
//!
//! Lets the sequence pipeline write and read any supported format without
//! knowing the codec behind a file extension.

use crate::fields::ExtraFields;
use crate::pcd::{PcdDataFormat, PcdReadOptions, PcdReader, PcdWriteOptions, PcdWriter};
use crate::ptx::{PtxReadOptions, PtxReader, PtxWriteOptions, PtxWriter};
use ndarray::ArrayView3;
use rgbdcloud_core::{ColorGrid, Error, PointGrid, Result, RigidTransform};
use std::collections::HashMap;
use std::path::Path;

/// Writes one image-shaped frame to a file
pub trait FrameWriter: Send + Sync {
    /// Write `points` (H×W×3) and `colors` (H×W×3) to the given path
    fn write_frame(&self, points: ArrayView3<f32>, colors: ArrayView3<u8>, path: &Path) -> Result<()>;

    /// Get the format name this writer handles
    fn format_name(&self) -> &'static str;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;
}

/// Reads one image-shaped frame back from a file
pub trait FrameReader: Send + Sync {
    fn read_frame(&self, path: &Path) -> Result<(PointGrid, ColorGrid)>;

    fn format_name(&self) -> &'static str;
}

/// PCD frames in the configured data format
#[derive(Debug, Clone)]
pub struct PcdFrameWriter {
    pub data_format: PcdDataFormat,
}

impl Default for PcdFrameWriter {
    fn default() -> Self {
        Self {
            data_format: PcdDataFormat::Binary,
        }
    }
}

impl FrameWriter for PcdFrameWriter {
    fn write_frame(&self, points: ArrayView3<f32>, colors: ArrayView3<u8>, path: &Path) -> Result<()> {
        let options = PcdWriteOptions {
            data_format: self.data_format,
            ..PcdWriteOptions::default()
        };
        PcdWriter::write(path, points, colors, &ExtraFields::new(), &options)
    }

    fn format_name(&self) -> &'static str {
        "pcd"
    }

    fn extension(&self) -> &'static str {
        "pcd"
    }
}

/// PTX frames seen from a fixed scanner pose
#[derive(Debug, Clone, Default)]
pub struct PtxFrameWriter {
    pub transform: RigidTransform,
}

impl FrameWriter for PtxFrameWriter {
    fn write_frame(&self, points: ArrayView3<f32>, colors: ArrayView3<u8>, path: &Path) -> Result<()> {
        let options = PtxWriteOptions {
            transform: self.transform,
        };
        PtxWriter::write(path, points, Some(colors), &options)
    }

    fn format_name(&self) -> &'static str {
        "ptx"
    }

    fn extension(&self) -> &'static str {
        "ptx"
    }
}

#[derive(Debug, Clone, Default)]
pub struct PcdFrameReader {
    pub options: PcdReadOptions,
}

impl FrameReader for PcdFrameReader {
    fn read_frame(&self, path: &Path) -> Result<(PointGrid, ColorGrid)> {
        let cloud = PcdReader::read(path, &self.options)?;
        let points = cloud
            .points
            .ok_or_else(|| Error::InvalidData(format!("{:?} has no x, y, z fields", path)))?;
        Ok((points, cloud.colors))
    }

    fn format_name(&self) -> &'static str {
        "pcd"
    }
}

#[derive(Debug, Clone, Default)]
pub struct PtxFrameReader {
    pub options: PtxReadOptions,
}

impl FrameReader for PtxFrameReader {
    fn read_frame(&self, path: &Path) -> Result<(PointGrid, ColorGrid)> {
        let cloud = PtxReader::read(path, &self.options)?;
        Ok((cloud.points, cloud.colors))
    }

    fn format_name(&self) -> &'static str {
        "ptx"
    }
}

/// Registry of frame codecs keyed by lowercase file extension
pub struct FormatRegistry {
    writers: HashMap<String, Box<dyn FrameWriter>>,
    readers: HashMap<String, Box<dyn FrameReader>>,
}

impl FormatRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            writers: HashMap::new(),
            readers: HashMap::new(),
        }
    }

    /// Register a writer under its own extension, replacing any previous one
    pub fn register_writer(&mut self, writer: Box<dyn FrameWriter>) {
        self.writers.insert(writer.extension().to_lowercase(), writer);
    }

    pub fn register_reader(&mut self, extension: &str, reader: Box<dyn FrameReader>) {
        self.readers.insert(extension.to_lowercase(), reader);
    }

    pub fn writer(&self, extension: &str) -> Option<&dyn FrameWriter> {
        self.writers.get(&extension.to_lowercase()).map(|w| w.as_ref())
    }

    pub fn reader(&self, extension: &str) -> Option<&dyn FrameReader> {
        self.readers.get(&extension.to_lowercase()).map(|r| r.as_ref())
    }

    /// Write a frame with the writer registered for the path's extension
    pub fn write_frame(&self, points: ArrayView3<f32>, colors: ArrayView3<u8>, path: &Path) -> Result<()> {
        let extension = extension_of(path)?;
        let writer = self.writer(extension).ok_or_else(|| {
            Error::UnsupportedFormat(format!("no frame writer registered for '.{}'", extension))
        })?;
        writer.write_frame(points, colors, path)
    }

    /// Read a frame with the reader registered for the path's extension
    pub fn read_frame(&self, path: &Path) -> Result<(PointGrid, ColorGrid)> {
        let extension = extension_of(path)?;
        let reader = self.reader(extension).ok_or_else(|| {
            Error::UnsupportedFormat(format!("no frame reader registered for '.{}'", extension))
        })?;
        reader.read_frame(path)
    }

    /// Sorted list of extensions with a registered writer
    pub fn writable_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.writers.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for FormatRegistry {
    /// PCD (binary) and PTX, both directions
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_writer(Box::new(PcdFrameWriter::default()));
        registry.register_writer(Box::new(PtxFrameWriter::default()));
        registry.register_reader("pcd", Box::new(PcdFrameReader::default()));
        registry.register_reader("ptx", Box::new(PtxFrameReader::default()));
        registry
    }
}

fn extension_of(path: &Path) -> Result<&str> {
    path.extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::UnsupportedFormat(format!("{:?} has no file extension", path)))
}
