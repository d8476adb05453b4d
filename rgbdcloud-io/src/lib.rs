//! File formats for rgbdcloud
//!
//! This crate reads and writes image-shaped colored point clouds in the PCD
//! (ASCII and binary) and PTX formats, and the manifest that lists a sequence of
//! written frames.

pub mod fields;
pub mod manifest;
pub mod output;
pub mod pcd;
pub mod ptx;
pub mod registry;
pub mod schema;
pub mod text;

pub use fields::{ExtraFields, FieldValues, PcdScalar};
pub use manifest::SequenceManifest;
pub use output::ScopedOutput;
pub use pcd::{
    decode_pcd, encode_pcd, read_pcd, write_pcd, LabelMaps, PcdCloud, PcdDataFormat, PcdHeader, PcdReadOptions,
    PcdReader, PcdWriteOptions, PcdWriter, PCD_SCAN_ORDER,
};
pub use ptx::{
    read_ptx, write_ptx, PtxCloud, PtxReadOptions, PtxReader, PtxWriteOptions, PtxWriter, DEFAULT_PTX_COLOR,
    PTX_SCAN_ORDER,
};
pub use registry::{
    FormatRegistry, FrameReader, FrameWriter, PcdFrameReader, PcdFrameWriter, PtxFrameReader, PtxFrameWriter,
};
pub use schema::{FieldDef, FieldKind, FieldSchema, FieldType, PADDING_FIELD};

use ndarray::ArrayView3;
use rgbdcloud_core::{ColorGrid, PointGrid, Result};
use std::path::Path;

/// Write a frame, picking the codec from the file extension
pub fn write_frame<P: AsRef<Path>>(points: ArrayView3<f32>, colors: ArrayView3<u8>, path: P) -> Result<()> {
    FormatRegistry::default().write_frame(points, colors, path.as_ref())
}

/// Read a frame, picking the codec from the file extension
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<(PointGrid, ColorGrid)> {
    FormatRegistry::default().read_frame(path.as_ref())
}
