//! PTX (Leica scanner) format support
//!
//! A PTX file starts with the column count and row count, followed by the scanner
//! position, the three scanner axes and a 4×4 transform block. Every point then
//! takes one line `x y z intensity r g b`, with positions in the scanner frame and
//! points listed column by column from the bottom row of the image up.

use crate::output::ScopedOutput;
use crate::text::format_fixed;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use ndarray::{Array2, ArrayView3};
use rgbdcloud_core::{
    check_grid_shape, point_grid_dims, ColorGrid, Error, PointGrid, Result, RigidTransform, ScanOrder,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::SplitWhitespace;

/// Record order of PTX bodies
pub const PTX_SCAN_ORDER: ScanOrder = ScanOrder::ColumnMajorFlipped;

/// Color written when the caller has none
pub const DEFAULT_PTX_COLOR: [u8; 3] = [127, 127, 127];

const DECIMALS: usize = 5;

/// Seven single-character values and their separators
const MIN_POINT_BYTES: usize = 13;

/// PTX write options
#[derive(Debug, Clone, Default)]
pub struct PtxWriteOptions {
    /// Scanner pose; points are written as `R · (p − t)`
    pub transform: RigidTransform,
}

/// PTX read options
#[derive(Debug, Clone)]
pub struct PtxReadOptions {
    /// Map points from the scanner frame back to world coordinates
    pub transform_points: bool,
}

impl Default for PtxReadOptions {
    fn default() -> Self {
        Self { transform_points: true }
    }
}

/// A decoded PTX file
#[derive(Debug, Clone)]
pub struct PtxCloud {
    /// `rows × cols × 3` positions, in world or scanner frame per [`PtxReadOptions`]
    pub points: PointGrid,
    pub colors: ColorGrid,
    pub intensities: Array2<f32>,
    pub transform: RigidTransform,
    /// The 4×4 block as found in the file
    pub block: Matrix4<f64>,
}

/// PTX writer
pub struct PtxWriter;

impl PtxWriter {
    /// Write a cloud to `path`; nothing is left on disk if any step fails
    pub fn write<P: AsRef<Path>>(
        path: P,
        points: ArrayView3<f32>,
        colors: Option<ArrayView3<u8>>,
        options: &PtxWriteOptions,
    ) -> Result<()> {
        Self::validate(points, colors)?;
        let mut output = ScopedOutput::create(path)?;
        Self::encode_unchecked(&mut output, points, colors, options)?;
        output.commit()
    }

    pub fn encode<W: Write>(
        writer: &mut W,
        points: ArrayView3<f32>,
        colors: Option<ArrayView3<u8>>,
        options: &PtxWriteOptions,
    ) -> Result<()> {
        Self::validate(points, colors)?;
        Self::encode_unchecked(writer, points, colors, options)
    }

    fn validate(points: ArrayView3<f32>, colors: Option<ArrayView3<u8>>) -> Result<(usize, usize)> {
        let (height, width) = point_grid_dims("points", points.shape())?;
        if let Some(colors) = colors {
            check_grid_shape("colors", colors.shape(), height, width, 3)?;
        }
        Ok((height, width))
    }

    fn encode_unchecked<W: Write>(
        writer: &mut W,
        points: ArrayView3<f32>,
        colors: Option<ArrayView3<u8>>,
        options: &PtxWriteOptions,
    ) -> Result<()> {
        let (height, width) = (points.shape()[0], points.shape()[1]);
        let transform = &options.transform;

        writeln!(writer, "{}", width)?;
        writeln!(writer, "{}", height)?;
        writeln!(writer, "{}", format_row(transform.translation.iter()))?;
        let axes = transform.rotation.transpose();
        for r in 0..3 {
            writeln!(writer, "{}", format_row(axes.row(r).iter()))?;
        }
        let block = transform.ptx_block();
        for r in 0..4 {
            writeln!(writer, "{}", format_row(block.row(r).iter()))?;
        }

        for (i, j) in PTX_SCAN_ORDER.indices(height, width) {
            let world = Point3::new(
                points[[i, j, 0]] as f64,
                points[[i, j, 1]] as f64,
                points[[i, j, 2]] as f64,
            );
            let q = transform.to_scanner_frame(&world);
            let color = match colors {
                Some(colors) => [colors[[i, j, 0]], colors[[i, j, 1]], colors[[i, j, 2]]],
                None => DEFAULT_PTX_COLOR,
            };
            writeln!(
                writer,
                "{} {} {} 1 {} {} {}",
                format_fixed(q.x, DECIMALS),
                format_fixed(q.y, DECIMALS),
                format_fixed(q.z, DECIMALS),
                color[0],
                color[1],
                color[2]
            )?;
        }
        writer.flush()?;

        log::debug!("encoded PTX {}x{}", width, height);
        Ok(())
    }
}

/// PTX reader
pub struct PtxReader;

impl PtxReader {
    pub fn read<P: AsRef<Path>>(path: P, options: &PtxReadOptions) -> Result<PtxCloud> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::decode(&mut reader, options)
    }

    pub fn decode<R: BufRead>(reader: &mut R, options: &PtxReadOptions) -> Result<PtxCloud> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::InvalidData(format!("PTX file: {}", e)))?;
        let mut tokens = text.split_whitespace();

        let width: usize = header_value(&mut tokens, "columns")?;
        let height: usize = header_value(&mut tokens, "rows")?;
        let mut translation = Vector3::<f64>::zeros();
        for v in translation.iter_mut() {
            *v = header_value(&mut tokens, "scanner position")?;
        }
        // The file lists the scanner axes, i.e. the rows of Rᵀ
        let mut axes = Matrix3::<f64>::zeros();
        for r in 0..3 {
            for c in 0..3 {
                axes[(r, c)] = header_value(&mut tokens, "scanner axes")?;
            }
        }
        let mut block = Matrix4::<f64>::zeros();
        for r in 0..4 {
            for c in 0..4 {
                block[(r, c)] = header_value(&mut tokens, "transform block")?;
            }
        }
        let transform = RigidTransform::new(axes.transpose(), translation);

        let total = width
            .checked_mul(height)
            .ok_or_else(|| Error::malformed_header("columns", format!("{} x {} points overflow", width, height)))?;
        if total.saturating_mul(MIN_POINT_BYTES) > text.len() {
            return Err(Error::InvalidData(format!(
                "PTX file of {} bytes is too short for {} x {} points",
                text.len(),
                width,
                height
            )));
        }
        let mut points = PointGrid::zeros((height, width, 3));
        let mut colors = ColorGrid::zeros((height, width, 3));
        let mut intensities = Array2::<f32>::zeros((height, width));
        for (k, (i, j)) in PTX_SCAN_ORDER.indices(height, width).enumerate() {
            let mut xyz = [0.0f64; 3];
            for v in xyz.iter_mut() {
                *v = body_value(&mut tokens, k, total)?;
            }
            let intensity: f32 = body_value(&mut tokens, k, total)?;
            let mut rgb = [0u8; 3];
            for v in rgb.iter_mut() {
                let value: f64 = body_value(&mut tokens, k, total)?;
                if !(0.0..256.0).contains(&value) {
                    return Err(Error::InvalidData(format!(
                        "PTX point {} has color component {} outside 0..255",
                        k, value
                    )));
                }
                *v = value as u8;
            }

            let q = Point3::from(xyz);
            let p = if options.transform_points {
                transform.from_scanner_frame(&q)
            } else {
                q
            };
            for c in 0..3 {
                points[[i, j, c]] = p[c] as f32;
                colors[[i, j, c]] = rgb[c];
            }
            intensities[[i, j]] = intensity;
        }
        if let Some(extra) = tokens.next() {
            return Err(Error::InvalidData(format!(
                "PTX file has values after {} points, starting with '{}'",
                total, extra
            )));
        }

        log::debug!("decoded PTX {}x{}", width, height);
        Ok(PtxCloud {
            points,
            colors,
            intensities,
            transform,
            block,
        })
    }
}

/// Write a PTX file, see [`PtxWriter::write`]
pub fn write_ptx<P: AsRef<Path>>(
    path: P,
    points: ArrayView3<f32>,
    colors: Option<ArrayView3<u8>>,
    options: &PtxWriteOptions,
) -> Result<()> {
    PtxWriter::write(path, points, colors, options)
}

pub fn read_ptx<P: AsRef<Path>>(path: P, options: &PtxReadOptions) -> Result<PtxCloud> {
    PtxReader::read(path, options)
}

fn format_row<'a>(values: impl Iterator<Item = &'a f64>) -> String {
    values
        .map(|v| format_fixed(*v, DECIMALS))
        .collect::<Vec<_>>()
        .join(" ")
}

fn header_value<T: std::str::FromStr>(tokens: &mut SplitWhitespace<'_>, what: &str) -> Result<T> {
    let token = tokens
        .next()
        .ok_or_else(|| Error::malformed_header(what, "unexpected end of file"))?;
    token
        .parse()
        .map_err(|_| Error::malformed_header(what, format!("invalid value '{}'", token)))
}

fn body_value<T: std::str::FromStr>(tokens: &mut SplitWhitespace<'_>, index: usize, total: usize) -> Result<T> {
    let token = tokens.next().ok_or_else(|| {
        Error::InvalidData(format!("PTX body ends in point {} of {}", index, total))
    })?;
    token
        .parse()
        .map_err(|_| Error::InvalidData(format!("invalid value '{}' in PTX point {}", token, index)))
}
