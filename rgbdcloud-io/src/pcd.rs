//! PCD (Point Cloud Data) format support
//!
//! Writes image-shaped clouds as `x y z rgb` records followed by any extra fields,
//! in ASCII or binary mode, and reads back ASCII and binary files with arbitrary
//! field layouts. Binary records are little-endian.

use crate::fields::{ExtraFields, FieldBuffer, FieldValues};
use crate::output::ScopedOutput;
use crate::schema::{FieldDef, FieldSchema, FieldType};
use crate::text::{format_exponent, format_fixed};
use ndarray::{s, Array2, Array3, ArrayView3, Axis};
use rgbdcloud_core::{
    check_grid_shape, pack_rgb_f32, point_grid_dims, unpack_rgb, ColorGrid, Error, PointGrid, Result, RigidTransform,
    ScanOrder,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Record order of PCD bodies
pub const PCD_SCAN_ORDER: ScanOrder = ScanOrder::RowMajor;

/// Label maps carried in `# map: <key> <index>:<label>` comments, keyed by map name
pub type LabelMaps = BTreeMap<String, BTreeMap<u32, String>>;

/// Field names folded into positions, colors and normals when decoding
/// Upper bound on values reserved per field before the body is read
const PREALLOCATED_VALUES: usize = 1 << 20;

const CONSUMED_FIELDS: [&str; 8] = ["x", "y", "z", "rgb", "rgba", "normal_x", "normal_y", "normal_z"];

/// PCD data format variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PcdDataFormat {
    Ascii,
    Binary,
    BinaryCompressed,
}

impl PcdDataFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PcdDataFormat::Ascii => "ascii",
            PcdDataFormat::Binary => "binary",
            PcdDataFormat::BinaryCompressed => "binary_compressed",
        }
    }
}

impl FromStr for PcdDataFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ascii" => Ok(PcdDataFormat::Ascii),
            "binary" => Ok(PcdDataFormat::Binary),
            "binary_compressed" => Ok(PcdDataFormat::BinaryCompressed),
            other => Err(Error::UnsupportedFormat(format!(
                "PCD data format '{}' (expected ascii or binary)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PcdDataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PCD header information
#[derive(Debug, Clone, PartialEq)]
pub struct PcdHeader {
    pub version: String,
    pub schema: FieldSchema,
    pub width: usize,
    pub height: usize,
    pub viewpoint: [f64; 7], // tx, ty, tz, qw, qx, qy, qz
    pub points: usize,
    pub data_format: PcdDataFormat,
}

/// PCD write options
#[derive(Debug, Clone)]
pub struct PcdWriteOptions {
    pub data_format: PcdDataFormat,
    /// Its translation becomes the VIEWPOINT origin; the orientation is always identity
    pub viewpoint: Option<RigidTransform>,
    pub label_maps: LabelMaps,
}

impl Default for PcdWriteOptions {
    fn default() -> Self {
        Self {
            data_format: PcdDataFormat::Binary,
            viewpoint: None,
            label_maps: LabelMaps::new(),
        }
    }
}

impl PcdWriteOptions {
    pub fn ascii() -> Self {
        Self {
            data_format: PcdDataFormat::Ascii,
            ..Default::default()
        }
    }

    pub fn binary() -> Self {
        Self::default()
    }
}

/// PCD read options
#[derive(Debug, Clone)]
pub struct PcdReadOptions {
    /// Color used for every point when the file has neither `rgb` nor `rgba`
    pub default_color: [u8; 3],
}

impl Default for PcdReadOptions {
    fn default() -> Self {
        Self {
            default_color: [128, 128, 128],
        }
    }
}

/// A decoded PCD file
#[derive(Debug, Clone)]
pub struct PcdCloud {
    pub header: PcdHeader,
    /// `HEIGHT × WIDTH × 3` positions, absent when the file has no x/y/z fields
    pub points: Option<PointGrid>,
    pub colors: ColorGrid,
    /// Remaining fields keyed by name; `normal_x/y/z` are merged into `normals`
    pub extra: ExtraFields,
    pub label_maps: LabelMaps,
}

/// Validated layout of a cloud about to be written
struct PcdLayout {
    height: usize,
    width: usize,
    schema: FieldSchema,
}

/// PCD writer for image-shaped clouds
pub struct PcdWriter;

impl PcdWriter {
    /// Write a cloud to `path`; nothing is left on disk if any step fails
    pub fn write<P: AsRef<Path>>(
        path: P,
        points: ArrayView3<f32>,
        colors: ArrayView3<u8>,
        extra: &ExtraFields,
        options: &PcdWriteOptions,
    ) -> Result<()> {
        let layout = Self::validate(points, colors, extra, options)?;
        let mut output = ScopedOutput::create(path)?;
        Self::encode_layout(&mut output, &layout, points, colors, extra, options)?;
        output.commit()
    }

    /// Encode a cloud to any writer
    pub fn encode<W: Write>(
        writer: &mut W,
        points: ArrayView3<f32>,
        colors: ArrayView3<u8>,
        extra: &ExtraFields,
        options: &PcdWriteOptions,
    ) -> Result<()> {
        let layout = Self::validate(points, colors, extra, options)?;
        Self::encode_layout(writer, &layout, points, colors, extra, options)
    }

    fn validate(
        points: ArrayView3<f32>,
        colors: ArrayView3<u8>,
        extra: &ExtraFields,
        options: &PcdWriteOptions,
    ) -> Result<PcdLayout> {
        if options.data_format == PcdDataFormat::BinaryCompressed {
            return Err(Error::UnsupportedFormat(
                "binary_compressed PCD output is not supported".to_string(),
            ));
        }

        let (height, width) = point_grid_dims("points", points.shape())?;
        check_grid_shape("colors", colors.shape(), height, width, 3)?;

        let mut schema = FieldSchema::xyz_rgb();
        for (name, values) in extra.iter() {
            check_grid_shape(name, values.shape(), height, width, values.count())?;
            schema.push(FieldDef::new(name, values.field_type(), values.count())?)?;
        }

        for (key, labels) in &options.label_maps {
            if key.is_empty() || key.chars().any(char::is_whitespace) {
                return Err(Error::InvalidFieldName(format!("label map key '{}'", key)));
            }
            if labels.values().any(|label| label.contains('\n')) {
                return Err(Error::InvalidData(format!("label map '{}' has a multi-line label", key)));
            }
        }

        Ok(PcdLayout { height, width, schema })
    }

    fn encode_layout<W: Write>(
        writer: &mut W,
        layout: &PcdLayout,
        points: ArrayView3<f32>,
        colors: ArrayView3<u8>,
        extra: &ExtraFields,
        options: &PcdWriteOptions,
    ) -> Result<()> {
        let translation = options
            .viewpoint
            .map(|t| t.translation)
            .unwrap_or_else(nalgebra::Vector3::zeros);
        let header = PcdHeader {
            version: "0.7".to_string(),
            schema: layout.schema.clone(),
            width: layout.width,
            height: layout.height,
            viewpoint: [translation.x, translation.y, translation.z, 1.0, 0.0, 0.0, 0.0],
            points: layout.width * layout.height,
            data_format: options.data_format,
        };
        Self::write_header(writer, &header, &options.label_maps)?;

        // The rgb field is the packed color bits, whatever the data format
        let packed = Array2::from_shape_fn((layout.height, layout.width), |(i, j)| {
            pack_rgb_f32([colors[[i, j, 0]], colors[[i, j, 1]], colors[[i, j, 2]]])
        });

        match options.data_format {
            PcdDataFormat::Ascii => Self::write_ascii_data(writer, layout, points, &packed, extra)?,
            PcdDataFormat::Binary => Self::write_binary_data(writer, layout, points, &packed, extra)?,
            PcdDataFormat::BinaryCompressed => {
                return Err(Error::UnsupportedFormat(
                    "binary_compressed PCD output is not supported".to_string(),
                ))
            }
        }
        writer.flush()?;

        log::debug!(
            "encoded PCD {}x{} ({} fields, {})",
            layout.width,
            layout.height,
            layout.schema.len(),
            options.data_format
        );
        Ok(())
    }

    /// Write PCD header
    fn write_header<W: Write>(writer: &mut W, header: &PcdHeader, label_maps: &LabelMaps) -> Result<()> {
        writeln!(writer, "# .PCD v{} - Point Cloud Data file format", header.version)?;
        for (key, labels) in label_maps {
            for (index, label) in labels {
                writeln!(writer, "# map: {} {}:{}", key, index, label)?;
            }
        }
        writeln!(writer, "VERSION {}", header.version)?;

        let fields = header.schema.fields();
        writeln!(writer, "FIELDS {}", join_fields(fields, |d| d.name.clone()))?;
        writeln!(writer, "SIZE {}", join_fields(fields, |d| d.field_type.size().to_string()))?;
        writeln!(writer, "TYPE {}", join_fields(fields, |d| d.field_type.kind().to_string()))?;
        writeln!(writer, "COUNT {}", join_fields(fields, |d| d.count.to_string()))?;

        writeln!(writer, "WIDTH {}", header.width)?;
        writeln!(writer, "HEIGHT {}", header.height)?;
        let viewpoint: Vec<String> = header.viewpoint.iter().map(|v| format!("{:.5}", v)).collect();
        writeln!(writer, "VIEWPOINT {}", viewpoint.join(" "))?;
        writeln!(writer, "POINTS {}", header.points)?;
        writeln!(writer, "DATA {}", header.data_format)?;
        Ok(())
    }

    /// Write ASCII format data: `%.7f %.7f %.7f %.8e [extra...]` per point
    fn write_ascii_data<W: Write>(
        writer: &mut W,
        layout: &PcdLayout,
        points: ArrayView3<f32>,
        packed: &Array2<f32>,
        extra: &ExtraFields,
    ) -> Result<()> {
        let mut line = String::new();
        for (i, j) in PCD_SCAN_ORDER.indices(layout.height, layout.width) {
            line.clear();
            let _ = write!(
                line,
                "{} {} {} {}",
                format_fixed(points[[i, j, 0]] as f64, 7),
                format_fixed(points[[i, j, 1]] as f64, 7),
                format_fixed(points[[i, j, 2]] as f64, 7),
                format_exponent(packed[[i, j]] as f64, 8)
            );
            for (_, values) in extra.iter() {
                values.write_ascii(i, j, &mut line);
            }
            line.push('\n');
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    /// Write binary format data: fixed-size records, no separators
    fn write_binary_data<W: Write>(
        writer: &mut W,
        layout: &PcdLayout,
        points: ArrayView3<f32>,
        packed: &Array2<f32>,
        extra: &ExtraFields,
    ) -> Result<()> {
        let mut record = Vec::with_capacity(layout.schema.record_size());
        for (i, j) in PCD_SCAN_ORDER.indices(layout.height, layout.width) {
            record.clear();
            for c in 0..3 {
                record.extend_from_slice(&points[[i, j, c]].to_le_bytes());
            }
            record.extend_from_slice(&packed[[i, j]].to_le_bytes());
            for (_, values) in extra.iter() {
                values.write_le(i, j, &mut record);
            }
            debug_assert_eq!(record.len(), layout.schema.record_size());
            writer.write_all(&record)?;
        }
        Ok(())
    }
}

/// PCD reader for ASCII and binary files
pub struct PcdReader;

impl PcdReader {
    pub fn read<P: AsRef<Path>>(path: P, options: &PcdReadOptions) -> Result<PcdCloud> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::decode(&mut reader, options)
    }

    pub fn decode<R: BufRead>(reader: &mut R, options: &PcdReadOptions) -> Result<PcdCloud> {
        let (header, label_maps) = Self::read_header(reader)?;
        let buffers = match header.data_format {
            PcdDataFormat::Ascii => Self::read_ascii_data(reader, &header)?,
            PcdDataFormat::Binary => Self::read_binary_data(reader, &header)?,
            PcdDataFormat::BinaryCompressed => {
                return Err(Error::UnsupportedFormat(
                    "binary_compressed PCD data is not supported".to_string(),
                ))
            }
        };

        let mut fields = ExtraFields::new();
        for (def, buffer) in header.schema.iter().zip(buffers) {
            if def.is_padding() {
                continue;
            }
            fields.insert(def.name.clone(), buffer.into_values(header.height, header.width, def.count)?);
        }

        let points = Self::take_points(&fields, header.height, header.width);
        let colors = Self::take_colors(&fields, header.height, header.width, options.default_color)?;
        if let Some(normals) = Self::take_normals(&fields, header.height, header.width) {
            fields.insert("normals", normals);
        }
        for name in CONSUMED_FIELDS {
            fields.remove(name);
        }

        log::debug!(
            "decoded PCD {}x{} ({}, {} extra fields)",
            header.width,
            header.height,
            header.data_format,
            fields.len()
        );

        Ok(PcdCloud {
            header,
            points,
            colors,
            extra: fields,
            label_maps,
        })
    }

    /// Read header lines up to and including `DATA`
    fn read_header<R: BufRead>(reader: &mut R) -> Result<(PcdHeader, LabelMaps)> {
        let mut version = None;
        let mut names: Option<Vec<String>> = None;
        let mut sizes: Option<Vec<String>> = None;
        let mut types: Option<Vec<String>> = None;
        let mut counts: Option<Vec<String>> = None;
        let mut width = None;
        let mut height = None;
        let mut viewpoint = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut points = None;
        let mut label_maps = LabelMaps::new();

        let mut raw = Vec::new();
        let data_format = loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                return Err(Error::malformed_header("DATA", "end of file before the DATA line"));
            }
            let line = std::str::from_utf8(&raw)
                .map_err(|_| Error::malformed_header("header", "header line is not valid UTF-8"))?
                .trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                Self::parse_comment(line, &mut label_maps)?;
                continue;
            }

            let mut parts = line.split_whitespace();
            let key = parts.next().unwrap_or_default();
            let values: Vec<String> = parts.map(str::to_string).collect();
            match key {
                "DATA" => {
                    let mode = values
                        .first()
                        .ok_or_else(|| Error::malformed_header("DATA", "missing data format"))?;
                    match mode.parse::<PcdDataFormat>()? {
                        PcdDataFormat::BinaryCompressed => {
                            return Err(Error::UnsupportedFormat(
                                "binary_compressed PCD data is not supported".to_string(),
                            ))
                        }
                        format => break format,
                    }
                }
                "VERSION" => version = values.first().cloned(),
                "FIELDS" => names = Some(values),
                "SIZE" => sizes = Some(values),
                "TYPE" => types = Some(values),
                "COUNT" => counts = Some(values),
                "WIDTH" => width = Some(parse_single("WIDTH", &values)?),
                "HEIGHT" => height = Some(parse_single("HEIGHT", &values)?),
                "POINTS" => points = Some(parse_single("POINTS", &values)?),
                "VIEWPOINT" => {
                    if values.len() != 7 {
                        return Err(Error::malformed_header(
                            "VIEWPOINT",
                            format!("expected 7 values, found {}", values.len()),
                        ));
                    }
                    for (slot, value) in viewpoint.iter_mut().zip(&values) {
                        *slot = value
                            .parse()
                            .map_err(|_| Error::malformed_header("VIEWPOINT", format!("invalid value '{}'", value)))?;
                    }
                }
                _ => log::debug!("ignoring unknown PCD header line '{}'", line),
            }
        };

        let require = |key: &str, v: Option<Vec<String>>| v.ok_or_else(|| Error::malformed_header(key, "missing"));
        let names = require("FIELDS", names)?;
        let sizes = require("SIZE", sizes)?;
        let types = require("TYPE", types)?;
        let counts = require("COUNT", counts)?;
        let width = width.ok_or_else(|| Error::malformed_header("WIDTH", "missing"))?;
        let height = height.ok_or_else(|| Error::malformed_header("HEIGHT", "missing"))?;
        let points = points.ok_or_else(|| Error::malformed_header("POINTS", "missing"))?;

        for (key, list) in [("SIZE", &sizes), ("TYPE", &types), ("COUNT", &counts)] {
            if list.len() != names.len() {
                return Err(Error::malformed_header(
                    key,
                    format!("{} entries for {} FIELDS", list.len(), names.len()),
                ));
            }
        }
        let cells = width.checked_mul(height).ok_or_else(|| {
            Error::malformed_header("POINTS", format!("WIDTH {} * HEIGHT {} overflows", width, height))
        })?;
        if points != cells {
            return Err(Error::malformed_header(
                "POINTS",
                format!("{} does not match WIDTH * HEIGHT = {}", points, cells),
            ));
        }

        let mut schema = FieldSchema::default();
        let mut record_size = 0usize;
        for (((name, size), kind), count) in names.iter().zip(&sizes).zip(&types).zip(&counts) {
            let size: usize = size
                .parse()
                .map_err(|_| Error::malformed_header("SIZE", format!("invalid size '{}' for field '{}'", size, name)))?;
            let count: usize = count
                .parse()
                .map_err(|_| Error::malformed_header("COUNT", format!("invalid count '{}' for field '{}'", count, name)))?;
            if count == 0 {
                return Err(Error::malformed_header("COUNT", format!("field '{}' has a COUNT of 0", name)));
            }
            let field_type = FieldType::from_header(name, kind, size)?;
            record_size = size
                .checked_mul(count)
                .and_then(|bytes| record_size.checked_add(bytes))
                .ok_or_else(|| Error::malformed_header("COUNT", format!("record size overflows at field '{}'", name)))?;
            let def = FieldDef::new(name.clone(), field_type, count)?;
            schema
                .push(def)
                .map_err(|_| Error::malformed_header("FIELDS", format!("field '{}' appears more than once", name)))?;
        }

        let header = PcdHeader {
            version: version.unwrap_or_else(|| "0.7".to_string()),
            schema,
            width,
            height,
            viewpoint,
            points,
            data_format,
        };
        Ok((header, label_maps))
    }

    /// Parse `# map: <key> <index>:<label>`; other comments are ignored
    fn parse_comment(line: &str, label_maps: &mut LabelMaps) -> Result<()> {
        let tokens: Vec<&str> = line.trim_start_matches('#').split_whitespace().collect();
        if tokens.first() != Some(&"map:") {
            return Ok(());
        }
        let malformed = || Error::malformed_header("# map:", format!("expected '<key> <index>:<label>', found '{}'", line));
        if tokens.len() < 3 {
            return Err(malformed());
        }
        let entry = tokens[2..].join(" ");
        let (index, label) = entry.split_once(':').ok_or_else(malformed)?;
        let index: u32 = index.parse().map_err(|_| malformed())?;
        label_maps
            .entry(tokens[1].to_string())
            .or_default()
            .insert(index, label.to_string());
        Ok(())
    }

    /// Read whitespace-separated values, slicing each record by field counts in FIELDS order
    fn read_ascii_data<R: BufRead>(reader: &mut R, header: &PcdHeader) -> Result<Vec<FieldBuffer>> {
        let mut body = String::new();
        reader
            .read_to_string(&mut body)
            .map_err(|e| Error::InvalidData(format!("ASCII PCD body: {}", e)))?;

        let per_record = header.schema.values_per_record();
        let mut buffers = Self::new_buffers(header);
        let mut tokens = body.split_whitespace();
        for record in 0..header.points {
            for (def, buffer) in header.schema.iter().zip(buffers.iter_mut()) {
                for _ in 0..def.count {
                    let token = tokens.next().ok_or_else(|| {
                        Error::InvalidData(format!(
                            "ASCII PCD body ends in record {} of {} ({} values per record)",
                            record, header.points, per_record
                        ))
                    })?;
                    buffer.push_token(&def.name, token)?;
                }
            }
        }
        if let Some(extra) = tokens.next() {
            return Err(Error::InvalidData(format!(
                "ASCII PCD body has values after {} records, starting with '{}'",
                header.points, extra
            )));
        }
        Ok(buffers)
    }

    /// Read `POINTS` fixed-size records
    fn read_binary_data<R: Read>(reader: &mut R, header: &PcdHeader) -> Result<Vec<FieldBuffer>> {
        let record_size = header.schema.record_size();
        let mut buffers = Self::new_buffers(header);
        let mut record = Vec::new();
        for index in 0..header.points {
            // Grows with the bytes actually present, whatever the header claims
            record.clear();
            let read = Read::take(&mut *reader, record_size as u64).read_to_end(&mut record)?;
            if read < record_size {
                return Err(Error::InvalidData(format!(
                    "binary PCD body holds {} of {} records of {} bytes",
                    index, header.points, record_size
                )));
            }
            let mut offset = 0;
            for (def, buffer) in header.schema.iter().zip(buffers.iter_mut()) {
                let len = def.byte_size();
                buffer.push_le(&record[offset..offset + len]);
                offset += len;
            }
        }
        Ok(buffers)
    }

    fn new_buffers(header: &PcdHeader) -> Vec<FieldBuffer> {
        header
            .schema
            .iter()
            .map(|def| {
                let capacity = header.points.saturating_mul(def.count).min(PREALLOCATED_VALUES);
                FieldBuffer::with_capacity(def.field_type, capacity)
            })
            .collect()
    }

    fn take_points(fields: &ExtraFields, height: usize, width: usize) -> Option<PointGrid> {
        let x = fields.get("x")?.to_f32();
        let y = fields.get("y")?.to_f32();
        let z = fields.get("z")?.to_f32();
        let mut points = PointGrid::zeros((height, width, 3));
        for (c, axis) in [x, y, z].iter().enumerate() {
            points.slice_mut(s![.., .., c]).assign(&axis.index_axis(Axis(2), 0));
        }
        Some(points)
    }

    fn take_colors(fields: &ExtraFields, height: usize, width: usize, default_color: [u8; 3]) -> Result<ColorGrid> {
        let packed = ["rgb", "rgba"]
            .into_iter()
            .find_map(|name| fields.get(name).map(|values| (name, values)));
        let Some((name, values)) = packed else {
            return Ok(Array3::from_shape_fn((height, width, 3), |(_, _, c)| default_color[c]));
        };

        let bits: Array2<u32> = match values {
            FieldValues::F32(v) => v.index_axis(Axis(2), 0).mapv(f32::to_bits),
            FieldValues::U32(v) => v.index_axis(Axis(2), 0).to_owned(),
            FieldValues::I32(v) => v.index_axis(Axis(2), 0).mapv(|x| x as u32),
            other => {
                let (kind, size) = other.field_type().describe();
                return Err(Error::UnsupportedType {
                    field: name.to_string(),
                    kind: kind.to_string(),
                    width: size,
                });
            }
        };
        Ok(Array3::from_shape_fn((height, width, 3), |(i, j, c)| unpack_rgb(bits[[i, j]])[c]))
    }

    fn take_normals(fields: &ExtraFields, height: usize, width: usize) -> Option<FieldValues> {
        let nx = fields.get("normal_x")?.to_f32();
        let ny = fields.get("normal_y")?.to_f32();
        let nz = fields.get("normal_z")?.to_f32();
        let mut normals = Array3::<f32>::zeros((height, width, 3));
        for (c, axis) in [nx, ny, nz].iter().enumerate() {
            normals.slice_mut(s![.., .., c]).assign(&axis.index_axis(Axis(2), 0));
        }
        Some(normals.into())
    }
}

/// Write a PCD file, see [`PcdWriter::write`]
pub fn write_pcd<P: AsRef<Path>>(
    path: P,
    points: ArrayView3<f32>,
    colors: ArrayView3<u8>,
    extra: &ExtraFields,
    options: &PcdWriteOptions,
) -> Result<()> {
    PcdWriter::write(path, points, colors, extra, options)
}

pub fn read_pcd<P: AsRef<Path>>(path: P, options: &PcdReadOptions) -> Result<PcdCloud> {
    PcdReader::read(path, options)
}

pub fn encode_pcd<W: Write>(
    writer: &mut W,
    points: ArrayView3<f32>,
    colors: ArrayView3<u8>,
    extra: &ExtraFields,
    options: &PcdWriteOptions,
) -> Result<()> {
    PcdWriter::encode(writer, points, colors, extra, options)
}

pub fn decode_pcd<R: BufRead>(reader: &mut R, options: &PcdReadOptions) -> Result<PcdCloud> {
    PcdReader::decode(reader, options)
}

fn parse_single(key: &str, values: &[String]) -> Result<usize> {
    let value = values
        .first()
        .ok_or_else(|| Error::malformed_header(key, "missing value"))?;
    value
        .parse()
        .map_err(|_| Error::malformed_header(key, format!("invalid value '{}'", value)))
}

fn join_fields(fields: &[FieldDef], f: impl Fn(&FieldDef) -> String) -> String {
    fields.iter().map(f).collect::<Vec<_>>().join(" ")
}
