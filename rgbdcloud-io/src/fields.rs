//! Typed per-point fields carried alongside positions and colors

use crate::schema::FieldType;
use ndarray::{Array2, Array3, Axis};
use rgbdcloud_core::{Error, Result};
use std::fmt::Display;

/// Scalar types that can be stored in a PCD field
pub trait PcdScalar: Copy + Default + PartialEq + Display + Send + Sync + 'static {
    const FIELD_TYPE: FieldType;

    /// Append the little-endian bytes of this value
    fn write_le(self, out: &mut Vec<u8>);

    /// Read a value from exactly `FIELD_TYPE.size()` little-endian bytes
    fn read_le(bytes: &[u8]) -> Self;

    /// Parse an ASCII token
    fn parse_token(token: &str) -> Option<Self>;

    fn to_f32(self) -> f32;

    fn wrap(values: Array3<Self>) -> FieldValues;

    fn unwrap_ref(values: &FieldValues) -> Option<&Array3<Self>>;
}

macro_rules! impl_pcd_scalar {
    ($t:ty, $variant:ident, $width:expr, $parse:expr) => {
        impl PcdScalar for $t {
            const FIELD_TYPE: FieldType = FieldType::$variant;

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $width];
                buf.copy_from_slice(&bytes[..$width]);
                <$t>::from_le_bytes(buf)
            }

            fn parse_token(token: &str) -> Option<Self> {
                ($parse)(token)
            }

            fn to_f32(self) -> f32 {
                self as f32
            }

            fn wrap(values: Array3<Self>) -> FieldValues {
                FieldValues::$variant(values)
            }

            fn unwrap_ref(values: &FieldValues) -> Option<&Array3<Self>> {
                match values {
                    FieldValues::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

/// Integers written by tools that format everything as floats (`3.0`) are accepted
/// when the value is integral and in range.
macro_rules! parse_integer {
    ($t:ty) => {
        |token: &str| {
            token.parse::<$t>().ok().or_else(|| {
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.fract() == 0.0 && *v >= <$t>::MIN as f64 && *v <= <$t>::MAX as f64)
                    .map(|v| v as $t)
            })
        }
    };
}

impl_pcd_scalar!(f32, F32, 4, |token: &str| token.parse::<f32>().ok());
impl_pcd_scalar!(u32, U32, 4, parse_integer!(u32));
impl_pcd_scalar!(i32, I32, 4, parse_integer!(i32));
impl_pcd_scalar!(u8, U8, 1, parse_integer!(u8));
impl_pcd_scalar!(u16, U16, 2, parse_integer!(u16));

/// Values of one field over a grid, shaped `height × width × count`
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    F32(Array3<f32>),
    U32(Array3<u32>),
    I32(Array3<i32>),
    U8(Array3<u8>),
    U16(Array3<u16>),
}

macro_rules! with_values {
    ($values:expr, $v:ident => $body:expr) => {
        match $values {
            FieldValues::F32($v) => $body,
            FieldValues::U32($v) => $body,
            FieldValues::I32($v) => $body,
            FieldValues::U8($v) => $body,
            FieldValues::U16($v) => $body,
        }
    };
}

impl FieldValues {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::F32(_) => FieldType::F32,
            FieldValues::U32(_) => FieldType::U32,
            FieldValues::I32(_) => FieldType::I32,
            FieldValues::U8(_) => FieldType::U8,
            FieldValues::U16(_) => FieldType::U16,
        }
    }

    pub fn shape(&self) -> &[usize] {
        with_values!(self, v => v.shape())
    }

    /// Number of scalars per point
    pub fn count(&self) -> usize {
        self.shape()[2]
    }

    /// Borrow the values as a typed array
    pub fn as_array<T: PcdScalar>(&self) -> Option<&Array3<T>> {
        T::unwrap_ref(self)
    }

    /// Numeric copy of the values as `f32`
    pub fn to_f32(&self) -> Array3<f32> {
        with_values!(self, v => v.mapv(PcdScalar::to_f32))
    }

    /// Append the little-endian bytes of every component at `(row, col)`
    pub fn write_le(&self, row: usize, col: usize, out: &mut Vec<u8>) {
        with_values!(self, v => {
            for value in v.slice(ndarray::s![row, col, ..]).iter() {
                value.write_le(out);
            }
        })
    }

    /// Append ` value` for every component at `(row, col)`
    pub fn write_ascii(&self, row: usize, col: usize, out: &mut String) {
        use std::fmt::Write;
        with_values!(self, v => {
            for value in v.slice(ndarray::s![row, col, ..]).iter() {
                // Writing into a String cannot fail
                let _ = write!(out, " {}", value);
            }
        })
    }
}

impl<T: PcdScalar> From<Array3<T>> for FieldValues {
    fn from(values: Array3<T>) -> Self {
        T::wrap(values)
    }
}

impl<T: PcdScalar> From<Array2<T>> for FieldValues {
    fn from(values: Array2<T>) -> Self {
        T::wrap(values.insert_axis(Axis(2)))
    }
}

/// Named per-point fields in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraFields {
    entries: Vec<(String, FieldValues)>,
}

impl ExtraFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, keeping its existing position if the name already exists
    pub fn insert(&mut self, name: impl Into<String>, values: impl Into<FieldValues>) -> Option<FieldValues> {
        let name = name.into();
        let values = values.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, values)),
            None => {
                self.entries.push((name, values));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValues> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValues> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValues)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Flat accumulator for one field while decoding records
#[derive(Debug)]
pub(crate) enum FieldBuffer {
    F32(Vec<f32>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
}

macro_rules! with_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            FieldBuffer::F32($v) => $body,
            FieldBuffer::U32($v) => $body,
            FieldBuffer::I32($v) => $body,
            FieldBuffer::U8($v) => $body,
            FieldBuffer::U16($v) => $body,
        }
    };
}

impl FieldBuffer {
    pub(crate) fn with_capacity(field_type: FieldType, capacity: usize) -> Self {
        match field_type {
            FieldType::F32 => FieldBuffer::F32(Vec::with_capacity(capacity)),
            FieldType::U32 => FieldBuffer::U32(Vec::with_capacity(capacity)),
            FieldType::I32 => FieldBuffer::I32(Vec::with_capacity(capacity)),
            FieldType::U8 => FieldBuffer::U8(Vec::with_capacity(capacity)),
            FieldType::U16 => FieldBuffer::U16(Vec::with_capacity(capacity)),
        }
    }

    /// Push the values stored back to back in `bytes`
    pub(crate) fn push_le(&mut self, bytes: &[u8]) {
        with_buffer!(self, v => push_le_into(v, bytes))
    }

    pub(crate) fn push_token(&mut self, field: &str, token: &str) -> Result<()> {
        with_buffer!(self, v => push_token_into(v, field, token))
    }

    pub(crate) fn into_values(self, height: usize, width: usize, count: usize) -> Result<FieldValues> {
        with_buffer!(self, v => {
            let found = v.len();
            Array3::from_shape_vec((height, width, count), v)
                .map(FieldValues::from)
                .map_err(|_| Error::shape_mismatch("decoded field", &[height * width * count], &[found]))
        })
    }
}

fn push_le_into<T: PcdScalar>(values: &mut Vec<T>, bytes: &[u8]) {
    for chunk in bytes.chunks_exact(T::FIELD_TYPE.size()) {
        values.push(T::read_le(chunk));
    }
}

fn push_token_into<T: PcdScalar>(values: &mut Vec<T>, field: &str, token: &str) -> Result<()> {
    let value = T::parse_token(token).ok_or_else(|| {
        Error::InvalidData(format!(
            "invalid {} value '{}' for field '{}'",
            T::FIELD_TYPE,
            token,
            field
        ))
    })?;
    values.push(value);
    Ok(())
}
