//! PCD field schema registry
//!
//! Maps each record field to one of the five element types the codecs understand
//! and computes the fixed record layout shared by the binary encoder and decoder.

use rgbdcloud_core::{Error, Result};
use std::fmt;

/// Name PCL uses for padding fields; it may repeat within a schema
pub const PADDING_FIELD: &str = "_";

/// Element kind letter used by the PCD `TYPE` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Float,
    Unsigned,
    Signed,
}

impl FieldKind {
    pub fn as_char(self) -> char {
        match self {
            FieldKind::Float => 'F',
            FieldKind::Unsigned => 'U',
            FieldKind::Signed => 'I',
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Element types supported by the PCD codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    F32,
    U32,
    I32,
    U8,
    U16,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::F32,
        FieldType::U32,
        FieldType::I32,
        FieldType::U8,
        FieldType::U16,
    ];

    /// The `(TYPE, SIZE)` pair written to a PCD header
    pub fn describe(self) -> (FieldKind, usize) {
        match self {
            FieldType::F32 => (FieldKind::Float, 4),
            FieldType::U32 => (FieldKind::Unsigned, 4),
            FieldType::I32 => (FieldKind::Signed, 4),
            FieldType::U8 => (FieldKind::Unsigned, 1),
            FieldType::U16 => (FieldKind::Unsigned, 2),
        }
    }

    pub fn kind(self) -> FieldKind {
        self.describe().0
    }

    /// Width of one element in bytes
    pub fn size(self) -> usize {
        self.describe().1
    }

    /// Resolve a `(kind, size)` pair, rejecting every combination outside the table
    pub fn from_kind_size(field: &str, kind: FieldKind, size: usize) -> Result<Self> {
        match (kind, size) {
            (FieldKind::Float, 4) => Ok(FieldType::F32),
            (FieldKind::Unsigned, 4) => Ok(FieldType::U32),
            (FieldKind::Signed, 4) => Ok(FieldType::I32),
            (FieldKind::Unsigned, 1) => Ok(FieldType::U8),
            (FieldKind::Unsigned, 2) => Ok(FieldType::U16),
            _ => Err(Error::UnsupportedType {
                field: field.to_string(),
                kind: kind.to_string(),
                width: size,
            }),
        }
    }

    /// Resolve the `TYPE` letter and `SIZE` declared for a field in a PCD header
    pub fn from_header(field: &str, type_str: &str, size: usize) -> Result<Self> {
        let kind = match type_str {
            "F" => FieldKind::Float,
            "U" => FieldKind::Unsigned,
            "I" => FieldKind::Signed,
            other => {
                return Err(Error::UnsupportedType {
                    field: field.to_string(),
                    kind: other.to_string(),
                    width: size,
                })
            }
        };
        Self::from_kind_size(field, kind, size)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::F32 => "f32",
            FieldType::U32 => "u32",
            FieldType::I32 => "i32",
            FieldType::U8 => "u8",
            FieldType::U16 => "u16",
        };
        f.write_str(name)
    }
}

/// One field of a PCD record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub count: usize,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType, count: usize) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidFieldName(format!(
                "'{}' must be non-empty and contain no whitespace",
                name
            )));
        }
        if count == 0 {
            return Err(Error::InvalidData(format!("field '{}' has a COUNT of 0", name)));
        }
        Ok(Self {
            name,
            field_type,
            count,
        })
    }

    /// Bytes this field occupies in a binary record
    pub fn byte_size(&self) -> usize {
        self.field_type.size() * self.count
    }

    pub fn is_padding(&self) -> bool {
        self.name == PADDING_FIELD
    }
}

/// Ordered record layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    /// Build a schema, rejecting duplicate names other than padding
    pub fn new(fields: Vec<FieldDef>) -> Result<Self> {
        let mut schema = Self::default();
        for field in fields {
            schema.push(field)?;
        }
        Ok(schema)
    }

    /// The `x y z rgb` layout every written PCD file starts with
    pub fn xyz_rgb() -> Self {
        let fields = ["x", "y", "z", "rgb"]
            .into_iter()
            .map(|name| FieldDef {
                name: name.to_string(),
                field_type: FieldType::F32,
                count: 1,
            })
            .collect();
        Self { fields }
    }

    pub fn push(&mut self, field: FieldDef) -> Result<()> {
        if !field.is_padding() && self.get(&field.name).is_some() {
            return Err(Error::InvalidFieldName(format!(
                "'{}' appears more than once in the schema",
                field.name
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Element kind and byte width of a named field
    pub fn describe(&self, name: &str) -> Option<(FieldKind, usize)> {
        self.get(name).map(|f| f.field_type.describe())
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDef> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Size of one binary record: the sum of `size × count` over all fields
    pub fn record_size(&self) -> usize {
        self.fields.iter().map(FieldDef::byte_size).sum()
    }

    /// Number of scalars in one ASCII record
    pub fn values_per_record(&self) -> usize {
        self.fields.iter().map(|f| f.count).sum()
    }
}
