//! Sequence manifest: one relative point cloud file name per line

use crate::output::ScopedOutput;
use rgbdcloud_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceManifest {
    pub entries: Vec<String>,
}

impl SequenceManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) -> Result<()> {
        let entry = entry.into();
        if entry.is_empty() || entry.contains(['\n', '\r']) {
            return Err(Error::InvalidData(format!(
                "manifest entry {:?} must be a non-empty single line",
                entry
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}", entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Parse a manifest; blank lines are skipped
    pub fn decode<R: BufRead>(reader: R) -> Result<Self> {
        let mut manifest = Self::new();
        for line in reader.lines() {
            let line = line?;
            let entry = line.trim();
            if !entry.is_empty() {
                manifest.entries.push(entry.to_string());
            }
        }
        Ok(manifest)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut output = ScopedOutput::create(path)?;
        self.encode(&mut output)?;
        output.commit()
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::decode(BufReader::new(File::open(path)?))
    }
}
