//! All-or-nothing output files
//!
//! Writers stream into `<name>.partial` next to the destination and rename it into
//! place on [`ScopedOutput::commit`]. Dropping an uncommitted output removes the
//! partial file, so an aborted encode never leaves a truncated file behind.

use rgbdcloud_core::{Error, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct ScopedOutput {
    destination: PathBuf,
    partial: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl ScopedOutput {
    /// Open a partial file for `destination`
    pub fn create<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let file_name = destination
            .file_name()
            .ok_or_else(|| Error::InvalidData(format!("output path {:?} has no file name", destination)))?;
        let mut partial_name = file_name.to_os_string();
        partial_name.push(".partial");
        let partial = destination.with_file_name(partial_name);

        let file = File::create(&partial)?;
        Ok(Self {
            destination,
            partial,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Flush everything and move the file to its destination
    pub fn commit(mut self) -> Result<()> {
        let result = self.finish();
        if result.is_err() {
            let _ = fs::remove_file(&self.partial);
        }
        result
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&self.partial, &self.destination)?;
        Ok(())
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "output already committed"))
    }
}

impl Write for ScopedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer()?.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for ScopedOutput {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer);
            if let Err(e) = fs::remove_file(&self.partial) {
                log::warn!("failed to remove partial output {:?}: {}", self.partial, e);
            } else {
                log::warn!("discarded incomplete output for {:?}", self.destination);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.pcd");

        let mut output = ScopedOutput::create(&path).unwrap();
        output.write_all(b"VERSION 0.7\n").unwrap();
        assert!(dir.path().join("cloud.pcd.partial").exists());
        assert!(!path.exists());
        output.commit().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"VERSION 0.7\n");
        assert!(!dir.path().join("cloud.pcd.partial").exists());
    }

    #[test]
    fn test_drop_without_commit_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.ptx");
        {
            let mut output = ScopedOutput::create(&path).unwrap();
            output.write_all(b"640\n").unwrap();
        }
        assert!(!path.exists());
        assert!(!dir.path().join("cloud.ptx.partial").exists());
    }

    #[test]
    fn test_existing_destination_untouched_on_abort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.pcd");
        fs::write(&path, b"previous").unwrap();
        {
            let mut output = ScopedOutput::create(&path).unwrap();
            output.write_all(b"half").unwrap();
        }
        assert_eq!(fs::read(&path).unwrap(), b"previous");
    }
}
