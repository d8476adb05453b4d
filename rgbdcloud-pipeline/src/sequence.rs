//! Frame sequence driver
//!
//! Renders every frame of a [`FrameSource`], flattens it into a point cloud and
//! writes one file per enabled format, then lists the frames in a manifest.

use crate::config::SequenceConfig;
use crate::frame::FrameSource;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use rgbdcloud_core::{Error, Result};
use rgbdcloud_io::{FormatRegistry, PcdFrameWriter, PtxFrameWriter, SequenceManifest};
use std::fs;
use std::path::{Path, PathBuf};

/// `<stem><index, zero-padded to width>.<extension>`
pub fn frame_file_name(stem: &str, index: usize, width: usize, extension: &str) -> String {
    format!("{}{:0width$}.{}", stem, index, extension, width = width)
}

/// What was written for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub index: usize,
    pub point_count: usize,
    /// Written files, in the order of the generator's extensions
    pub files: Vec<PathBuf>,
}

/// Outcome of a sequence run
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReport {
    /// One entry per frame, in frame order
    pub frames: Vec<FrameReport>,
    pub manifest: SequenceManifest,
    pub manifest_path: PathBuf,
}

impl SequenceReport {
    pub fn point_counts(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.point_count).collect()
    }

    pub fn total_points(&self) -> usize {
        self.frames.iter().map(|f| f.point_count).sum()
    }
}

/// Writes a whole frame sequence to a directory
pub struct SequenceGenerator {
    config: SequenceConfig,
    registry: FormatRegistry,
    extensions: Vec<&'static str>,
}

impl SequenceGenerator {
    /// Validate the config and set up a writer per enabled format
    pub fn new(config: SequenceConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = FormatRegistry::new();
        let mut extensions = Vec::new();
        if config.write_pcd {
            let writer = PcdFrameWriter {
                data_format: config.pcd_data_format()?,
            };
            extensions.push("pcd");
            registry.register_writer(Box::new(writer));
        }
        if config.write_ptx {
            let writer = PtxFrameWriter {
                transform: config.ptx_transform,
            };
            extensions.push("ptx");
            registry.register_writer(Box::new(writer));
        }

        Ok(Self {
            config,
            registry,
            extensions,
        })
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Extensions written for every frame; the first one names the manifest entries
    pub fn extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    /// Write every frame of `source` into `output_dir`, then the manifest
    ///
    /// Stops at the first failing frame. Files of frames that completed stay on disk,
    /// but no manifest is written.
    pub fn generate<S, P>(&self, source: &S, output_dir: P) -> Result<SequenceReport>
    where
        S: FrameSource + ?Sized,
        P: AsRef<Path>,
    {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;
        let frame_count = source.frame_count();
        log::info!(
            "writing {} frames to {:?} ({})",
            frame_count,
            output_dir,
            self.extensions.join(", ")
        );

        let frames = if self.config.parallel {
            self.generate_parallel(source, output_dir, frame_count)?
        } else {
            (0..frame_count)
                .map(|index| self.write_frame(source, index, frame_count, output_dir))
                .collect::<Result<Vec<_>>>()?
        };

        let mut manifest = SequenceManifest::new();
        let listed = self.extensions.first().copied().unwrap_or("pcd");
        for frame in &frames {
            manifest.push(self.file_name(frame.index, listed))?;
        }
        let manifest_path = output_dir.join(&self.config.manifest_name);
        manifest.write(&manifest_path)?;

        let report = SequenceReport {
            frames,
            manifest,
            manifest_path,
        };
        log::info!("wrote {} frames, {} points", report.frames.len(), report.total_points());
        Ok(report)
    }

    fn generate_parallel<S>(&self, source: &S, output_dir: &Path, frame_count: usize) -> Result<Vec<FrameReport>>
    where
        S: FrameSource + ?Sized,
    {
        let run = || {
            (0..frame_count)
                .into_par_iter()
                .map(|index| self.write_frame(source, index, frame_count, output_dir))
                .collect::<Result<Vec<_>>>()
        };

        match self.config.threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("rgbdcloud-frame-{}", index))
                    .build()
                    .map_err(|e| Error::InvalidData(format!("failed to create thread pool: {}", e)))?;
                pool.install(run)
            }
            None => run(),
        }
    }

    fn write_frame<S>(&self, source: &S, index: usize, frame_count: usize, output_dir: &Path) -> Result<FrameReport>
    where
        S: FrameSource + ?Sized,
    {
        let frame = source.render_frame(index)?;
        let cloud = frame.to_point_cloud(self.config.subsampling_step)?;
        let (points, colors) = cloud.to_grids();

        let mut files = Vec::with_capacity(self.extensions.len());
        for extension in &self.extensions {
            let path = output_dir.join(self.file_name(index, extension));
            self.registry.write_frame(points.view(), colors.view(), &path)?;
            files.push(path);
        }

        log::info!("frame {}/{}: {} points", index + 1, frame_count, cloud.len());
        Ok(FrameReport {
            index,
            point_count: cloud.len(),
            files,
        })
    }

    fn file_name(&self, index: usize, extension: &str) -> String {
        frame_file_name(&self.config.file_stem, index, self.config.index_width, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name("pointCloud", 7, 3, "pcd"), "pointCloud007.pcd");
        assert_eq!(frame_file_name("frame", 1234, 3, "ptx"), "frame1234.ptx");
        assert_eq!(frame_file_name("f", 0, 1, "pcd"), "f0.pcd");
    }

    #[test]
    fn test_enabled_formats() {
        let generator = SequenceGenerator::new(SequenceConfig::default()).unwrap();
        assert_eq!(generator.extensions(), &["pcd", "ptx"]);

        let config = SequenceConfig {
            write_pcd: false,
            ..Default::default()
        };
        let generator = SequenceGenerator::new(config).unwrap();
        assert_eq!(generator.extensions(), &["ptx"]);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SequenceConfig {
            subsampling_step: 0,
            ..Default::default()
        };
        assert!(SequenceGenerator::new(config).is_err());
    }
}
