//! Frame sequence pipeline for rgbdcloud
//!
//! Takes the RGB and XYZ images of rendered frames, subsamples them into colored
//! point clouds and writes a numbered PCD and/or PTX file per frame, plus a
//! manifest listing the sequence.

pub mod config;
pub mod frame;
pub mod sequence;

pub use config::SequenceConfig;
pub use frame::{FrameSource, RgbdFrame};
pub use sequence::{frame_file_name, FrameReport, SequenceGenerator, SequenceReport};
