//! Core data structures for rgbdcloud
//!
//! This crate provides the grid types that rendered RGB-D frames arrive in, the
//! packed-color codec shared by the file formats, the scanner transform, and the
//! builder that flattens a frame into a colored point cloud.

pub mod builder;
pub mod color;
pub mod error;
pub mod grid;
pub mod point_cloud;
pub mod transform;

pub use builder::*;
pub use color::*;
pub use error::*;
pub use grid::*;
pub use point_cloud::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
