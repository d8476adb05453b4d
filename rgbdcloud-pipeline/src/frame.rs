//! Rendered RGB-D frames and the sources that produce them

use rgbdcloud_core::{
    build_point_cloud, check_grid_shape, point_grid_dims, ColorGrid, Error, PointCloud, PointGrid, Result,
};

/// One rendered frame: an RGB image and the XYZ position of every pixel
///
/// Background pixels have NaN in all three XYZ channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbdFrame {
    rgb: ColorGrid,
    xyz: PointGrid,
}

impl RgbdFrame {
    /// Pair an `H × W × 3` color image with an `H × W × 3` position image
    pub fn new(rgb: ColorGrid, xyz: PointGrid) -> Result<Self> {
        let (height, width) = point_grid_dims("xyz image", xyz.shape())?;
        check_grid_shape("rgb image", rgb.shape(), height, width, 3)?;
        Ok(Self { rgb, xyz })
    }

    pub fn rgb(&self) -> &ColorGrid {
        &self.rgb
    }

    pub fn xyz(&self) -> &PointGrid {
        &self.xyz
    }

    pub fn height(&self) -> usize {
        self.xyz.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.xyz.shape()[1]
    }

    pub fn into_parts(self) -> (ColorGrid, PointGrid) {
        (self.rgb, self.xyz)
    }

    /// Valid samples on every `stride`-th row and column
    pub fn to_point_cloud(&self, stride: usize) -> Result<PointCloud> {
        build_point_cloud(self.xyz.view(), self.rgb.view(), stride)
    }
}

/// Producer of the frames of a sequence, such as a renderer following a camera path
///
/// Frames may be requested from several threads at once when the sequence is
/// written in parallel.
pub trait FrameSource: Sync {
    fn frame_count(&self) -> usize;

    /// Render frame `index`, for `index < frame_count()`
    fn render_frame(&self, index: usize) -> Result<RgbdFrame>;
}

/// Pre-rendered frames held in memory
impl FrameSource for Vec<RgbdFrame> {
    fn frame_count(&self) -> usize {
        self.len()
    }

    fn render_frame(&self, index: usize) -> Result<RgbdFrame> {
        self.get(index)
            .cloned()
            .ok_or_else(|| Error::InvalidData(format!("frame {} requested from {} frames", index, self.len())))
    }
}
