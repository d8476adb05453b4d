//! Image-shaped point and color grids and the scan orders used to serialize them

use crate::error::{Error, Result};
use ndarray::Array3;

/// Height × width × 3 grid of positions; invalid samples hold NaN
pub type PointGrid = Array3<f32>;

/// Height × width × 3 grid of 8-bit RGB colors, co-indexed with a [`PointGrid`]
pub type ColorGrid = Array3<u8>;

/// Order in which the cells of a grid are visited when written to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Rows top to bottom, columns left to right within each row (PCD)
    RowMajor,
    /// Grid flipped vertically, then columns left to right, rows within each
    /// column from the bottom row up to the top row (PTX)
    ColumnMajorFlipped,
}

impl ScanOrder {
    /// Grid cell `(row, col)` visited at record index `k`; callers keep `k < height * width`
    fn position(self, k: usize, height: usize, width: usize) -> (usize, usize) {
        match self {
            ScanOrder::RowMajor => (k / width, k % width),
            ScanOrder::ColumnMajorFlipped => (height - 1 - k % height, k / height),
        }
    }

    /// Iterate over every `(row, col)` of a `height × width` grid in this order
    pub fn indices(self, height: usize, width: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..height * width).map(move |k| self.position(k, height, width))
    }
}

/// Check that a grid has the given height and width and a trailing dimension of `depth`
pub fn check_grid_shape(what: &str, shape: &[usize], height: usize, width: usize, depth: usize) -> Result<()> {
    let expected = [height, width, depth];
    if shape != expected {
        return Err(Error::shape_mismatch(what, &expected, shape));
    }
    Ok(())
}

/// Check that a position grid is `H × W × 3` and return `(H, W)`
pub fn point_grid_dims(what: &str, shape: &[usize]) -> Result<(usize, usize)> {
    match shape {
        [h, w, 3] => Ok((*h, *w)),
        [h, w, _] => Err(Error::shape_mismatch(what, &[*h, *w, 3], shape)),
        _ => Err(Error::InvalidData(format!(
            "{} must be a height x width x 3 grid, found {} dimensions",
            what,
            shape.len()
        ))),
    }
}
