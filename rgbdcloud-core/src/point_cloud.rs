//! Flat colored point cloud

use crate::color::to_u8_color;
use crate::grid::{ColorGrid, PointGrid};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A position with a normalized (0..1) RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    pub position: Point3<f32>,
    pub color: [f32; 3],
}

/// An ordered sequence of colored points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<ColoredPoint>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn from_points(points: Vec<ColoredPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: ColoredPoint) {
        self.points.push(point);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColoredPoint> {
        self.points.iter()
    }

    /// Lay the cloud out as a single-row `1 × N` grid pair
    ///
    /// Colors are scaled back to 0..255 and rounded, which is the form the PCD and
    /// PTX writers take.
    pub fn to_grids(&self) -> (PointGrid, ColorGrid) {
        let n = self.points.len();
        let mut positions = PointGrid::zeros((1, n, 3));
        let mut colors = ColorGrid::zeros((1, n, 3));
        for (j, point) in self.points.iter().enumerate() {
            let rgb = to_u8_color(point.color);
            for c in 0..3 {
                positions[[0, j, c]] = point.position[c];
                colors[[0, j, c]] = rgb[c];
            }
        }
        (positions, colors)
    }
}

impl FromIterator<ColoredPoint> for PointCloud {
    fn from_iter<I: IntoIterator<Item = ColoredPoint>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a ColoredPoint;
    type IntoIter = std::slice::Iter<'a, ColoredPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_grids_single_row() {
        let cloud: PointCloud = vec![
            ColoredPoint {
                position: Point3::new(1.0, 2.0, 3.0),
                color: [1.0, 0.0, 0.5],
            },
            ColoredPoint {
                position: Point3::new(-1.0, 0.0, 4.0),
                color: [0.2, 0.4, 0.6],
            },
        ]
        .into_iter()
        .collect();

        let (positions, colors) = cloud.to_grids();
        assert_eq!(positions.shape(), &[1, 2, 3]);
        assert_eq!(colors.shape(), &[1, 2, 3]);
        assert_eq!(positions[[0, 1, 2]], 4.0);
        assert_eq!(colors[[0, 0, 0]], 255);
        assert_eq!(colors[[0, 0, 2]], 128);
        assert_eq!(colors[[0, 1, 1]], 102);
    }

    #[test]
    fn test_empty_cloud_grids() {
        let (positions, colors) = PointCloud::new().to_grids();
        assert_eq!(positions.shape(), &[1, 0, 3]);
        assert_eq!(colors.shape(), &[1, 0, 3]);
    }
}
