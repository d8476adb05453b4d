//! Conversion of a rendered RGB-D frame into a flat colored point cloud

use crate::color::to_unit_color;
use crate::error::{Error, Result};
use crate::grid::{check_grid_shape, point_grid_dims, ScanOrder};
use crate::point_cloud::{ColoredPoint, PointCloud};
use nalgebra::Point3;
use ndarray::{s, ArrayView3};

/// Flatten an XYZ grid and its RGB grid into a point cloud
///
/// Keeps the samples at rows and columns that are multiples of `stride`, in
/// row-major order over that sub-grid, and drops every sample whose X channel is
/// NaN. Producers set all three channels of a background pixel to NaN together.
pub fn build_point_cloud(xyz: ArrayView3<f32>, rgb: ArrayView3<u8>, stride: usize) -> Result<PointCloud> {
    if stride == 0 {
        return Err(Error::InvalidData("subsampling stride must be at least 1".to_string()));
    }
    let (height, width) = point_grid_dims("xyz grid", xyz.shape())?;
    check_grid_shape("rgb grid", rgb.shape(), height, width, 3)?;

    let xyz = xyz.slice(s![..;stride, ..;stride, ..]);
    let rgb = rgb.slice(s![..;stride, ..;stride, ..]);
    let (sub_height, sub_width) = (xyz.shape()[0], xyz.shape()[1]);

    let mut cloud = PointCloud::with_capacity(sub_height * sub_width);
    for (i, j) in ScanOrder::RowMajor.indices(sub_height, sub_width) {
        let x = xyz[[i, j, 0]];
        if x.is_nan() {
            continue;
        }
        cloud.push(ColoredPoint {
            position: Point3::new(x, xyz[[i, j, 1]], xyz[[i, j, 2]]),
            color: to_unit_color([rgb[[i, j, 0]], rgb[[i, j, 1]], rgb[[i, j, 2]]]),
        });
    }
    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ColorGrid, PointGrid};
    use approx::assert_relative_eq;
    use rand::Rng;

    /// Grid whose position at (i, j) is (i, j, 10*i + j)
    fn indexed_grid(height: usize, width: usize) -> (PointGrid, ColorGrid) {
        let xyz = PointGrid::from_shape_fn((height, width, 3), |(i, j, c)| match c {
            0 => i as f32,
            1 => j as f32,
            _ => (10 * i + j) as f32,
        });
        let rgb = ColorGrid::from_shape_fn((height, width, 3), |(i, j, c)| (i * 50 + j * 10 + c) as u8);
        (xyz, rgb)
    }

    fn grid_indices(cloud: &PointCloud) -> Vec<(usize, usize)> {
        cloud
            .iter()
            .map(|p| (p.position.x as usize, p.position.y as usize))
            .collect()
    }

    #[test]
    fn test_stride_subsampling() {
        let (xyz, rgb) = indexed_grid(4, 4);
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 2).unwrap();
        assert_eq!(grid_indices(&cloud), vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_invalid_samples_dropped() {
        let (mut xyz, rgb) = indexed_grid(3, 3);
        for c in 0..3 {
            xyz[[1, 1, c]] = f32::NAN;
        }
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 1).unwrap();
        assert_eq!(cloud.len(), 8);
        assert!(!grid_indices(&cloud).contains(&(1, 1)));
        assert!(cloud.iter().all(|p| p.position.z.is_finite()));
    }

    #[test]
    fn test_colors_normalized() {
        let (xyz, rgb) = indexed_grid(2, 2);
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 1).unwrap();
        let last = cloud.points[3];
        assert_relative_eq!(last.color[0], 60.0 / 255.0);
        assert_relative_eq!(last.color[2], 62.0 / 255.0);
        assert_relative_eq!(last.position.z, 11.0);
    }

    #[test]
    fn test_stride_larger_than_grid() {
        let (xyz, rgb) = indexed_grid(3, 2);
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 5).unwrap();
        assert_eq!(grid_indices(&cloud), vec![(0, 0)]);

        let (mut xyz, rgb) = indexed_grid(3, 2);
        xyz[[0, 0, 0]] = f32::NAN;
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 5).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_empty_grid() {
        let xyz = PointGrid::zeros((0, 0, 3));
        let rgb = ColorGrid::zeros((0, 0, 3));
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 1).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let (xyz, rgb) = indexed_grid(3, 3);
        assert!(matches!(
            build_point_cloud(xyz.view(), rgb.view(), 0),
            Err(Error::InvalidData(_))
        ));

        let (_, small_rgb) = indexed_grid(3, 2);
        assert!(matches!(
            build_point_cloud(xyz.view(), small_rgb.view(), 1),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_random_mask_matches_count() {
        let mut rng = rand::thread_rng();
        let (mut xyz, rgb) = indexed_grid(16, 12);
        let mut expected = 0;
        for i in 0..16 {
            for j in 0..12 {
                if rng.gen_bool(0.3) {
                    for c in 0..3 {
                        xyz[[i, j, c]] = f32::NAN;
                    }
                } else if i % 3 == 0 && j % 3 == 0 {
                    expected += 1;
                }
            }
        }
        let cloud = build_point_cloud(xyz.view(), rgb.view(), 3).unwrap();
        assert_eq!(cloud.len(), expected);
        let indices = grid_indices(&cloud);
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
    }
}
