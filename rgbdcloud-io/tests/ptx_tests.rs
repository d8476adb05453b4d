//! Integration tests for the PTX codec and the sequence manifest

use approx::assert_relative_eq;
use nalgebra::Rotation3;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rgbdcloud_core::{Error, RigidTransform, Vector3};
use rgbdcloud_io::*;
use std::fs;

fn scanner_pose() -> RigidTransform {
    let rotation = Rotation3::from_euler_angles(0.1, -0.4, 1.2);
    RigidTransform::new(*rotation.matrix(), Vector3::new(0.5, -1.0, 2.0))
}

fn decode(text: &str, options: &PtxReadOptions) -> rgbdcloud_core::Result<PtxCloud> {
    let mut reader = text.as_bytes();
    PtxReader::decode(&mut reader, options)
}

#[test]
fn test_round_trip_with_transform() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = Array3::from_shape_fn((3, 4, 3), |_| rng.gen_range(-5.0f32..5.0));
    let colors = Array3::from_shape_fn((3, 4, 3), |_| rng.gen::<u8>());
    let options = PtxWriteOptions {
        transform: scanner_pose(),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.ptx");
    write_ptx(&path, points.view(), Some(colors.view()), &options).unwrap();
    let cloud = read_ptx(&path, &PtxReadOptions::default()).unwrap();

    assert_eq!(cloud.colors, colors);
    assert!(cloud.intensities.iter().all(|&v| v == 1.0));
    for (a, b) in cloud.points.iter().zip(points.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-3);
    }
    assert_relative_eq!(cloud.transform.rotation, options.transform.rotation, epsilon = 1e-5);
    assert_relative_eq!(cloud.transform.translation, options.transform.translation, epsilon = 1e-5);
    assert_relative_eq!(cloud.block[(3, 3)], 1.0);
    assert_relative_eq!(cloud.block[(3, 0)], 0.0);
}

#[test]
fn test_points_stay_in_scanner_frame_on_request() {
    let points = Array3::from_shape_vec((1, 1, 3), vec![1.0f32, 0.0, 0.0]).unwrap();
    let translation = Vector3::new(1.0, 0.0, 0.0);
    let options = PtxWriteOptions {
        transform: RigidTransform::new(rgbdcloud_core::Matrix3::identity(), translation),
    };
    let mut out = Vec::new();
    PtxWriter::encode(&mut out, points.view(), None, &options).unwrap();
    let text = String::from_utf8(out).unwrap();

    let local = decode(&text, &PtxReadOptions { transform_points: false }).unwrap();
    assert_eq!(local.points.as_slice().unwrap(), &[0.0, 0.0, 0.0]);
    assert_eq!(local.colors.as_slice().unwrap(), &DEFAULT_PTX_COLOR);

    let world = decode(&text, &PtxReadOptions::default()).unwrap();
    assert_eq!(world.points.as_slice().unwrap(), &[1.0, 0.0, 0.0]);
}

#[test]
fn test_body_order_is_column_major_from_bottom_row() {
    // Point (i, j) carries x = 10 * i + j
    let points = Array3::from_shape_fn((2, 3, 3), |(i, j, c)| if c == 0 { (10 * i + j) as f32 } else { 0.0 });
    let mut out = Vec::new();
    PtxWriter::encode(&mut out, points.view(), None, &PtxWriteOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();

    let xs: Vec<f32> = text
        .lines()
        .skip(10)
        .map(|line| line.split(' ').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(xs, vec![10.0, 0.0, 11.0, 1.0, 12.0, 2.0]);
}

#[test]
fn test_color_shape_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.ptx");
    let points = Array3::<f32>::zeros((3, 4, 3));
    let colors = Array3::<u8>::zeros((3, 5, 3));

    let result = PtxWriter::write(&path, points.view(), Some(colors.view()), &PtxWriteOptions::default());
    match result {
        Err(Error::ShapeMismatch { expected, found, .. }) => {
            assert_eq!(expected, vec![3, 4, 3]);
            assert_eq!(found, vec![3, 5, 3]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let flat = Array3::<f32>::zeros((3, 4, 2));
    let result = PtxWriter::write(&path, flat.view(), None, &PtxWriteOptions::default());
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_malformed_bodies() {
    let header = "1\n2\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n";
    let options = PtxReadOptions::default();

    let truncated = format!("{}0 0 0 1 1 2 3\n", header);
    assert!(matches!(decode(&truncated, &options), Err(Error::InvalidData(_))));

    let bad_color = format!("{}0 0 0 1 1 2 3\n0 0 0 1 300 0 0\n", header);
    assert!(matches!(decode(&bad_color, &options), Err(Error::InvalidData(_))));

    let trailing = format!("{}0 0 0 1 1 2 3\n0 0 0 1 4 5 6\n7\n", header);
    assert!(matches!(decode(&trailing, &options), Err(Error::InvalidData(_))));

    let good = format!("{}0 0 0 1 1 2 3\n0 0 0 0.5 4 5 6\n", header);
    let cloud = decode(&good, &options).unwrap();
    // First body line is the bottom row
    assert_eq!(cloud.colors[[1, 0, 0]], 1);
    assert_eq!(cloud.colors[[0, 0, 0]], 4);
    assert_eq!(cloud.intensities[[0, 0]], 0.5);

    let bad_header = "1\ntwo\n";
    match decode(bad_header, &options) {
        Err(Error::MalformedHeader { key, .. }) => assert_eq!(key, "rows"),
        other => panic!("expected MalformedHeader, got {:?}", other),
    }
}

#[test]
fn test_oversized_dimensions() {
    let pose = "0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n";
    let options = PtxReadOptions::default();

    let overflowing = format!("4294967296\n4294967296\n{}", pose);
    match decode(&overflowing, &options) {
        Err(Error::MalformedHeader { key, .. }) => assert_eq!(key, "columns"),
        other => panic!("expected MalformedHeader, got {:?}", other),
    }

    // A million by a million points declared, one supplied
    let huge = format!("1000000\n1000000\n{}0 0 0 1 1 2 3\n", pose);
    assert!(matches!(decode(&huge, &options), Err(Error::InvalidData(_))));
}

#[test]
fn test_manifest_lists_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = SequenceManifest::new();
    for index in 0..3 {
        manifest.push(format!("pointCloud{:03}.ptx", index)).unwrap();
    }
    let path = dir.path().join("pcdSequence.txt");
    manifest.write(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "pointCloud000.ptx\npointCloud001.ptx\npointCloud002.ptx\n"
    );
    assert_eq!(SequenceManifest::read(&path).unwrap().len(), 3);
}
