// tests/pipeline_test.rs

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use mocap_angles::data_analysis::angle_models::AngleModels;
use mocap_angles::data_input::angle_export::{
    default_export_path, load_angles_json, save_angles_json, AnglesDocument,
};
use mocap_angles::data_input::roles::{RoleMapping, Side};
use mocap_angles::{calculate_angles, read_capture, FrameRange, MocapError};

/// Writes a capture file with the usual metadata block and one row per frame.
fn write_tsv(path: &Path, names: &[&str], frames: &[Vec<[f64; 3]>], frequency: f64) {
    let mut text = format!(
        "NO_OF_FRAMES\t{}\nNO_OF_MARKERS\t{}\nFREQUENCY\t{}\n",
        frames.len(),
        names.len(),
        frequency
    );
    text.push_str("Frame\tTime");
    for name in names {
        text.push_str(&format!("\t{name} X\t{name} Y\t{name} Z"));
    }
    text.push('\n');
    for (i, frame) in frames.iter().enumerate() {
        text.push_str(&format!("{}\t{:.3}", i + 1, i as f64 / frequency));
        for p in frame {
            text.push_str(&format!("\t{}\t{}\t{}", p[0], p[1], p[2]));
        }
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

const LEG_NAMES: [&str; 8] = ["ra", "rk", "rh", "rs", "la", "lk", "lh", "ls"];

/// Right leg bent at right angles, left leg straight, shifted by `dx`.
fn leg_frame(dx: f64) -> Vec<[f64; 3]> {
    vec![
        [dx, 0.0, 0.0],
        [dx, 0.0, 500.0],
        [dx + 400.0, 0.0, 500.0],
        [dx + 400.0, 0.0, 1000.0],
        [dx, 300.0, 0.0],
        [dx, 300.0, 500.0],
        [dx, 300.0, 1000.0],
        [dx, 300.0, 1500.0],
    ]
}

#[test]
fn test_synthetic_capture_to_angles() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("walk.tsv");
    write_tsv(&path, &LEG_NAMES, &[leg_frame(0.0), leg_frame(25.0)], 100.0);

    let capture = read_capture(&path).unwrap();
    assert_eq!(capture.frames.shape(), &[2, 8, 3]);
    assert_eq!(capture.frequency_hz(), 100.0);
    assert_eq!(capture.metadata.get("NO_OF_FRAMES"), Some("2"));

    let roles = RoleMapping::from_names(&capture.marker_names);
    assert!(roles.has_role_set(Side::Right));
    assert!(roles.has_role_set(Side::Left));

    let angles = calculate_angles(&capture.frames, &roles);
    assert_eq!(angles.num_frames(), 2);
    for frame in 0..2 {
        assert_abs_diff_eq!(angles.qr1()[frame], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.qr2()[frame], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.qr3()[frame], 90.0, epsilon = 1e-9);

        assert_abs_diff_eq!(angles.ql1()[frame], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.ql2()[frame], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(angles.ql3()[frame], 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_missing_side_is_zeroed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("right_only.tsv");
    let frame: Vec<[f64; 3]> = leg_frame(0.0).into_iter().take(4).collect();
    write_tsv(&path, &LEG_NAMES[..4], &[frame.clone(), frame], 50.0);

    let capture = read_capture(&path).unwrap();
    let roles = RoleMapping::from_names(&capture.marker_names);
    assert!(!roles.has_role_set(Side::Left));

    let angles = calculate_angles(&capture.frames, &roles);
    assert_abs_diff_eq!(angles.qr2()[1], 90.0, epsilon = 1e-9);
    assert!(angles.left.q1.iter().all(|&q| q == 0.0));
    assert!(angles.left.q2.iter().all(|&q| q == 0.0));
    assert!(angles.left.q3.iter().all(|&q| q == 0.0));
}

#[test]
fn test_short_row_is_zero_filled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.tsv");
    let text = "FREQUENCY\t100\n\
                Frame\tTime\tA X\tA Y\tA Z\tB X\tB Y\tB Z\n\
                1\t0.00\t1\t2\t3\t4\t5\t6\n\
                2\t0.01\t7\t8\t9\n";
    fs::write(&path, text).unwrap();

    let capture = read_capture(&path).unwrap();
    assert_eq!(capture.frames.shape(), &[2, 2, 3]);
    assert_eq!(capture.frames[[1, 0, 2]], 9.0);
    assert_eq!(capture.frames[[1, 1, 0]], 0.0);
    assert!(capture.missing[[1, 1]]);
    assert!(!capture.missing[[0, 1]]);
    assert_eq!(capture.missing_sample_count(), 1);
}

#[test]
fn test_reader_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("nope.tsv");
    assert!(matches!(
        read_capture(&missing),
        Err(MocapError::FileNotFound { .. })
    ));

    let headerless = dir.path().join("headerless.tsv");
    fs::write(&headerless, "FREQUENCY\t100\n1\t0.0\t1\t2\t3\n").unwrap();
    assert!(matches!(
        read_capture(&headerless),
        Err(MocapError::MalformedHeader { .. })
    ));

    let garbage = dir.path().join("garbage.tsv");
    fs::write(&garbage, "Frame\tTime\tA X\tA Y\tA Z\n1\t0.0\t1\tabc\t3\n").unwrap();
    assert!(matches!(
        read_capture(&garbage),
        Err(MocapError::InvalidValue { .. })
    ));
}

#[test]
fn test_angles_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Measurement1.tsv");
    let frames: Vec<Vec<[f64; 3]>> = (0..6).map(|i| leg_frame(i as f64 * 3.3)).collect();
    write_tsv(&input, &LEG_NAMES, &frames, 100.0);

    let capture = read_capture(&input).unwrap();
    let roles = RoleMapping::from_names(&capture.marker_names);
    let angles = calculate_angles(&capture.frames, &roles);

    let document = AnglesDocument::new(
        &angles,
        capture.frequency_hz(),
        &capture.metadata,
        FrameRange::default(),
    );
    let out_dir = dir.path().join("data").join("calculated_angles");
    let json_path = default_export_path(&input, &out_dir);
    assert!(json_path.ends_with("Measurement1_calculated_angles.json"));

    save_angles_json(&json_path, &document).unwrap();
    let loaded = load_angles_json(&json_path).unwrap();
    assert_eq!(loaded, document);
    assert_eq!(loaded.joint_angles(), angles);
    assert!(loaded.metadata.frame_range.is_none());

    let raw = fs::read_to_string(&json_path).unwrap();
    assert!(!raw.contains("frame_range"));
    assert!(raw.contains("\"qr1\""));
}

#[test]
fn test_ranged_export_records_window() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("walk.tsv");
    let frames: Vec<Vec<[f64; 3]>> = (0..10).map(|i| leg_frame(i as f64)).collect();
    write_tsv(&input, &LEG_NAMES, &frames, 200.0);

    let capture = read_capture(&input).unwrap();
    let angles = calculate_angles(
        &capture.frames,
        &RoleMapping::from_names(&capture.marker_names),
    );
    let document = AnglesDocument::new(
        &angles,
        capture.frequency_hz(),
        &capture.metadata,
        FrameRange::new(Some(2), Some(7)),
    );

    assert_eq!(document.metadata.num_frames, 5);
    assert_eq!(document.angles.right.qr2.len(), 5);
    let window = document.metadata.frame_range.unwrap();
    assert_eq!((window.start_frame, window.end_frame, window.total_frames), (2, 7, 10));
}

#[test]
fn test_models_fit_exported_angles() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bend.tsv");

    // Knee swings through a range of flexion so q2 varies
    let frames: Vec<Vec<[f64; 3]>> = (0..40)
        .map(|i| {
            let theta = (i as f64 * 2.0).to_radians();
            let mut frame = leg_frame(0.0);
            frame[2] = [400.0 * theta.cos(), 0.0, 500.0 + 400.0 * theta.sin()];
            frame[3] = [frame[2][0], 0.0, frame[2][2] + 500.0];
            frame
        })
        .collect();
    write_tsv(&input, &LEG_NAMES, &frames, 100.0);

    let capture = read_capture(&input).unwrap();
    let angles = calculate_angles(
        &capture.frames,
        &RoleMapping::from_names(&capture.marker_names),
    );
    let models = AngleModels::fit(&angles, capture.frequency_hz()).unwrap();

    let right = models.side(Side::Right);
    assert_eq!(right.phi1.degree(), 3);
    assert_eq!(right.q2_of_t.degree(), 5);
    assert_eq!(right.dq2_dt.len(), 40);
    // Thigh rises 2 degrees per frame at 100 Hz
    assert_abs_diff_eq!(right.dq2_dt[20], -200.0, epsilon = 1e-6);
}
