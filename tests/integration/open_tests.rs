//! Stack opening tests.
//!
//! Tests verify:
//! - Metadata is parsed and typed from the descriptor
//! - Shape and dimension names follow the channel count
//! - Raw file size is validated against the derived shape
//! - Missing files and attributes abort construction

use std::fs;

use ndarray::IxDyn;
use sciscan_stack::{Dim, SciScanStack, StackError, StackOptions, StackWarning, Value};

use super::test_utils::{descriptor, ramp_bytes, ramp_stack, ramp_value, write_stack};

// =============================================================================
// Metadata
// =============================================================================

#[test]
fn test_metadata_is_typed() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    let metadata = stack.metadata();

    assert_eq!(metadata.x_pixels(), Some(&Value::Int(8)));
    assert_eq!(metadata.get("frames_p_sec"), Some(&Value::Float(30.0)));
    assert_eq!(metadata.get("zoom"), Some(&Value::Float(2.5)));
    assert_eq!(metadata.get_bool("save_raw"), Some(true));
    assert_eq!(metadata.get_str("scanner_type"), Some("resonant 8kHz"));
    assert_eq!(metadata.get_str("experiment_type"), Some("XYT"));
}

#[test]
fn test_placeholder_values_are_dropped() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert!(!stack.metadata().contains_key("comment"));
    assert!(!stack.metadata().contains_key("operator"));
}

#[test]
fn test_paths_are_reported() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert_eq!(stack.raw_path(), stack_dir.raw_path());
    assert_eq!(stack.ini_path(), stack_dir.ini_path());
}

// =============================================================================
// Shape
// =============================================================================

#[test]
fn test_single_channel_shape() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert_eq!(stack.shape(), &[3, 4, 8]);
    assert_eq!(stack.dim_names(), &[Dim::T, Dim::Y, Dim::X]);
}

#[test]
fn test_two_channel_shape() {
    let stack_dir = ramp_stack(8, 4, 2, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert_eq!(stack.shape(), &[3, 2, 4, 8]);
    assert_eq!(stack.dim_names(), &[Dim::T, Dim::C, Dim::Y, Dim::X]);
}

#[test]
fn test_pixel_layout_is_frame_major() {
    let stack_dir = ramp_stack(8, 4, 2, 3, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    let frames = stack.frames();

    // index (t, c, y, x) -> ((t * 2 + c) * 4 + y) * 8 + x
    assert_eq!(frames.get(&[0, 0, 0, 0]).unwrap(), ramp_value(0));
    assert_eq!(frames.get(&[0, 1, 0, 0]).unwrap(), ramp_value(32));
    assert_eq!(frames.get(&[2, 1, 3, 7]).unwrap(), ramp_value(191));

    let frame = frames.frame(1).unwrap();
    assert_eq!(frame.shape(), &[2, 4, 8]);
    assert_eq!(frame[IxDyn(&[0, 0, 0])], ramp_value(64));
}

#[test]
fn test_to_array_matches_get() {
    let stack_dir = ramp_stack(5, 3, 1, 2, 0);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    let array = stack.frames().to_array().unwrap();
    assert_eq!(array.shape(), stack.shape());
    for ((t, y, x), expected) in [((0, 0, 0), 0), ((1, 2, 4), 29), ((1, 0, 1), 16)] {
        assert_eq!(array[IxDyn(&[t, y, x])], ramp_value(expected));
        assert_eq!(stack.frames().get(&[t, y, x]).unwrap(), ramp_value(expected));
    }
}

// =============================================================================
// Size Validation
// =============================================================================

#[test]
fn test_exact_size_has_no_warnings() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 0);
    assert_eq!(stack_dir.raw_len(), 8 * 4 * 3 * 2);

    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    assert!(stack.warnings().is_empty());
}

#[test]
fn test_oversized_file_warns_once() {
    let stack_dir = ramp_stack(8, 4, 1, 3, 10);
    let stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert_eq!(
        stack.warnings(),
        &[StackWarning::SizeMismatch {
            expected: 192,
            actual: 202
        }]
    );
    assert_eq!(stack.frames().as_bytes().len(), 192);
}

#[test]
fn test_undersized_file_fails() {
    let stack_dir = write_stack(&descriptor(8, 4, 1, 3), &ramp_bytes(8 * 4 * 3 - 1, 0));

    let err = SciScanStack::open(stack_dir.path()).unwrap_err();
    match err {
        StackError::InsufficientData {
            expected, actual, ..
        } => {
            assert_eq!(expected, 192);
            assert_eq!(actual, 190);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_experiment_type_warns() {
    let ini = descriptor(4, 4, 1, 1).replace("\"XYT\"", "\"XYZT\"");
    let stack_dir = write_stack(&ini, &ramp_bytes(16, 0));

    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    assert_eq!(
        stack.warnings(),
        &[StackWarning::SchemaAssumption {
            experiment_type: "XYZT".to_string()
        }]
    );
    assert_eq!(stack.shape(), &[1, 4, 4]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("image.ini"), descriptor(4, 4, 1, 1)).unwrap();

    let err = SciScanStack::open(dir.path()).unwrap_err();
    assert!(matches!(err, StackError::MissingFile { .. }));
}

#[test]
fn test_missing_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("image.raw"), ramp_bytes(16, 0)).unwrap();

    let err = SciScanStack::open(dir.path()).unwrap_err();
    assert!(matches!(err, StackError::MissingFile { .. }));
}

#[test]
fn test_missing_required_attribute() {
    let ini = descriptor(4, 4, 1, 1).replace("no.of.channels = 1\n", "");
    let stack_dir = write_stack(&ini, &ramp_bytes(16, 0));

    let err = SciScanStack::open(stack_dir.path()).unwrap_err();
    assert!(matches!(err, StackError::MissingAttribute("no_of_channels")));
}

#[test]
fn test_non_numeric_required_attribute() {
    let ini = descriptor(4, 4, 1, 1).replace("x.pixels = 4", "x.pixels = four");
    let stack_dir = write_stack(&ini, &ramp_bytes(16, 0));

    let err = SciScanStack::open(stack_dir.path()).unwrap_err();
    assert!(matches!(err, StackError::TypeCoercion { key: "x_pixels", .. }));
}

#[test]
fn test_unaddressable_shape_with_zero_width_fails() {
    let huge = 1usize << 40;
    let stack_dir = write_stack(&descriptor(0, huge, 1, huge), &[]);

    let err = SciScanStack::open(stack_dir.path()).unwrap_err();
    match err {
        StackError::ShapeOverflow { shape } => assert_eq!(shape, vec![huge, huge, 0]),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_out_of_range_float_frame_count_fails() {
    let ini = descriptor(0, 4, 4, 1).replace("frame.count = 1", "frame.count = 1e30");
    let stack_dir = write_stack(&ini, &[]);

    let err = SciScanStack::open(stack_dir.path()).unwrap_err();
    assert!(matches!(err, StackError::TypeCoercion { key: "frame_count", .. }));
}

#[test]
fn test_custom_extensions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("acq.txt"), descriptor(2, 2, 1, 1)).unwrap();
    fs::write(dir.path().join("acq.dat"), ramp_bytes(4, 0)).unwrap();

    let options = StackOptions::new()
        .with_descriptor_extension(".txt")
        .with_raw_extension("dat");
    let stack = SciScanStack::open_with_options(dir.path(), &options).unwrap();
    assert_eq!(stack.shape(), &[1, 2, 2]);

    // Default extensions find nothing here
    assert!(SciScanStack::open(dir.path()).is_err());
}

#[test]
fn test_invalid_options_rejected() {
    let stack_dir = ramp_stack(2, 2, 1, 1, 0);
    let options = StackOptions::new().with_raw_extension("ini");

    let err = SciScanStack::open_with_options(stack_dir.path(), &options).unwrap_err();
    assert!(matches!(err, StackError::InvalidOptions(_)));
}
