//! Access mode tests.
//!
//! Tests verify:
//! - Read-only stacks reject writes
//! - Read-write changes reach the file after a flush
//! - Copy-on-write changes stay private
//! - Growable modes extend or recreate the raw file

use sciscan_stack::{AccessMode, SciScanStack, StackError};

use super::test_utils::{descriptor, ramp_bytes, ramp_stack, ramp_value, write_stack};

#[test]
fn test_read_only_rejects_writes() {
    let stack_dir = ramp_stack(4, 4, 1, 2, 0);
    let mut stack = SciScanStack::open(stack_dir.path()).unwrap();

    assert!(!stack.frames().is_writable());
    let err = stack.frames_mut().set(&[0, 0, 0], 1).unwrap_err();
    assert!(matches!(err, StackError::ReadOnly));
}

#[test]
fn test_read_write_round_trip() {
    let stack_dir = ramp_stack(4, 4, 1, 2, 0);

    {
        let mut stack = SciScanStack::open_with_mode(stack_dir.path(), AccessMode::ReadWrite).unwrap();
        stack.frames_mut().set(&[1, 2, 3], 0xBEEF).unwrap();
        stack.frames().flush().unwrap();
    }

    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    assert_eq!(stack.frames().get(&[1, 2, 3]).unwrap(), 0xBEEF);
    // Neighbours untouched
    assert_eq!(stack.frames().get(&[1, 2, 2]).unwrap(), ramp_value(26));
}

#[test]
fn test_copy_on_write_is_private() {
    let stack_dir = ramp_stack(4, 4, 1, 2, 0);

    {
        let mut stack =
            SciScanStack::open_with_mode(stack_dir.path(), AccessMode::CopyOnWrite).unwrap();
        stack.frames_mut().set(&[0, 0, 0], 0xFFFF).unwrap();
        assert_eq!(stack.frames().get(&[0, 0, 0]).unwrap(), 0xFFFF);
        stack.frames().flush().unwrap();
    }

    let stack = SciScanStack::open(stack_dir.path()).unwrap();
    assert_eq!(stack.frames().get(&[0, 0, 0]).unwrap(), ramp_value(0));
}

#[test]
fn test_copy_on_write_short_file_fails() {
    let stack_dir = write_stack(&descriptor(4, 4, 1, 2), &ramp_bytes(10, 0));

    let err = SciScanStack::open_with_mode(stack_dir.path(), AccessMode::CopyOnWrite).unwrap_err();
    assert!(matches!(err, StackError::InsufficientData { .. }));
}

#[test]
fn test_read_write_extends_short_file() {
    let stack_dir = write_stack(&descriptor(4, 4, 1, 2), &ramp_bytes(10, 0));

    let stack = SciScanStack::open_with_mode(stack_dir.path(), AccessMode::ReadWrite).unwrap();
    assert!(stack.warnings().is_empty());
    assert_eq!(stack_dir.raw_len(), 4 * 4 * 2 * 2);

    // Existing samples kept, the rest zero-filled
    assert_eq!(stack.frames().get(&[0, 2, 1]).unwrap(), ramp_value(9));
    assert_eq!(stack.frames().get(&[1, 3, 3]).unwrap(), 0);
}

#[test]
fn test_create_recreates_file() {
    let stack_dir = ramp_stack(4, 4, 1, 2, 6);

    let stack = SciScanStack::open_with_mode(stack_dir.path(), AccessMode::Create).unwrap();
    assert!(stack.warnings().is_empty());
    assert_eq!(stack_dir.raw_len(), 4 * 4 * 2 * 2);
    assert!(stack.frames().to_array().unwrap().iter().all(|&v| v == 0));
}

#[test]
fn test_read_write_oversized_still_warns() {
    let stack_dir = ramp_stack(4, 4, 1, 2, 4);

    let stack = SciScanStack::open_with_mode(stack_dir.path(), AccessMode::ReadWrite).unwrap();
    assert_eq!(stack.warnings().len(), 1);
    // Padding is left alone
    assert_eq!(stack_dir.raw_len(), 4 * 4 * 2 * 2 + 4);
}
