//! Buffer Adapter Tests
//!
//! Tests verify:
//! - Borrowing adapters expose the lent memory unchanged (no copy)
//! - Writes through an adapter land in the underlying memory
//! - Owning adapters take over their buffer without copying
//! - Detaching a borrowed adapter copies

use std::thread;

use kvbridge::NativeBuffer;

// =============================================================================
// Borrowing Tests
// =============================================================================

#[test]
fn test_borrowed_exposes_pointer_and_len() {
    let mut backing = vec![1u8, 2, 3, 4];
    let ptr = backing.as_mut_ptr();

    let mut buffer = NativeBuffer::from_borrowed(&mut backing);

    assert_eq!(buffer.data(), ptr);
    assert_eq!(buffer.size(), 4);
    assert!(!buffer.is_owner());
    assert_eq!(buffer.as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn test_borrowed_writes_through() {
    let mut backing = [0u8; 4];
    {
        let mut buffer = NativeBuffer::from_borrowed(&mut backing);
        buffer.as_mut_slice().copy_from_slice(b"abcd");
    }

    assert_eq!(&backing, b"abcd");
}

#[test]
fn test_borrowed_write_through_raw_pointer() {
    let mut backing = [0u8; 2];
    {
        let mut buffer = NativeBuffer::from_borrowed(&mut backing);
        // SAFETY: index 1 is within the 2-byte region.
        unsafe { *buffer.data().add(1) = 0x7F };
    }

    assert_eq!(backing, [0, 0x7F]);
}

#[test]
fn test_from_raw_parts() {
    let mut backing = vec![9u8; 16];
    let ptr = backing.as_mut_ptr();

    // SAFETY: `backing` outlives the adapter and is not touched meanwhile.
    let mut buffer = unsafe { NativeBuffer::from_raw_parts(ptr, backing.len()) };

    assert_eq!(buffer.data(), ptr);
    assert_eq!(buffer.size(), 16);
    assert!(!buffer.is_owner());
}

#[test]
fn test_from_raw_parts_null_is_empty() {
    // SAFETY: a null pointer is mapped to an empty region.
    let buffer = unsafe { NativeBuffer::from_raw_parts(std::ptr::null_mut(), 32) };

    assert!(buffer.is_empty());
    assert_eq!(buffer.as_slice(), &[] as &[u8]);
}

#[test]
fn test_borrowed_empty_slice() {
    let mut backing: [u8; 0] = [];
    let buffer = NativeBuffer::from_borrowed(&mut backing);

    assert!(buffer.is_empty());
    assert_eq!(buffer.size(), 0);
}

// =============================================================================
// Owning Tests
// =============================================================================

#[test]
fn test_owned_takes_vec_without_copy() {
    let bytes = vec![5u8; 64];
    let ptr = bytes.as_ptr();

    let buffer = NativeBuffer::from_owned(bytes);

    assert!(buffer.is_owner());
    assert_eq!(buffer.as_ptr(), ptr);
    assert_eq!(buffer.size(), 64);
}

#[test]
fn test_copy_from_slice_allocates() {
    let source = [1u8, 2, 3];
    let buffer = NativeBuffer::copy_from_slice(&source);

    assert!(buffer.is_owner());
    assert_ne!(buffer.as_ptr(), source.as_ptr());
    assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
}

#[test]
fn test_owned_is_mutable() {
    let mut buffer = NativeBuffer::from_owned(vec![0u8; 3]);
    buffer.as_mut()[2] = 42;

    assert_eq!(buffer.as_ref(), &[0, 0, 42]);
}

#[test]
fn test_owned_moves_across_threads() {
    let buffer = NativeBuffer::from_owned(b"payload".to_vec());

    let size = thread::spawn(move || buffer.size()).join().unwrap();

    assert_eq!(size, 7);
}

// =============================================================================
// Detach Tests
// =============================================================================

#[test]
fn test_into_owned_copies_borrowed() {
    let mut backing = b"engine".to_vec();
    let owned = {
        let buffer = NativeBuffer::from_borrowed(&mut backing);
        buffer.into_owned()
    };
    backing[0] = b'E';

    assert!(owned.is_owner());
    assert_eq!(owned.as_slice(), b"engine");
    assert_eq!(backing, b"Engine");
}

#[test]
fn test_into_owned_keeps_owned_allocation() {
    let buffer = NativeBuffer::from_owned(vec![1u8, 2]);
    let ptr = buffer.as_ptr();

    assert_eq!(buffer.into_owned().as_ptr(), ptr);
}

#[test]
fn test_into_vec() {
    let mut backing = [7u8; 3];
    assert_eq!(NativeBuffer::from_borrowed(&mut backing).into_vec(), vec![7, 7, 7]);
    assert_eq!(NativeBuffer::from_owned(vec![1u8]).into_vec(), vec![1]);
}

#[test]
fn test_debug_format() {
    let buffer = NativeBuffer::from_owned(vec![0u8; 5]);
    assert_eq!(format!("{:?}", buffer), "NativeBuffer { owner: true, size: 5 }");
}
