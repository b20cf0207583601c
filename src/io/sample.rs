// =============================================================================
// Sample Encoding
// =============================================================================
//
// SciScan writes pixels as big-endian unsigned 16-bit integers with no header.
// These helpers decode and encode single samples in place.

/// Size of one pixel sample in bytes.
pub const SAMPLE_SIZE: usize = 2;

/// Decode the sample stored at the start of `bytes`; trailing bytes are
/// ignored.
///
/// # Panics
/// Panics if `bytes` is shorter than [`SAMPLE_SIZE`].
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Write a big-endian u16 into a byte slice.
///
/// # Panics
/// Panics if the slice has fewer than 2 bytes.
#[inline]
pub fn write_u16_be(bytes: &mut [u8], value: u16) {
    bytes[..SAMPLE_SIZE].copy_from_slice(&value.to_be_bytes());
}

/// Decode a run of big-endian samples into native integers.
pub fn decode_samples(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(SAMPLE_SIZE).map(read_u16_be).collect()
}
