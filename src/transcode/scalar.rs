//! Scalar UTF-16 decoding
//!
//! The reference algorithm. The block fast path must produce exactly the
//! bytes this module produces for every input.

/// U+FFFD, emitted for every unpaired surrogate
pub const REPLACEMENT: u32 = 0xFFFD;

#[inline]
pub fn is_high_surrogate(unit: u16) -> bool {
    (unit & 0xFC00) == 0xD800
}

#[inline]
pub fn is_low_surrogate(unit: u16) -> bool {
    (unit & 0xFC00) == 0xDC00
}

#[inline]
pub fn is_surrogate(unit: u16) -> bool {
    (unit & 0xF800) == 0xD800
}

#[inline]
fn combine_surrogates(high: u16, low: u16) -> u32 {
    ((((high & 0x3FF) as u32) << 10) | ((low & 0x3FF) as u32)) + 0x10000
}

/// Decode the code point starting at `pos`.
///
/// Returns the code point and the number of units consumed (1 or 2).
/// `pos` must be in bounds.
#[inline]
pub fn decode_at(units: &[u16], pos: usize) -> (u32, usize) {
    let unit = units[pos];

    if is_high_surrogate(unit) {
        match units.get(pos + 1) {
            Some(&next) if is_low_surrogate(next) => (combine_surrogates(unit, next), 2),
            _ => (REPLACEMENT, 1),
        }
    } else if is_low_surrogate(unit) {
        (REPLACEMENT, 1)
    } else {
        (unit as u32, 1)
    }
}

/// Number of UTF-8 bytes needed for `code_point`
#[inline]
pub fn encoded_len(code_point: u32) -> usize {
    match code_point {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        _ => 4,
    }
}

/// Append the UTF-8 encoding of `code_point` to `out`
#[inline]
pub fn push_code_point(code_point: u32, out: &mut Vec<u8>) {
    let cp = code_point;
    match encoded_len(cp) {
        1 => out.push(cp as u8),
        2 => out.extend_from_slice(&[0xC0 | (cp >> 6) as u8, 0x80 | (cp & 0x3F) as u8]),
        3 => out.extend_from_slice(&[
            0xE0 | (cp >> 12) as u8,
            0x80 | ((cp >> 6) & 0x3F) as u8,
            0x80 | (cp & 0x3F) as u8,
        ]),
        _ => out.extend_from_slice(&[
            0xF0 | (cp >> 18) as u8,
            0x80 | ((cp >> 12) & 0x3F) as u8,
            0x80 | ((cp >> 6) & 0x3F) as u8,
            0x80 | (cp & 0x3F) as u8,
        ]),
    }
}

/// Encode the code point at `pos` into `out`, returning the units consumed
#[inline]
pub(crate) fn encode_one(units: &[u16], pos: usize, out: &mut Vec<u8>) -> usize {
    let (code_point, consumed) = decode_at(units, pos);
    push_code_point(code_point, out);
    consumed
}

/// Append the UTF-8 encoding of `units` to `out`, one code point at a time
pub fn utf16_to_utf8_into(units: &[u16], out: &mut Vec<u8>) {
    let mut pos = 0;
    while pos < units.len() {
        pos += encode_one(units, pos, out);
    }
}

/// Convert `units` to UTF-8 without the block fast path
pub fn utf16_to_utf8(units: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len() * 3);
    utf16_to_utf8_into(units, &mut out);
    out
}
