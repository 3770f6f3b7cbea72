//! Portable 8-lane block encoder
//!
//! Works on fixed `[u16; 8]` / `[u8; 24]` arrays so the compiler can keep
//! each block in vector registers. Used on every target without a
//! dedicated intrinsics backend.

use super::LANES;

/// Encoded-length class shared by every unit of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockClass {
    /// All units < 0x80
    Ascii,
    /// All units in [0x80, 0x800)
    TwoByte,
    /// All units in [0x800, 0xFFFF], none a surrogate
    ThreeByte,
    /// Surrogates or a mix of classes; must go through the scalar path
    Mixed,
}

pub(crate) fn classify(block: &[u16; LANES]) -> BlockClass {
    let mut min = u16::MAX;
    let mut max = 0u16;
    let mut surrogates = 0u16;

    for &unit in block {
        min = min.min(unit);
        max = max.max(unit);
        surrogates |= ((unit & 0xF800) == 0xD800) as u16;
    }

    if surrogates != 0 {
        BlockClass::Mixed
    } else if max < 0x80 {
        BlockClass::Ascii
    } else if min >= 0x800 {
        BlockClass::ThreeByte
    } else if min >= 0x80 && max < 0x800 {
        BlockClass::TwoByte
    } else {
        BlockClass::Mixed
    }
}

/// Encode one block if it is uniform. Returns `false` for mixed blocks,
/// leaving `out` untouched.
pub(crate) fn try_encode_block(block: &[u16], out: &mut Vec<u8>) -> bool {
    let block: &[u16; LANES] = match block.try_into() {
        Ok(block) => block,
        Err(_) => return false,
    };

    match classify(block) {
        BlockClass::Ascii => {
            let mut bytes = [0u8; LANES];
            for (dst, &unit) in bytes.iter_mut().zip(block) {
                *dst = unit as u8;
            }
            out.extend_from_slice(&bytes);
            true
        }
        BlockClass::TwoByte => {
            let mut bytes = [0u8; LANES * 2];
            for (dst, &unit) in bytes.chunks_exact_mut(2).zip(block) {
                dst[0] = 0xC0 | (unit >> 6) as u8;
                dst[1] = 0x80 | (unit & 0x3F) as u8;
            }
            out.extend_from_slice(&bytes);
            true
        }
        BlockClass::ThreeByte => {
            let mut bytes = [0u8; LANES * 3];
            for (dst, &unit) in bytes.chunks_exact_mut(3).zip(block) {
                dst[0] = 0xE0 | (unit >> 12) as u8;
                dst[1] = 0x80 | ((unit >> 6) & 0x3F) as u8;
                dst[2] = 0x80 | (unit & 0x3F) as u8;
            }
            out.extend_from_slice(&bytes);
            true
        }
        BlockClass::Mixed => false,
    }
}
