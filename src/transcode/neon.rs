//! NEON block encoder (aarch64)
//!
//! Same contract as the portable encoder in `block.rs`: encode 8 units
//! when they share one encoded-length class, otherwise leave `out` alone
//! and return `false`.

use std::arch::aarch64::*;

use super::LANES;

pub(crate) fn try_encode_block(block: &[u16], out: &mut Vec<u8>) -> bool {
    if block.len() != LANES {
        return false;
    }

    // SAFETY: NEON is part of the aarch64 baseline, `block` holds exactly
    // LANES units, and every store targets a local array of matching size.
    unsafe {
        let units = vld1q_u16(block.as_ptr());
        let mask_3f = vdupq_n_u16(0x3F);
        let cont = vdupq_n_u16(0x80);

        let surrogate = vceqq_u16(vandq_u16(units, vdupq_n_u16(0xF800)), vdupq_n_u16(0xD800));
        if vmaxvq_u16(surrogate) != 0 {
            return false;
        }

        let min = vminvq_u16(units);
        let max = vmaxvq_u16(units);

        if max < 0x80 {
            let mut bytes = [0u8; LANES];
            vst1_u8(bytes.as_mut_ptr(), vmovn_u16(units));
            out.extend_from_slice(&bytes);
            true
        } else if min >= 0x800 {
            let b0 = vmovn_u16(vorrq_u16(vshrq_n_u16::<12>(units), vdupq_n_u16(0xE0)));
            let b1 = vmovn_u16(vorrq_u16(vandq_u16(vshrq_n_u16::<6>(units), mask_3f), cont));
            let b2 = vmovn_u16(vorrq_u16(vandq_u16(units, mask_3f), cont));

            let mut bytes = [0u8; LANES * 3];
            vst3_u8(bytes.as_mut_ptr(), uint8x8x3_t(b0, b1, b2));
            out.extend_from_slice(&bytes);
            true
        } else if min >= 0x80 && max < 0x800 {
            let b0 = vmovn_u16(vorrq_u16(vshrq_n_u16::<6>(units), vdupq_n_u16(0xC0)));
            let b1 = vmovn_u16(vorrq_u16(vandq_u16(units, mask_3f), cont));

            let mut bytes = [0u8; LANES * 2];
            vst2_u8(bytes.as_mut_ptr(), uint8x8x2_t(b0, b1));
            out.extend_from_slice(&bytes);
            true
        } else {
            false
        }
    }
}
