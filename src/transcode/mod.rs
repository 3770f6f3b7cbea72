//! Transcoder Module
//!
//! Converts UTF-16 code units, as handed out by the runtime's string
//! storage, into UTF-8 bytes.
//!
//! ## Responsibilities
//! - Decode surrogate pairs into supplementary code points
//! - Replace unpaired surrogates with U+FFFD (never an error)
//! - Encode runs of 8 same-class units in one step
//!
//! ## Fast Path
//! ```text
//!   units ──► [8 units left?] ──no──────────────────────► scalar tail
//!                  │ yes
//!                  ▼
//!        [no surrogate && one class?] ──no──► scalar until block consumed
//!                  │ yes                            │
//!                  ▼                                │
//!       fixed-width store (8 / 16 / 24 bytes)  ◄────┘ (loop)
//! ```
//!
//! The backend is chosen at build time: NEON intrinsics on aarch64, the
//! portable array encoder everywhere else. Both must agree byte for byte
//! with `scalar::utf16_to_utf8`.

pub mod scalar;

#[cfg(not(target_arch = "aarch64"))]
mod block;
#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(not(target_arch = "aarch64"))]
use block as backend;
#[cfg(target_arch = "aarch64")]
use neon as backend;

pub use scalar::REPLACEMENT;

/// Units processed per fast-path block
pub const LANES: usize = 8;

/// Name of the block backend compiled into this build
pub fn backend_name() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "neon"
    } else {
        "portable"
    }
}

/// Convert UTF-16 code units to UTF-8.
///
/// Every input has a defined output: unpaired surrogates become U+FFFD.
pub fn utf16_to_utf8(units: &[u16]) -> Vec<u8> {
    // Worst case is 3 bytes per unit; a surrogate pair yields 4 bytes for 2 units.
    let mut out = Vec::with_capacity(units.len() * 3);
    utf16_to_utf8_into(units, &mut out);
    out
}

/// Append the UTF-8 encoding of `units` to `out`
pub fn utf16_to_utf8_into(units: &[u16], out: &mut Vec<u8>) {
    out.reserve(units.len() * 3);

    let mut pos = 0;
    while units.len() - pos >= LANES {
        if backend::try_encode_block(&units[pos..pos + LANES], out) {
            pos += LANES;
            continue;
        }

        // Scalar over the rejected block. A pair straddling the block end
        // is consumed whole, so `pos` may end one past the block.
        let block_end = pos + LANES;
        while pos < block_end {
            pos += scalar::encode_one(units, pos, out);
        }
    }

    while pos < units.len() {
        pos += scalar::encode_one(units, pos, out);
    }
}

/// Convert UTF-16 code units to a `String`
pub fn utf16_to_string(units: &[u16]) -> String {
    match String::from_utf8(utf16_to_utf8(units)) {
        Ok(s) => s,
        // Unreachable in practice: every emitted sequence is well-formed.
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Exact number of UTF-8 bytes `utf16_to_utf8` produces for `units`
pub fn utf8_len(units: &[u16]) -> usize {
    let mut len = 0;
    let mut pos = 0;
    while pos < units.len() {
        let (code_point, consumed) = scalar::decode_at(units, pos);
        len += scalar::encoded_len(code_point);
        pos += consumed;
    }
    len
}
