//! Host string model
//!
//! Stand-in for a runtime string object: a sequence of 8-bit and 16-bit
//! segments, the way engines store ropes and concatenation results. The
//! binding glue never builds these itself; they exist so the text handle
//! can be driven through the same chunk protocol a real runtime uses.

use crate::text::{Chunk, ExternalString};

/// One storage segment of a `HostString`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostChunk {
    /// 8-bit, ASCII-compatible code units
    Latin1(Vec<u8>),

    /// 16-bit code units, possibly with unpaired surrogates
    Utf16(Vec<u16>),
}

/// A runtime string stored as one or more chunks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostString {
    chunks: Vec<HostChunk>,
}

impl HostString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single 8-bit chunk holding `s`'s bytes
    pub fn ascii(s: &str) -> Self {
        Self {
            chunks: vec![HostChunk::Latin1(s.as_bytes().to_vec())],
        }
    }

    /// Single 16-bit chunk holding `s` re-encoded as UTF-16
    pub fn utf16(s: &str) -> Self {
        Self {
            chunks: vec![HostChunk::Utf16(s.encode_utf16().collect())],
        }
    }

    /// Single 16-bit chunk with raw units, well-formed or not
    pub fn from_units(units: Vec<u16>) -> Self {
        Self {
            chunks: vec![HostChunk::Utf16(units)],
        }
    }

    pub fn from_chunks(chunks: Vec<HostChunk>) -> Self {
        Self { chunks }
    }

    /// Append an 8-bit segment (rope concatenation)
    pub fn push_ascii(&mut self, s: &str) -> &mut Self {
        self.chunks.push(HostChunk::Latin1(s.as_bytes().to_vec()));
        self
    }

    /// Append a 16-bit segment (rope concatenation)
    pub fn push_utf16(&mut self, s: &str) -> &mut Self {
        self.chunks.push(HostChunk::Utf16(s.encode_utf16().collect()));
        self
    }

    pub fn chunks(&self) -> &[HostChunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl ExternalString for HostString {
    fn visit_chunks<'s>(&'s self, visitor: &mut dyn FnMut(Chunk<'s>)) {
        for chunk in &self.chunks {
            match chunk {
                HostChunk::Latin1(bytes) => visitor(Chunk::Bytes(bytes)),
                HostChunk::Utf16(units) => visitor(Chunk::Utf16(units)),
            }
        }
    }
}
