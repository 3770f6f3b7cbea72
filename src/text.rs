//! Text Handle
//!
//! A string holder optimized for zero-copy access to runtime strings.
//!
//! ## States
//! ```text
//!   View { &'a [u8] } ──promote()──► Owned { Vec<u8> }
//!        (borrowed)      exactly once      (self-contained)
//! ```
//!
//! There is no way back from `Owned` to `View`.
//!
//! ## Lifetimes
//! A `View` borrows the runtime's string storage for `'a`. That storage is
//! only stable until the runtime does anything that can move or collect
//! strings, so the glue must tie `'a` to a single native call. Anything
//! that outlives the call has to go through `into_owned()` first; the
//! borrow checker rejects code that forgets to:
//!
//! ```compile_fail
//! use kvbridge::{HostString, TextHandle};
//!
//! let handle;
//! {
//!     let source = HostString::ascii("key");
//!     handle = TextHandle::from_external(&source);
//! }
//! println!("{}", handle.len());
//! ```
//!
//! ```
//! use kvbridge::{HostString, TextHandle};
//!
//! let handle;
//! {
//!     let source = HostString::ascii("key");
//!     handle = TextHandle::from_external(&source).into_owned();
//! }
//! assert_eq!(handle, "key");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::transcode;

/// One contiguous piece of a runtime string's storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// 8-bit, ASCII-compatible data. Copied verbatim.
    Bytes(&'a [u8]),

    /// 16-bit code units. Transcoded to UTF-8.
    Utf16(&'a [u16]),
}

/// Access to a runtime string's internal representation.
///
/// Implementations hand every chunk of the string to `visitor`, in order.
/// A string stored as a single 8-bit chunk lets `TextHandle` skip copying.
pub trait ExternalString {
    fn visit_chunks<'s>(&'s self, visitor: &mut dyn FnMut(Chunk<'s>));
}

impl ExternalString for str {
    fn visit_chunks<'s>(&'s self, visitor: &mut dyn FnMut(Chunk<'s>)) {
        visitor(Chunk::Bytes(self.as_bytes()));
    }
}

impl ExternalString for [u16] {
    fn visit_chunks<'s>(&'s self, visitor: &mut dyn FnMut(Chunk<'s>)) {
        visitor(Chunk::Utf16(self));
    }
}

/// UTF-8 text that is either borrowed from the runtime or owned.
///
/// Cloning a `View` copies the reference, not the bytes.
#[derive(Clone)]
pub struct TextHandle<'a> {
    /// `Borrowed` is the `View` state
    repr: Cow<'a, [u8]>,
}

impl<'a> TextHandle<'a> {
    /// Create a handle borrowing `bytes`
    pub fn view(bytes: &'a [u8]) -> Self {
        Self {
            repr: Cow::Borrowed(bytes),
        }
    }

    /// Create a handle owning `bytes`
    pub fn owned(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            repr: Cow::Owned(bytes.into()),
        }
    }

    /// Build a handle from a runtime string's chunks.
    ///
    /// A single 8-bit chunk yields a `View` with no copy. Anything else is
    /// transcoded and concatenated into an `Owned` handle.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Chunk<'a>>,
    {
        let mut builder = Builder::Empty;
        for chunk in chunks {
            builder.push(chunk);
        }
        builder.finish()
    }

    /// Build a handle from anything exposing its chunks
    pub fn from_external<S>(source: &'a S) -> Self
    where
        S: ExternalString + ?Sized,
    {
        let mut builder = Builder::Empty;
        source.visit_chunks(&mut |chunk| builder.push(chunk));
        builder.finish()
    }

    /// Read-only access to the bytes, whatever the state
    pub fn as_bytes(&self) -> &[u8] {
        &self.repr
    }

    /// The bytes as `str`, if they are valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// The bytes as `str`, replacing invalid sequences
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Owned buffer, promoting a `View` first.
    ///
    /// The first call on a `View` copies; every later call returns the same
    /// buffer.
    pub fn as_owned(&mut self) -> &Vec<u8> {
        self.promote();
        self.repr.to_mut()
    }

    /// Turn a `View` into `Owned`. Returns `true` if bytes were copied.
    pub fn promote(&mut self) -> bool {
        let Cow::Borrowed(bytes) = self.repr else {
            return false;
        };
        tracing::trace!(len = bytes.len(), "promoting text view to owned");
        self.repr = Cow::Owned(bytes.to_vec());
        true
    }

    /// Detach from the runtime's storage so the handle can be kept
    pub fn into_owned(self) -> TextHandle<'static> {
        TextHandle {
            repr: Cow::Owned(self.into_bytes()),
        }
    }

    /// Consume the handle, copying only if it is still a `View`
    pub fn into_bytes(self) -> Vec<u8> {
        self.repr.into_owned()
    }

    pub fn is_view(&self) -> bool {
        matches!(self.repr, Cow::Borrowed(_))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TextHandle<'_> {
    fn default() -> Self {
        Self {
            repr: Cow::Owned(Vec::new()),
        }
    }
}

impl AsRef<[u8]> for TextHandle<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for TextHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TextHandle<'_> {}

impl PartialEq<str> for TextHandle<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for TextHandle<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Hash for TextHandle<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for TextHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_view() { "View" } else { "Owned" };
        f.debug_tuple(state).field(&self.to_str_lossy()).finish()
    }
}

impl fmt::Display for TextHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl<'a> From<&'a str> for TextHandle<'a> {
    fn from(s: &'a str) -> Self {
        Self::view(s.as_bytes())
    }
}

impl From<String> for TextHandle<'_> {
    fn from(s: String) -> Self {
        Self::owned(s.into_bytes())
    }
}

impl From<Vec<u8>> for TextHandle<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self::owned(bytes)
    }
}

/// Accumulates chunks, staying zero-copy while only one 8-bit chunk has
/// been seen.
enum Builder<'a> {
    Empty,
    Single(&'a [u8]),
    Owned(Vec<u8>),
}

impl<'a> Builder<'a> {
    fn push(&mut self, chunk: Chunk<'a>) {
        *self = match std::mem::replace(self, Builder::Empty) {
            Builder::Empty => match chunk {
                Chunk::Bytes(bytes) => Builder::Single(bytes),
                Chunk::Utf16(units) => Builder::Owned(transcode::utf16_to_utf8(units)),
            },
            Builder::Single(first) => {
                let mut buf = Vec::with_capacity(first.len() + chunk_capacity(&chunk));
                buf.extend_from_slice(first);
                append_chunk(&mut buf, chunk);
                Builder::Owned(buf)
            }
            Builder::Owned(mut buf) => {
                append_chunk(&mut buf, chunk);
                Builder::Owned(buf)
            }
        };
    }

    fn finish(self) -> TextHandle<'a> {
        match self {
            Builder::Empty => TextHandle::default(),
            Builder::Single(bytes) => TextHandle::view(bytes),
            Builder::Owned(bytes) => TextHandle::owned(bytes),
        }
    }
}

fn chunk_capacity(chunk: &Chunk<'_>) -> usize {
    match chunk {
        Chunk::Bytes(bytes) => bytes.len(),
        Chunk::Utf16(units) => units.len() * 3,
    }
}

fn append_chunk(buf: &mut Vec<u8>, chunk: Chunk<'_>) {
    match chunk {
        Chunk::Bytes(bytes) => buf.extend_from_slice(bytes),
        Chunk::Utf16(units) => transcode::utf16_to_utf8_into(units, buf),
    }
}
