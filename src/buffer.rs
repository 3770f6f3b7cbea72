//! Buffer Adapter
//!
//! Exposes a native byte region to the runtime as a fixed-size buffer.
//!
//! ## Ownership Modes
//! - **Owning**: the adapter holds the only handle to the memory and frees
//!   it exactly once when dropped. Safe to keep for as long as the runtime
//!   keeps the buffer object alive.
//! - **Borrowing (no-copy)**: the adapter wraps memory owned by the storage
//!   engine or the runtime and never frees it. Valid for `'a` only, which
//!   the glue ties to the call (or native object) that lent the memory.
//!
//! There is no resizing and no copy-on-write. Writes through `data()` land
//! directly in the wrapped memory.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

enum Storage {
    Owned(Vec<u8>),
    Borrowed { ptr: NonNull<u8>, len: usize },
}

/// A byte region handed to the runtime
pub struct NativeBuffer<'a> {
    storage: Storage,
    _borrow: PhantomData<&'a mut [u8]>,
}

// SAFETY: an owning adapter is a `Vec<u8>`; a borrowing adapter behaves like
// the `&'a mut [u8]` it was created from, which is `Send + Sync`.
unsafe impl Send for NativeBuffer<'_> {}
unsafe impl Sync for NativeBuffer<'_> {}

impl NativeBuffer<'static> {
    /// Take ownership of `bytes`. No copy for `Vec<u8>` / `Box<[u8]>`.
    pub fn from_owned(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            storage: Storage::Owned(bytes.into()),
            _borrow: PhantomData,
        }
    }

    /// Copy `bytes` into a new owning adapter
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self::from_owned(bytes.to_vec())
    }
}

impl<'a> NativeBuffer<'a> {
    /// Wrap `bytes` without copying. The adapter cannot outlive the borrow.
    pub fn from_borrowed(bytes: &'a mut [u8]) -> Self {
        let len = bytes.len();
        Self {
            storage: Storage::Borrowed {
                ptr: NonNull::from(bytes).cast::<u8>(),
                len,
            },
            _borrow: PhantomData,
        }
    }

    /// Wrap a raw region without copying. A null `ptr` yields an empty buffer.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes for all of
    /// `'a`, and nothing else may access that memory while the adapter is
    /// alive.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        let storage = match NonNull::new(ptr) {
            Some(ptr) => Storage::Borrowed { ptr, len },
            None => Storage::Borrowed {
                ptr: NonNull::dangling(),
                len: 0,
            },
        };
        Self {
            storage,
            _borrow: PhantomData,
        }
    }

    /// Mutable pointer to the first byte
    pub fn data(&mut self) -> *mut u8 {
        match &mut self.storage {
            Storage::Owned(bytes) => bytes.as_mut_ptr(),
            Storage::Borrowed { ptr, .. } => ptr.as_ptr(),
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        match &self.storage {
            Storage::Owned(bytes) => bytes.as_ptr(),
            Storage::Borrowed { ptr, .. } => ptr.as_ptr(),
        }
    }

    pub fn size(&self) -> usize {
        match &self.storage {
            Storage::Owned(bytes) => bytes.len(),
            Storage::Borrowed { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether dropping this adapter frees the memory
    pub fn is_owner(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(bytes) => bytes,
            // SAFETY: guaranteed valid for `len` bytes by the constructor's contract.
            Storage::Borrowed { ptr, len } => unsafe {
                std::slice::from_raw_parts(ptr.as_ptr(), *len)
            },
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(bytes) => bytes,
            // SAFETY: exclusive access for `'a` is part of the constructor's contract.
            Storage::Borrowed { ptr, len } => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Consume the adapter, copying only if it is borrowing
    pub fn into_vec(self) -> Vec<u8> {
        match self.storage {
            Storage::Owned(bytes) => bytes,
            Storage::Borrowed { .. } => self.as_slice().to_vec(),
        }
    }

    /// Detach from borrowed memory by copying it. Owning adapters move as-is.
    pub fn into_owned(self) -> NativeBuffer<'static> {
        match self.storage {
            Storage::Owned(bytes) => NativeBuffer::from_owned(bytes),
            Storage::Borrowed { .. } => NativeBuffer::copy_from_slice(self.as_slice()),
        }
    }
}

impl AsRef<[u8]> for NativeBuffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for NativeBuffer<'_> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for NativeBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBuffer")
            .field("owner", &self.is_owner())
            .field("size", &self.size())
            .finish()
    }
}
