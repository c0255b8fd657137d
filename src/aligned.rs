//! Aligned heap buffers with scoped release.
//!
//! The harness requires 32-byte aligned matrix storage (64-byte under the
//! `wide-align` feature, for wide-memory hardware profiles). Allocation
//! failure surfaces as a [`MedirError`] so the orchestrator can abort the
//! run cleanly; deallocation is tied to `Drop`, so every exit path —
//! including the fatal ones — releases the buffer.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::{MedirError, Result};

/// Buffer alignment in bytes.
#[cfg(not(feature = "wide-align"))]
pub const ALIGNMENT: usize = 32;

/// Buffer alignment in bytes (wide-memory profile).
#[cfg(feature = "wide-align")]
pub const ALIGNMENT: usize = 64;

/// Owned, zero-initialized, [`ALIGNMENT`]-aligned heap buffer.
///
/// # Examples
///
/// ```
/// use medir::aligned::{AlignedBuf, ALIGNMENT};
///
/// let buf = AlignedBuf::<f64>::new(16).unwrap();
/// assert_eq!(buf.len(), 16);
/// assert_eq!(buf.as_slice().as_ptr() as usize % ALIGNMENT, 0);
/// assert!(buf.as_slice().iter().all(|&x| x == 0.0));
/// ```
#[derive(Debug)]
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// The buffer is exclusively owned; sending it between threads or sharing
// immutable views is safe whenever T itself is.
unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}

impl<T: Copy> AlignedBuf<T> {
    /// Allocate a zeroed buffer of `len` elements.
    ///
    /// # Errors
    ///
    /// Returns [`MedirError::AllocationFailed`] if `len` is zero, the
    /// layout overflows, or the allocator returns null.
    pub fn new(len: usize) -> Result<Self> {
        let bytes = len
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(MedirError::AllocationFailed {
                bytes: usize::MAX,
                align: ALIGNMENT,
            })?;
        if bytes == 0 {
            return Err(MedirError::AllocationFailed {
                bytes: 0,
                align: ALIGNMENT,
            });
        }
        let layout = Layout::from_size_align(bytes, ALIGNMENT).map_err(|_| {
            MedirError::AllocationFailed {
                bytes,
                align: ALIGNMENT,
            }
        })?;
        // SAFETY: layout has non-zero size and a valid power-of-two alignment.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(MedirError::AllocationFailed {
            bytes,
            align: ALIGNMENT,
        })?;
        Ok(Self { ptr, len, layout })
    }

    /// Number of elements in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements. Always false for a
    /// successfully constructed buffer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Immutable view of the whole buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len elements for the lifetime of self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutable view of the whole buffer.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: ptr is valid for len elements and we hold &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        // SAFETY: ptr was allocated with exactly this layout in `new`.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout);
        }
    }
}
