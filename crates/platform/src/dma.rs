//! DMA destination handles
//!
//! Converters fill sample blocks by DMA long after the call that queued them
//! has returned, so the handle passed to a driver cannot carry a borrow. A
//! [`DmaTarget`] is a raw pointer + length pair whose validity is guaranteed by
//! whoever created it.

use core::ptr::NonNull;

use crate::converter::Sample;

/// Raw DMA destination for one sample block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaTarget {
    ptr: NonNull<Sample>,
    len: usize,
}

// SAFETY: the handle is only an address; the creator of the handle upholds
// the aliasing contract documented on `DmaTarget::new`.
unsafe impl Send for DmaTarget {}

impl DmaTarget {
    /// Create a DMA target covering `buffer`.
    ///
    /// # Safety
    ///
    /// The buffer must stay valid, and must not move, for as long as any
    /// driver may write through this handle. No other code may read the
    /// buffer while the hardware owns it.
    pub unsafe fn new(buffer: &mut [Sample]) -> Self {
        let len = buffer.len();
        Self {
            ptr: NonNull::from(buffer).cast(),
            len,
        }
    }

    /// Get buffer pointer
    #[must_use]
    pub fn as_mut_ptr(&self) -> *mut Sample {
        self.ptr.as_ptr()
    }

    /// Buffer capacity in samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View the first `len` samples (clamped to the buffer length).
    ///
    /// # Safety
    ///
    /// The hardware must have finished writing the buffer and must not be
    /// given it again while the returned slice is alive.
    #[must_use]
    pub unsafe fn filled<'b>(&self, len: usize) -> &'b [Sample] {
        // SAFETY: ptr/len describe a live buffer per the `new` contract, and
        // the caller guarantees no concurrent DMA write.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), len.min(self.len)) }
    }

    /// Buffer capacity in bytes, as programmed into the DMA length register.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // Safety: len comes from a real slice; byte size fits usize
    pub fn byte_len(&self) -> usize {
        self.len * core::mem::size_of::<Sample>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_reports_sample_and_byte_length() {
        let mut block = [0 as Sample; 40];
        // SAFETY: block outlives the handle and nothing writes through it.
        let target = unsafe { DmaTarget::new(&mut block) };
        assert_eq!(target.len(), 40);
        assert_eq!(target.byte_len(), 80);
        assert!(!target.is_empty());
        assert_eq!(target.as_mut_ptr(), block.as_mut_ptr());
    }
}
