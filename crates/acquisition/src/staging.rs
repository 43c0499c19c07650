//! Staging slot between the converter interrupt and the streaming task
//!
//! One block deep, last write wins. `stage` copies the finished block in and
//! raises an idempotent wake; the deferred task copies the latest content out
//! and transports its private copy. Both copies happen inside a short critical
//! section, so a reader sees one whole block or the next one, never a mix of
//! two. A block staged while the previous one was still pending replaces it
//! and is counted as overwritten.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use platform::Sample;

struct Slot<const CAP: usize> {
    samples: [Sample; CAP],
    len: usize,
    pending: bool,
    staged: u32,
    overwritten: u32,
}

/// Single-slot, overwrite-on-write handoff buffer.
pub struct StagingSlot<const CAP: usize> {
    slot: Mutex<CriticalSectionRawMutex, RefCell<Slot<CAP>>>,
    ready: Signal<CriticalSectionRawMutex, ()>,
}

impl<const CAP: usize> StagingSlot<CAP> {
    /// Create an empty slot. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Slot {
                samples: [0; CAP],
                len: 0,
                pending: false,
                staged: 0,
                overwritten: 0,
            })),
            ready: Signal::new(),
        }
    }

    /// Copy `block` into the slot and wake the deferred task.
    ///
    /// Non-blocking and O(len). Copies at most `CAP` samples and returns the
    /// number copied. Safe to call from interrupt context.
    pub fn stage(&self, block: &[Sample]) -> usize {
        let len = block.len().min(CAP);
        let replaced = self.slot.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let replaced = slot.pending;
            if let (Some(dst), Some(src)) = (slot.samples.get_mut(..len), block.get(..len)) {
                dst.copy_from_slice(src);
            }
            slot.len = len;
            slot.pending = true;
            slot.staged = slot.staged.wrapping_add(1);
            if replaced {
                slot.overwritten = slot.overwritten.wrapping_add(1);
            }
            replaced
        });
        if replaced {
            trace!("staging: undrained block overwritten");
        }
        self.ready.signal(());
        len
    }

    /// Copy the pending block into `out` and mark the slot drained.
    ///
    /// Returns the number of samples copied, or `None` when nothing new was
    /// staged since the last drain.
    pub fn try_drain(&self, out: &mut [Sample]) -> Option<usize> {
        self.slot.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if !slot.pending {
                return None;
            }
            slot.pending = false;
            let len = slot.len.min(out.len());
            if let (Some(dst), Some(src)) = (out.get_mut(..len), slot.samples.get(..len)) {
                dst.copy_from_slice(src);
            }
            Some(len)
        })
    }

    /// Wait for a staged block and drain it into `out`.
    pub async fn drain(&self, out: &mut [Sample]) -> usize {
        loop {
            if let Some(len) = self.try_drain(out) {
                self.ready.reset();
                return len;
            }
            self.ready.wait().await;
        }
    }

    /// Whether a staged block is waiting.
    pub fn is_pending(&self) -> bool {
        self.slot.lock(|cell| cell.borrow().pending)
    }

    /// Blocks staged since start.
    pub fn staged(&self) -> u32 {
        self.slot.lock(|cell| cell.borrow().staged)
    }

    /// Blocks replaced before the deferred task drained them.
    pub fn overwritten(&self) -> u32 {
        self.slot.lock(|cell| cell.borrow().overwritten)
    }
}

impl<const CAP: usize> Default for StagingSlot<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    // ── Test A ── second stage before drain wins ────────────────────────────
    #[test]
    fn test_last_write_wins() {
        let staging = StagingSlot::<8>::new();
        staging.stage(&[1, 1, 1, 1, 1, 1]);
        staging.stage(&[2, 2, 2]);

        let mut out = [0; 8];
        assert_eq!(staging.try_drain(&mut out), Some(3));
        assert_eq!(&out[..3], &[2, 2, 2]);
        assert_eq!(staging.overwritten(), 1);
        assert_eq!(staging.staged(), 2);
    }

    // ── Test B ── nothing pending after a drain ─────────────────────────────
    #[test]
    fn test_drain_clears_pending() {
        let staging = StagingSlot::<4>::new();
        staging.stage(&[7, 8]);
        let mut out = [0; 4];
        assert!(staging.try_drain(&mut out).is_some());
        assert!(!staging.is_pending());
        assert_eq!(staging.try_drain(&mut out), None);
    }

    // ── Test C ── oversize blocks are clipped to capacity ───────────────────
    #[test]
    fn test_stage_clips_to_capacity() {
        let staging = StagingSlot::<4>::new();
        assert_eq!(staging.stage(&[1, 2, 3, 4, 5, 6]), 4);
        let mut out = [0; 4];
        assert_eq!(staging.try_drain(&mut out), Some(4));
        assert_eq!(out, [1, 2, 3, 4]);
    }

    // ── Test D ── the wake is idempotent, one drain per burst ───────────────
    #[tokio::test]
    async fn test_drain_wakes_once_for_burst() {
        let staging = StagingSlot::<4>::new();
        staging.stage(&[1]);
        staging.stage(&[2]);
        staging.stage(&[3, 3]);

        let mut out = [0; 4];
        assert_eq!(staging.drain(&mut out).await, 2);
        assert_eq!(&out[..2], &[3, 3]);
        assert!(!staging.is_pending());
        assert_eq!(staging.overwritten(), 2);
    }
}
