//! Analog-to-digital converter abstraction
//!
//! The converter writes samples into a destination buffer through DMA and
//! reports progress through a small set of events. The driver never touches
//! the sample data itself; the sampler that owns the blocks reads them once a
//! block is reported complete.

use crate::dma::DmaTarget;

/// One converter sample: native resolution, sign-extended to 16 bits.
pub type Sample = i16;

/// Events raised by the converter from interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConverterEvent {
    /// Converter is initialised and has a buffer; sampling may begin.
    Ready,
    /// Converter needs its *next* buffer while the current one is filling.
    BufferRequest,
    /// The buffer in `slot` holds `len` fresh samples.
    Done {
        /// Rotating block index the converter wrote into.
        slot: usize,
        /// Number of samples written.
        len: usize,
    },
    /// Any other driver event, identified by its raw event code.
    Unhandled(u8),
}

/// Converter driver trait
pub trait Converter {
    /// Error type
    type Error: core::fmt::Debug;

    /// Queue `target` as the next destination buffer.
    ///
    /// `slot` identifies the block; it is echoed back in
    /// [`ConverterEvent::Done`] once the buffer is full.
    fn queue_buffer(&mut self, slot: usize, target: DmaTarget) -> Result<(), Self::Error>;

    /// Arm the converter. Sampling does not start here: the converter raises
    /// [`ConverterEvent::Ready`] and waits for hardware sample requests.
    fn trigger(&mut self) -> Result<(), Self::Error>;

    /// Number of buffers the converter can hold queued at once (current + next).
    fn queue_depth(&self) -> usize {
        2
    }
}
