//! Double-buffered sampler
//!
//! Owns N rotating sample blocks and feeds them to the converter round-robin.
//! [`Sampler::handle`] is the converter interrupt body:
//!
//! | Event            | Action                                            |
//! |------------------|---------------------------------------------------|
//! | `Ready`          | start the fabric's sample timer                   |
//! | `BufferRequest`  | queue the next block (slot `k mod N`)             |
//! | `Done{slot,len}` | diagnostics, copy into the staging slot           |
//! | `Unhandled(_)`   | log, nothing else                                 |
//!
//! A block is hardware-owned from the moment it is queued until its `Done`;
//! the staging copy happens inside the `Done` handling, before the converter
//! can be handed that block again.

use core::marker::PhantomData;

use platform::{
    AcquisitionConfig, ConfigError, Converter, ConverterEvent, DmaTarget, EventRouter, Sample,
    SampleClock,
};

use crate::fabric::TriggerFabric;
use crate::staging::StagingSlot;
use crate::stats::BlockStats;

/// Sampler setup and control errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerError {
    /// Configuration does not fit this sampler's block layout.
    #[error("invalid acquisition configuration: {0}")]
    Config(#[from] ConfigError),
    /// Configured buffer count differs from the compiled block count.
    #[error("configured {configured} buffers, sampler owns {owned}")]
    BufferMismatch {
        /// `AcquisitionConfig::buffer_count`
        configured: usize,
        /// Compiled block count
        owned: usize,
    },
    /// Converter refused a buffer.
    #[error("converter rejected a buffer")]
    Queue,
    /// Converter refused to arm.
    #[error("converter trigger failed")]
    Trigger,
}

/// What a converter event resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handled {
    /// Sample timer started.
    Started,
    /// Block `slot` handed to the converter as its next buffer.
    Queued(usize),
    /// Block `slot` completed and was staged.
    Completed {
        /// Completed block index.
        slot: usize,
        /// Diagnostics over the staged samples (`None` for an empty block).
        stats: Option<BlockStats>,
    },
    /// Event ignored.
    Ignored,
    /// The converter did not accept the next buffer; it will stall.
    Stalled,
}

/// Rotating-buffer sampler over `N` blocks of `CAP` samples.
pub struct Sampler<'a, V, C, const CAP: usize, const N: usize> {
    converter: V,
    fabric: TriggerFabric<C>,
    blocks: [DmaTarget; N],
    next_slot: usize,
    completed: u64,
    _blocks: PhantomData<&'a mut [[Sample; CAP]; N]>,
}

impl<'a, V, C, const CAP: usize, const N: usize> Sampler<'a, V, C, CAP, N>
where
    V: Converter,
    C: SampleClock,
{
    /// Take ownership of `blocks` for the sampler's lifetime.
    ///
    /// Only the first `config.block_size` samples of each block are handed
    /// to the converter.
    pub fn new(
        converter: V,
        fabric: TriggerFabric<C>,
        blocks: &'a mut [[Sample; CAP]; N],
        config: &AcquisitionConfig,
    ) -> Result<Self, SamplerError> {
        Self::check_config(config)?;
        let block_size = config.block_size;
        let blocks = blocks.each_mut().map(|block| {
            let logical = block.get_mut(..block_size).unwrap_or_default();
            // SAFETY: the blocks are borrowed mutably for 'a, which outlives
            // the sampler, so they cannot move and nothing else can touch them.
            // From here on they are only accessed through these handles.
            unsafe { DmaTarget::new(logical) }
        });
        Ok(Self {
            converter,
            fabric,
            blocks,
            next_slot: 0,
            completed: 0,
            _blocks: PhantomData,
        })
    }

    /// Check `config` against this sampler's block layout without building
    /// anything.
    pub fn check_config(config: &AcquisitionConfig) -> Result<(), SamplerError> {
        config.validate(CAP)?;
        if config.buffer_count != N {
            return Err(SamplerError::BufferMismatch {
                configured: config.buffer_count,
                owned: N,
            });
        }
        Ok(())
    }

    /// Tear down: stop the timer, free the routing channels and hand back
    /// the converter and timer.
    pub fn release<R: EventRouter>(self, router: &mut R) -> (V, C) {
        let clock = self.fabric.release(router);
        (self.converter, clock)
    }

    /// Queue the first buffers (up to the converter's queue depth).
    pub fn prime(&mut self) -> Result<(), SamplerError> {
        let depth = self.converter.queue_depth().clamp(1, N);
        for _ in 0..depth {
            self.queue_next().map_err(|_| SamplerError::Queue)?;
        }
        debug!("sampler: {} buffers primed", depth);
        Ok(())
    }

    /// Arm the converter. Sampling starts once it reports `Ready`.
    pub fn trigger(&mut self) -> Result<(), SamplerError> {
        self.converter.trigger().map_err(|_| {
            error!("sampler: converter trigger failed");
            SamplerError::Trigger
        })
    }

    /// Handle one converter event. Never blocks.
    pub fn handle(&mut self, event: ConverterEvent, staging: &StagingSlot<CAP>) -> Handled {
        match event {
            ConverterEvent::Ready => {
                self.fabric.start();
                Handled::Started
            }
            ConverterEvent::BufferRequest => match self.queue_next() {
                Ok(slot) => Handled::Queued(slot),
                Err(()) => Handled::Stalled,
            },
            ConverterEvent::Done { slot, len } => self.complete(slot, len, staging),
            ConverterEvent::Unhandled(code) => {
                info!("sampler: unhandled converter event {}", code);
                Handled::Ignored
            }
        }
    }

    /// Blocks completed since start.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Slot the next `BufferRequest` will queue.
    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    /// The trigger fabric driving this sampler.
    pub fn fabric(&self) -> &TriggerFabric<C> {
        &self.fabric
    }

    /// The converter driver.
    pub fn converter(&self) -> &V {
        &self.converter
    }

    /// Mutable access to the converter driver.
    pub fn converter_mut(&mut self) -> &mut V {
        &mut self.converter
    }

    fn queue_next(&mut self) -> Result<usize, ()> {
        let slot = self.next_slot;
        let target = *self.blocks.get(slot).ok_or(())?;
        if self.converter.queue_buffer(slot, target).is_err() {
            error!("sampler: converter rejected block {}", slot);
            return Err(());
        }
        self.next_slot = slot.wrapping_add(1).checked_rem(N).unwrap_or(0);
        trace!("sampler: block {} queued", slot);
        Ok(slot)
    }

    fn complete(&mut self, slot: usize, len: usize, staging: &StagingSlot<CAP>) -> Handled {
        let Some(target) = self.blocks.get(slot) else {
            warn!("sampler: completion for unknown block {}", slot);
            return Handled::Ignored;
        };
        let expected = self.completed.checked_rem(N as u64).unwrap_or(0);
        if expected != slot as u64 {
            warn!("sampler: block {} completed, expected {}", slot, expected);
        }

        // SAFETY: the converter reported this block done and it is not
        // re-queued until a later BufferRequest, which cannot be handled
        // while this borrow is alive.
        let samples = unsafe { target.filled(len) };
        let stats = BlockStats::compute(samples);
        if let Some(s) = stats {
            info!(
                "block {}: AVG {} MIN {} MAX {} ({} samples)",
                slot, s.average, s.min, s.max, s.len
            );
        }
        staging.stage(samples);
        self.completed = self.completed.wrapping_add(1);
        Handled::Completed { slot, stats }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use platform::mocks::{MockClock, MockConverter, MockRouter};

    const CAP: usize = 8;

    fn config(block_size: usize, buffers: usize) -> AcquisitionConfig {
        AcquisitionConfig {
            sample_rate_hz: 1000,
            block_size,
            buffer_count: buffers,
            chunk_samples: 4,
        }
    }

    fn fabric() -> TriggerFabric<MockClock> {
        let mut router = MockRouter::default();
        TriggerFabric::configure(MockClock::new(), &mut router, &config(CAP, 2)).unwrap()
    }

    #[test]
    fn test_prime_queues_converter_depth() {
        let mut blocks = [[0; CAP]; 3];
        let mut sampler =
            Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(CAP, 3)).unwrap();
        sampler.prime().unwrap();
        assert_eq!(sampler.converter().queued_slots(), vec![0, 1]);
        assert_eq!(sampler.next_slot(), 2);
    }

    #[test]
    fn test_ready_starts_timer() {
        let mut blocks = [[0; CAP]; 2];
        let staging = StagingSlot::<CAP>::new();
        let mut sampler =
            Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(CAP, 2)).unwrap();
        assert!(!sampler.fabric().is_running());
        assert_eq!(sampler.handle(ConverterEvent::Ready, &staging), Handled::Started);
        assert!(sampler.fabric().is_running());
    }

    #[test]
    fn test_unhandled_event_changes_nothing() {
        let mut blocks = [[0; CAP]; 2];
        let staging = StagingSlot::<CAP>::new();
        let mut sampler =
            Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(CAP, 2)).unwrap();
        sampler.prime().unwrap();
        assert_eq!(sampler.handle(ConverterEvent::Unhandled(9), &staging), Handled::Ignored);
        assert_eq!(sampler.next_slot(), 0);
        assert!(!sampler.fabric().is_running());
        assert!(!staging.is_pending());
    }

    #[test]
    fn test_buffer_count_must_match_blocks() {
        let mut blocks = [[0; CAP]; 2];
        let err = Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(CAP, 3))
            .err()
            .unwrap();
        assert_eq!(err, SamplerError::BufferMismatch { configured: 3, owned: 2 });
    }

    #[test]
    fn test_block_size_above_capacity_is_rejected() {
        let mut blocks = [[0; CAP]; 2];
        let err = Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(CAP + 1, 2))
            .err()
            .unwrap();
        assert!(matches!(err, SamplerError::Config(ConfigError::BlockSize { .. })));
    }

    #[test]
    fn test_release_frees_routes_and_stops_timer() {
        let mut blocks = [[0; CAP]; 2];
        let staging = StagingSlot::<CAP>::new();
        let mut router = MockRouter::default();
        let fabric =
            TriggerFabric::configure(MockClock::new(), &mut router, &config(CAP, 2)).unwrap();
        let mut sampler =
            Sampler::new(MockConverter::new(), fabric, &mut blocks, &config(CAP, 2)).unwrap();
        sampler.handle(ConverterEvent::Ready, &staging);

        let (_, clock) = sampler.release(&mut router);

        assert!(!clock.is_enabled());
        assert!(router.allocated().is_empty());
        assert!(router.enabled().is_empty());
    }

    #[test]
    fn test_check_config_matches_new() {
        type S<'a> = Sampler<'a, MockConverter, MockClock, CAP, 2>;
        assert_eq!(S::check_config(&config(CAP, 2)), Ok(()));
        assert_eq!(
            S::check_config(&config(CAP, 3)),
            Err(SamplerError::BufferMismatch { configured: 3, owned: 2 })
        );
    }

    #[test]
    fn test_rejected_buffer_reports_stall() {
        let mut blocks = [[0; CAP]; 2];
        let staging = StagingSlot::<CAP>::new();
        let mut converter = MockConverter::new();
        converter.fail_queue();
        let mut sampler = Sampler::new(converter, fabric(), &mut blocks, &config(CAP, 2)).unwrap();
        assert_eq!(sampler.prime(), Err(SamplerError::Queue));
        assert_eq!(sampler.handle(ConverterEvent::BufferRequest, &staging), Handled::Stalled);
    }

    #[test]
    fn test_done_stages_logical_length_only() {
        let mut blocks = [[0; CAP]; 2];
        let staging = StagingSlot::<CAP>::new();
        let mut sampler =
            Sampler::new(MockConverter::new(), fabric(), &mut blocks, &config(5, 2)).unwrap();
        sampler.prime().unwrap();

        let (_, target) = sampler.converter().current().unwrap();
        assert_eq!(target.len(), 5);
        for i in 0..target.len() {
            // SAFETY: slot 0 is queued to the mock; the test plays the DMA.
            unsafe { target.as_mut_ptr().add(i).write(i as Sample * 10) };
        }
        let done = sampler.converter_mut().complete(CAP).unwrap();
        let handled = sampler.handle(done, &staging);

        let Handled::Completed { slot, stats } = handled else {
            panic!("unexpected {handled:?}");
        };
        assert_eq!(slot, 0);
        assert_eq!(stats.unwrap().max, 40);

        let mut out = [0; CAP];
        assert_eq!(staging.try_drain(&mut out), Some(5));
        assert_eq!(&out[..5], &[0, 10, 20, 30, 40]);
    }
}
