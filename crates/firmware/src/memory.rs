//! Statically allocated acquisition memory.
//!
//! Sample blocks are 6 KB each and live for the whole program; they are
//! handed out exactly once through [`StaticCell`].

use acquisition::StagingSlot;
use platform::Sample;
use static_cell::StaticCell;

/// Compiled block capacity in samples.
pub const BLOCK_CAPACITY: usize = 3000;

/// Rotating blocks owned by the sampler.
pub const BUFFER_COUNT: usize = 2;

/// The sampler's rotating blocks.
pub type SampleBlocks = [[Sample; BLOCK_CAPACITY]; BUFFER_COUNT];

/// Handoff slot between the converter interrupt and the streaming task.
pub static STAGING: StagingSlot<BLOCK_CAPACITY> = StagingSlot::new();

static BLOCKS: StaticCell<SampleBlocks> = StaticCell::new();
static SNAPSHOT: StaticCell<[Sample; BLOCK_CAPACITY]> = StaticCell::new();

/// Take the sampler's blocks. Returns `None` after the first call.
pub fn take_blocks() -> Option<&'static mut SampleBlocks> {
    BLOCKS.try_init([[0; BLOCK_CAPACITY]; BUFFER_COUNT])
}

/// Take the streaming task's private snapshot buffer. Returns `None` after
/// the first call.
pub fn take_snapshot() -> Option<&'static mut [Sample; BLOCK_CAPACITY]> {
    SNAPSHOT.try_init([0; BLOCK_CAPACITY])
}
