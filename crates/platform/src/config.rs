//! Application configuration and constants
//!
//! This module defines central configuration values used across the instrument.
//! Naming and acquisition parameters should reference these constants rather
//! than hardcoding values.

/// The application name
pub const APP_NAME: &str = "EPG Acquisition Board";

/// GAP device name. Not carried in the advertising data.
pub const DEVICE_NAME: &str = "EPG";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest number of samples carried by one wireless notification.
///
/// 40 samples × 2 bytes = 80 bytes, which fits a single ATT notification once
/// the link negotiates a data length above the 23-byte default MTU.
pub const MAX_CHUNK_SAMPLES: usize = 40;

/// Longest command buffer accepted from one wireless write.
pub const MAX_COMMAND_LEN: usize = 20;

/// Highest sample rate the trigger fabric can express (1 µs compare interval).
pub const MAX_SAMPLE_RATE_HZ: u32 = 1_000_000;

/// Development mode banner
pub const fn dev_banner() -> &'static str {
    "EPG Acquisition Board - Simulator"
}

/// Reasons an [`AcquisitionConfig`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample rate is zero or above [`MAX_SAMPLE_RATE_HZ`].
    #[error("sample rate {0} Hz is outside 1..=1000000")]
    SampleRate(u32),
    /// Block size is zero or larger than the compiled block capacity.
    #[error("block size {size} is outside 1..={capacity}")]
    BlockSize {
        /// Requested logical block length.
        size: usize,
        /// Compiled-in block capacity.
        capacity: usize,
    },
    /// Fewer than two rotating buffers.
    #[error("{0} buffers configured, at least 2 are required")]
    BufferCount(usize),
    /// Chunk size is zero or above [`MAX_CHUNK_SAMPLES`].
    #[error("chunk size {0} is outside 1..=40")]
    ChunkSamples(usize),
}

/// Acquisition pipeline parameters.
///
/// The block *capacity* is a const generic on the sampler and staging slot;
/// `block_size` is the logical length the converter fills per block and must
/// not exceed that capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionConfig {
    /// Converter sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Samples per completed block.
    pub block_size: usize,
    /// Number of rotating sample blocks (N ≥ 2).
    pub buffer_count: usize,
    /// Samples per wireless notification.
    pub chunk_samples: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 3000,
            block_size: 3000,
            buffer_count: 2,
            chunk_samples: MAX_CHUNK_SAMPLES,
        }
    }
}

impl AcquisitionConfig {
    /// Check every field against its valid range for a block capacity of
    /// `capacity` samples.
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 || self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(ConfigError::SampleRate(self.sample_rate_hz));
        }
        if self.block_size == 0 || self.block_size > capacity {
            return Err(ConfigError::BlockSize {
                size: self.block_size,
                capacity,
            });
        }
        if self.buffer_count < 2 {
            return Err(ConfigError::BufferCount(self.buffer_count));
        }
        if self.chunk_samples == 0 || self.chunk_samples > MAX_CHUNK_SAMPLES {
            return Err(ConfigError::ChunkSamples(self.chunk_samples));
        }
        Ok(())
    }

    /// Timer compare interval in microseconds (`1_000_000 / rate`, truncated).
    ///
    /// Returns `None` for a zero rate.
    #[must_use]
    pub fn interval_us(&self) -> Option<u32> {
        1_000_000_u32.checked_div(self.sample_rate_hz)
    }

    /// Time the converter needs to fill one block, in microseconds.
    ///
    /// Handoff latency must stay below this or the converter stalls waiting
    /// for its next buffer.
    #[must_use]
    pub fn block_fill_time_us(&self) -> Option<u64> {
        let interval = u64::from(self.interval_us()?);
        interval.checked_mul(self.block_size as u64)
    }
}
