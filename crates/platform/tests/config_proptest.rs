//! Property-based tests for acquisition timing arithmetic.
//!
//! The sample timer interval and the block fill time are derived from user
//! parameters with checked integer math; these tests pin down the truncation
//! behaviour over the full valid range.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::config::{MAX_CHUNK_SAMPLES, MAX_SAMPLE_RATE_HZ};
use platform::{AcquisitionConfig, ConfigError};
use proptest::prelude::*;

fn config(sample_rate_hz: u32, block_size: usize) -> AcquisitionConfig {
    AcquisitionConfig {
        sample_rate_hz,
        block_size,
        buffer_count: 2,
        chunk_samples: MAX_CHUNK_SAMPLES,
    }
}

proptest! {
    /// The interval never overshoots the requested period and is off by less
    /// than one microsecond.
    #[test]
    fn interval_is_floor_of_period(rate in 1u32..=MAX_SAMPLE_RATE_HZ) {
        let interval = config(rate, 1).interval_us().unwrap();
        prop_assert!(interval >= 1);
        prop_assert!(u64::from(interval) * u64::from(rate) <= 1_000_000);
        prop_assert!(u64::from(interval + 1) * u64::from(rate) > 1_000_000);
    }

    #[test]
    fn fill_time_is_interval_times_block(rate in 1u32..=MAX_SAMPLE_RATE_HZ, block in 1usize..=4096) {
        let c = config(rate, block);
        let expected = u64::from(c.interval_us().unwrap()) * block as u64;
        prop_assert_eq!(c.block_fill_time_us(), Some(expected));
    }

    #[test]
    fn validate_accepts_exactly_the_documented_ranges(
        rate in 0u32..=MAX_SAMPLE_RATE_HZ + 10,
        block in 0usize..=64,
        buffers in 0usize..=4,
        chunk in 0usize..=MAX_CHUNK_SAMPLES + 2,
    ) {
        let c = AcquisitionConfig {
            sample_rate_hz: rate,
            block_size: block,
            buffer_count: buffers,
            chunk_samples: chunk,
        };
        let result = c.validate(32);
        let valid = (1..=MAX_SAMPLE_RATE_HZ).contains(&rate)
            && (1..=32).contains(&block)
            && buffers >= 2
            && (1..=MAX_CHUNK_SAMPLES).contains(&chunk);
        prop_assert_eq!(result.is_ok(), valid);
        if rate == 0 {
            prop_assert_eq!(result, Err(ConfigError::SampleRate(0)));
        }
    }
}
