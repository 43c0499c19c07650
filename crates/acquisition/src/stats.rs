//! Per-block diagnostics.

use platform::Sample;

/// Average, minimum and maximum over one completed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockStats {
    /// Number of samples the figures cover.
    pub len: usize,
    /// Integer mean, truncated toward zero.
    pub average: Sample,
    /// Smallest sample.
    pub min: Sample,
    /// Largest sample.
    pub max: Sample,
}

impl BlockStats {
    /// Compute diagnostics over `samples`. Returns `None` for an empty block.
    #[must_use]
    pub fn compute(samples: &[Sample]) -> Option<Self> {
        let (&first, rest) = samples.split_first()?;
        let mut sum = i64::from(first);
        let mut min = first;
        let mut max = first;
        for &s in rest {
            sum = sum.saturating_add(i64::from(s));
            min = min.min(s);
            max = max.max(s);
        }
        let count = i64::try_from(samples.len()).ok()?;
        // Mean of i16 values always fits i16; division truncates toward zero.
        let average = Sample::try_from(sum.checked_div(count)?).ok()?;
        Some(Self {
            len: samples.len(),
            average,
            min,
            max,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_block_has_no_stats() {
        assert_eq!(BlockStats::compute(&[]), None);
    }

    #[test]
    fn test_average_truncates_toward_zero() {
        let up = BlockStats::compute(&[1, 2]).unwrap();
        assert_eq!(up.average, 1);

        let down = BlockStats::compute(&[-1, -2]).unwrap();
        assert_eq!(down.average, -1);
    }

    #[test]
    fn test_min_max_use_signed_comparison() {
        let stats = BlockStats::compute(&[5, -32768, 32767, 0]).unwrap();
        assert_eq!(stats.min, -32768);
        assert_eq!(stats.max, 32767);
        assert_eq!(stats.len, 4);
    }

    #[test]
    fn test_full_scale_block_does_not_overflow() {
        let block = [Sample::MAX; 3000];
        let stats = BlockStats::compute(&block).unwrap();
        assert_eq!(stats.average, Sample::MAX);
        assert_eq!(stats.len, 3000);
    }
}
