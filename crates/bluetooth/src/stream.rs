//! Chunked sample streaming
//!
//! A block is cut into chunks of at most `chunk_samples` samples, each sent
//! as one notification of raw little-endian `i16` bytes with no framing.
//! Chunks are dropped, never queued, while the peer is not connected and
//! subscribed; a failed send is logged and the next chunk goes out as usual.

use platform::config::MAX_CHUNK_SAMPLES;
use platform::{NotifySink, Sample};

use crate::state::ConnectionState;

/// Bytes per encoded sample.
pub const BYTES_PER_SAMPLE: usize = core::mem::size_of::<Sample>();

/// Largest notification payload.
pub const MAX_CHUNK_BYTES: usize = MAX_CHUNK_SAMPLES * BYTES_PER_SAMPLE;

/// Number of chunks a block of `len` samples is split into.
#[must_use]
pub fn chunk_count(len: usize, chunk_samples: usize) -> usize {
    len.div_ceil(chunk_samples.max(1))
}

/// Encode `samples` little-endian into `out` and return the written prefix.
///
/// Encodes at most `MAX_CHUNK_SAMPLES` samples.
pub fn encode_chunk<'b>(samples: &[Sample], out: &'b mut [u8; MAX_CHUNK_BYTES]) -> &'b [u8] {
    let mut written: usize = 0;
    for (sample, dst) in samples.iter().zip(out.chunks_exact_mut(BYTES_PER_SAMPLE)) {
        dst.copy_from_slice(&sample.to_le_bytes());
        written = written.saturating_add(BYTES_PER_SAMPLE);
    }
    out.get(..written).unwrap_or_default()
}

/// Outcome of transporting one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportReport {
    /// Chunks the sink accepted.
    pub sent: u32,
    /// Chunks discarded because nobody was listening.
    pub dropped: u32,
    /// Chunks the sink rejected.
    pub failed: u32,
}

impl TransportReport {
    /// Total chunks the block was split into.
    pub fn chunks(&self) -> u32 {
        self.sent
            .saturating_add(self.dropped)
            .saturating_add(self.failed)
    }
}

/// Cumulative streaming counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamStats {
    /// Blocks handed to the transport.
    pub blocks: u32,
    /// Chunks sent.
    pub sent: u32,
    /// Chunks dropped for lack of a subscriber.
    pub dropped: u32,
    /// Chunks that failed to send.
    pub failed: u32,
}

impl StreamStats {
    /// Fold one block's report into the totals.
    pub fn record(&mut self, report: &TransportReport) {
        self.blocks = self.blocks.wrapping_add(1);
        self.sent = self.sent.wrapping_add(report.sent);
        self.dropped = self.dropped.wrapping_add(report.dropped);
        self.failed = self.failed.wrapping_add(report.failed);
    }
}

/// Splits blocks into notifications on a [`NotifySink`].
pub struct ChunkTransport<'s> {
    link: &'s ConnectionState,
    chunk_samples: usize,
}

impl<'s> ChunkTransport<'s> {
    /// Create a transport gated by `link`. `chunk_samples` is clamped to
    /// `1..=MAX_CHUNK_SAMPLES`.
    pub fn new(link: &'s ConnectionState, chunk_samples: usize) -> Self {
        Self {
            link,
            chunk_samples: chunk_samples.clamp(1, MAX_CHUNK_SAMPLES),
        }
    }

    /// Samples per chunk.
    pub fn chunk_samples(&self) -> usize {
        self.chunk_samples
    }

    /// Send `block` to `sink` chunk by chunk.
    ///
    /// Never fails: every chunk is either sent, dropped or counted as failed.
    pub async fn transport<S: NotifySink>(&self, sink: &mut S, block: &[Sample]) -> TransportReport {
        let mut report = TransportReport::default();
        let mut buf = [0u8; MAX_CHUNK_BYTES];

        for (index, chunk) in block.chunks(self.chunk_samples).enumerate() {
            if !self.link.can_stream() {
                report.dropped = report.dropped.saturating_add(1);
                continue;
            }
            let payload = encode_chunk(chunk, &mut buf);
            match sink.notify(payload).await {
                Ok(()) => report.sent = report.sent.saturating_add(1),
                Err(_) => {
                    warn!("ble: notify failed for chunk {} ({} bytes)", index, payload.len());
                    report.failed = report.failed.saturating_add(1);
                }
            }
        }

        if report.dropped > 0 {
            debug!("ble: {} chunks dropped, no subscriber", report.dropped);
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::MockNotifier;

    fn streaming_link() -> ConnectionState {
        let link = ConnectionState::new();
        link.on_connected();
        link.on_ccc_write(0x0001);
        link
    }

    #[test]
    fn test_chunk_count_rounds_up() {
        assert_eq!(chunk_count(3000, 40), 75);
        assert_eq!(chunk_count(3001, 40), 76);
        assert_eq!(chunk_count(39, 40), 1);
        assert_eq!(chunk_count(0, 40), 0);
    }

    #[test]
    fn test_encode_is_little_endian() {
        let mut buf = [0u8; MAX_CHUNK_BYTES];
        let bytes = encode_chunk(&[0x0102, -2], &mut buf);
        assert_eq!(bytes, &[0x02, 0x01, 0xFE, 0xFF]);
    }

    #[tokio::test]
    async fn test_last_chunk_is_short() {
        let link = streaming_link();
        let transport = ChunkTransport::new(&link, 40);
        let mut sink = MockNotifier::new();
        let block: Vec<Sample> = (0..90).collect();

        let report = transport.transport(&mut sink, &block).await;

        assert_eq!(report, TransportReport { sent: 3, dropped: 0, failed: 0 });
        let lens: Vec<usize> = sink.sent().iter().map(Vec::len).collect();
        assert_eq!(lens, vec![80, 80, 20]);
    }

    #[tokio::test]
    async fn test_unsubscribed_link_drops_every_chunk() {
        let link = ConnectionState::new();
        link.on_connected();
        let transport = ChunkTransport::new(&link, 40);
        let mut sink = MockNotifier::new();

        let report = transport.transport(&mut sink, &[1; 100]).await;

        assert_eq!(report.dropped, 3);
        assert_eq!(report.sent, 0);
        assert_eq!(sink.attempts(), 0, "dropped chunks must not reach the radio");
    }

    #[tokio::test]
    async fn test_send_failure_does_not_stop_the_block() {
        let link = streaming_link();
        let transport = ChunkTransport::new(&link, 4);
        let mut sink = MockNotifier::new();
        sink.fail_attempt(1);

        let report = transport.transport(&mut sink, &[7; 12]).await;

        assert_eq!(report, TransportReport { sent: 2, dropped: 0, failed: 1 });
        assert_eq!(sink.attempts(), 3);
    }

    #[test]
    fn test_chunk_size_is_clamped() {
        let link = ConnectionState::new();
        assert_eq!(ChunkTransport::new(&link, 0).chunk_samples(), 1);
        assert_eq!(ChunkTransport::new(&link, 500).chunk_samples(), MAX_CHUNK_SAMPLES);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut stats = StreamStats::default();
        stats.record(&TransportReport { sent: 75, dropped: 0, failed: 0 });
        stats.record(&TransportReport { sent: 0, dropped: 75, failed: 0 });
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.sent, 75);
        assert_eq!(stats.dropped, 75);
    }
}
