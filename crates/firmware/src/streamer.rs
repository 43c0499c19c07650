//! Deferred streaming task.
//!
//! Sleeps on the staging slot's wake, copies out the latest block and pushes
//! it through the chunk transport. It runs in thread mode, so it may wait on
//! the radio for as long as it needs; the converter interrupt never waits on
//! it. Blocks that arrive faster than they can be sent are skipped, not
//! queued.

use acquisition::StagingSlot;
use bluetooth::{ChunkTransport, StreamStats, TransportReport};
use platform::{NotifySink, Sample};

/// Drains the staging slot into the wireless link.
pub struct Streamer<'a, const CAP: usize> {
    staging: &'a StagingSlot<CAP>,
    transport: ChunkTransport<'a>,
    snapshot: &'a mut [Sample; CAP],
    stats: StreamStats,
}

impl<'a, const CAP: usize> Streamer<'a, CAP> {
    /// Create a streamer with its private snapshot buffer.
    pub fn new(
        staging: &'a StagingSlot<CAP>,
        transport: ChunkTransport<'a>,
        snapshot: &'a mut [Sample; CAP],
    ) -> Self {
        Self {
            staging,
            transport,
            snapshot,
            stats: StreamStats::default(),
        }
    }

    /// Wait for one staged block and transport it.
    pub async fn step<S: NotifySink>(&mut self, sink: &mut S) -> TransportReport {
        let len = self.staging.drain(self.snapshot).await;
        self.send(sink, len).await
    }

    /// Transport the pending block, if any, without waiting.
    pub async fn poll<S: NotifySink>(&mut self, sink: &mut S) -> Option<TransportReport> {
        let len = self.staging.try_drain(self.snapshot)?;
        Some(self.send(sink, len).await)
    }

    /// Run forever.
    pub async fn run<S: NotifySink>(&mut self, sink: &mut S) -> ! {
        loop {
            self.step(sink).await;
        }
    }

    /// Totals since start.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    async fn send<S: NotifySink>(&mut self, sink: &mut S, len: usize) -> TransportReport {
        let block = self.snapshot.get(..len).unwrap_or_default();
        let report = self.transport.transport(sink, block).await;
        self.stats.record(&report);
        debug!(
            "stream: block of {} samples, {} sent {} dropped {} failed",
            len, report.sent, report.dropped, report.failed
        );
        report
    }
}
