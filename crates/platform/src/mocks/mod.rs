//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests, and as the building blocks of the
//! desktop simulator.

#![cfg(any(test, feature = "std"))]

use std::collections::VecDeque;
use std::vec::Vec;

use crate::*;

/// Error returned by mocks configured to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

// ── Converter ────────────────────────────────────────────────────────────────

/// Mock converter.
///
/// Queued buffers complete in FIFO order, mirroring a DMA-driven converter
/// that always finishes the oldest buffer first.
#[derive(Debug, Default)]
pub struct MockConverter {
    queued: VecDeque<(usize, DmaTarget)>,
    history: Vec<usize>,
    triggered: bool,
    fail_queue: bool,
    fail_trigger: bool,
}

impl MockConverter {
    /// Create new mock converter
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `queue_buffer` call fail.
    pub fn fail_queue(&mut self) {
        self.fail_queue = true;
    }

    /// Make `trigger` fail.
    pub fn fail_trigger(&mut self) {
        self.fail_trigger = true;
    }

    /// Whether `trigger` has been called.
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Slots currently queued, oldest first.
    pub fn queued_slots(&self) -> Vec<usize> {
        self.queued.iter().map(|(slot, _)| *slot).collect()
    }

    /// Every slot ever queued, in order.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Slot and DMA handle the converter is currently writing into.
    pub fn current(&self) -> Option<(usize, DmaTarget)> {
        self.queued.front().copied()
    }

    /// Finish the oldest queued buffer with `len` samples.
    ///
    /// Returns the `Done` event the hardware would raise, or `None` when no
    /// buffer was queued (the converter would have stalled).
    pub fn complete(&mut self, len: usize) -> Option<ConverterEvent> {
        let (slot, target) = self.queued.pop_front()?;
        Some(ConverterEvent::Done {
            slot,
            len: len.min(target.len()),
        })
    }
}

impl Converter for MockConverter {
    type Error = MockError;

    fn queue_buffer(&mut self, slot: usize, target: DmaTarget) -> Result<(), Self::Error> {
        if self.fail_queue {
            return Err(MockError);
        }
        self.queued.push_back((slot, target));
        self.history.push(slot);
        Ok(())
    }

    fn trigger(&mut self) -> Result<(), Self::Error> {
        if self.fail_trigger {
            return Err(MockError);
        }
        self.triggered = true;
        Ok(())
    }
}

// ── Sample clock ─────────────────────────────────────────────────────────────

/// Mock sample timer
#[derive(Debug, Default)]
pub struct MockClock {
    compare: Option<(u8, u32)>,
    enabled: bool,
    fail_configure: bool,
}

impl MockClock {
    /// Create new mock timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `configure` fail.
    pub fn fail_configure(&mut self) {
        self.fail_configure = true;
    }

    /// Compare channel and interval from the last `configure` call.
    pub fn compare(&self) -> Option<(u8, u32)> {
        self.compare
    }
}

impl SampleClock for MockClock {
    type Error = MockError;

    fn configure(&mut self, compare: u8, interval_us: u32) -> Result<(), Self::Error> {
        if self.fail_configure {
            return Err(MockError);
        }
        self.compare = Some((compare, interval_us));
        Ok(())
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ── Event router ─────────────────────────────────────────────────────────────

/// Router operation a [`MockRouter`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterStep {
    /// Fail the n-th `allocate` call (0-based).
    Allocate(usize),
    /// Fail every `connect` call.
    Connect,
    /// Fail every `enable` call.
    Enable,
}

/// Mock event router with a fixed pool of channels.
#[derive(Debug)]
pub struct MockRouter {
    capacity: u8,
    allocated: Vec<RouteChannel>,
    bindings: Vec<(RouteChannel, EventSource, TaskSink)>,
    enabled: Vec<RouteChannel>,
    allocations: usize,
    fail: Option<RouterStep>,
}

impl MockRouter {
    /// Create a router with `capacity` channels.
    pub fn new(capacity: u8) -> Self {
        Self {
            capacity,
            allocated: Vec::new(),
            bindings: Vec::new(),
            enabled: Vec::new(),
            allocations: 0,
            fail: None,
        }
    }

    /// Inject a failure.
    pub fn fail_at(&mut self, step: RouterStep) {
        self.fail = Some(step);
    }

    /// Channels currently allocated.
    pub fn allocated(&self) -> &[RouteChannel] {
        &self.allocated
    }

    /// Bindings on allocated channels.
    pub fn bindings(&self) -> &[(RouteChannel, EventSource, TaskSink)] {
        &self.bindings
    }

    /// Channels currently enabled.
    pub fn enabled(&self) -> &[RouteChannel] {
        &self.enabled
    }
}

impl Default for MockRouter {
    fn default() -> Self {
        Self::new(8)
    }
}

impl EventRouter for MockRouter {
    type Error = MockError;

    fn allocate(&mut self) -> Result<RouteChannel, Self::Error> {
        let attempt = self.allocations;
        self.allocations = self.allocations.saturating_add(1);
        if self.fail == Some(RouterStep::Allocate(attempt)) {
            return Err(MockError);
        }
        let free = (0..self.capacity)
            .map(RouteChannel)
            .find(|ch| !self.allocated.contains(ch))
            .ok_or(MockError)?;
        self.allocated.push(free);
        Ok(free)
    }

    fn connect(
        &mut self,
        channel: RouteChannel,
        source: EventSource,
        sink: TaskSink,
    ) -> Result<(), Self::Error> {
        if self.fail == Some(RouterStep::Connect) || !self.allocated.contains(&channel) {
            return Err(MockError);
        }
        self.bindings.push((channel, source, sink));
        Ok(())
    }

    fn enable(&mut self, channel: RouteChannel) -> Result<(), Self::Error> {
        if self.fail == Some(RouterStep::Enable) || !self.allocated.contains(&channel) {
            return Err(MockError);
        }
        self.enabled.push(channel);
        Ok(())
    }

    fn release(&mut self, channel: RouteChannel) -> Result<(), Self::Error> {
        self.allocated.retain(|ch| *ch != channel);
        self.bindings.retain(|(ch, _, _)| *ch != channel);
        self.enabled.retain(|ch| *ch != channel);
        Ok(())
    }
}

// ── Notifications ────────────────────────────────────────────────────────────

/// Mock notification sink recording every payload it accepts.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Vec<Vec<u8>>,
    attempts: usize,
    fail_attempts: Vec<usize>,
}

impl MockNotifier {
    /// Create new mock notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the notification attempt with this 0-based index.
    pub fn fail_attempt(&mut self, attempt: usize) {
        self.fail_attempts.push(attempt);
    }

    /// Payloads accepted so far.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Number of `notify` calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// All accepted payloads concatenated.
    pub fn concatenated(&self) -> Vec<u8> {
        self.sent.concat()
    }
}

impl NotifySink for MockNotifier {
    type Error = MockError;

    async fn notify(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts = self.attempts.saturating_add(1);
        if self.fail_attempts.contains(&attempt) {
            return Err(MockError);
        }
        self.sent.push(payload.to_vec());
        Ok(())
    }
}

// ── Bluetooth adapter ────────────────────────────────────────────────────────

/// Mock Bluetooth adapter that becomes ready after a number of polls.
#[derive(Debug, Default)]
pub struct MockAdapter {
    initialised: bool,
    polls_until_ready: core::cell::Cell<u32>,
    advertising: Option<(Vec<u8>, u16)>,
    fail_init: bool,
}

impl MockAdapter {
    /// Adapter that reports ready on the first poll after `init`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter that reports not-ready for `polls` polls after `init`.
    pub fn ready_after(polls: u32) -> Self {
        Self {
            polls_until_ready: core::cell::Cell::new(polls),
            ..Self::default()
        }
    }

    /// Make `init` fail.
    pub fn fail_init(&mut self) {
        self.fail_init = true;
    }

    /// Advertising payload and interval, if advertising.
    pub fn advertising(&self) -> Option<(&[u8], u16)> {
        self.advertising
            .as_ref()
            .map(|(payload, interval)| (payload.as_slice(), *interval))
    }
}

impl BluetoothAdapter for MockAdapter {
    type Error = MockError;

    async fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(MockError);
        }
        self.initialised = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        if !self.initialised {
            return false;
        }
        let remaining = self.polls_until_ready.get();
        if remaining == 0 {
            true
        } else {
            self.polls_until_ready.set(remaining.saturating_sub(1));
            false
        }
    }

    async fn start_advertising(&mut self, payload: &[u8], interval: u16) -> Result<(), Self::Error> {
        self.advertising = Some((payload.to_vec(), interval));
        Ok(())
    }

    async fn stop_advertising(&mut self) -> Result<(), Self::Error> {
        self.advertising = None;
        Ok(())
    }
}

// ── Signal chain ─────────────────────────────────────────────────────────────

/// Mock signal chain recording the last value written to each setting.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MockSignalChain {
    /// Front end powered
    pub powered: bool,
    /// Number of `power_up` calls
    pub power_up_calls: u32,
    /// Waveform output running at this frequency
    pub dds_running: Option<u32>,
    /// Last waveform frequency
    pub dds_frequency: Option<u32>,
    /// Last waveform amplification
    pub dds_amplification: Option<f32>,
    /// Last waveform offset
    pub dds_offset: Option<f32>,
    /// Last setting per PGA stage (index 0 = stage 1)
    pub pga: [Option<u8>; 2],
    /// Last wiper per digipot channel
    pub digipot: [Option<u8>; 4],
    /// Last multiplexer selection
    pub mux: Option<u8>,
    /// Last signal-chain offset
    pub signal_chain_offset: Option<f32>,
    /// Last signal-chain amplification
    pub signal_chain_amplification: Option<f32>,
    /// Fail every call
    pub fail: bool,
}

impl MockSignalChain {
    /// Create new mock signal chain
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), MockError> {
        if self.fail {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl SignalChain for MockSignalChain {
    type Error = MockError;

    fn power_up(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.powered = true;
        self.power_up_calls = self.power_up_calls.saturating_add(1);
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.powered = false;
        Ok(())
    }

    fn start_dds(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.check()?;
        self.dds_running = Some(frequency_hz);
        Ok(())
    }

    fn stop_dds(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.dds_running = None;
        Ok(())
    }

    fn set_dds_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.check()?;
        self.dds_frequency = Some(frequency_hz);
        Ok(())
    }

    fn set_dds_amplification(&mut self, amplification: f32) -> Result<(), Self::Error> {
        self.check()?;
        self.dds_amplification = Some(amplification);
        Ok(())
    }

    fn set_dds_offset(&mut self, volts: f32) -> Result<(), Self::Error> {
        self.check()?;
        self.dds_offset = Some(volts);
        Ok(())
    }

    fn configure_pga(&mut self, stage: PgaStage, setting: u8) -> Result<(), Self::Error> {
        self.check()?;
        let index = usize::from(stage.number()).saturating_sub(1);
        if let Some(slot) = self.pga.get_mut(index) {
            *slot = Some(setting);
        }
        Ok(())
    }

    fn set_digipot(&mut self, channel: u8, wiper: u8) -> Result<(), Self::Error> {
        self.check()?;
        if let Some(slot) = self.digipot.get_mut(usize::from(channel)) {
            *slot = Some(wiper);
        }
        Ok(())
    }

    fn set_mux(&mut self, selection: u8) -> Result<(), Self::Error> {
        self.check()?;
        self.mux = Some(selection);
        Ok(())
    }

    fn set_signal_chain_offset(&mut self, volts: f32) -> Result<(), Self::Error> {
        self.check()?;
        self.signal_chain_offset = Some(volts);
        Ok(())
    }

    fn set_signal_chain_amplification(&mut self, gain: f32) -> Result<(), Self::Error> {
        self.check()?;
        self.signal_chain_amplification = Some(gain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_converter_completes_in_queue_order() {
        let mut converter = MockConverter::new();
        let mut a = [0i16; 4];
        let mut b = [0i16; 4];
        // SAFETY: the mock never writes through the handles.
        let (ta, tb) = unsafe { (DmaTarget::new(&mut a), DmaTarget::new(&mut b)) };
        converter.queue_buffer(0, ta).unwrap();
        converter.queue_buffer(1, tb).unwrap();

        assert_eq!(converter.complete(4), Some(ConverterEvent::Done { slot: 0, len: 4 }));
        assert_eq!(converter.complete(9), Some(ConverterEvent::Done { slot: 1, len: 4 }));
        assert_eq!(converter.complete(4), None);
    }

    #[test]
    fn test_mock_router_frees_released_channels() {
        let mut router = MockRouter::new(1);
        let ch = router.allocate().unwrap();
        assert!(router.allocate().is_err());
        router.release(ch).unwrap();
        assert_eq!(router.allocate().unwrap(), ch);
    }

    #[tokio::test]
    async fn test_mock_notifier_fails_selected_attempts() {
        let mut notifier = MockNotifier::new();
        notifier.fail_attempt(1);

        notifier.notify(&[1, 2]).await.unwrap();
        assert!(notifier.notify(&[3, 4]).await.is_err());
        notifier.notify(&[5, 6]).await.unwrap();

        assert_eq!(notifier.attempts(), 3);
        assert_eq!(notifier.concatenated(), vec![1, 2, 5, 6]);
    }

    #[tokio::test]
    async fn test_mock_adapter_becomes_ready_after_polls() {
        let mut adapter = MockAdapter::ready_after(2);
        assert!(!adapter.is_ready());
        adapter.init().await.unwrap();
        assert!(!adapter.is_ready());
        assert!(!adapter.is_ready());
        assert!(adapter.is_ready());
    }

    #[test]
    fn test_mock_signal_chain_records_pga_by_stage() {
        let mut chain = MockSignalChain::new();
        chain.configure_pga(PgaStage::Second, 5).unwrap();
        assert_eq!(chain.pga, [None, Some(5)]);
    }
}
