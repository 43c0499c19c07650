//! Phase gate
//!
//! Both command channels latch the same two requests, power and start. A
//! request is latched per channel and never cleared, so each observer is a
//! monotonic OR over the channels. The phase only moves forward:
//!
//! ```text
//! Idle ──power──▶ PoweredUp ──armed──▶ Armed ──start──▶ Running
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use embassy_time::{Duration, Timer};

/// Poll period of the gate wait loops.
pub const GATE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Command source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Wired UART
    Serial,
    /// Wireless command characteristic
    Wireless,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Self::Serial => 0,
            Self::Wireless => 1,
        }
    }
}

/// Coarse operating state of the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// Waiting for power-up.
    Idle = 0,
    /// Front end powered, defaults applied.
    PoweredUp = 1,
    /// Trigger fabric wired and converter primed.
    Armed = 2,
    /// Sampling.
    Running = 3,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::PoweredUp,
            2 => Self::Armed,
            3 => Self::Running,
            _ => Self::Idle,
        }
    }
}

/// Request latches plus the current phase.
pub struct PhaseGate {
    power: [AtomicBool; 2],
    start: [AtomicBool; 2],
    phase: AtomicU8,
}

impl PhaseGate {
    /// Create a gate in `Idle` with nothing requested.
    pub const fn new() -> Self {
        Self {
            power: [AtomicBool::new(false), AtomicBool::new(false)],
            start: [AtomicBool::new(false), AtomicBool::new(false)],
            phase: AtomicU8::new(Phase::Idle as u8),
        }
    }

    /// Latch a power request from `channel`.
    pub fn request_power(&self, channel: Channel) {
        if let Some(flag) = self.power.get(channel.index()) {
            if !flag.swap(true, Ordering::AcqRel) {
                info!("gate: power requested ({})", channel_name(channel));
            }
        }
    }

    /// Latch a start request from `channel`.
    pub fn request_start(&self, channel: Channel) {
        if let Some(flag) = self.start.get(channel.index()) {
            if !flag.swap(true, Ordering::AcqRel) {
                info!("gate: start requested ({})", channel_name(channel));
            }
        }
    }

    /// True once either channel requested power.
    pub fn power_requested(&self) -> bool {
        self.power.iter().any(|f| f.load(Ordering::Acquire))
    }

    /// True once either channel requested start.
    pub fn start_requested(&self) -> bool {
        self.start.iter().any(|f| f.load(Ordering::Acquire))
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Move to `next` if it lies ahead of the current phase.
    ///
    /// Returns `false` (and changes nothing) for a backward or repeated move.
    pub fn advance(&self, next: Phase) -> bool {
        let moved = self
            .phase
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                (next as u8 > cur).then_some(next as u8)
            })
            .is_ok();
        if moved {
            info!("gate: phase -> {}", phase_name(next));
        }
        moved
    }

    /// Wait until power has been requested. No timeout.
    pub async fn wait_for_power(&self) {
        while !self.power_requested() {
            Timer::after(GATE_POLL_INTERVAL).await;
        }
    }

    /// Wait until start has been requested. No timeout.
    pub async fn wait_for_start(&self) {
        while !self.start_requested() {
            Timer::after(GATE_POLL_INTERVAL).await;
        }
    }
}

impl Default for PhaseGate {
    fn default() -> Self {
        Self::new()
    }
}

fn channel_name(channel: Channel) -> &'static str {
    match channel {
        Channel::Serial => "serial",
        Channel::Wireless => "wireless",
    }
}

/// Log name of a phase.
pub fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "Idle",
        Phase::PoweredUp => "PoweredUp",
        Phase::Armed => "Armed",
        Phase::Running => "Running",
    }
}
