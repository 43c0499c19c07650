//! Analog signal chain and waveform source
//!
//! The excitation waveform generator (DDS), the programmable-gain stages, the
//! digital potentiometers and the input multiplexer are driven by code
//! outside the acquisition core. This trait is the seam the command
//! dispatcher and the boot flow talk through.

use core::ops::RangeInclusive;

/// Valid waveform / signal-chain offset in volts.
pub const OFFSET_RANGE_V: RangeInclusive<f32> = -3.3..=3.3;

/// Valid signal-chain amplification.
pub const SIGNAL_CHAIN_GAIN_RANGE: RangeInclusive<f32> = 1.0..=7000.0;

/// Default waveform amplification limits when the driver does not narrow them.
pub const DEFAULT_DDS_AMPLIFICATION_RANGE: RangeInclusive<f32> = -5.0..=5.0;

/// Waveform frequency used by the `IDDS` command and at power-up.
pub const DEFAULT_DDS_FREQUENCY_HZ: u32 = 1000;

/// Programmable-gain stage selector (stage 1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PgaStage {
    /// First gain stage
    First,
    /// Second gain stage
    Second,
}

impl PgaStage {
    /// Stage from its 1-based board number.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            _ => None,
        }
    }

    /// 1-based board number.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// Signal chain collaborator trait
pub trait SignalChain {
    /// Error type
    type Error: core::fmt::Debug;

    /// Power the analog front end up.
    fn power_up(&mut self) -> Result<(), Self::Error>;

    /// Power the analog front end down.
    fn power_down(&mut self) -> Result<(), Self::Error>;

    /// Start waveform output at `frequency_hz`.
    fn start_dds(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Stop waveform output.
    fn stop_dds(&mut self) -> Result<(), Self::Error>;

    /// Change waveform frequency.
    fn set_dds_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error>;

    /// Set waveform amplification.
    fn set_dds_amplification(&mut self, amplification: f32) -> Result<(), Self::Error>;

    /// Set waveform DC offset in volts.
    fn set_dds_offset(&mut self, volts: f32) -> Result<(), Self::Error>;

    /// Select gain setting `setting` (0..=7) on a PGA stage.
    fn configure_pga(&mut self, stage: PgaStage, setting: u8) -> Result<(), Self::Error>;

    /// Move a digital-potentiometer wiper (channel 0..=3).
    fn set_digipot(&mut self, channel: u8, wiper: u8) -> Result<(), Self::Error>;

    /// Select input multiplexer position (0..=7).
    fn set_mux(&mut self, selection: u8) -> Result<(), Self::Error>;

    /// Set signal-chain offset in volts.
    fn set_signal_chain_offset(&mut self, volts: f32) -> Result<(), Self::Error>;

    /// Set signal-chain amplification.
    fn set_signal_chain_amplification(&mut self, gain: f32) -> Result<(), Self::Error>;

    /// Waveform amplification this driver accepts.
    fn dds_amplification_range(&self) -> RangeInclusive<f32> {
        DEFAULT_DDS_AMPLIFICATION_RANGE
    }
}
