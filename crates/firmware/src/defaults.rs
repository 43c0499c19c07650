//! Front-end settings applied right after power-up.

use platform::SignalChain;

/// Signal-chain state the instrument starts acquiring with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrontEndDefaults {
    /// Input multiplexer position.
    pub mux: u8,
    /// Waveform DC offset (V).
    pub dds_offset_v: f32,
    /// Waveform amplification.
    pub dds_amplification: f32,
    /// Waveform frequency (Hz).
    pub dds_frequency_hz: u32,
    /// Signal-chain amplification.
    pub signal_chain_amplification: f32,
    /// Signal-chain offset (V).
    pub signal_chain_offset_v: f32,
}

impl Default for FrontEndDefaults {
    fn default() -> Self {
        Self {
            mux: 0,
            dds_offset_v: -0.341,
            dds_amplification: -1.0,
            dds_frequency_hz: platform::signal_chain::DEFAULT_DDS_FREQUENCY_HZ,
            signal_chain_amplification: 2.0,
            signal_chain_offset_v: 0.6,
        }
    }
}

impl FrontEndDefaults {
    /// Write every setting, in board order: mux, waveform offset and
    /// amplification, waveform start, then signal-chain gain and offset.
    pub fn apply<F: SignalChain>(&self, front_end: &mut F) -> Result<(), F::Error> {
        front_end.set_mux(self.mux)?;
        front_end.set_dds_offset(self.dds_offset_v)?;
        front_end.set_dds_amplification(self.dds_amplification)?;
        front_end.start_dds(self.dds_frequency_hz)?;
        front_end.set_signal_chain_amplification(self.signal_chain_amplification)?;
        front_end.set_signal_chain_offset(self.signal_chain_offset_v)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use platform::mocks::MockSignalChain;

    #[test]
    fn test_defaults_reach_every_setting() {
        let mut fe = MockSignalChain::new();
        FrontEndDefaults::default().apply(&mut fe).unwrap();

        assert_eq!(fe.mux, Some(0));
        assert_eq!(fe.dds_offset, Some(-0.341));
        assert_eq!(fe.dds_amplification, Some(-1.0));
        assert_eq!(fe.dds_running, Some(1000));
        assert_eq!(fe.signal_chain_amplification, Some(2.0));
        assert_eq!(fe.signal_chain_offset, Some(0.6));
    }

    #[test]
    fn test_defaults_are_within_command_ranges() {
        use platform::signal_chain::{OFFSET_RANGE_V, SIGNAL_CHAIN_GAIN_RANGE};
        let d = FrontEndDefaults::default();
        assert!(OFFSET_RANGE_V.contains(&d.dds_offset_v));
        assert!(OFFSET_RANGE_V.contains(&d.signal_chain_offset_v));
        assert!(SIGNAL_CHAIN_GAIN_RANGE.contains(&d.signal_chain_amplification));
    }
}
