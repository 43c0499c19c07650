use platform::{PgaStage, SignalChain};

/// Signal chain that only logs what it is told.
#[derive(Debug, Default)]
pub struct LoggingFrontEnd {
    powered: bool,
}

impl LoggingFrontEnd {
    /// Create a powered-down front end.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the front end is powered.
    pub fn is_powered(&self) -> bool {
        self.powered
    }
}

impl SignalChain for LoggingFrontEnd {
    type Error = core::convert::Infallible;

    fn power_up(&mut self) -> Result<(), Self::Error> {
        self.powered = true;
        tracing::info!("front end: power up");
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), Self::Error> {
        self.powered = false;
        tracing::info!("front end: power down");
        Ok(())
    }

    fn start_dds(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        tracing::info!(frequency_hz, "front end: waveform on");
        Ok(())
    }

    fn stop_dds(&mut self) -> Result<(), Self::Error> {
        tracing::info!("front end: waveform off");
        Ok(())
    }

    fn set_dds_frequency(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        tracing::info!(frequency_hz, "front end: waveform frequency");
        Ok(())
    }

    fn set_dds_amplification(&mut self, amplification: f32) -> Result<(), Self::Error> {
        tracing::info!(amplification, "front end: waveform amplification");
        Ok(())
    }

    fn set_dds_offset(&mut self, volts: f32) -> Result<(), Self::Error> {
        tracing::info!(volts, "front end: waveform offset");
        Ok(())
    }

    fn configure_pga(&mut self, stage: PgaStage, setting: u8) -> Result<(), Self::Error> {
        tracing::info!(stage = stage.number(), setting, "front end: PGA");
        Ok(())
    }

    fn set_digipot(&mut self, channel: u8, wiper: u8) -> Result<(), Self::Error> {
        tracing::info!(channel, wiper, "front end: digipot");
        Ok(())
    }

    fn set_mux(&mut self, selection: u8) -> Result<(), Self::Error> {
        tracing::info!(selection, "front end: mux");
        Ok(())
    }

    fn set_signal_chain_offset(&mut self, volts: f32) -> Result<(), Self::Error> {
        tracing::info!(volts, "front end: signal-chain offset");
        Ok(())
    }

    fn set_signal_chain_amplification(&mut self, gain: f32) -> Result<(), Self::Error> {
        tracing::info!(gain, "front end: signal-chain amplification");
        Ok(())
    }
}
