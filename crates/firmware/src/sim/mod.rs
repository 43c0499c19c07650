//! Desktop simulator peripherals (feature `emulator`).
//!
//! Stand-ins for the converter, radio and analog front end that let the full
//! pipeline run on tokio. The sample timer and event router come from
//! `platform::mocks`; they only record configuration.

mod converter;
mod front_end;
mod radio;

pub use converter::SimConverter;
pub use front_end::LoggingFrontEnd;
pub use radio::SimRadio;

use std::time::Duration;

use acquisition::StagingSlot;
use bluetooth::ConnectionState;
use control::Dispatcher;
use platform::{ConverterEvent, SampleClock, SignalChain};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::boot::SharedSampler;
use crate::irq;
use crate::radio::{on_gatt_event, GattEvent};

/// Wireless commands suggested in the simulator banner.
pub const WIRELESS_EXAMPLES: &[&str] = &["M:3", "SDDS:500", "DDSA:1.5"];

/// Play the converter hardware: READY after trigger, then one DONE and one
/// BUFFER_REQUEST per `block_period` while the sample timer runs.
pub async fn run_hardware<C, const CAP: usize, const N: usize>(
    sampler: &SharedSampler<'_, SimConverter, C, CAP, N>,
    staging: &StagingSlot<CAP>,
    block_period: Duration,
) where
    C: SampleClock,
{
    let mut ticker = tokio::time::interval(block_period);
    loop {
        ticker.tick().await;
        let event = sampler.lock(|cell| {
            let mut cell = cell.borrow_mut();
            let s = cell.as_mut()?;
            if let Some(ready) = s.converter_mut().take_ready() {
                return Some(ready);
            }
            if !s.fabric().is_running() {
                return None;
            }
            s.converter_mut().fill_next()
        });
        let Some(event) = event else { continue };

        irq::converter_event(sampler, staging, event);
        if matches!(event, ConverterEvent::Done { .. }) {
            irq::converter_event(sampler, staging, ConverterEvent::BufferRequest);
        }
    }
}

/// A central that connects and enables notifications after `delay`.
pub async fn simulate_peer(link: &ConnectionState, delay: Duration) {
    tokio::time::sleep(delay).await;
    link.on_connected();
    tokio::time::sleep(Duration::from_millis(50)).await;
    link.on_ccc_write(bluetooth::gatt::CCC_NOTIFY);
}

/// Feed stdin to the command channels until EOF.
///
/// Plain lines go to the serial channel (the newline becomes `\r`); lines
/// starting with `ble ` are delivered as one wireless write.
pub async fn read_commands<F: SignalChain>(
    link: &ConnectionState,
    dispatcher: &Dispatcher<'_, F>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(write) = line.strip_prefix("ble ") {
            let outcome = on_gatt_event(link, dispatcher, GattEvent::CommandWritten(write.as_bytes()));
            tracing::info!(?outcome, "wireless command");
        } else {
            for byte in line.bytes().chain(core::iter::once(b'\r')) {
                if let Some(outcome) = irq::serial_byte(dispatcher, byte) {
                    tracing::info!(?outcome, "serial command");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_examples_are_valid_commands() {
        for example in WIRELESS_EXAMPLES {
            assert!(control::command::parse(example.as_bytes()).is_ok(), "{example}");
        }
    }
}
