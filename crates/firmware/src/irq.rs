//! Interrupt handler bodies.
//!
//! Board code calls these from the converter and UART interrupt vectors.
//! Each takes a short critical section and never waits.

use core::cell::RefCell;

use acquisition::{Handled, StagingSlot};
use control::{Dispatcher, LineAssembler, Outcome};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::{Converter, ConverterEvent, SampleClock, SignalChain};

use crate::boot::SharedSampler;

/// UART receive line buffer.
pub static SERIAL_LINE: Mutex<CriticalSectionRawMutex, RefCell<LineAssembler>> =
    Mutex::new(RefCell::new(LineAssembler::new()));

/// Converter interrupt: route one event through the sampler.
///
/// Returns `None` when the event arrives before the sampler is installed.
pub fn converter_event<V, C, const CAP: usize, const N: usize>(
    sampler: &SharedSampler<'_, V, C, CAP, N>,
    staging: &StagingSlot<CAP>,
    event: ConverterEvent,
) -> Option<Handled>
where
    V: Converter,
    C: SampleClock,
{
    let handled = sampler.lock(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|s| s.handle(event, staging))
    });
    if handled.is_none() {
        warn!("irq: converter event before sampler was armed");
    }
    handled
}

/// UART receive interrupt: feed one byte to the serial line.
pub fn serial_byte<F: SignalChain>(dispatcher: &Dispatcher<'_, F>, byte: u8) -> Option<Outcome> {
    SERIAL_LINE.lock(|cell| dispatcher.on_serial_byte(&mut cell.borrow_mut(), byte))
}
