//! Command dispatch
//!
//! Routes parsed commands from either channel: phase requests latch the
//! [`PhaseGate`], everything else is applied to the signal chain. Rejected
//! commands are logged at debug level and never answered.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::config::MAX_COMMAND_LEN;
use platform::signal_chain::DEFAULT_DDS_FREQUENCY_HZ;
use platform::SignalChain;

use crate::command::{self, Command, CommandError};
use crate::gate::{Channel, PhaseGate};
use crate::serial::LineAssembler;

/// Signal chain shared between the dispatcher and the boot flow.
pub type SharedFrontEnd<F> = Mutex<CriticalSectionRawMutex, RefCell<F>>;

/// What happened to one command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Phase request latched.
    Latched(Command),
    /// Setting forwarded to the signal chain.
    Applied(Command),
    /// Command discarded before reaching any collaborator.
    Rejected(CommandError),
    /// Signal chain refused the setting.
    Failed(Command),
}

/// Routes commands from both channels.
pub struct Dispatcher<'a, F> {
    gate: &'a PhaseGate,
    front_end: &'a SharedFrontEnd<F>,
}

impl<'a, F: SignalChain> Dispatcher<'a, F> {
    /// Create a dispatcher over the shared gate and front end.
    pub fn new(gate: &'a PhaseGate, front_end: &'a SharedFrontEnd<F>) -> Self {
        Self { gate, front_end }
    }

    /// Feed one UART byte; dispatches when it completes a line.
    pub fn on_serial_byte(&self, assembler: &mut LineAssembler, byte: u8) -> Option<Outcome> {
        let line = assembler.feed(byte)?;
        Some(match line {
            Ok(cmd) => self.dispatch(Channel::Serial, cmd),
            Err(e) => reject(Channel::Serial, e),
        })
    }

    /// Handle one write to the command characteristic.
    pub fn on_wireless_write(&self, data: &[u8]) -> Outcome {
        if data.len() > MAX_COMMAND_LEN {
            return reject(Channel::Wireless, CommandError::TooLong);
        }
        match command::parse(data) {
            Ok(cmd) => self.dispatch(Channel::Wireless, cmd),
            Err(e) => reject(Channel::Wireless, e),
        }
    }

    /// Route an already parsed command.
    pub fn dispatch(&self, channel: Channel, cmd: Command) -> Outcome {
        match cmd {
            Command::PowerOn => {
                self.gate.request_power(channel);
                Outcome::Latched(cmd)
            }
            Command::Start => {
                self.gate.request_start(channel);
                Outcome::Latched(cmd)
            }
            _ => self.apply(cmd),
        }
    }

    fn apply(&self, cmd: Command) -> Outcome {
        self.front_end.lock(|cell| {
            let mut fe = cell.borrow_mut();
            let result = match cmd {
                Command::SetDdsFrequency(hz) => fe.set_dds_frequency(hz),
                Command::SetDdsAmplification(amp) => {
                    if !fe.dds_amplification_range().contains(&amp) {
                        return reject(Channel::Wireless, CommandError::OutOfRange);
                    }
                    fe.set_dds_amplification(amp)
                }
                Command::SetDdsOffset(v) => fe.set_dds_offset(v),
                Command::ConfigurePga { stage, setting } => fe.configure_pga(stage, setting),
                Command::SetDigipot { channel, wiper } => fe.set_digipot(channel, wiper),
                Command::SetMux(sel) => fe.set_mux(sel),
                Command::SetSignalChainOffset(v) => fe.set_signal_chain_offset(v),
                Command::SetSignalChainAmplification(g) => fe.set_signal_chain_amplification(g),
                Command::StartDds => fe.start_dds(DEFAULT_DDS_FREQUENCY_HZ),
                Command::StopDds => fe.stop_dds(),
                Command::PowerOff => fe.power_down(),
                Command::PowerOn | Command::Start => Ok(()),
            };
            match result {
                Ok(()) => Outcome::Applied(cmd),
                Err(_) => {
                    warn!("command: signal chain rejected setting");
                    Outcome::Failed(cmd)
                }
            }
        })
    }
}

fn reject(channel: Channel, error: CommandError) -> Outcome {
    match channel {
        Channel::Serial => debug!("serial: line ignored ({})", error_name(error)),
        Channel::Wireless => debug!("wireless: command ignored ({})", error_name(error)),
    }
    Outcome::Rejected(error)
}

fn error_name(error: CommandError) -> &'static str {
    match error {
        CommandError::Unrecognized => "unrecognized",
        CommandError::Malformed => "malformed",
        CommandError::OutOfRange => "out of range",
        CommandError::TooLong => "too long",
    }
}
