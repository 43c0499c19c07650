//! Operator command handling.
//!
//! - [`command`]: one grammar for both channels
//! - [`serial`]: UART line assembly
//! - [`gate`]: power/start latches and the forward-only phase
//! - [`dispatch`]: routes commands to the gate or the signal chain

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod fmt;

pub mod command;
pub mod dispatch;
pub mod gate;
pub mod serial;

pub use command::{Command, CommandError};
pub use dispatch::{Dispatcher, Outcome, SharedFrontEnd};
pub use gate::{Channel, Phase, PhaseGate};
pub use serial::LineAssembler;
