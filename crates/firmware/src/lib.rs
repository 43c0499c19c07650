//! EPG Acquisition Firmware
//!
//! Board-level wiring of the acquisition pipeline: boot and phase
//! orchestration, interrupt bodies, radio bring-up and the deferred
//! streaming task.
//!
//! # Architecture
//!
//! ```text
//! Application flow (app, boot, streamer)
//!         ↓
//! Interrupt / callback bodies (irq, radio)
//!         ↓
//! Acquisition, bluetooth and control crates
//!         ↓
//! Platform traits (converter, timer, router, signal chain, radio)
//! ```
//!
//! # Features
//!
//! - `emulator` - Desktop simulator binary (tokio, tracing)
//! - `std` - Enable standard library (for emulator and testing)
//! - `defmt` - Log through defmt on the target
//!
//! # Simulator
//!
//! ```bash
//! cargo run -p firmware --bin simulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

// Must come first so the other modules see its macros.
mod fmt;

pub mod app;
pub mod boot;
pub mod defaults;
pub mod irq;
pub mod memory;
pub mod radio;
pub mod streamer;

#[cfg(feature = "emulator")]
pub mod sim;

pub use boot::{BootError, Peripherals, SharedSampler, BOOT_SEQUENCE_STEPS};
pub use defaults::FrontEndDefaults;
pub use streamer::Streamer;
