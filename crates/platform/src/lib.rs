//! Hardware Abstraction Layer (HAL) for the EPG acquisition firmware
//!
//! This crate provides trait-based abstractions for every peripheral the
//! acquisition core touches, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (acquisition, bluetooth, control)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (vendor HAL / radio stack)
//! ```
//!
//! # Abstraction Levels
//!
//! ## Acquisition
//! - [`Converter`] - DMA-driven ADC with rotating buffers
//! - [`SampleClock`] - periodic sample timer
//! - [`EventRouter`] - event-to-task routing channels
//! - [`dma`] - DMA destination handles
//!
//! ## Connectivity and control
//! - [`BluetoothAdapter`] / [`NotifySink`] - wireless link
//! - [`SignalChain`] - analog front end and waveform generator
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt formatting of platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{SampleClock, AcquisitionConfig};
//!
//! fn arm<C: SampleClock>(clock: &mut C) -> Result<(), C::Error> {
//!     let interval = AcquisitionConfig::default().interval_us().unwrap_or(1);
//!     clock.configure(0, interval)?;
//!     clock.enable();
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register and characteristic names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod bluetooth;
pub mod config;
pub mod converter;
pub mod dma;
pub mod mocks;
pub mod signal_chain;
pub mod trigger;

// Re-export main high-level traits
pub use bluetooth::{BluetoothAdapter, NotifySink};
pub use converter::{Converter, ConverterEvent, Sample};
pub use signal_chain::{PgaStage, SignalChain};
pub use trigger::{EventRouter, EventSource, RouteChannel, SampleClock, TaskSink};

// Re-export configuration
pub use config::{AcquisitionConfig, ConfigError};

// Re-export DMA types
pub use dma::DmaTarget;
