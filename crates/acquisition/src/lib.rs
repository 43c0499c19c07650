//! Timer-paced, double-buffered acquisition core.
//!
//! - [`fabric`] wires the sample timer to the converter through hardware
//!   event routing.
//! - [`sampler`] rotates sample blocks through the converter and handles its
//!   interrupt events.
//! - [`staging`] hands completed blocks from interrupt context to the
//!   streaming task.
//! - [`stats`] computes per-block diagnostics.
//!
//! This crate is `no_std`; host tests back its critical sections with the
//! `critical-section` `std` implementation.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod fmt;

pub mod fabric;
pub mod sampler;
pub mod staging;
pub mod stats;

pub use fabric::{Route, TriggerError, TriggerFabric};
pub use sampler::{Handled, Sampler, SamplerError};
pub use staging::StagingSlot;
pub use stats::BlockStats;
