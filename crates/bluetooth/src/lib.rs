//! Bluetooth LE streaming link: connection state, GATT layout and the chunked
//! sample transport.
//!
//! This crate is `no_std` by default; it only uses `core` + the platform traits.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![allow(missing_docs)]

mod fmt;

pub mod gatt;
pub mod state;
pub mod stream;

pub use state::ConnectionState;
pub use stream::{ChunkTransport, StreamStats, TransportReport};
