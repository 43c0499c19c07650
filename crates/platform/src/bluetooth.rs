//! Bluetooth adapter abstraction
//!
//! The radio stack itself is external. The firmware needs three things from
//! it: bring-up, connectable advertising, and a way to push notifications on
//! the streaming characteristic.

/// Bluetooth adapter trait
pub trait BluetoothAdapter {
    /// Error type
    type Error: core::fmt::Debug;

    /// Initialize adapter. The stack may finish bring-up asynchronously;
    /// poll [`is_ready`](Self::is_ready) afterwards.
    fn init(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Check if the stack finished bring-up
    fn is_ready(&self) -> bool;

    /// Start connectable advertising with a prebuilt advertising payload and
    /// an interval in 0.625 ms units.
    fn start_advertising(
        &mut self,
        payload: &[u8],
        interval: u16,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop advertising
    fn stop_advertising(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Notification channel towards the connected peer.
pub trait NotifySink {
    /// Error type
    type Error: core::fmt::Debug;

    /// Send one notification on the streaming characteristic.
    ///
    /// `payload` never exceeds the link's maximum notification size.
    fn notify(&mut self, payload: &[u8]) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
