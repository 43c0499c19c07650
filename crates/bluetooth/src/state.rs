//! Bluetooth connection state tracker.
//!
//! Written from the radio stack's callback context, read by the streaming
//! task before every chunk. Each flag has a single writer (the stack); a
//! stale read costs at most one chunk.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::gatt::CCC_NOTIFY;

/// Tracks whether a peer is connected and subscribed to sample notifications.
pub struct ConnectionState {
    connected: AtomicBool,
    subscribed: AtomicBool,
}

impl ConnectionState {
    /// Create a new, disconnected state.
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            subscribed: AtomicBool::new(false),
        }
    }

    /// Record a successful connection.
    pub fn on_connected(&self) {
        self.connected.store(true, Ordering::Release);
        info!("ble: connected");
    }

    /// Record that the peer has disconnected. Clears the subscription.
    pub fn on_disconnected(&self, reason: u8) {
        self.subscribed.store(false, Ordering::Release);
        self.connected.store(false, Ordering::Release);
        info!("ble: disconnected (reason {})", reason);
    }

    /// Record a write to the streaming characteristic's CCC descriptor.
    ///
    /// `0x0001` (notifications) subscribes; any other value unsubscribes.
    pub fn on_ccc_write(&self, value: u16) {
        let enabled = value == CCC_NOTIFY;
        self.subscribed.store(enabled, Ordering::Release);
        info!("ble: notifications {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Returns `true` if a peer is currently connected.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Returns `true` if the peer enabled notifications.
    #[must_use]
    pub fn subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }

    /// Returns `true` when a chunk may be sent (connected and subscribed).
    #[must_use]
    pub fn can_stream(&self) -> bool {
        self.connected() && self.subscribed()
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState;

    #[test]
    fn test_bt_starts_disconnected() {
        let state = ConnectionState::new();
        assert!(!state.connected());
        assert!(!state.subscribed());
        assert!(!state.can_stream());
    }

    #[test]
    fn test_bt_connect_without_subscription_cannot_stream() {
        let state = ConnectionState::new();
        state.on_connected();
        assert!(state.connected());
        assert!(!state.can_stream());
    }

    #[test]
    fn test_bt_ccc_notify_subscribes() {
        let state = ConnectionState::new();
        state.on_connected();
        state.on_ccc_write(0x0001);
        assert!(state.can_stream());
    }

    #[test]
    fn test_bt_ccc_indicate_is_not_a_subscription() {
        let state = ConnectionState::new();
        state.on_connected();
        state.on_ccc_write(0x0002);
        assert!(!state.subscribed());
    }

    #[test]
    fn test_bt_disconnect_clears_subscription() {
        let state = ConnectionState::new();
        state.on_connected();
        state.on_ccc_write(0x0001);
        state.on_disconnected(0x13);
        assert!(!state.connected());
        assert!(!state.subscribed(), "a reconnecting peer must subscribe again");
    }
}
