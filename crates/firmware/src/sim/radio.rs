use std::time::Duration;

use platform::{BluetoothAdapter, NotifySink};

/// Time one notification occupies the simulated link.
const NOTIFY_AIRTIME: Duration = Duration::from_micros(500);

/// Simulated radio: always comes up, counts notifications.
#[derive(Debug, Default)]
pub struct SimRadio {
    initialised: bool,
    advertising: bool,
    notifications: u64,
    bytes: u64,
}

impl SimRadio {
    /// Create a radio that has not been initialised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far.
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Payload bytes delivered so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Whether advertising is on.
    pub fn is_advertising(&self) -> bool {
        self.advertising
    }
}

impl BluetoothAdapter for SimRadio {
    type Error = core::convert::Infallible;

    async fn init(&mut self) -> Result<(), Self::Error> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        self.initialised = true;
        tracing::info!("sim radio: stack up");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.initialised
    }

    async fn start_advertising(&mut self, payload: &[u8], interval: u16) -> Result<(), Self::Error> {
        self.advertising = true;
        tracing::info!(len = payload.len(), interval, "sim radio: advertising");
        Ok(())
    }

    async fn stop_advertising(&mut self) -> Result<(), Self::Error> {
        self.advertising = false;
        Ok(())
    }
}

impl NotifySink for SimRadio {
    type Error = core::convert::Infallible;

    async fn notify(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        tokio::time::sleep(NOTIFY_AIRTIME).await;
        self.notifications = self.notifications.saturating_add(1);
        self.bytes = self.bytes.saturating_add(payload.len() as u64);
        if self.notifications % 75 == 0 {
            tracing::debug!(
                notifications = self.notifications,
                bytes = self.bytes,
                "sim radio: delivered"
            );
        }
        Ok(())
    }
}
