//! Radio bring-up and GATT event routing.

use bluetooth::{gatt, ConnectionState};
use control::{Dispatcher, Outcome};
use embassy_time::{Duration, Timer};
use platform::{BluetoothAdapter, SignalChain};

use crate::boot::BootError;

/// Poll period while waiting for the radio stack to come up.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Events delivered by the radio stack's callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GattEvent<'d> {
    /// A central connected.
    Connected,
    /// The link dropped, with the HCI reason code.
    Disconnected(u8),
    /// The streaming characteristic's CCC descriptor was written.
    CccWritten(u16),
    /// The command characteristic was written.
    CommandWritten(&'d [u8]),
}

/// Initialise the adapter, wait until it is ready and start advertising.
pub async fn bring_up<A: BluetoothAdapter>(adapter: &mut A) -> Result<(), BootError> {
    adapter.init().await.map_err(|_| {
        error!("ble: init failed");
        BootError::Radio
    })?;
    while !adapter.is_ready() {
        Timer::after(READY_POLL_INTERVAL).await;
    }
    let payload = gatt::advertising_payload();
    adapter
        .start_advertising(&payload, gatt::ADV_INTERVAL)
        .await
        .map_err(|_| {
            error!("ble: advertising failed to start");
            BootError::Radio
        })?;
    info!("ble: advertising service, interval {}", gatt::ADV_INTERVAL);
    Ok(())
}

/// Apply one stack event to the link state or the command dispatcher.
pub fn on_gatt_event<F: SignalChain>(
    link: &ConnectionState,
    dispatcher: &Dispatcher<'_, F>,
    event: GattEvent<'_>,
) -> Option<Outcome> {
    match event {
        GattEvent::Connected => link.on_connected(),
        GattEvent::Disconnected(reason) => link.on_disconnected(reason),
        GattEvent::CccWritten(value) => link.on_ccc_write(value),
        GattEvent::CommandWritten(data) => return Some(dispatcher.on_wireless_write(data)),
    }
    None
}
