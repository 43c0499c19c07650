//! GATT service layout and advertising data.
//!
//! ```text
//! Service 445817D2-9E86-1078-1F76-703DC002EF41
//! ├── 445817D2-...-EF42  notify   sample stream  (+ CCC)
//! └── 445817D2-...-EF43  write    command buffer (≤ 20 bytes)
//! ```

/// Custom service UUID.
pub const SERVICE_UUID: u128 = 0x4458_17D2_9E86_1078_1F76_703D_C002_EF41;

/// Notify-only characteristic carrying sample chunks.
pub const STREAM_CHAR_UUID: u128 = 0x4458_17D2_9E86_1078_1F76_703D_C002_EF42;

/// Write-only characteristic receiving commands.
pub const COMMAND_CHAR_UUID: u128 = 0x4458_17D2_9E86_1078_1F76_703D_C002_EF43;

/// CCC descriptor value enabling notifications.
pub const CCC_NOTIFY: u16 = 0x0001;

/// Advertising interval, 0.625 ms units (0x0020 = 20 ms). Min and max are equal.
pub const ADV_INTERVAL: u16 = 0x0020;

pub use platform::config::MAX_COMMAND_LEN;

/// AD type: flags.
const AD_FLAGS: u8 = 0x01;
/// AD type: complete list of 128-bit service UUIDs.
const AD_UUID128_ALL: u8 = 0x07;
/// LE General Discoverable | BR/EDR not supported.
const FLAGS_GENERAL_NO_BREDR: u8 = 0x06;

/// Advertising payload length in bytes.
pub const ADV_PAYLOAD_LEN: usize = 3 + 2 + 16;

/// UUID in over-the-air (little-endian) byte order.
#[must_use]
pub const fn uuid_bytes(uuid: u128) -> [u8; 16] {
    uuid.to_le_bytes()
}

/// Connectable advertising data: flags and the service UUID.
#[must_use]
pub fn advertising_payload() -> [u8; ADV_PAYLOAD_LEN] {
    let mut payload = [0u8; ADV_PAYLOAD_LEN];
    let header = [0x02, AD_FLAGS, FLAGS_GENERAL_NO_BREDR, 0x11, AD_UUID128_ALL];
    let (head, uuid) = payload.split_at_mut(header.len());
    head.copy_from_slice(&header);
    uuid.copy_from_slice(&uuid_bytes(SERVICE_UUID));
    payload
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_fits_legacy_advertising() {
        assert!(ADV_PAYLOAD_LEN <= 31);
    }

    #[test]
    fn test_payload_carries_flags_and_service_uuid_only() {
        let payload = advertising_payload();
        let mut types = Vec::new();
        let mut rest = &payload[..];
        while let Some((&len, tail)) = rest.split_first() {
            let (field, next) = tail.split_at(usize::from(len));
            types.push(field[0]);
            rest = next;
        }
        assert_eq!(types, vec![AD_FLAGS, AD_UUID128_ALL]);
    }

    #[test]
    fn test_payload_layout() {
        let payload = advertising_payload();
        assert_eq!(&payload[..3], &[0x02, 0x01, 0x06]);
        assert_eq!(payload[3], 17, "UUID AD length covers type byte + 16");
        assert_eq!(payload[4], 0x07);
        assert_eq!(payload[5], 0x41, "UUID is sent least-significant byte first");
        assert_eq!(payload[20], 0x44);
    }

    #[test]
    fn test_characteristics_share_service_base() {
        assert_eq!(STREAM_CHAR_UUID >> 16, SERVICE_UUID >> 16);
        assert_eq!(COMMAND_CHAR_UUID.wrapping_sub(STREAM_CHAR_UUID), 1);
    }
}
