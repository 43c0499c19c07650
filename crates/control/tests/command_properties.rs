//! Property tests over the command grammar and the phase gate.

// Test files legitimately use unwrap() for readable assertions.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use control::command::parse;
use control::{Channel, Command, LineAssembler, Phase, PhaseGate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parser_never_panics(raw in proptest::collection::vec(any::<u8>(), 0..32)) {
        let _ = parse(&raw);
    }

    #[test]
    fn serial_assembler_never_panics(raw in proptest::collection::vec(any::<u8>(), 0..128)) {
        let mut asm = LineAssembler::new();
        for b in raw {
            if let Some(Ok(cmd)) = asm.feed(b) {
                prop_assert!(cmd.is_phase_request());
            }
        }
    }

    #[test]
    fn in_range_offsets_parse(value in -3.3f32..=3.3) {
        let text = format!("DDSO:{value}");
        prop_assert_eq!(parse(text.as_bytes()), Ok(Command::SetDdsOffset(value)));
    }

    #[test]
    fn requests_stay_latched(ops in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..20)) {
        let gate = PhaseGate::new();
        let mut power_seen = false;
        let mut start_seen = false;
        for (is_power, serial) in ops {
            let channel = if serial { Channel::Serial } else { Channel::Wireless };
            if is_power {
                gate.request_power(channel);
                power_seen = true;
            } else {
                gate.request_start(channel);
                start_seen = true;
            }
            prop_assert_eq!(gate.power_requested(), power_seen);
            prop_assert_eq!(gate.start_requested(), start_seen);
        }
    }
}

#[tokio::test]
async fn wait_for_start_blocks_until_wireless_start() {
    let gate = Arc::new(PhaseGate::new());
    let waiter = {
        let gate = Arc::clone(&gate);
        tokio::spawn(async move {
            gate.wait_for_start().await;
            gate.advance(Phase::Running)
        })
    };

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!waiter.is_finished());
    assert_eq!(gate.phase(), Phase::Idle);

    gate.request_start(Channel::Wireless);
    assert!(waiter.await.unwrap());
    assert_eq!(gate.phase(), Phase::Running);
}
