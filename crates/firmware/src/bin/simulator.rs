//! Desktop simulator for the acquisition board.
//!
//! Runs the real boot, sampling and streaming code against simulated
//! peripherals. Type commands on stdin: plain lines arrive on the serial
//! channel, lines prefixed with `ble ` arrive as wireless writes.
//!
//! Run with: cargo run -p firmware --bin simulator --features emulator

#![allow(missing_docs)]

use std::cell::RefCell;
use std::time::Duration;

use anyhow::Context as _;
use bluetooth::ConnectionState;
use control::{Dispatcher, PhaseGate};
use embassy_sync::blocking_mutex::Mutex;
use firmware::app::{self, Buffers, Shared};
use firmware::boot::{Peripherals, SharedSampler};
use firmware::defaults::FrontEndDefaults;
use firmware::memory::{self, BLOCK_CAPACITY, BUFFER_COUNT};
use firmware::sim::{self, LoggingFrontEnd, SimConverter, SimRadio};
use platform::config;
use platform::mocks::{MockClock, MockRouter};
use platform::AcquisitionConfig;
use tracing_subscriber::EnvFilter;

static GATE: PhaseGate = PhaseGate::new();
static LINK: ConnectionState = ConnectionState::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("{}", config::dev_banner());
    println!(
        "Serial: ON, START   Wireless: ble <command> (e.g. ble {})\n",
        sim::WIRELESS_EXAMPLES.join(", ble ")
    );

    let acquisition = AcquisitionConfig::default();
    let defaults = FrontEndDefaults::default();
    acquisition.validate(BLOCK_CAPACITY)?;
    let block_period = Duration::from_micros(
        acquisition
            .block_fill_time_us()
            .context("block fill time overflows")?,
    );

    let blocks = memory::take_blocks().context("sample blocks already taken")?;
    let snapshot = memory::take_snapshot().context("snapshot buffer already taken")?;
    let front_end = Mutex::new(RefCell::new(LoggingFrontEnd::new()));
    let dispatcher = Dispatcher::new(&GATE, &front_end);
    let sampler: SharedSampler<'_, SimConverter, MockClock, BLOCK_CAPACITY, BUFFER_COUNT> =
        Mutex::new(RefCell::new(None));
    let mut radio = SimRadio::new();

    let shared = Shared {
        gate: &GATE,
        front_end: &front_end,
        link: &LINK,
        staging: &memory::STAGING,
    };
    let hw = Peripherals {
        converter: SimConverter::new(50.0, acquisition.sample_rate_hz, 1500),
        clock: MockClock::new(),
        router: MockRouter::default(),
    };

    tokio::select! {
        err = app::run(
            &shared,
            &acquisition,
            &defaults,
            hw,
            Buffers { blocks, snapshot },
            &sampler,
            &mut radio,
        ) => {
            tracing::error!(%err, "acquisition stopped");
        }
        () = sim::run_hardware(&sampler, &memory::STAGING, block_period) => {}
        res = async {
            sim::simulate_peer(&LINK, Duration::from_secs(1)).await;
            sim::read_commands(&LINK, &dispatcher).await?;
            tracing::info!("stdin closed, running until interrupted");
            std::future::pending::<std::io::Result<()>>().await
        } => {
            res?;
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("interrupted");
        }
    }

    println!();
    println!("phase:         {}", control::gate::phase_name(GATE.phase()));
    println!("blocks staged: {}", memory::STAGING.staged());
    println!("overwritten:   {}", memory::STAGING.overwritten());
    println!("notifications: {}", radio.notifications());
    println!("bytes sent:    {}", radio.bytes());
    Ok(())
}
