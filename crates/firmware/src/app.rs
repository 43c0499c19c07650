//! Application main flow.
//!
//! Radio first (a power request may arrive wirelessly), then the boot
//! sequence, then streaming for the rest of the program's life. Commands are
//! handled in interrupt/callback context through [`crate::irq`] and
//! [`crate::radio::on_gatt_event`] while this flow sleeps.

use acquisition::StagingSlot;
use bluetooth::{ChunkTransport, ConnectionState};
use control::{PhaseGate, SharedFrontEnd};
use platform::{
    AcquisitionConfig, BluetoothAdapter, Converter, EventRouter, NotifySink, Sample, SampleClock,
    SignalChain,
};

use crate::boot::{self, BootError, Peripherals, SharedSampler};
use crate::defaults::FrontEndDefaults;
use crate::radio;
use crate::streamer::Streamer;

/// State shared between the main flow, interrupts and radio callbacks.
pub struct Shared<'a, F, const CAP: usize> {
    /// Power/start latches and phase
    pub gate: &'a PhaseGate,
    /// Signal chain collaborator
    pub front_end: &'a SharedFrontEnd<F>,
    /// Wireless connection state
    pub link: &'a ConnectionState,
    /// Interrupt-to-task handoff slot
    pub staging: &'a StagingSlot<CAP>,
}

/// Buffers owned by the acquisition for the program's lifetime.
pub struct Buffers<'a, const CAP: usize, const N: usize> {
    /// The sampler's rotating blocks
    pub blocks: &'a mut [[Sample; CAP]; N],
    /// The streaming task's private copy of the latest block
    pub snapshot: &'a mut [Sample; CAP],
}

/// Run the instrument. Returns only on a fatal boot error.
pub async fn run<'a, V, C, R, F, A, const CAP: usize, const N: usize>(
    shared: &Shared<'a, F, CAP>,
    config: &AcquisitionConfig,
    defaults: &FrontEndDefaults,
    hw: Peripherals<V, C, R>,
    buffers: Buffers<'a, CAP, N>,
    sampler: &SharedSampler<'a, V, C, CAP, N>,
    radio: &mut A,
) -> BootError
where
    V: Converter,
    C: SampleClock,
    R: EventRouter,
    F: SignalChain,
    A: BluetoothAdapter + NotifySink,
{
    info!("{} v{}", platform::config::APP_NAME, platform::config::APP_VERSION);

    if let Err(e) = radio::bring_up(radio).await {
        return e;
    }

    let Buffers { blocks, snapshot } = buffers;
    // Routing channels stay allocated while sampling runs.
    let _router = match boot::run(
        shared.gate,
        shared.front_end,
        defaults,
        config,
        hw,
        blocks,
        sampler,
    )
    .await
    {
        Ok(router) => router,
        Err(e) => {
            error!("boot: fatal error, acquisition halted");
            return e;
        }
    };

    let transport = ChunkTransport::new(shared.link, config.chunk_samples);
    let mut streamer = Streamer::new(shared.staging, transport, snapshot);
    streamer.run(radio).await
}
