//! Boot and phase orchestration.
//!
//! Initialization order (MUST be respected):
//!   1. Wait for a power request on either command channel
//!   2. Power the front end and apply defaults → `PoweredUp`
//!   3. Configure the trigger fabric (timer stays stopped)
//!   4. Build the sampler and prime the converter → `Armed`
//!   5. Wait for a start request on either command channel
//!   6. Trigger the converter; its READY event starts the timer → `Running`
//!
//! A fatal error stops the sequence where it is. There is no retry and no
//! way back to an earlier phase.

use core::cell::RefCell;

use acquisition::{Sampler, SamplerError, TriggerError, TriggerFabric};
use control::{Phase, PhaseGate, SharedFrontEnd};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::{AcquisitionConfig, Converter, EventRouter, Sample, SampleClock, SignalChain};

use crate::defaults::FrontEndDefaults;

/// Ordered list of boot sequence steps for documentation and testing.
///
/// # Correctness Invariants
///
/// - The fabric is wired BEFORE the converter is primed, and the timer is
///   only enabled by the converter's READY event. Enabling it earlier clocks
///   samples into a converter with no buffer.
/// - The radio must already advertise before step 1: the power request may
///   arrive over the wireless channel.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Gate: wait for ON (serial or wireless)",
    "2. Front end: power up, apply defaults -> PoweredUp",
    "3. Trigger fabric: timer compare + 2 routes, timer stopped",
    "4. Sampler: prime converter with first buffers -> Armed",
    "5. Gate: wait for START (serial or wireless)",
    "6. Converter: trigger; READY enables timer -> Running",
];

/// Fatal boot errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Front end refused power-up or a default setting.
    #[error("front end power-up failed")]
    FrontEnd,
    /// Trigger fabric could not be wired.
    #[error("trigger fabric: {0}")]
    Trigger(#[from] TriggerError),
    /// Sampler setup or converter control failed.
    #[error("sampler: {0}")]
    Sampler(#[from] SamplerError),
    /// Start was attempted before the sampler was installed.
    #[error("sampler not armed")]
    NotArmed,
    /// Radio bring-up or advertising failed.
    #[error("radio bring-up failed")]
    Radio,
}

/// Sampler shared between the boot flow and the converter interrupt.
pub type SharedSampler<'a, V, C, const CAP: usize, const N: usize> =
    Mutex<CriticalSectionRawMutex, RefCell<Option<Sampler<'a, V, C, CAP, N>>>>;

/// Acquisition peripherals consumed by the boot flow.
pub struct Peripherals<V, C, R> {
    /// Converter driver
    pub converter: V,
    /// Sample timer
    pub clock: C,
    /// Event router
    pub router: R,
}

/// Steps 1–2: wait for power, power up, apply defaults.
pub async fn power_up<F: SignalChain>(
    gate: &PhaseGate,
    front_end: &SharedFrontEnd<F>,
    defaults: &FrontEndDefaults,
) -> Result<(), BootError> {
    gate.wait_for_power().await;
    front_end
        .lock(|cell| {
            let mut fe = cell.borrow_mut();
            fe.power_up()?;
            defaults.apply(&mut *fe)
        })
        .map_err(|_| {
            error!("boot: front end power-up failed");
            BootError::FrontEnd
        })?;
    gate.advance(Phase::PoweredUp);
    Ok(())
}

/// Steps 3–4: wire the fabric, prime the converter, install the sampler.
///
/// Returns the router, which must outlive the acquisition.
pub fn arm<'a, V, C, R, const CAP: usize, const N: usize>(
    gate: &PhaseGate,
    hw: Peripherals<V, C, R>,
    blocks: &'a mut [[Sample; CAP]; N],
    config: &AcquisitionConfig,
    sampler: &SharedSampler<'a, V, C, CAP, N>,
) -> Result<R, BootError>
where
    V: Converter,
    C: SampleClock,
    R: EventRouter,
{
    let Peripherals {
        converter,
        clock,
        mut router,
    } = hw;
    // Reject the layout before any routing channel is taken.
    if let Err(e) = Sampler::<'a, V, C, CAP, N>::check_config(config) {
        error!("boot: sampler setup rejected");
        return Err(e.into());
    }
    let fabric = TriggerFabric::configure(clock, &mut router, config)?;
    let mut primed = Sampler::new(converter, fabric, blocks, config)?;
    if let Err(e) = primed.prime() {
        error!("boot: converter priming failed, releasing routes");
        primed.release(&mut router);
        return Err(e.into());
    }
    // The converter holds raw block handles, so moving the sampler is fine.
    sampler.lock(|cell| *cell.borrow_mut() = Some(primed));
    gate.advance(Phase::Armed);
    Ok(router)
}

/// Steps 5–6: wait for start and trigger the converter.
pub async fn start<V, C, const CAP: usize, const N: usize>(
    gate: &PhaseGate,
    sampler: &SharedSampler<'_, V, C, CAP, N>,
) -> Result<(), BootError>
where
    V: Converter,
    C: SampleClock,
{
    gate.wait_for_start().await;
    sampler
        .lock(|cell| cell.borrow_mut().as_mut().map(Sampler::trigger))
        .ok_or(BootError::NotArmed)??;
    gate.advance(Phase::Running);
    Ok(())
}

/// Run the full sequence. Returns the router once acquisition is running.
#[allow(clippy::too_many_arguments)]
pub async fn run<'a, V, C, R, F, const CAP: usize, const N: usize>(
    gate: &PhaseGate,
    front_end: &SharedFrontEnd<F>,
    defaults: &FrontEndDefaults,
    config: &AcquisitionConfig,
    hw: Peripherals<V, C, R>,
    blocks: &'a mut [[Sample; CAP]; N],
    sampler: &SharedSampler<'a, V, C, CAP, N>,
) -> Result<R, BootError>
where
    V: Converter,
    C: SampleClock,
    R: EventRouter,
    F: SignalChain,
{
    info!("boot: waiting for power request");
    power_up(gate, front_end, defaults).await?;
    let router = arm(gate, hw, blocks, config, sampler)?;
    info!("boot: armed, waiting for start request");
    start(gate, sampler).await?;
    Ok(router)
}
