//! Trigger fabric
//!
//! Chains the sample timer and the converter in hardware:
//!
//! ```text
//! timer COMPARE[0] ──route──▶ converter SAMPLE
//! converter END    ──route──▶ converter START
//! ```
//!
//! The routes are allocated and enabled once at configuration time and are
//! never rewired. The timer itself stays stopped until [`TriggerFabric::start`],
//! which the sampler calls when the converter reports it holds a buffer.

use heapless::Vec;
use platform::{AcquisitionConfig, EventRouter, EventSource, RouteChannel, SampleClock, TaskSink};

/// Timer compare channel that paces the converter.
pub const SAMPLE_COMPARE: u8 = 0;

/// Number of routing channels the fabric holds.
pub const FABRIC_ROUTES: usize = 2;

/// The fabric's binding table, in allocation order.
pub const BINDINGS: [(EventSource, TaskSink); FABRIC_ROUTES] = [
    (EventSource::TimerCompare(SAMPLE_COMPARE), TaskSink::ConverterSample),
    (EventSource::ConverterEnd, TaskSink::ConverterStart),
];

/// Fatal trigger-fabric configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerError {
    /// Sample rate cannot be expressed as a whole-microsecond interval.
    #[error("sample rate {0} Hz cannot be generated")]
    SampleRate(u32),
    /// Timer rejected the compare configuration.
    #[error("sample timer configuration failed")]
    Clock,
    /// No routing channel available.
    #[error("routing channel allocation failed")]
    Allocate,
    /// Binding an event to a task failed.
    #[error("routing channel binding failed")]
    Connect,
    /// Enabling a bound channel failed.
    #[error("routing channel enable failed")]
    Enable,
}

/// One allocated (source → sink) binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Route {
    /// Hardware channel carrying the binding.
    pub channel: RouteChannel,
    /// Event that fires the channel.
    pub source: EventSource,
    /// Task the channel triggers.
    pub sink: TaskSink,
}

/// Configured timer + routing channels.
pub struct TriggerFabric<C> {
    clock: C,
    routes: Vec<Route, FABRIC_ROUTES>,
    interval_us: u32,
}

impl<C: SampleClock> TriggerFabric<C> {
    /// Configure the timer for `config.sample_rate_hz` and wire both routes.
    ///
    /// On failure every channel allocated so far is released and the timer
    /// is left stopped; there is no partially wired fabric.
    pub fn configure<R: EventRouter>(
        mut clock: C,
        router: &mut R,
        config: &AcquisitionConfig,
    ) -> Result<Self, TriggerError> {
        let rate = config.sample_rate_hz;
        let interval_us = match config.interval_us() {
            Some(us) if us > 0 && rate <= platform::config::MAX_SAMPLE_RATE_HZ => us,
            _ => {
                error!("fabric: unsupported sample rate {} Hz", rate);
                return Err(TriggerError::SampleRate(rate));
            }
        };

        clock.disable();
        if clock.configure(SAMPLE_COMPARE, interval_us).is_err() {
            error!("fabric: timer compare configuration failed");
            return Err(TriggerError::Clock);
        }

        let mut routes = Vec::new();
        for (source, sink) in BINDINGS {
            match bind(router, source, sink) {
                Ok(route) => {
                    // BINDINGS has exactly FABRIC_ROUTES entries.
                    let _ = routes.push(route);
                }
                Err(e) => {
                    error!("fabric: route setup failed, releasing {} channels", routes.len());
                    release_all(router, &routes);
                    return Err(e);
                }
            }
        }

        info!("fabric: {} routes enabled, interval {} us", routes.len(), interval_us);
        Ok(Self {
            clock,
            routes,
            interval_us,
        })
    }

    /// Start the sample timer. Idempotent.
    pub fn start(&mut self) {
        if !self.clock.is_enabled() {
            self.clock.enable();
            info!("fabric: sample timer started");
        }
    }

    /// Whether the sample timer is running.
    pub fn is_running(&self) -> bool {
        self.clock.is_enabled()
    }

    /// Timer compare interval in microseconds.
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Allocated bindings.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Stop the timer, free every routing channel and hand the timer back.
    pub fn release<R: EventRouter>(mut self, router: &mut R) -> C {
        self.clock.disable();
        release_all(router, &self.routes);
        self.clock
    }
}

fn bind<R: EventRouter>(
    router: &mut R,
    source: EventSource,
    sink: TaskSink,
) -> Result<Route, TriggerError> {
    let channel = router.allocate().map_err(|_| TriggerError::Allocate)?;
    let wired = router
        .connect(channel, source, sink)
        .map_err(|_| TriggerError::Connect)
        .and_then(|()| router.enable(channel).map_err(|_| TriggerError::Enable));
    if let Err(e) = wired {
        release_all(router, &[Route { channel, source, sink }]);
        return Err(e);
    }
    debug!("fabric: channel {} bound", channel.0);
    Ok(Route {
        channel,
        source,
        sink,
    })
}

fn release_all<R: EventRouter>(router: &mut R, routes: &[Route]) {
    for route in routes {
        if router.release(route.channel).is_err() {
            warn!("fabric: failed to release channel {}", route.channel.0);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use platform::mocks::{MockClock, MockRouter, RouterStep};

    fn config(rate: u32) -> AcquisitionConfig {
        AcquisitionConfig {
            sample_rate_hz: rate,
            ..AcquisitionConfig::default()
        }
    }

    #[test]
    fn test_configure_wires_both_routes() {
        let mut router = MockRouter::default();
        let fabric = TriggerFabric::configure(MockClock::new(), &mut router, &config(3000)).unwrap();

        assert_eq!(fabric.interval_us(), 333);
        assert!(!fabric.is_running());
        assert_eq!(router.enabled().len(), 2);
        assert_eq!(
            router.bindings()[0],
            (RouteChannel(0), EventSource::TimerCompare(0), TaskSink::ConverterSample)
        );
        assert_eq!(
            router.bindings()[1],
            (RouteChannel(1), EventSource::ConverterEnd, TaskSink::ConverterStart)
        );
    }

    #[test]
    fn test_zero_rate_is_rejected_before_touching_hardware() {
        let mut router = MockRouter::default();
        let err = TriggerFabric::configure(MockClock::new(), &mut router, &config(0))
            .err()
            .unwrap();
        assert_eq!(err, TriggerError::SampleRate(0));
        assert!(router.allocated().is_empty());
    }

    #[test]
    fn test_second_allocation_failure_releases_first_channel() {
        let mut router = MockRouter::default();
        router.fail_at(RouterStep::Allocate(1));
        let err = TriggerFabric::configure(MockClock::new(), &mut router, &config(3000))
            .err()
            .unwrap();
        assert_eq!(err, TriggerError::Allocate);
        assert!(router.allocated().is_empty());
        assert!(router.enabled().is_empty());
    }

    #[test]
    fn test_enable_failure_leaves_no_channel_allocated() {
        let mut router = MockRouter::default();
        router.fail_at(RouterStep::Enable);
        let err = TriggerFabric::configure(MockClock::new(), &mut router, &config(3000))
            .err()
            .unwrap();
        assert_eq!(err, TriggerError::Enable);
        assert!(router.allocated().is_empty());
    }

    #[test]
    fn test_clock_failure_is_fatal() {
        let mut router = MockRouter::default();
        let mut clock = MockClock::new();
        clock.fail_configure();
        let err = TriggerFabric::configure(clock, &mut router, &config(3000))
            .err()
            .unwrap();
        assert_eq!(err, TriggerError::Clock);
    }

    #[test]
    fn test_release_frees_channels_and_stops_timer() {
        let mut router = MockRouter::default();
        let mut fabric =
            TriggerFabric::configure(MockClock::new(), &mut router, &config(3000)).unwrap();
        fabric.start();
        assert!(fabric.is_running());

        let clock = fabric.release(&mut router);
        assert!(!clock.is_enabled());
        assert_eq!(clock.compare(), Some((SAMPLE_COMPARE, 333)));
        assert!(router.allocated().is_empty());
    }
}
