//! Hardware event routing and the sample clock
//!
//! Event routing (PPI/DPPI on nRF, the trigger matrix on other parts) lets one
//! peripheral's event fire another peripheral's task with no CPU involvement.
//! Channels are a finite resource: they are allocated, bound once, enabled,
//! and released when the binding is no longer needed.

/// Hardware events that can drive a routing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventSource {
    /// Sample timer compare match on the given compare channel.
    TimerCompare(u8),
    /// Converter finished writing its current buffer (END).
    ConverterEnd,
}

/// Hardware tasks a routing channel can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskSink {
    /// Take one converter sample.
    ConverterSample,
    /// Start the converter on its next queued buffer.
    ConverterStart,
}

/// Identifier of an allocated routing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RouteChannel(pub u8);

/// Event router trait
pub trait EventRouter {
    /// Error type
    type Error: core::fmt::Debug;

    /// Allocate a free routing channel.
    fn allocate(&mut self) -> Result<RouteChannel, Self::Error>;

    /// Bind `source` to `sink` on an allocated channel.
    fn connect(
        &mut self,
        channel: RouteChannel,
        source: EventSource,
        sink: TaskSink,
    ) -> Result<(), Self::Error>;

    /// Enable a bound channel.
    fn enable(&mut self, channel: RouteChannel) -> Result<(), Self::Error>;

    /// Disable and free a channel.
    fn release(&mut self, channel: RouteChannel) -> Result<(), Self::Error>;
}

/// Routes through the borrowed router; board code keeps ownership.
impl<R: EventRouter + ?Sized> EventRouter for &mut R {
    type Error = R::Error;

    fn allocate(&mut self) -> Result<RouteChannel, Self::Error> {
        R::allocate(self)
    }

    fn connect(
        &mut self,
        channel: RouteChannel,
        source: EventSource,
        sink: TaskSink,
    ) -> Result<(), Self::Error> {
        R::connect(self, channel, source, sink)
    }

    fn enable(&mut self, channel: RouteChannel) -> Result<(), Self::Error> {
        R::enable(self, channel)
    }

    fn release(&mut self, channel: RouteChannel) -> Result<(), Self::Error> {
        R::release(self, channel)
    }
}

/// Periodic sample timer
pub trait SampleClock {
    /// Error type
    type Error: core::fmt::Debug;

    /// Configure a compare event every `interval_us` microseconds on compare
    /// channel `compare`, clearing the counter on match.
    fn configure(&mut self, compare: u8, interval_us: u32) -> Result<(), Self::Error>;

    /// Start counting.
    fn enable(&mut self);

    /// Stop counting.
    fn disable(&mut self);

    /// Check if the timer is running
    fn is_enabled(&self) -> bool;
}
