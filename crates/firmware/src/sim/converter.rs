use std::collections::VecDeque;
use std::f32::consts::TAU;

use platform::{Converter, ConverterEvent, DmaTarget, Sample};

/// Simulated converter producing a sine wave.
#[derive(Debug)]
pub struct SimConverter {
    queued: VecDeque<(usize, DmaTarget)>,
    triggered: bool,
    ready_sent: bool,
    phase: f32,
    step: f32,
    amplitude: f32,
}

impl SimConverter {
    /// Sine of `frequency_hz` sampled at `sample_rate_hz`, peak `amplitude` counts.
    pub fn new(frequency_hz: f32, sample_rate_hz: u32, amplitude: Sample) -> Self {
        Self {
            queued: VecDeque::new(),
            triggered: false,
            ready_sent: false,
            phase: 0.0,
            step: TAU * frequency_hz / sample_rate_hz.max(1) as f32,
            amplitude: f32::from(amplitude),
        }
    }

    /// READY, once, after the converter has been triggered.
    pub fn take_ready(&mut self) -> Option<ConverterEvent> {
        if self.triggered && !self.ready_sent {
            self.ready_sent = true;
            tracing::debug!("sim converter: ready");
            Some(ConverterEvent::Ready)
        } else {
            None
        }
    }

    /// Fill the oldest queued buffer and report it done.
    pub fn fill_next(&mut self) -> Option<ConverterEvent> {
        let Some((slot, target)) = self.queued.pop_front() else {
            tracing::warn!("sim converter: no buffer queued, samples lost");
            return None;
        };
        for i in 0..target.len() {
            #[allow(clippy::cast_possible_truncation)]
            let value = (self.phase.sin() * self.amplitude) as Sample;
            // SAFETY: the sampler queued this block and will not read it until
            // the Done event below; i < target.len().
            unsafe { target.as_mut_ptr().add(i).write(value) };
            self.phase = (self.phase + self.step) % TAU;
        }
        Some(ConverterEvent::Done {
            slot,
            len: target.len(),
        })
    }
}

impl Converter for SimConverter {
    type Error = core::convert::Infallible;

    fn queue_buffer(&mut self, slot: usize, target: DmaTarget) -> Result<(), Self::Error> {
        tracing::trace!(slot, len = target.len(), "sim converter: buffer queued");
        self.queued.push_back((slot, target));
        Ok(())
    }

    fn trigger(&mut self) -> Result<(), Self::Error> {
        self.triggered = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_only_after_trigger_and_only_once() {
        let mut converter = SimConverter::new(50.0, 3000, 1000);
        assert_eq!(converter.take_ready(), None);
        converter.trigger().unwrap();
        assert_eq!(converter.take_ready(), Some(ConverterEvent::Ready));
        assert_eq!(converter.take_ready(), None);
    }

    #[test]
    fn test_fill_writes_bounded_waveform() {
        let mut block: [Sample; 60] = [0; 60];
        let mut converter = SimConverter::new(50.0, 3000, 1000);
        // SAFETY: block outlives the converter's use of it in this test.
        converter.queue_buffer(0, unsafe { DmaTarget::new(&mut block) }).unwrap();

        assert_eq!(converter.fill_next(), Some(ConverterEvent::Done { slot: 0, len: 60 }));
        assert_eq!(converter.fill_next(), None);
        assert!(block.iter().all(|s| s.abs() <= 1000));
        assert!(block.iter().any(|s| *s > 900), "one full period reaches the peak");
    }
}
