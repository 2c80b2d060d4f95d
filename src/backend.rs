//! Simulator backends, i.e., the engines that receive the wiring and integrate the network dynamics.
//!
//! Each engine is reached through the narrow [`Backend`] interface. The [`RecordingBackend`] keeps
//! everything it receives in memory, which is what the lattice binary and the tests run against.
use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::connection::{Connection, SynapseType};
use crate::error::SNNError;

/// A source of current injected into a unit. Times are in ms.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum CurrentSource {
    /// A single pulse of constant amplitude over `[start, stop)`.
    DC { amplitude: f64, start: f64, stop: f64 },
    /// A step-wise current: `amplitudes[i]` holds from `times[i]` until the next step.
    Step { times: Vec<f64>, amplitudes: Vec<f64> },
    /// A sine-modulated current over `[start, stop)`, with frequency in Hz and phase in degrees.
    AC {
        amplitude: f64,
        offset: f64,
        frequency: f64,
        phase: f64,
        start: f64,
        stop: f64,
    },
}

impl CurrentSource {
    /// Check the source parameters.
    pub fn validate(&self) -> Result<(), SNNError> {
        match self {
            CurrentSource::DC { start, stop, .. } | CurrentSource::AC { start, stop, .. } => {
                if !(start <= stop) {
                    return Err(SNNError::InvalidParameter(format!(
                        "Current source must start before it stops, got [{}, {})",
                        start, stop
                    )));
                }
            }
            CurrentSource::Step { times, amplitudes } => {
                if times.len() != amplitudes.len() {
                    return Err(SNNError::InvalidParameter(format!(
                        "Step current source has {} times but {} amplitudes",
                        times.len(),
                        amplitudes.len()
                    )));
                }
                if times.windows(2).any(|w| !(w[0] < w[1])) {
                    return Err(SNNError::InvalidParameter(
                        "Step current source times must be strictly increasing".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// The amplitude of the current at time `t`.
    pub fn amplitude_at(&self, t: f64) -> f64 {
        match self {
            CurrentSource::DC {
                amplitude,
                start,
                stop,
            } => {
                if t >= *start && t < *stop {
                    *amplitude
                } else {
                    0.0
                }
            }
            CurrentSource::Step { times, amplitudes } => {
                match times.iter().rposition(|&step| step <= t) {
                    Some(i) => amplitudes[i],
                    None => 0.0,
                }
            }
            CurrentSource::AC {
                amplitude,
                offset,
                frequency,
                phase,
                start,
                stop,
            } => {
                if t >= *start && t < *stop {
                    offset + amplitude * (2.0 * PI * (t * frequency / 1000.0 + phase / 360.0)).sin()
                } else {
                    0.0
                }
            }
        }
    }
}

/// The capabilities a simulator engine must offer to run a lattice network.
pub trait Backend {
    /// Register a connection targeting the given synapse type.
    fn register_connection(
        &mut self,
        connection: &Connection,
        synapse_type: SynapseType,
    ) -> Result<(), SNNError>;

    /// Inject a current into a unit, replacing any previous source for that unit.
    fn set_current(&mut self, unit_id: usize, source: CurrentSource) -> Result<(), SNNError>;

    /// Advance the simulation by `duration` ms.
    fn run(&mut self, duration: f64) -> Result<(), SNNError>;

    /// Reset the simulation time to zero. The wiring is kept.
    fn reset(&mut self);

    /// The current simulation time in ms.
    fn time(&self) -> f64;
}

/// A backend recording everything it receives.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RecordingBackend {
    lim_delays: (f64, f64),
    connections: Vec<(Connection, SynapseType)>,
    currents: HashMap<usize, CurrentSource>,
    time: f64,
}

impl RecordingBackend {
    /// Create a backend accepting delays in `[min_delay, max_delay]`.
    pub fn build(lim_delays: (f64, f64)) -> Result<Self, SNNError> {
        let (min_delay, max_delay) = lim_delays;
        if !(min_delay >= 0.0 && min_delay <= max_delay && max_delay.is_finite()) {
            return Err(SNNError::InvalidParameter(format!(
                "Backend delay range must satisfy 0 <= min <= max, got ({}, {})",
                min_delay, max_delay
            )));
        }
        Ok(RecordingBackend {
            lim_delays,
            connections: vec![],
            currents: HashMap::new(),
            time: 0.0,
        })
    }

    pub fn connections(&self) -> &[(Connection, SynapseType)] {
        &self.connections
    }

    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    /// The number of registered connections targeting the given synapse type.
    pub fn num_connections_of(&self, synapse_type: SynapseType) -> usize {
        self.connections
            .iter()
            .filter(|(_, other)| *other == synapse_type)
            .count()
    }

    /// The current injected into a unit at the present simulation time.
    pub fn injected_current(&self, unit_id: usize) -> f64 {
        self.currents
            .get(&unit_id)
            .map_or(0.0, |source| source.amplitude_at(self.time))
    }
}

impl Backend for RecordingBackend {
    fn register_connection(
        &mut self,
        connection: &Connection,
        synapse_type: SynapseType,
    ) -> Result<(), SNNError> {
        let (min_delay, max_delay) = self.lim_delays;
        if !(connection.delay >= min_delay && connection.delay <= max_delay) {
            return Err(SNNError::InvalidParameter(format!(
                "Connection {} -> {} has delay {} outside [{}, {}]",
                connection.source_id, connection.target_id, connection.delay, min_delay, max_delay
            )));
        }
        self.connections.push((connection.clone(), synapse_type));
        Ok(())
    }

    fn set_current(&mut self, unit_id: usize, source: CurrentSource) -> Result<(), SNNError> {
        source.validate()?;
        self.currents.insert(unit_id, source);
        Ok(())
    }

    fn run(&mut self, duration: f64) -> Result<(), SNNError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(SNNError::InvalidParameter(format!(
                "Simulation duration must be non-negative, got {}",
                duration
            )));
        }
        log::info!("Running the simulation for {} ms", duration);
        self.time += duration;
        Ok(())
    }

    fn reset(&mut self) {
        self.time = 0.0;
    }

    fn time(&self) -> f64 {
        self.time
    }
}
