//! Configuration of the lattice experiment.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_MAX_DELAY, DEFAULT_TIMESTEP};
use crate::error::SNNError;
use crate::network::projection::PathwayKind;
use crate::sampler::connector::WiringRequest;

/// Parameters of one pathway between the excitatory and inhibitory populations.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PathwayParams {
    /// Firing rate (Hz) of each of the external "ghost" units driving a target.
    pub background_rate: f64,
    /// Number of connections every target receives in total, from inside or outside the lattice.
    pub num_connections: f64,
    /// Proportion of those connections converted into connections from inside the lattice.
    pub internal_factor: f64,
}

impl PathwayParams {
    fn new(background_rate: f64, num_connections: f64, internal_factor: f64) -> Self {
        PathwayParams {
            background_rate,
            num_connections,
            internal_factor,
        }
    }

    /// The number of connections every target receives from inside the lattice.
    pub fn num_internal(&self) -> i64 {
        (self.num_connections * self.internal_factor) as i64
    }

    /// The Poisson rate driving a target before the lattice is wired.
    pub fn initial_rate(&self) -> f64 {
        self.background_rate * self.num_connections
    }

    /// The Poisson rate driving a target once the internal connections replace part of the background.
    pub fn reduced_rate(&self) -> f64 {
        self.background_rate * (self.num_connections - self.num_internal() as f64)
    }
}

/// Configuration of the lattice experiment. Times are in ms, weights in uS.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Simulation time step.
    pub dt: f64,
    /// Time during which the network settles without internal connections.
    pub t_init: f64,
    /// Total simulation time.
    pub t_sim: f64,
    /// Weight of all connections.
    pub weight: f64,
    /// Number of units on one side of the cube.
    pub lattice_size: usize,
    /// Proportion of inhibitory units.
    pub prop_inhibitory: f64,
    pub excitatory_to_excitatory: PathwayParams,
    pub excitatory_to_inhibitory: PathwayParams,
    pub inhibitory_to_excitatory: PathwayParams,
    pub inhibitory_to_inhibitory: PathwayParams,
    /// Conversion of distance into milliseconds of delay.
    pub distance_factor: f64,
    /// Scale of the multiplicative delay noise.
    pub noise_factor: f64,
    /// Shortest delay the simulator accepts. Defaults to the time step.
    pub min_delay: Option<f64>,
    pub max_delay: f64,
    /// Seed of the placement of the units on the lattice.
    pub layout_seed: u64,
    /// Seed of the wiring, shared by all pathways.
    pub wiring_seed: u64,
    /// Number of target shards wired concurrently.
    pub num_shards: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        LatticeConfig {
            dt: DEFAULT_TIMESTEP,
            t_init: 500.0,
            t_sim: 2000.0,
            weight: 0.002,
            lattice_size: 8,
            prop_inhibitory: 0.2,
            excitatory_to_excitatory: PathwayParams::new(6.0, 1000.0, 0.12),
            excitatory_to_inhibitory: PathwayParams::new(6.0, 1000.0, 0.2),
            inhibitory_to_excitatory: PathwayParams::new(10.0, 250.0, 0.2),
            inhibitory_to_inhibitory: PathwayParams::new(10.0, 250.0, 0.2),
            distance_factor: 0.25,
            noise_factor: 0.2,
            min_delay: None,
            max_delay: DEFAULT_MAX_DELAY,
            layout_seed: 0,
            wiring_seed: 12345,
            num_shards: 1,
        }
    }
}

impl LatticeConfig {
    /// Load a configuration from a JSON file. Missing fields take their default value.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SNNError> {
        let file = File::open(path)?;
        let config: LatticeConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SNNError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SNNError> {
        if !(self.dt > 0.0) {
            return Err(SNNError::InvalidParameter(format!(
                "The time step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.min_delay() <= self.dt) {
            return Err(SNNError::InvalidParameter(format!(
                "The minimum delay must not exceed the time step, got {} and {}",
                self.min_delay(),
                self.dt
            )));
        }
        if !(self.t_init >= 0.0 && self.t_init <= self.t_sim && self.t_sim.is_finite()) {
            return Err(SNNError::InvalidParameter(format!(
                "Simulation times must satisfy 0 <= t_init <= t_sim, got {} and {}",
                self.t_init, self.t_sim
            )));
        }
        if self.num_shards == 0 {
            return Err(SNNError::InvalidParameter(
                "The number of shards must be positive".to_string(),
            ));
        }
        for kind in PathwayKind::ALL {
            let params = self.pathway(kind);
            if !(params.background_rate >= 0.0
                && params.num_connections >= 0.0
                && (0.0..=1.0).contains(&params.internal_factor))
            {
                return Err(SNNError::InvalidParameter(format!(
                    "Invalid parameters for pathway {}: {:?}",
                    kind, params
                )));
            }
            self.wiring_request(kind).validate()?;
        }
        Ok(())
    }

    /// The shortest delay the simulator accepts.
    pub fn min_delay(&self) -> f64 {
        self.min_delay.unwrap_or(self.dt)
    }

    /// The delay range accepted by the simulator.
    pub fn lim_delays(&self) -> (f64, f64) {
        (self.min_delay(), self.max_delay)
    }

    pub fn pathway(&self, kind: PathwayKind) -> &PathwayParams {
        match kind {
            PathwayKind::ExcitatoryToExcitatory => &self.excitatory_to_excitatory,
            PathwayKind::ExcitatoryToInhibitory => &self.excitatory_to_inhibitory,
            PathwayKind::InhibitoryToExcitatory => &self.inhibitory_to_excitatory,
            PathwayKind::InhibitoryToInhibitory => &self.inhibitory_to_inhibitory,
        }
    }

    /// The wiring request of a pathway.
    pub fn wiring_request(&self, kind: PathwayKind) -> WiringRequest {
        WiringRequest {
            weight: self.weight,
            distance_factor: self.distance_factor,
            noise_factor: self.noise_factor,
            n: self.pathway(kind).num_internal(),
            lim_delays: self.lim_delays(),
        }
    }
}
