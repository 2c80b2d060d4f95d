//! This module provides the lattice connector, a stochastic wiring rule where each target unit
//! receives a fixed number of connections from distinct, randomly chosen source units.
//! The delay of every connection is proportional to the distance separating the two units,
//! jittered by a multiplicative Gamma(1, `noise_factor`) noise and clipped into the valid delay range.
//!
//! # Examples
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use lattice_snn::core::population::Population;
//! use lattice_snn::core::space::Position;
//! use lattice_snn::sampler::connector::{LatticeConnector, WiringRequest};
//!
//! let targets = Population::contiguous("post", 0, vec![Position::new(0.0, 0.0, 0.0), Position::new(1.0, 0.0, 0.0)]).unwrap();
//! let sources = Population::contiguous(
//!     "pre",
//!     0,
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(2.0, 0.0, 0.0), Position::new(0.0, 1.0, 0.0)],
//! ).unwrap();
//!
//! let request = WiringRequest {
//!     weight: 0.002,
//!     distance_factor: 0.25,
//!     noise_factor: 0.2,
//!     n: 2,
//!     lim_delays: (0.1, 30.0),
//! };
//! let connector = LatticeConnector::build(request).unwrap();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(12345);
//! let wiring = connector.connect(&targets, &sources, &mut rng).unwrap();
//!
//! assert_eq!(wiring.connections.len(), 4);
//! assert!(wiring.connections.iter().all(|c| c.delay >= 0.1 && c.delay <= 30.0));
//! ```

use std::time::{Duration, Instant};

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::connection::Connection;
use crate::core::population::Population;
use crate::core::space::Space;
use crate::core::MIN_TARGETS_PAR;
use crate::error::SNNError;
use crate::utils::clip;

/// Parameters governing one invocation of the lattice connector.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WiringRequest {
    /// The weight of every connection made.
    pub weight: f64,
    /// Conversion of distance into milliseconds of delay.
    pub distance_factor: f64,
    /// Scale of the Gamma(1, scale) multiplicative delay noise.
    pub noise_factor: f64,
    /// Number of connections to make for each target unit.
    pub n: i64,
    /// The minimum and maximum delays of the connections.
    pub lim_delays: (f64, f64),
}

impl WiringRequest {
    /// Check the request and return the number of connections per target.
    pub fn validate(&self) -> Result<usize, SNNError> {
        if !self.weight.is_finite() {
            return Err(SNNError::InvalidParameter(format!(
                "weight must be finite, got {}",
                self.weight
            )));
        }
        if !self.distance_factor.is_finite() || self.distance_factor < 0.0 {
            return Err(SNNError::InvalidParameter(format!(
                "distance_factor must be non-negative, got {}",
                self.distance_factor
            )));
        }
        if !self.noise_factor.is_finite() || self.noise_factor < 0.0 {
            return Err(SNNError::InvalidParameter(format!(
                "noise_factor must be non-negative, got {}",
                self.noise_factor
            )));
        }

        let (min_delay, max_delay) = self.lim_delays;
        if !min_delay.is_finite() || !max_delay.is_finite() || min_delay < 0.0 || min_delay > max_delay {
            return Err(SNNError::InvalidParameter(format!(
                "delay range must satisfy 0 <= min <= max, got ({}, {})",
                min_delay, max_delay
            )));
        }

        usize::try_from(self.n).map_err(|_| {
            SNNError::InvalidParameter(format!(
                "n must be a non-negative integer, got {}",
                self.n
            ))
        })
    }
}

/// Time spent in each phase of the wiring, accumulated over all targets.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// Drawing the sources of each target.
    pub sampling: Duration,
    /// Computing the distances between targets and their sources.
    pub distances: Duration,
    /// Drawing the noise and deriving the delays.
    pub delays: Duration,
    /// Clipping the delays into the valid range.
    pub clipping: Duration,
    /// Emitting the connections.
    pub connecting: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.sampling + self.distances + self.delays + self.clipping + self.connecting
    }

    fn accumulate(&mut self, other: &PhaseTimings) {
        self.sampling += other.sampling;
        self.distances += other.distances;
        self.delays += other.delays;
        self.clipping += other.clipping;
        self.connecting += other.connecting;
    }
}

/// Diagnostic emitted when more than one delay of a target had to be clipped.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClipWarning {
    pub target_id: usize,
    pub num_clipped: usize,
    pub num_total: usize,
}

/// The outcome of a wiring call: the connections and the diagnostics gathered while making them.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Wiring {
    /// Connections ordered by target, then by source draw.
    pub connections: Vec<Connection>,
    pub clip_warnings: Vec<ClipWarning>,
    /// Total number of clipped delays, including targets below the warning threshold.
    pub num_clipped: usize,
    pub timings: PhaseTimings,
}

impl Wiring {
    fn with_capacity(capacity: usize) -> Self {
        Wiring {
            connections: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Append another wiring, e.g., the one of the next shard of targets.
    pub fn append(&mut self, other: Wiring) {
        self.connections.extend(other.connections);
        self.clip_warnings.extend(other.clip_warnings);
        self.num_clipped += other.num_clipped;
        self.timings.accumulate(&other.timings);
    }

    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }
}

/// Connects each target to exactly `n` distinct sources chosen at random, with distance-dependent delays.
/// Self connections are allowed.
#[derive(Debug, PartialEq, Clone)]
pub struct LatticeConnector {
    request: WiringRequest,
    space: Space,
}

impl LatticeConnector {
    /// Create a connector in plain Euclidean space.
    /// Returns an error if the request is malformed.
    pub fn build(request: WiringRequest) -> Result<Self, SNNError> {
        request.validate()?;
        Ok(LatticeConnector {
            request,
            space: Space::default(),
        })
    }

    /// Measure distances in the given space instead.
    pub fn with_space(mut self, space: Space) -> Self {
        self.space = space;
        self
    }

    pub fn request(&self) -> &WiringRequest {
        &self.request
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Check the request against the source population before any random draw.
    fn check(&self, sources: &Population) -> Result<usize, SNNError> {
        let n = self.request.validate()?;
        if n > sources.len() {
            return Err(SNNError::InsufficientSources {
                requested: n,
                available: sources.len(),
            });
        }
        Ok(n)
    }

    /// Wire the targets, drawing every random number from `rng`.
    ///
    /// Targets are processed in enumeration order. For each of them, `n` distinct sources are drawn,
    /// then `n` noise samples, so that the output only depends on the state of `rng`.
    /// Any error aborts the whole call and no connection is returned.
    pub fn connect<R: Rng + ?Sized>(
        &self,
        targets: &Population,
        sources: &Population,
        rng: &mut R,
    ) -> Result<Wiring, SNNError> {
        let n = self.check(sources)?;
        let mut wiring = Wiring::with_capacity(n * targets.len());
        if n == 0 {
            return Ok(wiring);
        }

        let WiringRequest {
            weight,
            distance_factor,
            noise_factor,
            lim_delays: (min_delay, max_delay),
            ..
        } = self.request;

        for (target_id, target_position) in targets.iter() {
            let timer = Instant::now();
            let chosen = index::sample(rng, sources.len(), n).into_vec();
            wiring.timings.sampling += timer.elapsed();

            let timer = Instant::now();
            let distances = chosen
                .iter()
                .map(|&i| self.space.distance(target_position, sources.position(i)))
                .collect::<Result<Vec<f64>, SNNError>>()?;
            wiring.timings.distances += timer.elapsed();

            // Gamma(1, noise_factor) is noise_factor * Exp(1)
            let timer = Instant::now();
            let delays = distances
                .iter()
                .map(|&d| {
                    let e: f64 = Exp1.sample(rng);
                    let delay = distance_factor * d * (1.0 + noise_factor * e);
                    if delay.is_finite() {
                        Ok(delay)
                    } else {
                        Err(SNNError::InvalidGeometry(format!(
                            "Delay of target {} overflows at distance {}",
                            target_id, d
                        )))
                    }
                })
                .collect::<Result<Vec<f64>, SNNError>>()?;
            wiring.timings.delays += timer.elapsed();

            let timer = Instant::now();
            let mut num_clipped = 0;
            let delays: Vec<f64> = delays
                .into_iter()
                .map(|delay| {
                    let (delay, clipped) = clip(delay, min_delay, max_delay);
                    num_clipped += clipped as usize;
                    delay
                })
                .collect();
            if num_clipped > 1 {
                log::warn!(
                    "{} of {} delays of target {} were clipped into [{}, {}]",
                    num_clipped,
                    n,
                    target_id,
                    min_delay,
                    max_delay
                );
                wiring.clip_warnings.push(ClipWarning {
                    target_id,
                    num_clipped,
                    num_total: n,
                });
            }
            wiring.num_clipped += num_clipped;
            wiring.timings.clipping += timer.elapsed();

            let timer = Instant::now();
            wiring.connections.extend(
                chosen
                    .into_iter()
                    .zip(delays)
                    .map(|(i, delay)| Connection::new(sources.id(i), target_id, weight, delay)),
            );
            wiring.timings.connecting += timer.elapsed();
        }

        log::debug!(
            "Wired {} targets of {} from {}: {} connections in {:?}",
            targets.len(),
            targets.label(),
            sources.label(),
            wiring.num_connections(),
            wiring.timings.total()
        );

        Ok(wiring)
    }

    /// Wire the targets with a generator seeded from `seed`.
    pub fn connect_seeded(
        &self,
        targets: &Population,
        sources: &Population,
        seed: u64,
    ) -> Result<Wiring, SNNError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.connect(targets, sources, &mut rng)
    }

    /// Wire the targets in contiguous shards, each with its own random stream.
    ///
    /// Shard `k` draws from a generator seeded with `seed` on stream `k`.
    /// The result is concatenated in target order and is reproducible for a fixed `(seed, num_shards)`,
    /// whether the shards actually run in parallel or not.
    pub fn connect_par(
        &self,
        targets: &Population,
        sources: &Population,
        seed: u64,
        num_shards: usize,
    ) -> Result<Wiring, SNNError> {
        if num_shards == 0 {
            return Err(SNNError::InvalidParameter(
                "the number of shards must be positive".to_string(),
            ));
        }
        let n = self.check(sources)?;

        let shard_size = targets.len().div_ceil(num_shards).max(1);
        let shards = targets.shards(shard_size);

        let connect_shard = |(k, shard): (usize, &Population)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(k as u64);
            self.connect(shard, sources, &mut rng)
        };

        let wirings: Vec<Wiring> = if shard_size >= MIN_TARGETS_PAR && shards.len() > 1 {
            shards
                .par_iter()
                .enumerate()
                .map(connect_shard)
                .collect::<Result<Vec<Wiring>, SNNError>>()?
        } else {
            shards
                .iter()
                .enumerate()
                .map(connect_shard)
                .collect::<Result<Vec<Wiring>, SNNError>>()?
        };

        let mut wiring = Wiring::with_capacity(targets.len() * n);
        for other in wirings {
            wiring.append(other);
        }
        Ok(wiring)
    }
}

/// Wire `targets` from `sources` according to `request`, with a generator seeded from `rng_seed`.
pub fn connect(
    targets: &Population,
    sources: &Population,
    request: WiringRequest,
    rng_seed: u64,
) -> Result<Wiring, SNNError> {
    LatticeConnector::build(request)?.connect_seeded(targets, sources, rng_seed)
}
