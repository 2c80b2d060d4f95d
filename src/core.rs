//! Core module defining the main components of the lattice SNN library.
//!
//! - [`space`]: Positions of units and the metric used to measure distances between them
//! - [`population`]: Ordered collections of addressable units
//! - [`connection`]: Directed, weighted, delayed links between units
//!
//! # Examples
//!
//! ```
//! use lattice_snn::core::population::Population;
//! use lattice_snn::core::space::{Position, Space};
//!
//! let population = Population::build(
//!     "cells",
//!     vec![0, 1],
//!     vec![Position::new(0.0, 0.0, 0.0), Position::new(3.0, 4.0, 0.0)],
//! )
//! .unwrap();
//!
//! let space = Space::default();
//! let d = space.distance(population.position(0), population.position(1)).unwrap();
//! assert_eq!(d, 5.0);
//! ```
pub mod connection;
pub mod population;
pub mod space;

/// The default simulation time step (in ms), also used as the default minimum delay.
pub const DEFAULT_TIMESTEP: f64 = 0.1;
/// The default maximum delay (in ms) a connection may carry.
pub const DEFAULT_MAX_DELAY: f64 = 30.0;
/// Minimum number of targets per shard to consider parallel wiring.
pub const MIN_TARGETS_PAR: usize = 64;
