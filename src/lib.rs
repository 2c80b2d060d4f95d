//! This crate provides tools for wiring spiking neural networks laid out in space, in Rust.
//!
//! # Wiring Populations
//!
//! Every target unit receives exactly `n` connections from distinct source units chosen at random.
//! The delay of each connection grows with the distance separating the two units.
//!
//! ```rust
//! use lattice_snn::core::population::Population;
//! use lattice_snn::core::space::Position;
//! use lattice_snn::sampler::connector::{connect, WiringRequest};
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
//!     noise_factor: 0.0,
//!     n: 2,
//!     lim_delays: (0.1, 30.0),
//! };
//! let wiring = connect(&targets, &sources, request, 42).unwrap();
//!
//! assert_eq!(wiring.connections.len(), 4);
//! ```
//!
//! # Building a Lattice
//!
//! ```rust
//! use lattice_snn::backend::{Backend, RecordingBackend};
//! use lattice_snn::network::config::LatticeConfig;
//! use lattice_snn::network::lattice::LatticeNetwork;
//!
//! let mut config = LatticeConfig::default();
//! config.lattice_size = 4;
//! config.excitatory_to_excitatory.num_connections = 50.0;
//! config.excitatory_to_inhibitory.num_connections = 50.0;
//! config.inhibitory_to_excitatory.num_connections = 20.0;
//! config.inhibitory_to_inhibitory.num_connections = 20.0;
//!
//! let network = LatticeNetwork::build(config).unwrap();
//! let mut backend = RecordingBackend::build((0.1, 30.0)).unwrap();
//! network.run_protocol(&mut backend).unwrap();
//!
//! assert_eq!(
//!     backend.num_connections(),
//!     network.num_connections() + network.num_background_connections()
//! );
//! assert_eq!(backend.time(), 2000.0);
//! ```

pub mod backend;
pub mod core;
pub mod error;
pub mod network;
pub mod sampler;
pub mod utils;
