//! Module for sampling the random structure of lattice networks.
//!
//! - Placement of excitatory and inhibitory units on a cubic lattice via the [`lattice`] module
//! - Distance-dependent stochastic wiring via the [`connector`] module
pub mod connector;
pub mod lattice;
