//! The lattice network: excitatory and inhibitory populations on a cubic lattice, connected
//! by four distance-dependent pathways and driven by background Poisson ghost units wired one-to-one onto every target.
pub mod config;
pub mod lattice;
pub mod projection;
