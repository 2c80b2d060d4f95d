//! Assembly of the lattice network from its configuration.
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::backend::Backend;
use crate::core::population::Population;
use crate::error::SNNError;
use crate::network::config::LatticeConfig;
use crate::network::projection::{Background, PathwayKind, Projection};
use crate::sampler::connector::LatticeConnector;
use crate::sampler::lattice::LatticeLayout;

/// A lattice network: the placed populations, their wired pathways, and the background drive of
/// every pathway.
#[derive(Debug, PartialEq, Clone)]
pub struct LatticeNetwork {
    config: LatticeConfig,
    excitatory: Population,
    inhibitory: Population,
    projections: Vec<Projection>,
    backgrounds: Vec<Background>,
}

impl LatticeNetwork {
    /// Place the units, create the background drive of every pathway, and wire the four pathways.
    /// Any invalid parameter or failed wiring aborts the construction.
    pub fn build(config: LatticeConfig) -> Result<Self, SNNError> {
        config.validate()?;

        let layout = LatticeLayout::build(config.lattice_size, config.prop_inhibitory)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.layout_seed);
        let (excitatory, inhibitory) = layout.sample(&mut rng)?;
        log::info!(
            "Placed {} excitatory and {} inhibitory units on a lattice of size {}",
            excitatory.len(),
            inhibitory.len(),
            layout.size()
        );

        let mut network = LatticeNetwork {
            config,
            excitatory,
            inhibitory,
            projections: Vec::with_capacity(PathwayKind::ALL.len()),
            backgrounds: Vec::with_capacity(PathwayKind::ALL.len()),
        };

        // ghost ids follow the lattice ids, pathway after pathway
        let mut first_ghost_id = layout.num_sites();
        for kind in PathwayKind::ALL {
            let background = Background::build(
                kind,
                network.targets(kind),
                first_ghost_id,
                network.config.weight,
                network.config.dt,
                network.config.pathway(kind),
            )?;
            first_ghost_id += background.num_connections();
            network.backgrounds.push(background);
        }

        for kind in PathwayKind::ALL {
            let projection = network.wire(kind)?;
            network.projections.push(projection);
        }

        Ok(network)
    }

    fn wire(&self, kind: PathwayKind) -> Result<Projection, SNNError> {
        let request = self.config.wiring_request(kind);
        log::info!(
            "Wiring {} with {} connections per target",
            kind,
            request.n
        );
        let connector = LatticeConnector::build(request)?;
        let wiring = connector.connect_par(
            self.targets(kind),
            self.sources(kind),
            self.config.wiring_seed,
            self.config.num_shards,
        )?;
        Ok(Projection::new(kind, wiring))
    }

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    pub fn excitatory(&self) -> &Population {
        &self.excitatory
    }

    pub fn inhibitory(&self) -> &Population {
        &self.inhibitory
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn projection(&self, kind: PathwayKind) -> Option<&Projection> {
        self.projections.iter().find(|projection| projection.kind == kind)
    }

    pub fn backgrounds(&self) -> &[Background] {
        &self.backgrounds
    }

    pub fn background(&self, kind: PathwayKind) -> Option<&Background> {
        self.backgrounds.iter().find(|background| background.kind == kind)
    }

    /// The number of connections inside the lattice.
    pub fn num_connections(&self) -> usize {
        self.projections.iter().map(|p| p.num_connections()).sum()
    }

    /// The number of connections from the ghost units onto the lattice.
    pub fn num_background_connections(&self) -> usize {
        self.backgrounds.iter().map(|b| b.num_connections()).sum()
    }

    /// The population a pathway originates in.
    pub fn sources(&self, kind: PathwayKind) -> &Population {
        if kind.from_excitatory() {
            &self.excitatory
        } else {
            &self.inhibitory
        }
    }

    /// The population a pathway ends in.
    pub fn targets(&self, kind: PathwayKind) -> &Population {
        if kind.to_excitatory() {
            &self.excitatory
        } else {
            &self.inhibitory
        }
    }

    /// Register the ghost connections of all pathways with the backend.
    pub fn register_backgrounds<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), SNNError> {
        for background in self.backgrounds.iter() {
            background.register(backend)?;
            log::debug!(
                "Registered {} background connections of {} at {} Hz",
                background.num_connections(),
                background.kind,
                background.initial_rate
            );
        }
        Ok(())
    }

    /// Register all projections with the backend.
    pub fn register<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), SNNError> {
        for projection in self.projections.iter() {
            projection.register(backend)?;
            log::debug!(
                "Registered {} connections of {}",
                projection.num_connections(),
                projection.kind
            );
        }
        Ok(())
    }

    /// Run the lattice protocol: register the background drive, let the network settle without
    /// internal connections for `t_init`, register the wiring, and run for the remaining `t_sim - t_init`.
    ///
    /// Once wired, the background rates of the ghost units are reduced in proportion to the connections
    /// now coming from inside the lattice (see [`Background::reduced_rate`]).
    pub fn run_protocol<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), SNNError> {
        self.register_backgrounds(backend)?;

        log::info!("Running without internal connections");
        backend.run(self.config.t_init)?;

        self.register(backend)?;
        for background in self.backgrounds.iter() {
            log::info!(
                "Background rate of {} lowered from {} to {} Hz",
                background.kind,
                background.initial_rate,
                background.reduced_rate
            );
        }

        log::info!("Running with internal connections");
        backend.run(self.config.t_sim - self.config.t_init)
    }
}
