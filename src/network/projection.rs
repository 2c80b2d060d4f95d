//! Projections, i.e., the wired pathways between the populations of a lattice.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::core::connection::{Connection, SynapseType};
use crate::core::population::Population;
use crate::error::SNNError;
use crate::network::config::PathwayParams;
use crate::sampler::connector::Wiring;

/// The four pathways of a lattice, named by source then target population.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PathwayKind {
    ExcitatoryToExcitatory,
    ExcitatoryToInhibitory,
    InhibitoryToExcitatory,
    InhibitoryToInhibitory,
}

impl PathwayKind {
    pub const ALL: [PathwayKind; 4] = [
        PathwayKind::ExcitatoryToExcitatory,
        PathwayKind::ExcitatoryToInhibitory,
        PathwayKind::InhibitoryToExcitatory,
        PathwayKind::InhibitoryToInhibitory,
    ];

    /// Whether the pathway originates in the excitatory population.
    pub fn from_excitatory(&self) -> bool {
        matches!(
            self,
            PathwayKind::ExcitatoryToExcitatory | PathwayKind::ExcitatoryToInhibitory
        )
    }

    /// Whether the pathway ends in the excitatory population.
    pub fn to_excitatory(&self) -> bool {
        matches!(
            self,
            PathwayKind::ExcitatoryToExcitatory | PathwayKind::InhibitoryToExcitatory
        )
    }

    /// The synapse type targeted on the receiving units, given by the sign of the source population.
    pub fn synapse_type(&self) -> SynapseType {
        if self.from_excitatory() {
            SynapseType::Excitatory
        } else {
            SynapseType::Inhibitory
        }
    }
}

impl fmt::Display for PathwayKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PathwayKind::ExcitatoryToExcitatory => "E_E",
            PathwayKind::ExcitatoryToInhibitory => "E_I",
            PathwayKind::InhibitoryToExcitatory => "I_E",
            PathwayKind::InhibitoryToInhibitory => "I_I",
        };
        write!(f, "{}", name)
    }
}

/// A wired pathway.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub kind: PathwayKind,
    pub wiring: Wiring,
}

impl Projection {
    pub fn new(kind: PathwayKind, wiring: Wiring) -> Self {
        Projection { kind, wiring }
    }

    pub fn synapse_type(&self) -> SynapseType {
        self.kind.synapse_type()
    }

    pub fn num_connections(&self) -> usize {
        self.wiring.num_connections()
    }

    /// Register every connection with the backend, in wiring order.
    pub fn register<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), SNNError> {
        let synapse_type = self.synapse_type();
        self.wiring
            .connections
            .iter()
            .try_for_each(|connection| backend.register_connection(connection, synapse_type))
    }
}

/// The background drive of a pathway: one external "ghost" unit per target, each firing as a
/// Poisson process and wired one-to-one onto its target.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Background {
    pub kind: PathwayKind,
    pub connections: Vec<Connection>,
    /// Rate (Hz) of every ghost unit before the lattice is wired.
    pub initial_rate: f64,
    /// Rate (Hz) of every ghost unit once the lattice is wired.
    pub reduced_rate: f64,
}

impl Background {
    /// Create the background of a pathway, with ghost ids contiguous from `first_ghost_id`,
    /// in the enumeration order of the targets.
    pub fn build(
        kind: PathwayKind,
        targets: &Population,
        first_ghost_id: usize,
        weight: f64,
        delay: f64,
        params: &PathwayParams,
    ) -> Result<Self, SNNError> {
        first_ghost_id.checked_add(targets.len()).ok_or_else(|| {
            SNNError::OutOfBounds(format!(
                "Ghost ids of {} starting at {} overflow for {} targets",
                kind,
                first_ghost_id,
                targets.len()
            ))
        })?;

        let connections = targets
            .ids()
            .iter()
            .enumerate()
            .map(|(k, &target_id)| Connection::build(first_ghost_id + k, target_id, weight, delay))
            .collect::<Result<Vec<Connection>, SNNError>>()?;

        Ok(Background {
            kind,
            connections,
            initial_rate: params.initial_rate(),
            reduced_rate: params.reduced_rate(),
        })
    }

    pub fn synapse_type(&self) -> SynapseType {
        self.kind.synapse_type()
    }

    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    /// Register every ghost connection with the backend, in target order.
    pub fn register<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), SNNError> {
        let synapse_type = self.synapse_type();
        self.connections
            .iter()
            .try_for_each(|connection| backend.register_connection(connection, synapse_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::core::space::Position;

    #[test]
    fn test_pathway_kind() {
        assert_eq!(
            PathwayKind::ExcitatoryToInhibitory.synapse_type(),
            SynapseType::Excitatory
        );
        assert_eq!(
            PathwayKind::InhibitoryToExcitatory.synapse_type(),
            SynapseType::Inhibitory
        );
        assert!(PathwayKind::InhibitoryToExcitatory.to_excitatory());
        assert!(!PathwayKind::InhibitoryToInhibitory.to_excitatory());
        assert_eq!(PathwayKind::ExcitatoryToInhibitory.to_string(), "E_I");
    }

    #[test]
    fn test_projection_register() {
        let wiring = Wiring {
            connections: vec![
                Connection::new(60, 0, 0.002, 0.3),
                Connection::new(61, 0, 0.002, 0.7),
            ],
            ..Default::default()
        };
        let projection = Projection::new(PathwayKind::InhibitoryToExcitatory, wiring);

        let mut backend = RecordingBackend::build((0.1, 30.0)).unwrap();
        projection.register(&mut backend).unwrap();
        assert_eq!(backend.num_connections_of(SynapseType::Inhibitory), 2);
        assert_eq!(backend.connections()[1].0.source_id, 61);
    }

    #[test]
    fn test_background_one_to_one() {
        let targets = Population::build(
            "post",
            vec![7, 3, 5],
            vec![Position::origin(); 3],
        )
        .unwrap();
        let params = PathwayParams {
            background_rate: 10.0,
            num_connections: 250.0,
            internal_factor: 0.2,
        };
        let background = Background::build(
            PathwayKind::InhibitoryToInhibitory,
            &targets,
            100,
            0.002,
            0.1,
            &params,
        )
        .unwrap();

        let pairs: Vec<(usize, usize)> = background
            .connections
            .iter()
            .map(|c| (c.source_id, c.target_id))
            .collect();
        assert_eq!(pairs, vec![(100, 7), (101, 3), (102, 5)]);
        assert!(background
            .connections
            .iter()
            .all(|c| c.weight == 0.002 && c.delay == 0.1));
        assert_eq!(background.initial_rate, 2500.0);
        assert_eq!(background.reduced_rate, 2000.0);

        let mut backend = RecordingBackend::build((0.1, 30.0)).unwrap();
        background.register(&mut backend).unwrap();
        assert_eq!(backend.num_connections_of(SynapseType::Inhibitory), 3);
    }

    #[test]
    fn test_background_invalid() {
        let targets = Population::contiguous("post", 0, vec![Position::origin(); 2]).unwrap();
        let params = PathwayParams {
            background_rate: 6.0,
            num_connections: 1000.0,
            internal_factor: 0.12,
        };
        assert!(matches!(
            Background::build(PathwayKind::ExcitatoryToExcitatory, &targets, usize::MAX, 0.002, 0.1, &params),
            Err(SNNError::OutOfBounds(_))
        ));
        assert!(matches!(
            Background::build(PathwayKind::ExcitatoryToExcitatory, &targets, 10, 0.002, -0.1, &params),
            Err(SNNError::InvalidParameter(_))
        ));
    }
}
