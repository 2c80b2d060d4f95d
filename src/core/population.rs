//! Module implementing populations, i.e., ordered collections of units positioned in space.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::space::Position;
use crate::error::SNNError;

/// An ordered collection of units sharing a model.
/// The enumeration order of the units is significant: wiring processes targets in this order.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "PopulationData")]
pub struct Population {
    label: String,
    ids: Vec<usize>,
    positions: Vec<Position>,
}

/// Deserialized populations go through [`Population::build`].
#[derive(Deserialize)]
struct PopulationData {
    label: String,
    ids: Vec<usize>,
    positions: Vec<Position>,
}

impl TryFrom<PopulationData> for Population {
    type Error = SNNError;

    fn try_from(data: PopulationData) -> Result<Self, Self::Error> {
        Population::build(data.label, data.ids, data.positions)
    }
}

impl Population {
    /// Create a new population from unit identifiers and their positions.
    /// Returns an error if the lengths differ or if an identifier is repeated.
    pub fn build(
        label: impl Into<String>,
        ids: Vec<usize>,
        positions: Vec<Position>,
    ) -> Result<Self, SNNError> {
        let label = label.into();
        if ids.len() != positions.len() {
            return Err(SNNError::InvalidParameter(format!(
                "Population {}: {} ids but {} positions",
                label,
                ids.len(),
                positions.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(id) = ids.iter().find(|&&id| !seen.insert(id)) {
            return Err(SNNError::InvalidParameter(format!(
                "Population {}: duplicate id {}",
                label, id
            )));
        }

        Ok(Population {
            label,
            ids,
            positions,
        })
    }

    /// A population with contiguous identifiers starting at `first_id`.
    /// Returns an error if the last identifier does not fit in a `usize`.
    pub fn contiguous(
        label: impl Into<String>,
        first_id: usize,
        positions: Vec<Position>,
    ) -> Result<Self, SNNError> {
        let label = label.into();
        let end = first_id.checked_add(positions.len()).ok_or_else(|| {
            SNNError::OutOfBounds(format!(
                "Population {}: ids starting at {} overflow for {} units",
                label,
                first_id,
                positions.len()
            ))
        })?;
        Ok(Population {
            label,
            ids: (first_id..end).collect(),
            positions,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The identifier of the unit at the given index.
    pub fn id(&self, index: usize) -> usize {
        self.ids[index]
    }

    /// The position of the unit at the given index.
    pub fn position(&self, index: usize) -> &Position {
        &self.positions[index]
    }

    /// The index of the unit with the given identifier.
    pub fn id_to_index(&self, id: usize) -> Result<usize, SNNError> {
        self.ids.iter().position(|&other| other == id).ok_or_else(|| {
            SNNError::OutOfBounds(format!("Unit {} not found in population {}", id, self.label))
        })
    }

    /// An iterator over the (id, position) pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Position)> + '_ {
        self.ids.iter().copied().zip(self.positions.iter())
    }

    /// Split the population into contiguous shards of at most `shard_size` units, preserving order.
    pub fn shards(&self, shard_size: usize) -> Vec<Population> {
        let shard_size = shard_size.max(1);
        self.ids
            .chunks(shard_size)
            .zip(self.positions.chunks(shard_size))
            .enumerate()
            .map(|(k, (ids, positions))| Population {
                label: format!("{}[{}]", self.label, k),
                ids: ids.to_vec(),
                positions: positions.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Position> {
        (0..n).map(|i| Position::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_population_build() {
        let population = Population::build("pop", vec![4, 2, 9], line(3)).unwrap();
        assert_eq!(population.len(), 3);
        assert_eq!(population.id(1), 2);
        assert_eq!(population.position(2), &Position::new(2.0, 0.0, 0.0));
        assert_eq!(population.id_to_index(9), Ok(2));
        assert!(matches!(
            population.id_to_index(3),
            Err(SNNError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_population_build_invalid() {
        assert!(matches!(
            Population::build("pop", vec![0, 1], line(3)),
            Err(SNNError::InvalidParameter(_))
        ));
        assert!(matches!(
            Population::build("pop", vec![0, 1, 0], line(3)),
            Err(SNNError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_population_contiguous() {
        let population = Population::contiguous("pop", 10, line(4)).unwrap();
        assert_eq!(population.ids(), &[10, 11, 12, 13]);
        assert!(!population.is_empty());
        assert!(Population::contiguous("empty", 0, vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_population_contiguous_overflow() {
        assert!(matches!(
            Population::contiguous("pop", usize::MAX, line(2)),
            Err(SNNError::OutOfBounds(_))
        ));
        assert_eq!(
            Population::contiguous("pop", usize::MAX - 1, line(1))
                .unwrap()
                .ids(),
            &[usize::MAX - 1]
        );
    }

    #[test]
    fn test_population_deserialize_validates() {
        let population = Population::contiguous("pop", 3, line(2)).unwrap();
        let json = serde_json::to_string(&population).unwrap();
        let back: Population = serde_json::from_str(&json).unwrap();
        assert_eq!(back, population);

        let duplicate = json.replace(r#""ids":[3,4]"#, r#""ids":[3,3]"#);
        assert_ne!(duplicate, json);
        assert!(serde_json::from_str::<Population>(&duplicate).is_err());

        let mismatch = json.replace(r#""ids":[3,4]"#, r#""ids":[3]"#);
        assert!(serde_json::from_str::<Population>(&mismatch).is_err());
    }

    #[test]
    fn test_population_shards() {
        let population = Population::contiguous("pop", 0, line(7)).unwrap();
        let shards = population.shards(3);
        assert_eq!(shards.len(), 3);
        assert_eq!(shards[0].ids(), &[0, 1, 2]);
        assert_eq!(shards[2].ids(), &[6]);
        assert_eq!(shards[2].position(0), &Position::new(6.0, 0.0, 0.0));

        let ids: Vec<usize> = shards.iter().flat_map(|s| s.ids().to_vec()).collect();
        assert_eq!(ids, population.ids());
    }
}
