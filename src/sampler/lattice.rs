//! This module places excitatory and inhibitory units on the sites of a cubic lattice.
//!
//! # Examples
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use lattice_snn::sampler::lattice::LatticeLayout;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let layout = LatticeLayout::build(4, 0.2).unwrap();
//! let (excitatory, inhibitory) = layout.sample(&mut rng).unwrap();
//!
//! assert_eq!(excitatory.len(), 52);
//! assert_eq!(inhibitory.len(), 12);
//! ```

use itertools::iproduct;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::population::Population;
use crate::core::space::Position;
use crate::error::SNNError;

/// Label of the excitatory population of a lattice.
pub const EXCITATORY_LABEL: &str = "excitatory";
/// Label of the inhibitory population of a lattice.
pub const INHIBITORY_LABEL: &str = "inhibitory";

/// A cubic lattice with `size` sites per side, shared between an excitatory and an inhibitory population.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LatticeLayout {
    size: usize,
    num_excitatory: usize,
    num_inhibitory: usize,
}

impl LatticeLayout {
    /// Create a layout where a proportion `prop_inhibitory` of the sites (rounded down) hosts inhibitory units.
    /// Returns an error if the lattice is empty or the proportion is not in [0, 1].
    pub fn build(size: usize, prop_inhibitory: f64) -> Result<Self, SNNError> {
        if size == 0 {
            return Err(SNNError::InvalidParameter(
                "The lattice must have at least one site per side".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&prop_inhibitory) {
            return Err(SNNError::InvalidParameter(format!(
                "The proportion of inhibitory units must be in [0, 1], got {}",
                prop_inhibitory
            )));
        }

        let num_sites = size.checked_pow(3).ok_or_else(|| {
            SNNError::InvalidParameter(format!("Lattice of size {} is too large", size))
        })?;
        let num_inhibitory = (num_sites as f64 * prop_inhibitory) as usize;

        Ok(LatticeLayout {
            size,
            num_excitatory: num_sites - num_inhibitory,
            num_inhibitory,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_sites(&self) -> usize {
        self.num_excitatory + self.num_inhibitory
    }

    pub fn num_excitatory(&self) -> usize {
        self.num_excitatory
    }

    pub fn num_inhibitory(&self) -> usize {
        self.num_inhibitory
    }

    /// Assign every site to a unit at random.
    ///
    /// Sites are visited in x-major order and receive the unit given by a random permutation.
    /// Excitatory units get the ids `0..num_excitatory`, inhibitory units the following ones.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(Population, Population), SNNError> {
        let mut permutation: Vec<usize> = (0..self.num_sites()).collect();
        permutation.shuffle(rng);

        let origin = Position::origin();
        let mut excitatory = vec![origin; self.num_excitatory];
        let mut inhibitory = vec![origin; self.num_inhibitory];

        let sites = iproduct!(0..self.size, 0..self.size, 0..self.size);
        for ((x, y, z), &unit) in sites.zip(permutation.iter()) {
            let position = Position::new(x as f64, y as f64, z as f64);
            if unit < self.num_excitatory {
                excitatory[unit] = position;
            } else {
                inhibitory[unit - self.num_excitatory] = position;
            }
        }

        Ok((
            Population::contiguous(EXCITATORY_LABEL, 0, excitatory)?,
            Population::contiguous(INHIBITORY_LABEL, self.num_excitatory, inhibitory)?,
        ))
    }
}
