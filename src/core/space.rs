//! Positions in 3-D space and the metric used to compare them.
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::SNNError;
use crate::utils::mod_dist;

/// The position of a unit in 3-D space.
pub type Position = Point3<f64>;

/// The space in which units are embedded.
///
/// Distances are Euclidean. With periodic boundaries, each axis wraps around with the given extent,
/// i.e., the difference along an axis is the shortest one on the circle.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    periodic_boundaries: Option<[f64; 3]>,
}

impl Space {
    /// A space with the plain Euclidean metric.
    pub fn new() -> Self {
        Space {
            periodic_boundaries: None,
        }
    }

    /// A space where every axis wraps around with the given extent.
    /// Returns an error if any extent is not positive and finite.
    pub fn periodic(extents: [f64; 3]) -> Result<Self, SNNError> {
        if extents.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(SNNError::InvalidParameter(format!(
                "Periodic boundaries must be positive and finite, got {:?}",
                extents
            )));
        }
        Ok(Space {
            periodic_boundaries: Some(extents),
        })
    }

    pub fn periodic_boundaries(&self) -> Option<[f64; 3]> {
        self.periodic_boundaries
    }

    /// The distance between two positions.
    /// Non-finite coordinates are rejected instead of producing a meaningless distance.
    pub fn distance(&self, a: &Position, b: &Position) -> Result<f64, SNNError> {
        if !is_finite(a) || !is_finite(b) {
            return Err(SNNError::InvalidGeometry(format!(
                "Non-finite position: {} or {}",
                a, b
            )));
        }

        let diff: Vector3<f64> = match self.periodic_boundaries {
            None => b - a,
            Some(extents) => Vector3::from_fn(|i, _| mod_dist(a[i], b[i], extents[i])),
        };

        let dist = diff.norm();
        if !dist.is_finite() {
            return Err(SNNError::InvalidGeometry(format!(
                "Distance between {} and {} overflows",
                a, b
            )));
        }
        Ok(dist)
    }
}

fn is_finite(p: &Position) -> bool {
    p.coords.iter().all(|x| x.is_finite())
}
