//! Small numerical helpers shared across modules.

/// The shortest distance between two coordinates on an axis that wraps around with the given extent.
pub fn mod_dist(x: f64, y: f64, extent: f64) -> f64 {
    let forward = (x - y).rem_euclid(extent);
    let backward = (y - x).rem_euclid(extent);
    forward.min(backward)
}

/// Constrain a value into `[lo, hi]`. Returns the clipped value and whether it had to move.
pub fn clip(value: f64, lo: f64, hi: f64) -> (f64, bool) {
    if value < lo {
        (lo, true)
    } else if value > hi {
        (hi, true)
    } else {
        (value, false)
    }
}
