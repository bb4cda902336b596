use std::hash::Hash;

use crate::DemographyError;

/// Mass-based dispersal computed on the fly from a friction function and a
/// neighbor lookup, rather than from a precomputed `N x N` matrix.
///
/// Grounded on the friction-weighted neighboring-migration formula used by
/// the original demographic simulator this workspace descends from: an
/// emigrant leaving `x` stays with probability `1 - emigrant_rate`, and
/// otherwise lands on one of `x`'s neighbors with probability proportional
/// to `1 / friction(neighbor)`. Expressing this as a closure pair rather
/// than a precomputed matrix keeps memory flat for grids where the neighbor
/// count is small and fixed (e.g. a 4-neighbor lattice) but the deme space
/// itself is too large to materialize a dense matrix for.
pub struct NeighboringMigration<X> {
    emigrant_rate: f64,
    friction: Box<dyn Fn(&X) -> f64>,
    neighbors: Box<dyn Fn(&X) -> Vec<X>>,
}

impl<X> NeighboringMigration<X>
where
    X: Clone + Eq + Hash,
{
    /// `emigrant_rate` is the total probability mass that leaves `x`, split
    /// across `neighbors(x)` in proportion to `1 / friction(neighbor)`.
    pub fn new(
        emigrant_rate: f64,
        friction: impl Fn(&X) -> f64 + 'static,
        neighbors: impl Fn(&X) -> Vec<X> + 'static,
    ) -> Self {
        Self {
            emigrant_rate,
            friction: Box::new(friction),
            neighbors: Box::new(neighbors),
        }
    }

    pub fn arrival_space(&self, x: &X) -> Result<Vec<X>, DemographyError> {
        let mut space = vec![x.clone()];
        space.extend((self.neighbors)(x));
        Ok(space)
    }

    pub fn rate(&self, x: &X, y: &X) -> Result<f64, DemographyError> {
        if y == x {
            return Ok(1.0 - self.emigrant_rate);
        }
        let neighbors = (self.neighbors)(x);
        if !neighbors.iter().any(|z| z == y) {
            return Ok(0.0);
        }
        let denom: f64 = neighbors.iter().map(|z| 1.0 / (self.friction)(z)).sum();
        if denom <= 0.0 {
            return Err(DemographyError::ZeroWeightRow {
                deme: String::from("<neighboring migration>"),
            });
        }
        Ok(self.emigrant_rate * (1.0 / (self.friction)(y)) / denom)
    }
}
