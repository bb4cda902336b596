use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::{DemographyError, SquareMatrix};

struct MatrixKernelInner<X> {
    demes: Vec<X>,
    index: HashMap<X, usize>,
    matrix: SquareMatrix,
    // row i: indices j with matrix.get(i, j) > 0, precomputed once so
    // arrival_space never rescans a full row of demes.
    arrival_space: Vec<Vec<usize>>,
}

/// Mass-based dispersal backed by a dense, precomputed, row-normalized
/// migration matrix: `rate(x, y)` is the deterministic proportion of `x`'s
/// emigrants that land in `y`.
///
/// The matrix is built once from a non-normalized pairwise weight function
/// and shared behind an `Rc` exactly like [`super::IndividualKernel`], since
/// it is immutable after construction and commonly reused across many
/// generations of a single replicate.
#[derive(Clone)]
pub struct MatrixKernel<X> {
    inner: Rc<MatrixKernelInner<X>>,
}

impl<X> MatrixKernel<X>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    pub fn new<W>(demes: Vec<X>, weight: W) -> Result<Self, DemographyError>
    where
        W: Fn(&X, &X) -> f64,
    {
        let n = demes.len();
        let index: HashMap<X, usize> = demes
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, x)| (x, i))
            .collect();

        let mut matrix = SquareMatrix::zeros(n);
        for (i, x) in demes.iter().enumerate() {
            for (j, y) in demes.iter().enumerate() {
                matrix.set(i, j, weight(x, y));
            }
        }

        let mut arrival_space = Vec::with_capacity(n);
        for (i, x) in demes.iter().enumerate() {
            let sum = matrix.normalize_row(i);
            if sum <= 0.0 {
                return Err(DemographyError::ZeroWeightRow {
                    deme: format!("{x:?}"),
                });
            }
            let positive: Vec<usize> = (0..n).filter(|&j| matrix.get(i, j) > 0.0).collect();
            arrival_space.push(positive);
        }

        Ok(Self {
            inner: Rc::new(MatrixKernelInner {
                demes,
                index,
                matrix,
                arrival_space,
            }),
        })
    }

    pub fn arrival_space(&self, x: &X) -> Result<Vec<X>, DemographyError> {
        let row = self.row_of(x)?;
        Ok(self.inner.arrival_space[row]
            .iter()
            .map(|&j| self.inner.demes[j].clone())
            .collect())
    }

    pub fn rate(&self, x: &X, y: &X) -> Result<f64, DemographyError> {
        let row = self.row_of(x)?;
        let col = self.row_of(y)?;
        Ok(self.inner.matrix.get(row, col))
    }

    fn row_of(&self, x: &X) -> Result<usize, DemographyError> {
        self.inner
            .index
            .get(x)
            .copied()
            .ok_or_else(|| DemographyError::EmptyArrivalSpace {
                deme: format!("{x:?}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_space_excludes_zero_weight_destinations() {
        let demes = vec![0i32, 1, 2];
        let kernel = MatrixKernel::new(demes, |_x: &i32, y: &i32| if *y == 1 { 0.0 } else { 1.0 }).unwrap();
        let mut space = kernel.arrival_space(&0).unwrap();
        space.sort();
        assert_eq!(space, vec![0, 2]);
    }

    #[test]
    fn rate_rows_are_normalized() {
        let demes = vec![0i32, 1];
        let kernel = MatrixKernel::new(demes, |_x: &i32, _y: &i32| 1.0).unwrap();
        assert!((kernel.rate(&0, &0).unwrap() - 0.5).abs() < 1e-12);
        assert!((kernel.rate(&0, &1).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_row_rejected_at_construction() {
        let demes = vec![0i32, 1];
        let result = MatrixKernel::new(demes, |_x: &i32, _y: &i32| 0.0);
        assert!(matches!(result, Err(DemographyError::ZeroWeightRow { .. })));
    }
}
