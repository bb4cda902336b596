//! Spatial-temporal population store, dispersal kernels, and occupancy
//! spectrum combinatorics for a forward-time demographic simulation.
//!
//! This crate owns everything the forward engine needs to record a
//! replicate's demographic history (deme sizes and inter-deme flows over
//! discrete generations) and everything the backward coalescent engine
//! needs to query it (exact flow pre-images, occupancy spectra for
//! simultaneous-merger sampling). It has no notion of a genealogy or a
//! lineage; that lives in the crate built on top of this one.

mod error;
mod kernel;
mod square_matrix;
mod store;
mod time;

pub mod spectrum;

pub use error::DemographyError;
pub use kernel::{DispersalKernel, IndividualKernel, MassStrategy, MatrixKernel, NeighboringMigration};
pub use square_matrix::SquareMatrix;
pub use store::Store;
pub use time::Generation;
