//! First-order iterative solvers for the generalized symmetric eigenproblem
//! ```text
//! A u = lambda B u
//! ```
//! on top of `ndarray`. Instead of a dense decomposition, the dominant eigenvectors are found by
//! gradient-ascent style updates which only need the products `A U` and `B U`.
//!
//! The solver lives in [`gev`], the helpers it is built from (column norms, triangular parts,
//! B-energies and Rayleigh quotients) are exposed as extension traits on `ArrayBase`.

pub mod metrics;
pub mod norm;
pub mod rayleigh;
pub mod triangular;

#[cfg(feature = "iterative")]
pub mod gev;
#[cfg(feature = "iterative")]
pub mod synthetic;

use ndarray::{ArrayBase, Ix2, RawData};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GevError {
    #[error("Matrix with {rows} rows and {cols} cols is not square")]
    NotSquare { rows: usize, cols: usize },
    #[error("Pencil matrices have mismatched dimensions {a} and {b}")]
    DimensionMismatch { a: usize, b: usize },
    #[error(
        "Unknown update rule {0:?}, expected one of \"deflation\", \"hebbian\" or \"normalized-reward\""
    )]
    UnknownUpdateRule(String),
    #[error("Step size must be positive and finite")]
    InvalidStepSize,
    #[error("Momentum coefficient must lie in [0, 1)")]
    InvalidMomentum,
    #[error("Number of iterations must be positive")]
    NoIterations,
    #[error("Cannot estimate {components} components of a problem with dimension {dim}")]
    InvalidComponents { components: usize, dim: usize },
    #[error("Component {column} has non-positive B-energy {energy}")]
    NonPositiveEnergy { column: usize, energy: f64 },
    #[error("Component {column} has a degenerate euclidean norm")]
    DegenerateComponent { column: usize },
    #[error("Line search found no sufficient decrease after {0} step size reductions")]
    LineSearchExhausted(usize),
    #[error("Iterate became non-finite at iteration {iteration}")]
    NonFiniteIterate { iteration: usize },
}

impl GevError {
    /// Whether the error stems from the solver configuration, i.e. was raised before any matrix
    /// computation took place.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GevError::UnknownUpdateRule(_)
                | GevError::InvalidStepSize
                | GevError::InvalidMomentum
                | GevError::NoIterations
                | GevError::InvalidComponents { .. }
        )
    }

    /// Whether the error signals a numerical breakdown during the iteration.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            GevError::NonPositiveEnergy { .. }
                | GevError::DegenerateComponent { .. }
                | GevError::LineSearchExhausted(_)
                | GevError::NonFiniteIterate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GevError>;

pub(crate) fn check_square<S: RawData>(arr: &ArrayBase<S, Ix2>) -> Result<usize> {
    let (n, m) = (arr.nrows(), arr.ncols());
    if n != m {
        Err(GevError::NotSquare { rows: n, cols: m })
    } else {
        Ok(n)
    }
}

/// Checks that `a` and `b` are square and of the same dimension, returning that dimension
pub(crate) fn check_pencil<S1: RawData, S2: RawData>(
    a: &ArrayBase<S1, Ix2>,
    b: &ArrayBase<S2, Ix2>,
) -> Result<usize> {
    let n_a = check_square(a)?;
    let n_b = check_square(b)?;
    if n_a != n_b {
        return Err(GevError::DimensionMismatch { a: n_a, b: n_b });
    }
    Ok(n_a)
}
