//!
//! Iterative solver for the generalized symmetric eigenproblem
//! ```text
//! A u = lambda B u
//! ```
//! where A and B are symmetric and (u, lambda) the solution. Instead of decomposing the pencil,
//! a block of `k` candidate eigenvectors is improved by first-order updates:
//! * matrix free in spirit: every step only needs the products `A U` and `B U`.
//! * several update rules: a deflation rule, a generalized Hebbian rule and a normalized reward
//!   rule, see [UpdateRule].
//! * optional Nesterov momentum and backtracking line search on a surrogate objective.
//!
//! The number of iterations is the only termination criterion, there is no convergence test.
//!
mod line_search;
mod objective;
mod rule;
mod solver;

use ndarray::{prelude::*, Data};
use rand::distributions::Standard;
use rand::prelude::*;

use crate::{check_pencil, rayleigh::NormalizeEnergy, GevError, Result};

pub use objective::Objective;
pub use rule::UpdateRule;
pub use solver::{GevFit, GevSolver};

/// Generate random array
pub(crate) fn random<A, Sh, D, R: Rng>(sh: Sh, rng: &mut R) -> Array<A, D>
where
    A: NdFloat,
    D: Dimension,
    Sh: ShapeBuilder<Dim = D>,
    Standard: Distribution<A>,
{
    ArrayBase::from_shape_fn(sh, |_| rng.gen::<A>())
}

/// Draws the starting basis of a fit
///
/// The entries of the `n x components` basis are uniform in `[0, 1)`, afterwards every column is
/// scaled to unit B-energy, `U_i' B U_i = 1`.
pub fn initial_basis<A, S1, S2, R>(
    a: &ArrayBase<S1, Ix2>,
    b: &ArrayBase<S2, Ix2>,
    components: usize,
    rng: &mut R,
) -> Result<Array2<A>>
where
    A: NdFloat,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    R: Rng,
    Standard: Distribution<A>,
{
    let n = check_pencil(a, b)?;
    if components == 0 || components > n {
        return Err(GevError::InvalidComponents { components, dim: n });
    }

    let mut u: Array2<A> = random((n, components), rng);
    u.normalize_energy_inplace(b)?;

    Ok(u)
}
