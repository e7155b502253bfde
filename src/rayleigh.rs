//! Quadratic forms of candidate eigenvectors
//!
//! For an iterate `U` with one candidate eigenvector per column, the B-energy of column `i` is
//! `U_i' B U_i` and its generalized Rayleigh quotient `(U_i' A U_i) / (U_i' B U_i)`. Both only need
//! the diagonal of the Gram matrices, so the full `k x k` products are never formed here.

use ndarray::{prelude::*, Data, DataMut};

use crate::{GevError, Result};

/// Fails with `NonPositiveEnergy` on the first entry which is not strictly positive (NaN included)
pub(crate) fn check_energies<A: NdFloat>(energies: &Array1<A>) -> Result<()> {
    for (column, &energy) in energies.iter().enumerate() {
        // written this way to reject NaN as well
        if !(energy > A::zero()) {
            return Err(GevError::NonPositiveEnergy {
                column,
                energy: energy.to_f64().unwrap_or(f64::NAN),
            });
        }
    }
    Ok(())
}

/// Energies and Rayleigh quotients of the columns of an iterate
pub trait Rayleigh {
    type Elem;

    /// Computes `diag(U' M U)` without forming the full Gram matrix.
    fn energies<S: Data<Elem = Self::Elem>>(&self, m: &ArrayBase<S, Ix2>) -> Array1<Self::Elem>;

    /// Computes the generalized Rayleigh quotients `diag(U' A U) / diag(U' B U)`, one eigenvalue
    /// estimate per column.
    ///
    /// Fails with `NonPositiveEnergy` if a column has non-positive B-energy.
    fn rayleigh_quotients<S1, S2>(
        &self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
    ) -> Result<Array1<Self::Elem>>
    where
        S1: Data<Elem = Self::Elem>,
        S2: Data<Elem = Self::Elem>;
}

impl<A, S> Rayleigh for ArrayBase<S, Ix2>
where
    A: NdFloat,
    S: Data<Elem = A>,
{
    type Elem = A;

    fn energies<Sm: Data<Elem = A>>(&self, m: &ArrayBase<Sm, Ix2>) -> Array1<A> {
        let mu = m.dot(self);
        (&mu * self).sum_axis(Axis(0))
    }

    fn rayleigh_quotients<S1, S2>(
        &self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
    ) -> Result<Array1<A>>
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
    {
        let b_energies = self.energies(b);
        check_energies(&b_energies)?;

        Ok(self.energies(a) / b_energies)
    }
}

/// B-energy normalization of an iterate
pub trait NormalizeEnergy {
    type Elem;

    /// Scale every column in place such that `U_i' B U_i = 1`.
    ///
    /// Fails with `NonPositiveEnergy` if a column has non-positive B-energy, in which case the
    /// iterate is left untouched.
    fn normalize_energy_inplace<S: Data<Elem = Self::Elem>>(
        &mut self,
        b: &ArrayBase<S, Ix2>,
    ) -> Result<&mut Self>;
}

impl<A, S> NormalizeEnergy for ArrayBase<S, Ix2>
where
    A: NdFloat,
    S: DataMut<Elem = A>,
{
    type Elem = A;

    fn normalize_energy_inplace<Sb: Data<Elem = A>>(
        &mut self,
        b: &ArrayBase<Sb, Ix2>,
    ) -> Result<&mut Self> {
        let energies = self.energies(b);
        check_energies(&energies)?;

        *self /= &energies.mapv(A::sqrt);
        Ok(self)
    }
}
