//! Norms of iterates, either over the whole matrix or column by column

use ndarray::{prelude::*, Data, DataMut};

use crate::{GevError, Result};

/// Define norm as a metric linear space, treating the whole matrix as one big vector.
pub trait Norm {
    type Output;

    /// Squared L-2 norm
    fn norm_l2_sq(&self) -> Self::Output;
    /// L-2 norm
    fn norm_l2(&self) -> Self::Output;
}

impl<A, S, D> Norm for ArrayBase<S, D>
where
    A: NdFloat,
    S: Data<Elem = A>,
    D: Dimension,
{
    type Output = A;

    fn norm_l2_sq(&self) -> Self::Output {
        self.fold(A::zero(), |acc, &x| acc + x * x)
    }

    fn norm_l2(&self) -> Self::Output {
        self.norm_l2_sq().sqrt()
    }
}

/// Euclidean norms of the columns of a matrix, each column being one candidate eigenvector
pub trait ColumnNorm {
    type Elem;

    /// L-2 norm of every column
    fn column_norms_l2(&self) -> Array1<Self::Elem>;
}

impl<A, S> ColumnNorm for ArrayBase<S, Ix2>
where
    A: NdFloat,
    S: Data<Elem = A>,
{
    type Elem = A;

    fn column_norms_l2(&self) -> Array1<A> {
        self.columns().into_iter().map(|c| c.norm_l2()).collect()
    }
}

pub trait NormalizeColumns {
    /// Scale every column to unit L-2 norm in place.
    ///
    /// Fails with `DegenerateComponent` if a column has zero or non-finite norm, leaving the
    /// matrix untouched.
    fn normalize_columns_inplace(&mut self) -> Result<&mut Self>;
}

impl<A, S> NormalizeColumns for ArrayBase<S, Ix2>
where
    A: NdFloat,
    S: DataMut<Elem = A>,
{
    fn normalize_columns_inplace(&mut self) -> Result<&mut Self> {
        let norms = self.column_norms_l2();
        if let Some(column) = norms
            .iter()
            .position(|&norm| !norm.is_finite() || norm <= A::zero())
        {
            return Err(GevError::DegenerateComponent { column });
        }

        *self /= &norms;
        Ok(self)
    }
}
