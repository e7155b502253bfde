//! Triangular parts of (small) coupling matrices
//!
//! The offset `k` selects the diagonal the triangle starts from, counted like numpy's `triu` and
//! `tril`: `k = 0` is the main diagonal, `k = 1` the first super-diagonal and `k = -1` the first
//! sub-diagonal. Non-square matrices are supported.
//!
//! `ArrayBase::triu` and `ArrayBase::tril` return fresh copies; the traits here mask an array that
//! is owned or borrowed mutably without allocating.

use ndarray::{ArrayBase, DataMut, Ix2};
use num_traits::Zero;

/// Zero out everything outside of a triangle
pub trait IntoTriangular {
    /// Keep the elements with `j - i >= k` in place, zeroing out the rest.
    fn triu_inplace(&mut self, k: isize) -> &mut Self;
    /// Keep the elements with `j - i <= k` in place, zeroing out the rest.
    fn tril_inplace(&mut self, k: isize) -> &mut Self;

    /// Keep the elements with `j - i >= k`, zeroing out the rest.
    fn into_triu(mut self, k: isize) -> Self
    where
        Self: Sized,
    {
        self.triu_inplace(k);
        self
    }

    /// Keep the elements with `j - i <= k`, zeroing out the rest.
    fn into_tril(mut self, k: isize) -> Self
    where
        Self: Sized,
    {
        self.tril_inplace(k);
        self
    }
}

impl<A, S> IntoTriangular for ArrayBase<S, Ix2>
where
    A: Zero,
    S: DataMut<Elem = A>,
{
    fn triu_inplace(&mut self, k: isize) -> &mut Self {
        for ((i, j), x) in self.indexed_iter_mut() {
            if (j as isize) - (i as isize) < k {
                *x = A::zero();
            }
        }
        self
    }

    fn tril_inplace(&mut self, k: isize) -> &mut Self {
        for ((i, j), x) in self.indexed_iter_mut() {
            if (j as isize) - (i as isize) > k {
                *x = A::zero();
            }
        }
        self
    }
}
