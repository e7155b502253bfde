//! Random pencils with a prescribed generalized spectrum
//!
//! Useful for benchmarks and tests of the iterative solver: the eigenpairs of the generated
//! pencil are known exactly.

use ndarray::prelude::*;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::{gev::random, GevError, Result};

/// Symmetric pencil `(a, b)` with known solutions `a v_i = lambda_i b v_i`
#[derive(Debug, Clone)]
pub struct SyntheticPencil<A> {
    pub a: Array2<A>,
    /// Symmetric positive definite
    pub b: Array2<A>,
    /// Generalized eigenvalues, linearly spaced
    pub eigvals: Array1<A>,
    /// Generalized eigenvectors as columns, orthonormal with respect to `b`
    pub eigvecs: Array2<A>,
}

/// Generate a pencil of dimension `dim` whose generalized eigenvalues decay linearly from
/// `largest` to `smallest`
///
/// `b = Y' Y / dim + I` for uniform random `Y`, the eigenvectors `V` are a random basis made
/// B-orthonormal and `a = (B V) diag(lambda) (B V)'`.
pub fn decaying_pencil<A, R>(
    dim: usize,
    largest: A,
    smallest: A,
    rng: &mut R,
) -> Result<SyntheticPencil<A>>
where
    A: NdFloat,
    R: Rng,
    Standard: Distribution<A>,
{
    let two = A::one() + A::one();
    let n = A::from(dim.max(1)).unwrap();

    let y: Array2<A> = random((dim, dim), rng);
    let b = y.t().dot(&y) / n + Array2::eye(dim);

    let eigvecs = b_orthonormalize(random((dim, dim), rng), &b)?;
    let eigvals = Array1::linspace(largest, smallest, dim);

    let bv = b.dot(&eigvecs);
    let a = (&bv * &eigvals).dot(&bv.t());
    // remove rounding asymmetries
    let a = (&a + &a.t()) / two;

    Ok(SyntheticPencil {
        a,
        b,
        eigvals,
        eigvecs,
    })
}

/// Modified Gram-Schmidt in the inner product induced by `b`
fn b_orthonormalize<A: NdFloat>(mut v: Array2<A>, b: &Array2<A>) -> Result<Array2<A>> {
    for j in 0..v.ncols() {
        let mut col = v.column(j).to_owned();
        for i in 0..j {
            let q = v.column(i);
            let proj = col.dot(&b.dot(&q));
            col.scaled_add(-proj, &q);
        }

        let energy = col.dot(&b.dot(&col));
        if !(energy > A::zero()) {
            return Err(GevError::NonPositiveEnergy {
                column: j,
                energy: energy.to_f64().unwrap_or(f64::NAN),
            });
        }
        col /= energy.sqrt();
        v.column_mut(j).assign(&col);
    }

    Ok(v)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    use super::*;

    #[test]
    fn known_spectrum() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let p = decaying_pencil(8, 10.0f64, 1.0, &mut rng).unwrap();

        assert_abs_diff_eq!(p.eigvals[0], 10.);
        assert_abs_diff_eq!(p.eigvals[7], 1.);
        assert_abs_diff_eq!(p.a, p.a.t(), epsilon = 1e-12);
        assert_abs_diff_eq!(p.b, p.b.t(), epsilon = 1e-12);

        // eigenvectors are B-orthonormal
        let gram = p.eigvecs.t().dot(&p.b.dot(&p.eigvecs));
        assert_abs_diff_eq!(gram, Array2::eye(8), epsilon = 1e-8);

        // A V = B V diag(lambda)
        let av = p.a.dot(&p.eigvecs);
        let bvl = p.b.dot(&p.eigvecs) * &p.eigvals;
        assert_abs_diff_eq!(av, bvl, epsilon = 1e-8);
    }

    #[test]
    fn b_orthonormal_basis() {
        let b = array![[2.0f64, 0.5], [0.5, 1.]];
        let v = b_orthonormalize(array![[1.0, 1.], [0., 1.]], &b).unwrap();
        assert_abs_diff_eq!(v.t().dot(&b.dot(&v)), Array2::eye(2), epsilon = 1e-12);

        let dependent = array![[1.0, 2.], [1., 2.]];
        assert!(matches!(
            b_orthonormalize(dependent, &b),
            Err(GevError::NonPositiveEnergy { column: 1, .. })
        ));
    }

    #[test]
    fn empty() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let p = decaying_pencil(0, 1.0f64, 0.0, &mut rng).unwrap();
        assert_eq!(p.a.dim(), (0, 0));
        assert!(p.eigvals.is_empty());
    }
}
