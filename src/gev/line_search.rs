use log::{trace, warn};
use ndarray::{prelude::*, Data};

use super::UpdateRule;
use crate::{norm::Norm, GevError, Result};

/// Backtracking line search with an Armijo-type sufficient decrease condition
///
/// Starting from the current step size `eta`, the step is shrunk by `shrink` until
/// ```text
/// J(U - eta grad) <= J(U) - rho eta |grad|^2
/// ```
/// holds. The reduced step size is kept by the caller, so it anneals over a run.
#[derive(Debug, Clone)]
pub(crate) struct Backtracking<A> {
    rho: A,
    shrink: A,
    max_shrinks: usize,
}

impl<A: NdFloat> Backtracking<A> {
    pub fn new(max_shrinks: usize) -> Self {
        Backtracking {
            rho: A::from(0.1).unwrap(),
            shrink: A::from(0.9).unwrap(),
            max_shrinks,
        }
    }

    /// Shrinks `step_size` until the sufficient decrease condition holds and returns the number
    /// of reductions.
    ///
    /// A vanishing gradient satisfies the condition immediately. A trial objective which is not
    /// a number never does.
    pub fn search<S1, S2>(
        &self,
        rule: UpdateRule,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
        u: &Array2<A>,
        grad: &Array2<A>,
        step_size: &mut A,
    ) -> Result<usize>
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
    {
        let current = rule.objective(a, b, u)?.total();
        let grad_sq = grad.norm_l2_sq();

        let mut shrinks = 0;
        loop {
            let trial = u - &(grad * *step_size);
            let value = rule.objective(a, b, &trial)?.total();
            if value <= current - self.rho * *step_size * grad_sq {
                trace!("line search accepted step size after {} reductions", shrinks);
                return Ok(shrinks);
            }

            if shrinks == self.max_shrinks {
                warn!(
                    "line search gave up after {} reductions, objective {:?} against {:?}",
                    shrinks, value, current
                );
                return Err(GevError::LineSearchExhausted(shrinks));
            }

            *step_size = *step_size * self.shrink;
            shrinks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::prelude::*;

    use super::*;

    fn problem() -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        let a = Array2::from_diag(&array![10., 5., 2.]);
        let b = Array2::eye(3);
        let u = array![[0.5], [0.5], [0.5]];
        (a, b, u)
    }

    #[test]
    fn shrinks_large_steps() {
        let (a, b, mut u) = problem();
        let rule = UpdateRule::Deflation;
        let grad = rule.gradient(&a, &b, &mut u).unwrap();

        let mut step_size = 1.0;
        let shrinks = Backtracking::new(100)
            .search(rule, &a, &b, &u, &grad, &mut step_size)
            .unwrap();
        assert!(shrinks > 0);
        assert_abs_diff_eq!(step_size, 0.9f64.powi(shrinks as i32), epsilon = 1e-12);

        // the accepted step satisfies the sufficient decrease condition
        let before = rule.objective(&a, &b, &u).unwrap().total();
        let after = rule
            .objective(&a, &b, &(&u - &(&grad * step_size)))
            .unwrap()
            .total();
        assert!(after <= before - 0.1 * step_size * grad.norm_l2_sq());
    }

    #[test]
    fn keeps_small_steps() {
        let (a, b, mut u) = problem();
        let rule = UpdateRule::Deflation;
        let grad = rule.gradient(&a, &b, &mut u).unwrap();

        let mut step_size = 1e-3;
        let shrinks = Backtracking::new(100)
            .search(rule, &a, &b, &u, &grad, &mut step_size)
            .unwrap();
        assert_eq!(shrinks, 0);
        assert_eq!(step_size, 1e-3);
    }

    #[test]
    fn zero_gradient() {
        let (a, b, u) = problem();
        let grad = Array2::zeros((3, 1));

        let mut step_size = 1.0;
        let shrinks = Backtracking::new(0)
            .search(UpdateRule::Hebbian, &a, &b, &u, &grad, &mut step_size)
            .unwrap();
        assert_eq!(shrinks, 0);
        assert_eq!(step_size, 1.0);
    }

    #[test]
    fn ascent_direction_exhausts() {
        let (a, b, mut u) = problem();
        let rule = UpdateRule::Deflation;
        // searching along the wrong direction never decreases the objective
        let grad = -rule.gradient(&a, &b, &mut u).unwrap();

        let mut step_size = 1.0;
        let res = Backtracking::new(10).search(rule, &a, &b, &u, &grad, &mut step_size);
        assert!(matches!(res, Err(GevError::LineSearchExhausted(10))));
        assert_abs_diff_eq!(step_size, 0.9f64.powi(10), epsilon = 1e-12);
    }
}
