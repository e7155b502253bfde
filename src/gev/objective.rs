use ndarray::{Array1, NdFloat};

/// Value of the surrogate objective minimized by the solver
///
/// The deflation and Hebbian rules share one scalar objective. The normalized reward rule tracks
/// one negated Rayleigh quotient per component instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Objective<A> {
    Scalar(A),
    PerComponent(Array1<A>),
}

impl<A: NdFloat> Objective<A> {
    /// Collapse into a single number, summing per-component values
    ///
    /// This is what the line search compares.
    pub fn total(&self) -> A {
        match self {
            Objective::Scalar(x) => *x,
            Objective::PerComponent(xs) => xs.sum(),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Objective::Scalar(x) => x.is_finite(),
            Objective::PerComponent(xs) => xs.iter().all(|x| x.is_finite()),
        }
    }
}
