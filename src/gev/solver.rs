//! Outer iteration of the generalized eigenvalue solver

use log::{debug, trace};
use ndarray::{prelude::*, Data};
use rand::distributions::{Distribution, Standard};
use rand::Rng;

use super::{initial_basis, line_search::Backtracking, Objective, UpdateRule};
use crate::{check_pencil, metrics::MetricsSink, rayleigh::Rayleigh, GevError, Result};

/// Converged components of a fit
#[derive(Debug, Clone, PartialEq)]
pub struct GevFit<A> {
    /// `n x components` matrix, one eigenvector estimate per column
    pub eigvecs: Array2<A>,
    /// Generalized Rayleigh quotients of the columns, if requested
    pub eigvals: Option<Array1<A>>,
}

#[derive(Debug, Clone)]
/// Gradient based solver for the dominant generalized eigenpairs of a pencil (A, B)
///
/// The solver is configured with the builder pattern and then fitted to a pencil. Each fit draws
/// a random starting basis from the passed generator and runs a fixed number of momentum
/// accelerated updates. The state of the last fit (objective and step size traces, velocity) is
/// kept for inspection and reset by the next call to [fit](GevSolver::fit).
///
/// # Example
///
/// ```rust
/// use ndarray::{arr1, Array2};
/// use gev_descent::gev::{GevSolver, UpdateRule};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let a = Array2::from_diag(&arr1(&[10f64, 5., 2., 1., 0.5]));
/// let b = Array2::eye(5);
///
/// let mut solver = GevSolver::new(UpdateRule::Deflation)
///     .components(2)
///     .step_size(1e-2)
///     .iterations(2000);
///
/// let fit = solver.fit(&a, &b, &mut Xoshiro256Plus::seed_from_u64(42)).unwrap();
/// let eigvals = fit.eigvals.unwrap();
/// assert!((eigvals[0] - 10.).abs() < 1e-3);
/// ```
pub struct GevSolver<A> {
    rule: UpdateRule,
    step_size: A,
    iterations: usize,
    components: usize,
    momentum: A,
    line_search: bool,
    max_line_search_steps: usize,
    return_eigenvalues: bool,
    log_every: usize,

    velocity: Option<Array2<A>>,
    objective_trace: Vec<Objective<A>>,
    step_size_trace: Vec<A>,
}

impl<A: NdFloat> GevSolver<A> {
    /// Create a new solver for the given update rule
    ///
    /// # Defaults
    /// * `step_size`: 1
    /// * `iterations`: 50000
    /// * `components`: 1
    /// * `momentum`: 0, plain gradient steps
    /// * `line_search`: disabled
    /// * `return_eigenvalues`: enabled
    pub fn new(rule: UpdateRule) -> GevSolver<A> {
        GevSolver {
            rule,
            step_size: A::one(),
            iterations: 50_000,
            components: 1,
            momentum: A::zero(),
            line_search: false,
            max_line_search_steps: 100,
            return_eigenvalues: true,
            log_every: 100,
            velocity: None,
            objective_trace: Vec::new(),
            step_size_trace: Vec::new(),
        }
    }

    /// Create a new solver from the name of an update rule
    ///
    /// Fails with `UnknownUpdateRule` if the name is not recognized, see [UpdateRule].
    pub fn from_rule_name(name: &str) -> Result<GevSolver<A>> {
        Ok(GevSolver::new(name.parse()?))
    }

    /// Set the base step size of the gradient updates
    pub fn step_size(mut self, step_size: A) -> Self {
        self.step_size = step_size;

        self
    }

    /// Set the number of updates
    ///
    /// This is the only termination criterion, every fit runs exactly this many iterations.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;

        self
    }

    /// Set the number of simultaneously estimated eigenvectors
    pub fn components(mut self, components: usize) -> Self {
        self.components = components;

        self
    }

    /// Set the momentum coefficient in `[0, 1)`
    ///
    /// Before each gradient evaluation the iterate is moved along the velocity scaled by this
    /// coefficient (Nesterov look-ahead), afterwards the velocity accumulates the new step.
    pub fn momentum(mut self, momentum: A) -> Self {
        self.momentum = momentum;

        self
    }

    /// Enable backtracking line search
    ///
    /// The step size is shrunk by a factor of 0.9 until the objective decreases sufficiently. The
    /// reduced step size carries over to the following iterations, so it anneals over a fit.
    pub fn line_search(mut self, line_search: bool) -> Self {
        self.line_search = line_search;

        self
    }

    /// Set the maximal number of step size reductions of one line search
    ///
    /// Exceeding it fails the fit with `LineSearchExhausted`.
    pub fn max_line_search_steps(mut self, steps: usize) -> Self {
        self.max_line_search_steps = steps;

        self
    }

    /// Whether to estimate the eigenvalues of the converged components
    pub fn return_eigenvalues(mut self, return_eigenvalues: bool) -> Self {
        self.return_eigenvalues = return_eigenvalues;

        self
    }

    /// Report metrics to the sink every `log_every` iterations, zero disables reporting
    pub fn log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;

        self
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Objective after every iteration of the last fit
    pub fn objective_trace(&self) -> &[Objective<A>] {
        &self.objective_trace
    }

    /// Step size used in every iteration of the last fit
    pub fn step_size_trace(&self) -> &[A] {
        &self.step_size_trace
    }

    /// Step size at the end of the last fit, or the configured one before any fit
    pub fn effective_step_size(&self) -> A {
        self.step_size_trace
            .last()
            .copied()
            .unwrap_or(self.step_size)
    }

    /// Velocity at the end of the last successful fit
    pub fn velocity(&self) -> Option<ArrayView2<A>> {
        self.velocity.as_ref().map(|v| v.view())
    }

    fn validate(&self) -> Result<()> {
        if !(self.step_size > A::zero() && self.step_size.is_finite()) {
            return Err(GevError::InvalidStepSize);
        }
        if !(self.momentum >= A::zero() && self.momentum < A::one()) {
            return Err(GevError::InvalidMomentum);
        }
        if self.iterations == 0 {
            return Err(GevError::NoIterations);
        }
        Ok(())
    }

    /// Fit the solver to the pencil `(a, b)`
    ///
    /// Both matrices have to be square, of equal dimension and symmetric. Symmetry is not checked.
    pub fn fit<S1, S2, R>(
        &mut self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
        rng: &mut R,
    ) -> Result<GevFit<A>>
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
        R: Rng,
        Standard: Distribution<A>,
    {
        self.fit_with_sink(a, b, rng, ())
    }

    /// Fit the solver to the pencil `(a, b)`, reporting progress to `sink`
    ///
    /// Every `log_every` iterations and after the last one the objective (its total, and for the
    /// normalized reward rule also `objective/i` per component) and the step size are recorded.
    pub fn fit_with_sink<S1, S2, R, M>(
        &mut self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
        rng: &mut R,
        mut sink: M,
    ) -> Result<GevFit<A>>
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
        R: Rng,
        M: MetricsSink,
        Standard: Distribution<A>,
    {
        self.validate()?;
        let n = check_pencil(a, b)?;

        self.velocity = None;
        self.objective_trace.clear();
        self.step_size_trace.clear();

        debug!(
            "fitting {} components of a pencil with dimension {}: rule {}, step size {}, momentum {}, line search {}",
            self.components, n, self.rule, self.step_size, self.momentum, self.line_search
        );

        let mut u = initial_basis(a, b, self.components, rng)?;
        let mut velocity: Array2<A> = Array2::zeros(u.raw_dim());
        let mut step_size = self.step_size;

        let line_search = if self.line_search {
            Some(Backtracking::new(self.max_line_search_steps))
        } else {
            None
        };

        for iteration in 0..self.iterations {
            // evaluate the gradient at the look-ahead point
            u.scaled_add(self.momentum, &velocity);
            let grad = self.rule.gradient(a, b, &mut u)?;

            if let Some(ref line_search) = line_search {
                line_search.search(self.rule, a, b, &u, &grad, &mut step_size)?;
            }

            velocity *= self.momentum;
            velocity.scaled_add(-step_size, &grad);
            u += &velocity;

            if !u.iter().all(|x| x.is_finite()) {
                return Err(GevError::NonFiniteIterate { iteration });
            }

            // a finite iterate can still overflow in the quadratic forms
            let objective = self.rule.objective(a, b, &u)?;
            if !objective.is_finite() {
                return Err(GevError::NonFiniteIterate { iteration });
            }
            trace!(
                "iteration {}: objective {}, step size {}",
                iteration,
                objective.total(),
                step_size
            );

            if self.log_every > 0
                && (iteration % self.log_every == 0 || iteration + 1 == self.iterations)
            {
                report(&mut sink, iteration, &objective, step_size);
            }

            self.objective_trace.push(objective);
            self.step_size_trace.push(step_size);
        }

        self.velocity = Some(velocity);
        debug!(
            "finished {} iterations with step size {}",
            self.iterations, step_size
        );

        let eigvals = if self.return_eigenvalues {
            let eigvals = u.rayleigh_quotients(a, b)?;
            debug!("estimated eigenvalues {}", eigvals);
            Some(eigvals)
        } else {
            None
        };

        Ok(GevFit {
            eigvecs: u,
            eigvals,
        })
    }
}

fn report<A: NdFloat, M: MetricsSink>(
    sink: &mut M,
    step: usize,
    objective: &Objective<A>,
    step_size: A,
) {
    let to_f64 = |x: A| x.to_f64().unwrap_or(f64::NAN);

    sink.record(step, "objective", to_f64(objective.total()));
    if let Objective::PerComponent(values) = objective {
        for (i, &value) in values.iter().enumerate() {
            sink.record(step, &format!("objective/{}", i), to_f64(value));
        }
    }
    sink.record(step, "step_size", to_f64(step_size));
}
