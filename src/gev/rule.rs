use std::fmt;
use std::str::FromStr;

use ndarray::{prelude::*, Data};

use super::Objective;
use crate::{
    norm::NormalizeColumns,
    rayleigh::check_energies,
    triangular::IntoTriangular,
    GevError, Result,
};

/// Update rule of the solver, selecting the gradient formula and the objective
///
/// With `Aw = A U`, `Bw = B U`, `wAw = U' A U` and `wBw = U' B U` the raw ascent directions are
/// * `Deflation`: `2 Aw - (Aw triu(wBw) + Bw triu(wAw))`, every component is pushed towards the top
///   eigendirection while overlap with lower-indexed components is penalized. Column `i`
///   converges towards the `i`-th generalized eigenvector.
/// * `Hebbian`: `2 Aw - 2 Bw triu(wAw)`, a generalized Hebbian update.
/// * `NormalizedReward`: the columns of `U` are first scaled to unit euclidean norm, then a
///   per-component reward `Aw diag(wBw) - Bw diag(wAw)` is reduced by a penalty coupling each
///   component to all earlier ones.
///
/// The rules can be parsed from their names, `"deflation"`, `"hebbian"` and `"normalized-reward"`.
/// The short tags `"delta"`, `"gha"` and `"gamma"` are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateRule {
    Deflation,
    Hebbian,
    NormalizedReward,
}

impl UpdateRule {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::Deflation => "deflation",
            UpdateRule::Hebbian => "hebbian",
            UpdateRule::NormalizedReward => "normalized-reward",
        }
    }

    /// Computes the descent direction `grad = -raw`, where `raw` is the ascent direction of the rule
    ///
    /// For `NormalizedReward` the columns of `u` are rescaled to unit euclidean norm in place before
    /// the gradient is formed, so the caller continues with the rescaled iterate.
    pub(crate) fn gradient<A, S1, S2>(
        &self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
        u: &mut Array2<A>,
    ) -> Result<Array2<A>>
    where
        A: NdFloat,
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
    {
        if *self == UpdateRule::NormalizedReward {
            u.normalize_columns_inplace()?;
        }
        let u = &*u;

        let aw = a.dot(u);
        let bw = b.dot(u);
        let waw = u.t().dot(&aw);
        let wbw = u.t().dot(&bw);
        let two = A::one() + A::one();

        let raw = match self {
            UpdateRule::Deflation => &aw * two - (aw.dot(&wbw.triu(0)) + bw.dot(&waw.triu(0))),
            UpdateRule::Hebbian => (&aw - &bw.dot(&waw.into_triu(0))) * two,
            UpdateRule::NormalizedReward => normalized_reward(a, b, u, &aw, &bw, &waw, &wbw)?,
        };

        Ok(-raw)
    }

    /// Evaluates the surrogate objective, lower is better
    ///
    /// `Deflation` and `Hebbian` use
    /// `-2 trace(wAw) + diag(wAw) . diag(wBw) + 2 sum_{i<j} wAw_ij wBw_ij`,
    /// `NormalizedReward` the negated Rayleigh quotient of every component.
    pub(crate) fn objective<A, S1, S2, S3>(
        &self,
        a: &ArrayBase<S1, Ix2>,
        b: &ArrayBase<S2, Ix2>,
        u: &ArrayBase<S3, Ix2>,
    ) -> Result<Objective<A>>
    where
        A: NdFloat,
        S1: Data<Elem = A>,
        S2: Data<Elem = A>,
        S3: Data<Elem = A>,
    {
        let waw = u.t().dot(&a.dot(u));
        let wbw = u.t().dot(&b.dot(u));

        match self {
            UpdateRule::Deflation | UpdateRule::Hebbian => {
                let two = A::one() + A::one();
                let coupling = (&waw * &wbw).into_triu(1).sum();
                let value =
                    -two * waw.diag().sum() + waw.diag().dot(&wbw.diag()) + two * coupling;

                Ok(Objective::Scalar(value))
            }
            UpdateRule::NormalizedReward => {
                let energies = wbw.diag().to_owned();
                check_energies(&energies)?;

                Ok(Objective::PerComponent(-(waw.diag().to_owned() / energies)))
            }
        }
    }
}

/// Raw ascent direction of the normalized reward rule, `u` is expected to have unit columns
fn normalized_reward<A, S1, S2>(
    a: &ArrayBase<S1, Ix2>,
    b: &ArrayBase<S2, Ix2>,
    u: &Array2<A>,
    aw: &Array2<A>,
    bw: &Array2<A>,
    waw: &Array2<A>,
    wbw: &Array2<A>,
) -> Result<Array2<A>>
where
    A: NdFloat,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
{
    let energies = wbw.diag().to_owned();
    check_energies(&energies)?;
    let quadratic = waw.diag();

    // components scaled to unit B-energy
    let y = u / &energies.mapv(A::sqrt);
    let ay = a.dot(&y);
    let by = b.dot(&y);

    let reward = aw * &energies - bw * &quadratic;

    let cross = ay.t().dot(u) * &energies;
    let coupling = u.t().dot(&by).into_tril(-1).dot(&ay.t()).dot(u);
    let penalty = by.dot(&cross.into_triu(1)) - bw * &coupling.diag();

    Ok(reward - penalty)
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdateRule {
    type Err = GevError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deflation" | "delta" => Ok(UpdateRule::Deflation),
            "hebbian" | "gha" => Ok(UpdateRule::Hebbian),
            "normalized-reward" | "gamma" => Ok(UpdateRule::NormalizedReward),
            other => Err(GevError::UnknownUpdateRule(other.to_owned())),
        }
    }
}
