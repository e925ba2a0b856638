use crate::residual::{Residual, ResidualEvaluator};
use crate::utils::forward_difference_jacobian;
use crate::{
    CircuitState, EquivalentCircuit, LinearRestrictions, MotorPerformanceSpec, PerformanceModel,
};
use log::{debug, info, trace, warn};
use nalgebra::{convert, RealField, Vector6};
use num_traits::Float;

#[cfg(test)]
mod test_termination;
#[cfg(test)]
mod test_examples;

/// Reasons for failure of the estimation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The determinant of the finite-difference Jacobian is exactly zero.
    #[error("the finite-difference Jacobian is singular")]
    SingularJacobian,
    /// The damping factor dropped below its minimum without any step
    /// reducing the error.
    #[error("no damped Newton step reduced the error")]
    StepUnderflow,
    /// The maximal number of iterations was hit.
    #[error("iteration budget exhausted before the error tolerance was met")]
    BudgetExhausted,
}

/// Information about the estimation.
///
/// The circuit returned next to the report is the last accepted iterate,
/// also when the solver gave up.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverReport<F> {
    pub failure: Option<Failure>,
    /// Number of accepted Newton steps.
    pub iterations: usize,
    /// Number of calls to the performance model.
    pub number_of_evaluations: usize,
    /// Contains `$\|\vec{y}\|^2$` at the returned circuit.
    pub objective_function: F,
}

impl<F> SolverReport<F> {
    /// Whether the error tolerance was met.
    pub fn converged(&self) -> bool {
        self.failure.is_none()
    }
}

/// Current iterate, its residual and the bookkeeping for the report.
struct Run<'a, F, M>
where
    F: RealField + Float,
{
    evaluator: ResidualEvaluator<'a, F, M>,
    state: CircuitState<F>,
    residual: Residual<F>,
    iterations: usize,
}

impl<'a, F, M> Run<'a, F, M>
where
    F: RealField + Float,
    M: PerformanceModel<F>,
{
    fn finish(self, failure: Option<Failure>) -> (EquivalentCircuit<F>, SolverReport<F>) {
        let report = SolverReport {
            failure,
            iterations: self.iterations,
            number_of_evaluations: self.evaluator.evaluations(),
            objective_function: self.residual.error,
        };
        info!(
            "estimation finished after {} iterations with error {:?}: {}",
            report.iterations,
            report.objective_function,
            match failure {
                None => String::from("converged"),
                Some(failure) => failure.to_string(),
            }
        );
        (*self.state.circuit(), report)
    }

    fn failure(self, failure: Failure) -> (EquivalentCircuit<F>, SolverReport<F>) {
        self.finish(Some(failure))
    }

    fn success(self) -> (EquivalentCircuit<F>, SolverReport<F>) {
        self.finish(None)
    }
}

/// Take the absolute value of every free variable after a step.
///
/// A variable that would become negative is folded back to the positive
/// side instead of rejecting the step.
fn fold_positive<F: RealField + Float>(variables: Vector6<F>) -> Vector6<F> {
    variables.map(|v| Float::abs(v))
}

/// Damped Newton-Raphson solver for the double-cage parameters.
///
/// Starting from
/// [`EquivalentCircuit::initial_guess`](struct.EquivalentCircuit.html#method.initial_guess)
/// the solver drives the relative residuals `$\vec{y}(\vec{x})$` of the six
/// performance quantities to zero. Every outer iteration
///
/// 1. estimates `$\mathbf{J}$` by forward differences with step [`step`](#method.with_step),
/// 2. gives up if `$\det\mathbf{J} = 0$`,
/// 3. solves `$\mathbf{J}\Delta\vec{x} = \vec{y}$` and tries
///    `$\vec{x}' = |\vec{x} - 2^{-n}\Delta\vec{x}|$` for `$n = 0, 1, \ldots$` until
///    `$\|\vec{y}(\vec{x}')\|^2 < \|\vec{y}(\vec{x})\|^2$`.
///
/// If `$2^{-n}$` drops below [`min_damping`](#method.with_min_damping) the solver gives up.
/// It stops successfully once `$\|\vec{y}\|^2 \leq$` [`tolerance`](#method.with_tolerance).
///
/// The Jacobian is computed once per outer iteration and reused for all
/// damping attempts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DampedNewton<F> {
    step: F,
    min_damping: F,
    tolerance: F,
    max_iterations: usize,
}

impl<F: RealField + Float> DampedNewton<F> {
    pub fn new() -> Self {
        Self {
            step: convert(1e-5f64),
            min_damping: convert(1e-7f64),
            tolerance: convert(1e-6f64),
            max_iterations: 100,
        }
    }

    /// Set the forward-difference step `$h$` used for the Jacobian.
    ///
    /// # Panics
    ///
    /// Panics if `$h \leq 0$`.
    pub fn with_step(self, step: F) -> Self {
        assert!(step > F::zero(), "step must be > 0");
        Self { step, ..self }
    }

    /// Set the smallest damping factor `$2^{-n}$` tried before giving up.
    ///
    /// # Panics
    ///
    /// Panics if `min_damping` is not in `$(0, 1]$`.
    pub fn with_min_damping(self, min_damping: F) -> Self {
        assert!(
            min_damping > F::zero() && min_damping <= F::one(),
            "min_damping must be in (0, 1]"
        );
        Self {
            min_damping,
            ..self
        }
    }

    /// Set the bound on `$\|\vec{y}\|^2$` below which the solver stops.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative.
    pub fn with_tolerance(self, tolerance: F) -> Self {
        assert!(tolerance >= F::zero(), "tolerance must be >= 0");
        Self { tolerance, ..self }
    }

    /// Set the maximal number of accepted Newton steps.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Estimate the circuit parameters for `spec`, starting from the
    /// rule-of-thumb initial guess.
    pub fn estimate<M>(
        &self,
        spec: &MotorPerformanceSpec<F>,
        restrictions: LinearRestrictions<F>,
        model: &M,
    ) -> (EquivalentCircuit<F>, SolverReport<F>)
    where
        M: PerformanceModel<F>,
    {
        let initial = EquivalentCircuit::initial_guess(spec, &restrictions);
        self.minimize(&initial, spec, restrictions, model)
    }

    /// Estimate the circuit parameters for `spec`, starting from `initial`.
    ///
    /// `Rs` and `Xr2` of `initial` are ignored, they follow from the restrictions.
    pub fn minimize<M>(
        &self,
        initial: &EquivalentCircuit<F>,
        spec: &MotorPerformanceSpec<F>,
        restrictions: LinearRestrictions<F>,
        model: &M,
    ) -> (EquivalentCircuit<F>, SolverReport<F>)
    where
        M: PerformanceModel<F>,
    {
        let mut evaluator = ResidualEvaluator::new(model, spec);
        let state = CircuitState::new(initial, restrictions);
        let residual = evaluator.evaluate(&state);
        let mut run = Run {
            evaluator,
            state,
            residual,
            iterations: 0,
        };
        let two: F = convert(2.0f64);

        loop {
            if run.residual.error <= self.tolerance {
                return run.success();
            }
            if run.iterations >= self.max_iterations {
                return run.failure(Failure::BudgetExhausted);
            }

            // The residual kept from the last accepted step is the base point.
            let jacobian = forward_difference_jacobian(
                &mut run.evaluator,
                &run.state,
                &run.residual,
                self.step,
            );
            if jacobian.determinant().is_zero() {
                warn!("singular Jacobian at iteration {}", run.iterations);
                return run.failure(Failure::SingularJacobian);
            }
            let direction = match jacobian.lu().solve(&run.residual.values) {
                Some(direction) => direction,
                None => {
                    warn!("LU solve failed at iteration {}", run.iterations);
                    return run.failure(Failure::SingularJacobian);
                }
            };

            let checkpoint = (run.state, run.residual);
            let mut backtracks = 0;
            let mut damping = F::one();
            loop {
                let trial = fold_positive(checkpoint.0.variables() - direction * damping);
                run.state.update(trial);
                run.residual = run.evaluator.evaluate(&run.state);
                // NaN never counts as a decrease
                if Float::abs(run.residual.error) < Float::abs(checkpoint.1.error) {
                    break;
                }
                trace!(
                    "rejected step with damping {:?}, error {:?} >= {:?}",
                    damping,
                    run.residual.error,
                    checkpoint.1.error
                );
                backtracks += 1;
                damping = Float::powi(two, -backtracks);
                run.state = checkpoint.0;
                run.residual = checkpoint.1;
                if damping < self.min_damping {
                    warn!(
                        "damping fell below {:?} at iteration {}",
                        self.min_damping, run.iterations
                    );
                    return run.failure(Failure::StepUnderflow);
                }
            }
            run.iterations += 1;
            debug!(
                "iteration = {}, error = {:?}, damping = {:?}",
                run.iterations, run.residual.error, damping
            );
        }
    }
}

impl<F: RealField + Float> Default for DampedNewton<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimate the double-cage parameters of a motor with the default solver settings.
///
/// `kx` and `kr` are the [`LinearRestrictions`](struct.LinearRestrictions.html)
/// and `max_iterations` bounds the number of accepted Newton steps.
pub fn solve<F, M>(
    spec: &MotorPerformanceSpec<F>,
    kx: F,
    kr: F,
    max_iterations: usize,
    model: &M,
) -> (EquivalentCircuit<F>, SolverReport<F>)
where
    F: RealField + Float,
    M: PerformanceModel<F>,
{
    DampedNewton::new()
        .with_max_iterations(max_iterations)
        .estimate(spec, LinearRestrictions { kx, kr }, model)
}
