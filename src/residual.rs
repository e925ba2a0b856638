//! Relative residuals of a trial circuit against the fitting targets.
use nalgebra::{RealField, Vector6};
use num_traits::Float;

use crate::{CircuitState, MotorPerformanceSpec, PerformanceModel};

/// Residual vector `$\vec{y}$` together with `$\|\vec{y}\|^2$`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Residual<F> {
    pub values: Vector6<F>,
    pub error: F,
}

/// Wraps the performance model and counts its evaluations.
///
/// The residual of component `$i$` is `$y_i = (t_i - p_i)/t_i$` where `$t_i$` is
/// the target and `$p_i$` the model output. A zero target yields non-finite
/// residuals; it is up to the caller to avoid that.
pub(crate) struct ResidualEvaluator<'a, F, M>
where
    F: RealField + Float,
{
    model: &'a M,
    slip: F,
    targets: Vector6<F>,
    evaluations: usize,
}

impl<'a, F, M> ResidualEvaluator<'a, F, M>
where
    F: RealField + Float,
    M: PerformanceModel<F>,
{
    pub fn new(model: &'a M, spec: &MotorPerformanceSpec<F>) -> Self {
        Self {
            model,
            slip: spec.slip,
            targets: spec.targets(),
            evaluations: 0,
        }
    }

    pub fn evaluate(&mut self, state: &CircuitState<F>) -> Residual<F> {
        self.evaluations += 1;
        let outputs = self.model.performance(self.slip, state.circuit()).to_vector();
        let values = (self.targets - outputs).component_div(&self.targets);
        Residual {
            error: values.norm_squared(),
            values,
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}
