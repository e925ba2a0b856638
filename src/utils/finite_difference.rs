//! Forward-difference approximation of the residual Jacobian.
use nalgebra::{Matrix6, RealField};
use num_traits::Float;

use crate::residual::{Residual, ResidualEvaluator};
use crate::{CircuitState, PerformanceModel};

/// Approximate `$\mathbf{J}_{ij} = \partial y_i / \partial x_j$` column by column.
///
/// Each free variable is moved by `h` on its own, the circuit is remapped
/// and the residual re-evaluated, giving
/// ```math
///   \mathbf{J}\vec{e}_j \approx \frac{\vec{y}(\vec{x} + h\vec{e}_j) - \vec{y}(\vec{x})}{h}.
/// ```
/// `base` must be the residual at `state`. The state itself is never modified.
pub(crate) fn forward_difference_jacobian<F, M>(
    evaluator: &mut ResidualEvaluator<'_, F, M>,
    state: &CircuitState<F>,
    base: &Residual<F>,
    h: F,
) -> Matrix6<F>
where
    F: RealField + Float,
    M: PerformanceModel<F>,
{
    let mut jacobian = Matrix6::zeros();
    for j in 0..6 {
        let nudged = evaluator.evaluate(&state.nudged(j, h));
        jacobian.set_column(j, &((nudged.values - base.values) / h));
    }
    jacobian
}
