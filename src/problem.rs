use nalgebra::RealField;

use crate::{EquivalentCircuit, Performance};

/// Steady-state performance of a motor described by an equivalent circuit.
///
/// This is what [`DampedNewton`](struct.DampedNewton.html) fits the circuit
/// against. The solver evaluates the model at many trial circuits, including
/// slightly perturbed ones for the finite-difference Jacobian, so an
/// implementation
///
/// - must be a pure function of its arguments and
/// - should not panic for any finite circuit. Non-physical inputs may
///   produce `NaN` or `$\pm\infty$`, such steps are simply rejected.
///
/// [`DoubleCageModel`](struct.DoubleCageModel.html) is the steady-state model
/// of the double-cage circuit. Any closure of the right shape is a model as
/// well, which is handy for testing:
///
/// ```
/// # use double_cage_estimator::{EquivalentCircuit, Performance, PerformanceModel};
/// let model = |_slip: f64, z: &EquivalentCircuit<f64>| Performance {
///     mechanical_power: z.rr1,
///     reactive_power: z.xm,
///     breakdown_torque: z.xs,
///     locked_rotor_torque: z.rr2,
///     locked_rotor_current: z.xr1,
///     efficiency: z.rc,
/// };
/// let z = EquivalentCircuit::from_array([1., 2., 3., 4., 5., 6., 7., 8.]);
/// assert_eq!(model.performance(0.02, &z).reactive_power, 3.);
/// ```
pub trait PerformanceModel<F>
where
    F: RealField + Copy,
{
    /// Compute the six performance quantities of `circuit` operated at `slip`.
    fn performance(&self, slip: F, circuit: &EquivalentCircuit<F>) -> Performance<F>;
}

impl<F, T> PerformanceModel<F> for T
where
    F: RealField + Copy,
    T: Fn(F, &EquivalentCircuit<F>) -> Performance<F>,
{
    fn performance(&self, slip: F, circuit: &EquivalentCircuit<F>) -> Performance<F> {
        self(slip, circuit)
    }
}
