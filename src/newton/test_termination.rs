use approx::assert_relative_eq;
use nalgebra::Vector6;

use super::test_helpers::{
    catalog_spec, initial_variables, restrictions, scaled_model, RecordingModel,
};
use super::{DampedNewton, Failure};
use crate::{CircuitState, DoubleCageModel, EquivalentCircuit, Performance};

fn initial_circuit() -> EquivalentCircuit<f64> {
    *CircuitState::from_variables(initial_variables(), restrictions()).circuit()
}

fn assert_circuit_eq(a: &EquivalentCircuit<f64>, b: &EquivalentCircuit<f64>, max_relative: f64) {
    for (a, b) in a.to_array().iter().zip(b.to_array().iter()) {
        assert_relative_eq!(*a, *b, max_relative = max_relative);
    }
}

#[test]
fn singular_jacobian_on_first_iteration() {
    let model =
        |_: f64, _: &EquivalentCircuit<f64>| Performance::from_vector(&Vector6::repeat(1.0));
    let spec = catalog_spec();
    let (circuit, report) = DampedNewton::new().estimate(&spec, restrictions(), &model);

    assert_eq!(report.failure, Some(Failure::SingularJacobian));
    assert!(!report.converged());
    assert_eq!(report.iterations, 0);
    assert_eq!(report.number_of_evaluations, 7);
    let expected = spec.targets().map(|t| (t - 1.0) / t).norm_squared();
    assert_relative_eq!(report.objective_function, expected, max_relative = 1e-14);
    assert_eq!(circuit, initial_circuit());
}

#[test]
fn singular_jacobian_after_one_step() {
    // linear below half the true values, flat above
    let truth = initial_variables() * 3.0;
    let model = scaled_model(truth, |r| r.min(0.5));
    let (circuit, report) = DampedNewton::new().estimate(&catalog_spec(), restrictions(), &model);

    assert_eq!(report.failure, Some(Failure::SingularJacobian));
    assert_eq!(report.iterations, 1);
    assert_eq!(report.number_of_evaluations, 14);
    assert_eq!(report.objective_function, 1.5);
    assert_circuit_eq(&circuit, &restrictions().expand(&truth), 1e-8);
}

#[test]
fn step_underflow_in_a_bowl() {
    // the residual is smallest at the initial guess and nowhere zero
    let model = scaled_model(initial_variables(), |r| 0.5 - 10. * (r - 1.).powi(2));
    let mut model = RecordingModel::new(model);
    let (circuit, report) = DampedNewton::new()
        .with_max_iterations(50)
        .estimate(&catalog_spec(), restrictions(), &model);

    assert_eq!(report.failure, Some(Failure::StepUnderflow));
    assert_eq!(report.iterations, 0);
    assert!(report.iterations < 50);
    // 1 base point, 6 Jacobian columns and damping factors 2^0 to 2^-23
    assert_eq!(report.number_of_evaluations, 31);
    assert_eq!(model.calls().len(), 31);
    assert_relative_eq!(report.objective_function, 1.5, max_relative = 1e-12);
    assert_eq!(circuit, initial_circuit());
}

#[test]
fn coarser_damping_floor_gives_up_earlier() {
    let model = scaled_model(initial_variables(), |r| 0.5 - 10. * (r - 1.).powi(2));
    let (_, report) = DampedNewton::new()
        .with_min_damping(0.1)
        .estimate(&catalog_spec(), restrictions(), &model);
    assert_eq!(report.failure, Some(Failure::StepUnderflow));
    // damping factors 1, 1/2, 1/4 and 1/8
    assert_eq!(report.number_of_evaluations, 1 + 6 + 4);
}

#[test]
fn non_finite_trials_are_rejected() {
    let model = scaled_model(initial_variables(), |r| {
        if (r - 1.).abs() < 1e-3 {
            0.5 * r
        } else {
            f64::NAN
        }
    });
    let (circuit, report) = DampedNewton::new()
        .with_max_iterations(1)
        .estimate(&catalog_spec(), restrictions(), &model);

    assert_eq!(report.failure, Some(Failure::BudgetExhausted));
    assert_eq!(report.iterations, 1);
    // accepted at damping 2^-10
    assert_eq!(report.number_of_evaluations, 1 + 6 + 11);
    assert!(report.objective_function < 1.5);
    assert_relative_eq!(circuit.rc, 12. * (1. + 2f64.powi(-10)), max_relative = 1e-6);
}

#[test]
fn zero_iteration_budget() {
    let (circuit, report) = DampedNewton::new()
        .with_max_iterations(0)
        .estimate(&catalog_spec(), restrictions(), &DoubleCageModel);
    assert_eq!(report.failure, Some(Failure::BudgetExhausted));
    assert_eq!(report.iterations, 0);
    assert_eq!(report.number_of_evaluations, 1);
    assert_eq!(circuit, initial_circuit());
}

#[test]
fn loose_tolerance_converges_immediately() {
    let (circuit, report) = DampedNewton::new()
        .with_tolerance(1.0)
        .estimate(&catalog_spec(), restrictions(), &DoubleCageModel);
    assert!(report.converged());
    assert_eq!(report.iterations, 0);
    assert_eq!(report.number_of_evaluations, 1);
    assert!(report.objective_function <= 1.0);
    assert_eq!(circuit, initial_circuit());
}

#[test]
fn linear_model_is_solved_in_one_step() {
    let truth = Vector6::new(0.031, 0.037, 2.24, 0.118, 0.029, 21.9);
    let mut model = RecordingModel::new(scaled_model(truth, |r| r));
    let (circuit, report) = DampedNewton::new().estimate(&catalog_spec(), restrictions(), &model);

    assert!(report.converged());
    assert_eq!(report.iterations, 1);
    assert_eq!(report.number_of_evaluations, 8);
    assert!(report.objective_function <= 1e-6);
    assert_circuit_eq(&circuit, &restrictions().expand(&truth), 1e-8);

    let restrictions = restrictions();
    for z in model.calls() {
        assert_eq!(z.rs, restrictions.kr * z.rr1);
        assert_eq!(z.xr2, restrictions.kx * z.xs);
    }
}

#[test]
#[should_panic(expected = "step must be > 0")]
fn zero_step_panics() {
    DampedNewton::<f64>::new().with_step(0.);
}

#[test]
#[should_panic(expected = "min_damping must be in (0, 1]")]
fn min_damping_above_one_panics() {
    DampedNewton::<f64>::new().with_min_damping(2.);
}

#[test]
#[should_panic(expected = "tolerance must be >= 0")]
fn negative_tolerance_panics() {
    DampedNewton::<f64>::new().with_tolerance(-1.);
}
