//! The solver run against the double-cage motor model.
use approx::assert_relative_eq;

use super::test_helpers::{catalog_spec, consistent_spec, restrictions, RecordingModel};
use super::{solve, DampedNewton, Failure};
use crate::{DoubleCageModel, MotorPerformanceSpec, PerformanceModel};

#[test]
fn consistent_catalog_motor() {
    let spec = consistent_spec();
    let (circuit, report) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);

    assert!(report.converged(), "{:?}", report);
    assert!(report.objective_function <= 1e-6);
    assert!(report.iterations <= 6);
    assert!(circuit.is_positive(), "{:?}", circuit);
    assert_eq!(circuit.rs, circuit.rr1);
    assert_eq!(circuit.xr2, 0.5 * circuit.xs);
    // outer cage: higher resistance, lower reactance
    assert!(circuit.rr2 > circuit.rr1);
    assert!(circuit.xr2 < circuit.xr1);

    let achieved = DoubleCageModel.performance(spec.slip, &circuit).to_vector();
    for (a, t) in achieved.iter().zip(spec.targets().iter()) {
        assert_relative_eq!(*a, *t, max_relative = 1e-3);
    }
}

#[test]
fn fitted_breakdown_torque_is_the_peak_of_the_fitted_curve() {
    let spec = consistent_spec();
    let (circuit, report) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);
    assert!(report.converged(), "{:?}", report);

    let scanned = (1..=100_000)
        .map(|k| DoubleCageModel.torque(k as f64 * 1e-5, &circuit))
        .fold(0., f64::max);
    let breakdown = DoubleCageModel.performance(spec.slip, &circuit).breakdown_torque;
    assert!(scanned <= breakdown * (1. + 1e-12));
    assert_relative_eq!(scanned, breakdown, max_relative = 1e-6);
    assert_relative_eq!(scanned, 3.0 * spec.full_load_torque(), max_relative = 1e-3);
}

#[test]
fn catalog_motor_stalls_short_of_its_breakdown_torque() {
    // no circuit with Xr2 = Xs/2 and Rs = Rr1 peaks at 2.5 times full-load
    // torque while meeting the other five targets
    let spec = catalog_spec();
    let (circuit, report) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);

    assert_eq!(report.failure, Some(Failure::StepUnderflow));
    assert!(report.iterations > 0 && report.iterations < 100);
    assert!(report.objective_function > 0.03);
    assert!(report.objective_function < 0.05);
    assert!(circuit.is_positive(), "{:?}", circuit);
    let breakdown = DoubleCageModel.performance(spec.slip, &circuit).breakdown_torque;
    assert!(breakdown < 2.5 * spec.full_load_torque());
}

#[test]
fn high_efficiency_motor() {
    let spec = MotorPerformanceSpec::new(0.015, 0.93, 0.87, 2.8, 2.0, 7.0).unwrap();
    let (circuit, report) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);
    assert!(report.converged(), "{:?}", report);
    assert!(circuit.is_positive(), "{:?}", circuit);
}

#[test]
fn accepted_steps_decrease_the_error() {
    let spec = catalog_spec();
    let (_, full) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);
    let errors: Vec<f64> = (0..=full.iterations)
        .map(|budget| solve(&spec, 0.5, 1.0, budget, &DoubleCageModel).1)
        .map(|report| report.objective_function)
        .collect();
    assert!(errors.len() >= 2);
    for pair in errors.windows(2) {
        assert!(pair[1] < pair[0], "{:?}", errors);
    }
    assert_eq!(*errors.last().unwrap(), full.objective_function);
}

#[test]
fn identical_inputs_give_identical_results() {
    let spec = catalog_spec();
    let solver = DampedNewton::new();
    let first = solver.estimate(&spec, restrictions(), &DoubleCageModel);
    let second = solver.estimate(&spec, restrictions(), &DoubleCageModel);
    assert_eq!(first, second);
}

#[test]
fn every_evaluated_circuit_respects_the_restrictions() {
    let restrictions = restrictions();
    let mut model = RecordingModel::new(DoubleCageModel);
    let (_, report) = DampedNewton::new().estimate(&catalog_spec(), restrictions, &model);
    let calls = model.calls();
    assert_eq!(calls.len(), report.number_of_evaluations);
    for z in calls {
        assert_eq!(z.rs, restrictions.kr * z.rr1);
        assert_eq!(z.xr2, restrictions.kx * z.xs);
        let back = restrictions.expand(&restrictions.constrain(z));
        for (a, b) in back.to_array().iter().zip(z.to_array().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-14, max_relative = 1e-12);
        }
    }
}
