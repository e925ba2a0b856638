//! Estimation of the [double-cage](https://en.wikipedia.org/wiki/Induction_motor#Rotor)
//! induction motor equivalent circuit from manufacturer data using a damped
//! Newton-Raphson iteration on top of [nalgebra](https://nalgebra.org).
//!
//! Catalogs rarely list circuit parameters. They do list the full-load slip
//! `$s$`, efficiency `$\eta$` and power factor `$\mathrm{pf}$` together with the
//! breakdown torque, the locked-rotor torque and the locked-rotor current. This
//! crate finds the eight parameters
//! ```math
//!   \vec{z} = (R_s, X_s, X_m, R_{r1}, X_{r1}, R_{r2}, X_{r2}, R_c)^\top
//! ```
//! of the double-cage circuit with core-loss branch that reproduce those six
//! quantities.
//!
//! # Problem
//!
//! Let `$\vec{t}\in\R^6$` be the targets derived from the data, i.e. mechanical
//! power `$\mathrm{pf}\cdot\eta$`, reactive power `$\sin(\arccos\mathrm{pf})$`,
//! breakdown and locked-rotor torque in multiples of the full-load torque
//! `$T_{fl} = \mathrm{pf}\cdot\eta/(1-s)$`, locked-rotor current and efficiency.
//! With a [`PerformanceModel`](trait.PerformanceModel.html) `$\vec{p}(s, \vec{z})$`
//! the relative residuals are
//! ```math
//!   y_i = \frac{t_i - p_i(s, \vec{z})}{t_i},\quad i = 1,\ldots,6.
//! ```
//!
//! Six equations do not determine eight unknowns, so two
//! [`LinearRestrictions`](struct.LinearRestrictions.html) `$X_{r2} = k_x X_s$` and
//! `$R_s = k_r R_{r1}$` are imposed. The remaining parameters are mapped to six
//! free variables `$\vec{x}$` and [`DampedNewton`](struct.DampedNewton.html)
//! drives `$\|\vec{y}(\vec{x})\|^2$` below a tolerance.
//!
//! # Usage Example
//!
//! ```
//! use double_cage_estimator::{solve, DoubleCageModel, MotorPerformanceSpec};
//!
//! // slip, efficiency, power factor, breakdown torque, locked-rotor torque
//! // and locked-rotor current
//! let spec = MotorPerformanceSpec::new(0.02, 0.9, 0.85, 3.0, 1.2, 6.0).unwrap();
//! let (circuit, report) = solve(&spec, 0.5, 1.0, 100, &DoubleCageModel);
//! assert!(report.converged());
//! assert!(report.objective_function <= 1e-6);
//! assert!(circuit.is_positive());
//! ```
//!
//! The solver never fails with an error. If it gives up, the report says why
//! in [`failure`](struct.SolverReport.html#structfield.failure) and the best
//! circuit found so far is returned. Nothing is retried; picking other
//! restrictions is up to the caller.
//!
//! # Logging
//!
//! Progress is reported through the [`log`](https://docs.rs/log) facade,
//! accepted iterations at `debug` and rejected damping attempts at `trace` level.

mod double_cage;
mod error;
mod mapping;
mod motor;
mod newton;
mod problem;
mod residual;
mod utils;

pub use double_cage::DoubleCageModel;
pub use error::SpecError;
pub use mapping::{CircuitState, LinearRestrictions};
pub use motor::{EquivalentCircuit, MotorPerformanceSpec, Performance};
pub use newton::{solve, DampedNewton, Failure, SolverReport};
pub use problem::PerformanceModel;
