//! Change of variables between the eight circuit parameters and the six
//! free variables the Newton iteration works on.
//!
//! The two linear restrictions
//! ```math
//!   X_{r2} = k_x X_s \quad\text{and}\quad R_s = k_r R_{r1}
//! ```
//! remove two parameters from the search. The remaining ones are mapped to
//! ```math
//!   \vec{x} = (R_{r1},\ R_{r2} - R_{r1},\ X_m,\ X_s,\ X_{r1} - k_x X_s,\ R_c)^\top
//! ```
//! so that `$x_2 \geq 0$` and `$x_5 \geq 0$` encode that the outer cage has the
//! larger resistance and the smaller reactance.
use nalgebra::{RealField, Vector6};
use num_traits::Float;

use crate::{EquivalentCircuit, SpecError};

/// The ratios `$k_x = X_{r2}/X_s$` and `$k_r = R_s/R_{r1}$`.
///
/// They are picked by the caller, usually from the design class of the motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRestrictions<F> {
    pub kx: F,
    pub kr: F,
}

impl<F: RealField + Float> LinearRestrictions<F> {
    /// Create the restrictions, checking that both ratios are finite.
    pub fn new(kx: F, kr: F) -> Result<Self, SpecError> {
        if !Float::is_finite(kx) {
            return Err(SpecError::NotFinite { field: "kx" });
        }
        if !Float::is_finite(kr) {
            return Err(SpecError::NotFinite { field: "kr" });
        }
        Ok(Self { kx, kr })
    }

    /// Project a circuit onto the free variables `$\vec{x}$`.
    ///
    /// `Rs` and `Xr2` do not enter, they are implied by the other parameters.
    pub fn constrain(&self, z: &EquivalentCircuit<F>) -> Vector6<F> {
        Vector6::new(
            z.rr1,
            z.rr2 - z.rr1,
            z.xm,
            z.xs,
            z.xr1 - self.kx * z.xs,
            z.rc,
        )
    }

    /// Rebuild the full circuit from the free variables.
    ///
    /// The result always satisfies both restrictions exactly.
    pub fn expand(&self, x: &Vector6<F>) -> EquivalentCircuit<F> {
        let rr1 = x[0];
        let xs = x[3];
        EquivalentCircuit {
            rs: self.kr * rr1,
            xs,
            xm: x[2],
            rr1,
            xr1: self.kx * xs + x[4],
            rr2: rr1 + x[1],
            xr2: self.kx * xs,
            rc: x[5],
        }
    }
}

/// The iterate of the solver in both of its representations.
///
/// The free variables and the circuit can only be changed together, so the
/// circuit handed to the performance model is always the expansion of the
/// current variables.
#[derive(Debug, Clone, Copy)]
pub struct CircuitState<F> {
    restrictions: LinearRestrictions<F>,
    variables: Vector6<F>,
    circuit: EquivalentCircuit<F>,
}

impl<F: RealField + Float> CircuitState<F> {
    /// Start from a circuit. The circuit is normalized to the restrictions,
    /// i.e. its `Rs` and `Xr2` are recomputed.
    pub fn new(circuit: &EquivalentCircuit<F>, restrictions: LinearRestrictions<F>) -> Self {
        Self::from_variables(restrictions.constrain(circuit), restrictions)
    }

    pub fn from_variables(variables: Vector6<F>, restrictions: LinearRestrictions<F>) -> Self {
        Self {
            restrictions,
            variables,
            circuit: restrictions.expand(&variables),
        }
    }

    pub fn variables(&self) -> &Vector6<F> {
        &self.variables
    }

    pub fn circuit(&self) -> &EquivalentCircuit<F> {
        &self.circuit
    }

    /// Replace the free variables and remap the circuit.
    pub fn update(&mut self, variables: Vector6<F>) {
        self.variables = variables;
        self.circuit = self.restrictions.expand(&variables);
    }

    /// A copy of this state with variable `j` moved by `h`.
    pub fn nudged(&self, j: usize, h: F) -> Self {
        let mut variables = self.variables;
        variables[j] = variables[j] + h;
        Self::from_variables(variables, self.restrictions)
    }
}
