//! Manufacturer data, the equivalent circuit and the performance quantities
//! relating the two.
use nalgebra::{convert, RealField, Vector6};
use num_traits::Float;

use crate::{LinearRestrictions, SpecError};

/// Performance data of a motor as found on its nameplate or in a catalog.
///
/// All quantities are per-unit. Torques are given as multiples of the
/// full-load torque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorPerformanceSpec<F> {
    /// Full-load slip.
    pub slip: F,
    /// Full-load efficiency.
    pub efficiency: F,
    /// Full-load power factor.
    pub power_factor: F,
    /// Breakdown torque over full-load torque.
    pub breakdown_torque: F,
    /// Locked-rotor torque over full-load torque.
    pub locked_rotor_torque: F,
    /// Locked-rotor current.
    pub locked_rotor_current: F,
}

impl<F: RealField + Float> MotorPerformanceSpec<F> {
    /// Create a spec and check that all fitting targets derived from it are
    /// well-defined.
    ///
    /// The fields are public, so a spec can also be built directly. In that
    /// case nothing is checked and a zero target shows up as `NaN` or `$\pm\infty$`
    /// residuals during the solve.
    pub fn new(
        slip: F,
        efficiency: F,
        power_factor: F,
        breakdown_torque: F,
        locked_rotor_torque: F,
        locked_rotor_current: F,
    ) -> Result<Self, SpecError> {
        let spec = Self {
            slip,
            efficiency,
            power_factor,
            breakdown_torque,
            locked_rotor_torque,
            locked_rotor_current,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), SpecError> {
        let fields = [
            ("slip", self.slip),
            ("efficiency", self.efficiency),
            ("power factor", self.power_factor),
            ("breakdown torque", self.breakdown_torque),
            ("locked-rotor torque", self.locked_rotor_torque),
            ("locked-rotor current", self.locked_rotor_current),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !Float::is_finite(*v)) {
            return Err(SpecError::NotFinite { field: *field });
        }
        if (self.efficiency * self.power_factor).is_zero() {
            return Err(SpecError::ZeroInputPower);
        }
        if self.slip == F::one() {
            return Err(SpecError::UnitSlip);
        }
        let targets = self.targets();
        for (i, target) in Performance::<F>::NAMES.iter().enumerate() {
            if targets[i].is_zero() {
                return Err(SpecError::IllDefinedTarget { target: *target });
            }
        }
        Ok(())
    }

    /// Full-load torque `$T_{fl} = \mathrm{pf}\cdot\eta/(1-s)$`.
    pub fn full_load_torque(&self) -> F {
        self.power_factor * self.efficiency / (F::one() - self.slip)
    }

    /// Reactive power at full load, `$\sin(\arccos \mathrm{pf})$`.
    pub fn reactive_power(&self) -> F {
        Float::sin(Float::acos(self.power_factor))
    }

    /// The absolute performance quantities the circuit has to reproduce.
    ///
    /// The order matches [`Performance::to_vector`](struct.Performance.html#method.to_vector).
    pub fn targets(&self) -> Vector6<F> {
        let torque = self.full_load_torque();
        Performance {
            mechanical_power: self.power_factor * self.efficiency,
            reactive_power: self.reactive_power(),
            breakdown_torque: self.breakdown_torque * torque,
            locked_rotor_torque: self.locked_rotor_torque * torque,
            locked_rotor_current: self.locked_rotor_current,
            efficiency: self.efficiency,
        }
        .to_vector()
    }
}

/// Steady-state performance of a motor at a given slip, as computed by a
/// [`PerformanceModel`](trait.PerformanceModel.html).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance<F> {
    pub mechanical_power: F,
    pub reactive_power: F,
    /// Absolute breakdown torque in per-unit.
    pub breakdown_torque: F,
    /// Absolute locked-rotor torque in per-unit.
    pub locked_rotor_torque: F,
    pub locked_rotor_current: F,
    pub efficiency: F,
}

impl<F: RealField + Float> Performance<F> {
    pub(crate) const NAMES: [&'static str; 6] = [
        "mechanical power",
        "reactive power",
        "breakdown torque",
        "locked-rotor torque",
        "locked-rotor current",
        "efficiency",
    ];

    pub fn to_vector(&self) -> Vector6<F> {
        Vector6::new(
            self.mechanical_power,
            self.reactive_power,
            self.breakdown_torque,
            self.locked_rotor_torque,
            self.locked_rotor_current,
            self.efficiency,
        )
    }

    pub fn from_vector(v: &Vector6<F>) -> Self {
        Self {
            mechanical_power: v[0],
            reactive_power: v[1],
            breakdown_torque: v[2],
            locked_rotor_torque: v[3],
            locked_rotor_current: v[4],
            efficiency: v[5],
        }
    }
}

/// Parameters of the double-cage equivalent circuit with core-loss branch.
///
/// ```text
///   Rs    jXs
/// o-###---@@@--+-------+-------+------------+
///              |       |       |            |
///              #      @@@      # Rr1/s      # Rr2/s
///           Rc #   jXm @@@     #            #
///              |       |      @@@ jXr1     @@@ jXr2
///              |       |       |            |
/// o------------+-------+-------+------------+
/// ```
///
/// The first cage (`Rr1`, `Xr1`) is the inner, low-resistance, high-reactance
/// cage and the second (`Rr2`, `Xr2`) the outer cage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquivalentCircuit<F> {
    pub rs: F,
    pub xs: F,
    pub xm: F,
    pub rr1: F,
    pub xr1: F,
    pub rr2: F,
    pub xr2: F,
    pub rc: F,
}

impl<F: RealField + Float> EquivalentCircuit<F> {
    /// Starting point of the Newton iteration.
    ///
    /// These are rule-of-thumb values which usually lie in the basin of
    /// convergence for standard motors. Nothing is guaranteed for unusual data.
    pub fn initial_guess(
        spec: &MotorPerformanceSpec<F>,
        restrictions: &LinearRestrictions<F>,
    ) -> Self {
        let xm = F::one() / spec.reactive_power();
        let xs = xm * convert(0.05f64);
        let rr1 = spec.slip / (spec.power_factor * spec.efficiency);
        Self {
            rs: restrictions.kr * rr1,
            xs,
            xm,
            rr1,
            xr1: xs * convert(1.2f64),
            rr2: rr1 * convert(5.0f64),
            xr2: restrictions.kx * xs,
            rc: convert(12.0f64),
        }
    }

    /// `[Rs, Xs, Xm, Rr1, Xr1, Rr2, Xr2, Rc]`
    pub fn to_array(&self) -> [F; 8] {
        [
            self.rs, self.xs, self.xm, self.rr1, self.xr1, self.rr2, self.xr2, self.rc,
        ]
    }

    pub fn from_array([rs, xs, xm, rr1, xr1, rr2, xr2, rc]: [F; 8]) -> Self {
        Self {
            rs,
            xs,
            xm,
            rr1,
            xr1,
            rr2,
            xr2,
            rc,
        }
    }

    /// Whether every parameter is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.to_array().iter().all(|p| *p > F::zero())
    }
}
