/// Reasons why a set of manufacturer data cannot be turned into
/// well-defined fitting targets.
///
/// These are only reported by the validating constructors
/// [`MotorPerformanceSpec::new`](struct.MotorPerformanceSpec.html#method.new) and
/// [`LinearRestrictions::new`](struct.LinearRestrictions.html#method.new).
/// The solver itself never checks its inputs.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecError {
    /// A field is `NaN` or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// `efficiency * power_factor` is zero, so the rotor resistance guess divides by zero.
    #[error("the product of efficiency and power factor must not be zero")]
    ZeroInputPower,
    /// A slip of one means the full-load torque is undefined.
    #[error("full-load slip must not be 1")]
    UnitSlip,
    /// One of the derived performance targets is zero, which makes the
    /// relative residual undefined.
    #[error("the derived {target} target is zero, relative residuals are undefined")]
    IllDefinedTarget {
        /// Name of the vanishing target.
        target: &'static str,
    },
}
