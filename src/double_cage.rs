//! Steady-state model of the double-cage induction motor.
use nalgebra::{convert, Complex, RealField};
use num_traits::Float;

use crate::{EquivalentCircuit, Performance, PerformanceModel};

/// Slips `$k/N$`, `$k = 1,\ldots,N$`, sampled to bracket the breakdown slip.
const BREAKDOWN_SAMPLES: usize = 200;
/// Golden-section steps refining the bracket. Shrinks it by `$\approx 10^{-13}$`.
const GOLDEN_SECTION_STEPS: usize = 60;

/// Steady-state performance of the double-cage equivalent circuit.
///
/// All quantities are per-unit with the terminal voltage `$V = 1\angle 0$` and
/// the synchronous speed as base speed, so torque and air-gap power coincide.
/// With the cage impedances `$Z_k(s) = R_{rk}/s + jX_{rk}$` the machine draws
/// ```math
///   I_s = \frac{V}{R_s + jX_s
///     + \left(\frac{1}{R_c} + \frac{1}{jX_m} + \frac{1}{Z_1} + \frac{1}{Z_2}\right)^{-1}}
/// ```
/// and develops the torque
/// ```math
///   T(s) = \frac{|I_1|^2 R_{r1} + |I_2|^2 R_{r2}}{s}.
/// ```
///
/// The breakdown torque is the peak of the motoring torque curve,
/// ```math
///   T_b = \max_{0 < s \leq 1} T(s).
/// ```
/// It is found by sampling `$T$` on a uniform grid of slips and refining the
/// best sample by golden-section search between its neighbours. If the curve
/// still rises at standstill the result is `$T(1)$`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleCageModel;

struct OperatingPoint<F> {
    torque: F,
    current: Complex<F>,
}

fn real<F: RealField + Float>(re: F) -> Complex<F> {
    Complex::new(re, F::zero())
}

impl DoubleCageModel {
    fn operate<F: RealField + Float>(slip: F, z: &EquivalentCircuit<F>) -> OperatingPoint<F> {
        let stator = Complex::new(z.rs, z.xs);
        let inner = Complex::new(z.rr1 / slip, z.xr1);
        let outer = Complex::new(z.rr2 / slip, z.xr2);
        let admittance =
            real(z.rc).inv() + Complex::new(F::zero(), z.xm).inv() + inner.inv() + outer.inv();
        let parallel = admittance.inv();
        let current = (stator + parallel).inv();
        let air_gap = current * parallel;
        let i_inner = air_gap / inner;
        let i_outer = air_gap / outer;
        OperatingPoint {
            torque: (i_inner.norm_sqr() * z.rr1 + i_outer.norm_sqr() * z.rr2) / slip,
            current,
        }
    }

    /// Electromagnetic torque at `slip`.
    pub fn torque<F: RealField + Float>(&self, slip: F, circuit: &EquivalentCircuit<F>) -> F {
        Self::operate(slip, circuit).torque
    }

    /// Stator current phasor at `slip`.
    pub fn stator_current<F: RealField + Float>(
        &self,
        slip: F,
        circuit: &EquivalentCircuit<F>,
    ) -> Complex<F> {
        Self::operate(slip, circuit).current
    }

    /// Maximum torque over all motoring slips, see the type documentation.
    ///
    /// A circuit for which the torque is `NaN` everywhere yields `$-\infty$`.
    pub fn breakdown_torque<F: RealField + Float>(&self, z: &EquivalentCircuit<F>) -> F {
        let samples: F = convert(BREAKDOWN_SAMPLES as f64);
        let slip = |k: usize| convert::<f64, F>(k as f64) / samples;

        // `>` skips NaN samples
        let mut best = (0, Float::neg_infinity());
        for k in 1..=BREAKDOWN_SAMPLES {
            let torque = self.torque(slip(k), z);
            if torque > best.1 {
                best = (k, torque);
            }
        }
        let (k, sampled) = best;
        if k == 0 {
            return sampled;
        }

        let mut lower = if k == 1 {
            slip(1) * convert(1e-3f64)
        } else {
            slip(k - 1)
        };
        let mut upper = slip((k + 1).min(BREAKDOWN_SAMPLES));
        let ratio: F = convert(0.5 * (5f64.sqrt() - 1.0));
        let mut left = upper - (upper - lower) * ratio;
        let mut right = lower + (upper - lower) * ratio;
        let mut t_left = self.torque(left, z);
        let mut t_right = self.torque(right, z);
        for _ in 0..GOLDEN_SECTION_STEPS {
            if t_left > t_right {
                upper = right;
                right = left;
                t_right = t_left;
                left = upper - (upper - lower) * ratio;
                t_left = self.torque(left, z);
            } else {
                lower = left;
                left = right;
                t_left = t_right;
                right = lower + (upper - lower) * ratio;
                t_right = self.torque(right, z);
            }
        }
        Float::max(sampled, Float::max(t_left, t_right))
    }
}

impl<F: RealField + Float> PerformanceModel<F> for DoubleCageModel {
    fn performance(&self, slip: F, circuit: &EquivalentCircuit<F>) -> Performance<F> {
        let full_load = Self::operate(slip, circuit);
        let locked = Self::operate(F::one(), circuit);
        let mechanical_power = full_load.torque * (F::one() - slip);
        Performance {
            mechanical_power,
            reactive_power: -full_load.current.im,
            breakdown_torque: self.breakdown_torque(circuit),
            locked_rotor_torque: locked.torque,
            locked_rotor_current: Float::sqrt(locked.current.norm_sqr()),
            efficiency: mechanical_power / full_load.current.re,
        }
    }
}
