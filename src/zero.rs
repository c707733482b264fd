//! Zero solver: finds the bore angle that puts the bullet on the line of
//! sight at the rifle's zero distance.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::atmosphere::AirProperties;
use crate::error::{BallisticsError, Result};
use crate::inputs::{AmmoConfig, RifleConfig};
use crate::trajectory_solver::{point_at_distance, IntegratorSettings, TrajectorySolver};

/// Bisection bracket for the bore angle (radians above the sight line)
const ZERO_ANGLE_BRACKET: (f64, f64) = (0.0, 0.2);

/// Zero solver tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroSettings {
    /// Accepted vertical miss at the zero distance (inches)
    pub tolerance_in: f64,
    pub max_iterations: usize,
}

impl Default for ZeroSettings {
    fn default() -> Self {
        Self {
            tolerance_in: 0.001,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroResult {
    /// Bore angle relative to the line of sight (radians)
    pub angle_rad: f64,
    pub iterations: usize,
    /// Remaining vertical miss at the zero distance (inches)
    pub miss_in: f64,
}

impl ZeroResult {
    pub fn angle_moa(&self) -> f64 {
        self.angle_rad.to_degrees() * 60.0
    }
}

/// Bisect the bore angle until the trajectory crosses the sight line at the
/// zero distance.
///
/// The zero is shot level with no wind under `air`. A trajectory that falls
/// short of the zero distance counts as too low. Returns
/// `ZeroSolveFailure` when the iteration budget runs out.
pub fn solve_zero_angle(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    air: AirProperties,
    integrator: IntegratorSettings,
    settings: ZeroSettings,
) -> Result<ZeroResult> {
    let zero_distance = rifle.zero_distance_yd();
    let mut solver = TrajectorySolver::new(ammo, rifle.sight_height_in(), air);
    solver.set_settings(integrator);

    let (mut low_angle, mut high_angle) = ZERO_ANGLE_BRACKET;
    let mut miss_in = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        let mid_angle = 0.5 * (low_angle + high_angle);
        solver.set_launch_angle(mid_angle);
        let points = solver.solve(zero_distance);

        match point_at_distance(&points, zero_distance) {
            Some(point) => {
                miss_in = point.path_in;
                debug!(
                    "zero iteration {}: angle {:.8} rad, miss {:.5} in",
                    iteration, mid_angle, miss_in
                );

                if miss_in.abs() < settings.tolerance_in {
                    return Ok(ZeroResult {
                        angle_rad: mid_angle,
                        iterations: iteration,
                        miss_in,
                    });
                }

                if miss_in > 0.0 {
                    high_angle = mid_angle;
                } else {
                    low_angle = mid_angle;
                }
            }
            None => {
                debug!(
                    "zero iteration {}: angle {:.8} rad falls short of {:.1} yd",
                    iteration, mid_angle, zero_distance
                );
                low_angle = mid_angle;
            }
        }
    }

    Err(BallisticsError::ZeroSolveFailure {
        iterations: settings.max_iterations,
        miss_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::{calculate_atmospheric_conditions, AtmosphericConditions};
    use crate::inputs::TwistRate;
    use crate::DragModel;

    fn rifle(zero: f64) -> RifleConfig {
        RifleConfig::new(1.5, zero, TwistRate::new(10.0).unwrap(), 24.0).unwrap()
    }

    fn ammo() -> AmmoConfig {
        AmmoConfig::new(2600.0, 0.505, DragModel::G1, 175.0).unwrap()
    }

    fn standard_air() -> AirProperties {
        calculate_atmospheric_conditions(&AtmosphericConditions::standard())
    }

    #[test]
    fn test_converges_within_tolerance() {
        let settings = ZeroSettings::default();
        let zero = solve_zero_angle(&rifle(100.0), &ammo(), standard_air(), IntegratorSettings::default(), settings)
            .unwrap();
        assert!(zero.miss_in.abs() < settings.tolerance_in);
        assert!(zero.iterations <= settings.max_iterations);
        // A 100 yd zero with 1.5 in sight height is a few MOA of bore angle
        assert!(zero.angle_moa() > 1.5 && zero.angle_moa() < 6.0, "angle {} MOA", zero.angle_moa());
    }

    #[test]
    fn test_longer_zero_needs_more_angle() {
        let near = solve_zero_angle(&rifle(100.0), &ammo(), standard_air(), IntegratorSettings::default(), ZeroSettings::default())
            .unwrap();
        let far = solve_zero_angle(&rifle(300.0), &ammo(), standard_air(), IntegratorSettings::default(), ZeroSettings::default())
            .unwrap();
        assert!(far.angle_rad > near.angle_rad);
    }

    #[test]
    fn test_exhausted_budget_fails() {
        let settings = ZeroSettings {
            tolerance_in: 1e-9,
            max_iterations: 3,
        };
        let err = solve_zero_angle(&rifle(100.0), &ammo(), standard_air(), IntegratorSettings::default(), settings)
            .unwrap_err();
        match err {
            BallisticsError::ZeroSolveFailure { iterations, miss_in } => {
                assert_eq!(iterations, 3);
                assert!(miss_in.is_finite());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_zero_fails() {
        let slow = AmmoConfig::new(100.0, 0.1, DragModel::G1, 40.0).unwrap();
        let integrator = IntegratorSettings {
            time_step_s: 0.001,
            max_steps: 2_000,
        };
        let settings = ZeroSettings {
            tolerance_in: 0.001,
            max_iterations: 10,
        };
        let err = solve_zero_angle(&rifle(1000.0), &slow, standard_air(), integrator, settings).unwrap_err();
        assert!(matches!(err, BallisticsError::ZeroSolveFailure { iterations: 10, .. }));
    }
}
