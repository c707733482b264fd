//! Firing solutions: zero, integrate, then read corrections off the trajectory.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::atmosphere::{calculate_atmospheric_conditions, AtmosphericConditions};
use crate::error::{BallisticsError, Result};
use crate::inputs::{AmmoConfig, RifleConfig, ShotParameters};
use crate::trajectory_solver::{point_at_distance, IntegratorSettings, TrajectoryPoint, TrajectorySolver};
use crate::units::{AngularCorrection, DistanceUnit};
use crate::wind::Wind;
use crate::zero::{solve_zero_angle, ZeroSettings};

/// Corrections and terminal values at one distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticSolution {
    /// Requested distance in `unit`
    pub distance: f64,
    pub unit: DistanceUnit,
    /// Positive = dial up
    pub elevation: AngularCorrection,
    /// Positive = dial right
    pub windage: AngularCorrection,
    pub velocity_fps: f64,
    pub energy_ftlb: f64,
    /// Relative to the line of sight (inches, negative below)
    pub drop_in: f64,
    /// Lateral drift (inches, positive right)
    pub windage_in: f64,
    pub time_of_flight_s: f64,
}

/// Distances for a DOPE card, `start` to `end` inclusive every `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DopeCardRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub unit: DistanceUnit,
}

impl DopeCardRange {
    pub fn new(start: f64, end: f64, step: f64, unit: DistanceUnit) -> Result<Self> {
        if !(start.is_finite() && start > 0.0) {
            return Err(BallisticsError::invalid(format!("DOPE card start {start} must be positive")));
        }
        if !(end.is_finite() && end >= start) {
            return Err(BallisticsError::invalid(format!("DOPE card end {end} must be >= start {start}")));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(BallisticsError::invalid(format!("DOPE card step {step} must be positive")));
        }
        Ok(Self { start, end, step, unit })
    }

    pub fn distances(&self) -> Vec<f64> {
        let count = ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1;
        (0..count).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// Solve a single shot with default integrator and zero settings.
pub fn solve(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    shot: &ShotParameters,
    atmosphere: &AtmosphericConditions,
) -> Result<BallisticSolution> {
    solve_with_settings(
        rifle,
        ammo,
        shot,
        atmosphere,
        IntegratorSettings::default(),
        ZeroSettings::default(),
    )
}

pub fn solve_with_settings(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    shot: &ShotParameters,
    atmosphere: &AtmosphericConditions,
    integrator: IntegratorSettings,
    zero: ZeroSettings,
) -> Result<BallisticSolution> {
    let points = trajectory_for_shot(rifle, ammo, shot, atmosphere, integrator, zero)?;
    assemble_solution(&points, shot.distance(), shot.unit())
}

/// The zeroed trajectory for a shot, integrated out to the shot distance
pub fn compute_trajectory(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    shot: &ShotParameters,
    atmosphere: &AtmosphericConditions,
) -> Result<Vec<TrajectoryPoint>> {
    trajectory_for_shot(
        rifle,
        ammo,
        shot,
        atmosphere,
        IntegratorSettings::default(),
        ZeroSettings::default(),
    )
}

fn trajectory_for_shot(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    shot: &ShotParameters,
    atmosphere: &AtmosphericConditions,
    integrator: IntegratorSettings,
    zero: ZeroSettings,
) -> Result<Vec<TrajectoryPoint>> {
    let mut solver = zeroed_solver(rifle, ammo, atmosphere, integrator, zero)?;
    solver.set_incline(shot.angle_deg().to_radians());
    solver.set_wind(shot.wind());
    Ok(solver.solve(shot.distance_yd()))
}

/// Solver with the bore angle set from a fresh zero solve under `atmosphere`
pub(crate) fn zeroed_solver(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    atmosphere: &AtmosphericConditions,
    integrator: IntegratorSettings,
    zero: ZeroSettings,
) -> Result<TrajectorySolver> {
    let air = calculate_atmospheric_conditions(atmosphere);
    let zero_result = solve_zero_angle(rifle, ammo, air, integrator, zero)?;
    debug!(
        "zeroed at {:.1} yd: {:.4} MOA after {} iterations",
        rifle.zero_distance_yd(),
        zero_result.angle_moa(),
        zero_result.iterations
    );

    let mut solver = TrajectorySolver::new(ammo, rifle.sight_height_in(), air);
    solver.set_settings(integrator);
    solver.set_launch_angle(zero_result.angle_rad);
    Ok(solver)
}

/// Read a solution off a trajectory at `distance` (in `unit`).
///
/// Interpolates between the bracketing samples. A distance past the last
/// sample is `OutOfRangeDistance`.
pub fn assemble_solution(points: &[TrajectoryPoint], distance: f64, unit: DistanceUnit) -> Result<BallisticSolution> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(BallisticsError::invalid(format!("distance {distance} must be positive")));
    }

    let distance_yd = unit.to_yards(distance);
    let point = point_at_distance(points, distance_yd).ok_or_else(|| BallisticsError::OutOfRangeDistance {
        requested: distance,
        max_reached: unit.from_yards(points.last().map_or(0.0, |p| p.distance_yd)),
        unit: unit.abbreviation(),
    })?;

    Ok(BallisticSolution {
        distance,
        unit,
        elevation: AngularCorrection::from_inches(-point.path_in, distance_yd),
        windage: AngularCorrection::from_inches(-point.windage_in, distance_yd),
        velocity_fps: point.velocity_fps,
        energy_ftlb: point.energy_ftlb,
        drop_in: point.path_in,
        windage_in: point.windage_in,
        time_of_flight_s: point.time_s,
    })
}

/// Solutions every `range.step` from `range.start` to `range.end`.
///
/// One zero solve and one integration serve the whole card.
pub fn generate_dope_card(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    atmosphere: &AtmosphericConditions,
    range: &DopeCardRange,
    wind: Wind,
) -> Result<Vec<BallisticSolution>> {
    wind.validate()?;
    let distances = range.distances();

    let mut solver = zeroed_solver(
        rifle,
        ammo,
        atmosphere,
        IntegratorSettings::default(),
        ZeroSettings::default(),
    )?;
    solver.set_wind(wind);
    let points = solver.solve(range.unit.to_yards(range.end));

    distances
        .par_iter()
        .map(|&distance| assemble_solution(&points, distance, range.unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::TwistRate;
    use crate::DragModel;

    fn rifle() -> RifleConfig {
        RifleConfig::new(1.5, 100.0, TwistRate::new(10.0).unwrap(), 24.0).unwrap()
    }

    fn ammo() -> AmmoConfig {
        AmmoConfig::new(2600.0, 0.505, DragModel::G1, 175.0).unwrap()
    }

    fn point(distance_yd: f64, path_in: f64, windage_in: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            distance_yd,
            time_s: distance_yd / 800.0,
            velocity_fps: 2000.0,
            drop_in: path_in - 2.0,
            path_in,
            windage_in,
            energy_ftlb: 1500.0,
        }
    }

    #[test]
    fn test_assemble_signs() {
        let points = [point(0.0, -1.5, 0.0), point(500.0, -20.94, -10.47)];
        let sol = assemble_solution(&points, 500.0, DistanceUnit::Yards).unwrap();
        // Below the sight line dials up, drift left dials right
        assert!((sol.elevation.moa - 4.0).abs() < 1e-9);
        assert!((sol.windage.moa - 2.0).abs() < 1e-9);
        assert!(sol.elevation.mil > 0.0);
        assert_eq!(sol.drop_in, -20.94);
    }

    #[test]
    fn test_assemble_out_of_range() {
        let points = [point(0.0, -1.5, 0.0), point(400.0, -10.0, 0.0)];
        let err = assemble_solution(&points, 500.0, DistanceUnit::Yards).unwrap_err();
        assert_eq!(
            err,
            BallisticsError::OutOfRangeDistance {
                requested: 500.0,
                max_reached: 400.0,
                unit: "yd"
            }
        );
        assert!(matches!(
            assemble_solution(&[], 100.0, DistanceUnit::Meters),
            Err(BallisticsError::OutOfRangeDistance { .. })
        ));
        assert!(matches!(
            assemble_solution(&points, 0.0, DistanceUnit::Yards),
            Err(BallisticsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_solve_at_zero_distance() {
        let shot = ShotParameters::at(100.0, DistanceUnit::Yards).unwrap();
        let sol = solve(&rifle(), &ammo(), &shot, &AtmosphericConditions::standard()).unwrap();
        assert!(sol.drop_in.abs() < 0.001);
        assert!(sol.elevation.moa.abs() < 0.01);
        assert_eq!(sol.windage_in, 0.0);
    }

    #[test]
    fn test_solve_meters_reports_meters() {
        let shot = ShotParameters::at(500.0, DistanceUnit::Meters).unwrap();
        let sol = solve(&rifle(), &ammo(), &shot, &AtmosphericConditions::standard()).unwrap();
        assert_eq!(sol.unit, DistanceUnit::Meters);
        assert_eq!(sol.distance, 500.0);

        let yards = ShotParameters::at(500.0 / 0.9144, DistanceUnit::Yards).unwrap();
        let sol_yd = solve(&rifle(), &ammo(), &yards, &AtmosphericConditions::standard()).unwrap();
        assert!((sol.drop_in - sol_yd.drop_in).abs() < 1e-6);
    }

    #[test]
    fn test_dope_card_distances() {
        let range = DopeCardRange::new(100.0, 500.0, 100.0, DistanceUnit::Yards).unwrap();
        assert_eq!(range.distances(), vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        let odd = DopeCardRange::new(100.0, 550.0, 100.0, DistanceUnit::Yards).unwrap();
        assert_eq!(odd.distances().len(), 5);
        assert!(DopeCardRange::new(100.0, 50.0, 10.0, DistanceUnit::Yards).is_err());
        assert!(DopeCardRange::new(100.0, 500.0, 0.0, DistanceUnit::Yards).is_err());
    }

    #[test]
    fn test_dope_card_matches_solve() {
        let atmo = AtmosphericConditions::standard();
        let range = DopeCardRange::new(100.0, 600.0, 100.0, DistanceUnit::Yards).unwrap();
        let card = generate_dope_card(&rifle(), &ammo(), &atmo, &range, Wind::new(10.0, 90.0)).unwrap();
        assert_eq!(card.len(), 6);
        assert!(card.windows(2).all(|w| w[1].elevation.moa > w[0].elevation.moa));

        let shot = ShotParameters::new(400.0, DistanceUnit::Yards, 0.0, 10.0, 90.0).unwrap();
        let single = solve(&rifle(), &ammo(), &shot, &atmo).unwrap();
        assert!((card[3].drop_in - single.drop_in).abs() < 1e-6);
        assert!((card[3].windage_in - single.windage_in).abs() < 1e-6);
    }
}
