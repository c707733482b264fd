//! Wind tables: windage holds over a grid of distances and wind speeds.

use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::atmosphere::AtmosphericConditions;
use crate::error::{BallisticsError, Result};
use crate::inputs::{AmmoConfig, RifleConfig};
use crate::solution::{assemble_solution, zeroed_solver, BallisticSolution};
use crate::trajectory_solver::IntegratorSettings;
use crate::units::{AngularCorrection, DistanceUnit};
use crate::wind::Wind;
use crate::zero::ZeroSettings;

/// One (distance, wind speed) cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindTableEntry {
    pub distance: f64,
    pub unit: DistanceUnit,
    pub wind_speed_mph: f64,
    /// Positive = dial right
    pub windage: AngularCorrection,
    /// Lateral drift (inches, positive right)
    pub drift_in: f64,
}

fn check_unique(name: &str, values: &[f64]) -> Result<()> {
    for (i, a) in values.iter().enumerate() {
        if values[..i].contains(a) {
            return Err(BallisticsError::invalid(format!("duplicate {name} {a} in wind table grid")));
        }
    }
    Ok(())
}

/// Build a wind table for a fixed wind direction.
///
/// Entries are ordered distance-major: every wind speed for the first
/// distance, then every wind speed for the next. The rifle is zeroed once
/// and each wind speed gets its own integration out to the farthest
/// distance; rows run in parallel without affecting the result.
pub fn generate_wind_table(
    rifle: &RifleConfig,
    ammo: &AmmoConfig,
    distances: &[f64],
    unit: DistanceUnit,
    atmosphere: &AtmosphericConditions,
    wind_speeds: &[f64],
    wind_direction_deg: f64,
) -> Result<Vec<WindTableEntry>> {
    for &distance in distances {
        if !(distance.is_finite() && distance > 0.0) {
            return Err(BallisticsError::invalid(format!("distance {distance} must be positive")));
        }
    }
    for &speed in wind_speeds {
        Wind::new(speed, wind_direction_deg).validate()?;
    }
    check_unique("distance", distances)?;
    check_unique("wind speed", wind_speeds)?;

    if distances.is_empty() || wind_speeds.is_empty() {
        return Ok(Vec::new());
    }

    let solver = zeroed_solver(
        rifle,
        ammo,
        atmosphere,
        IntegratorSettings::default(),
        ZeroSettings::default(),
    )?;
    let max_distance_yd = distances.iter().map(|&d| unit.to_yards(d)).fold(0.0, f64::max);

    // rows[s][d]: one integration per wind speed
    let rows: Vec<Vec<BallisticSolution>> = wind_speeds
        .par_iter()
        .map(|&speed| {
            let mut row_solver = solver.clone();
            row_solver.set_wind(Wind::new(speed, wind_direction_deg));
            let points = row_solver.solve(max_distance_yd);
            distances
                .iter()
                .map(|&distance| assemble_solution(&points, distance, unit))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut entries = Vec::with_capacity(distances.len() * wind_speeds.len());
    for (d, &distance) in distances.iter().enumerate() {
        for (s, &speed) in wind_speeds.iter().enumerate() {
            let solution = &rows[s][d];
            trace!(
                "wind table {} {} @ {} mph: {:.2} in, {:.2} MOA",
                distance,
                unit.abbreviation(),
                speed,
                solution.windage_in,
                solution.windage.moa
            );
            entries.push(WindTableEntry {
                distance,
                unit,
                wind_speed_mph: speed,
                windage: solution.windage,
                drift_in: solution.windage_in,
            });
        }
    }

    Ok(entries)
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

    #[test]
    fn test_distance_major_order() {
        let distances = [100.0, 300.0, 500.0];
        let speeds = [5.0, 10.0];
        let table = generate_wind_table(
            &rifle(),
            &ammo(),
            &distances,
            DistanceUnit::Yards,
            &AtmosphericConditions::standard(),
            &speeds,
            90.0,
        )
        .unwrap();

        assert_eq!(table.len(), 6);
        let keys: Vec<(f64, f64)> = table.iter().map(|e| (e.distance, e.wind_speed_mph)).collect();
        assert_eq!(
            keys,
            vec![(100.0, 5.0), (100.0, 10.0), (300.0, 5.0), (300.0, 10.0), (500.0, 5.0), (500.0, 10.0)]
        );
    }

    #[test]
    fn test_drift_scales_with_speed_and_distance() {
        let table = generate_wind_table(
            &rifle(),
            &ammo(),
            &[200.0, 600.0],
            DistanceUnit::Yards,
            &AtmosphericConditions::standard(),
            &[0.0, 10.0, 20.0],
            90.0,
        )
        .unwrap();

        // Calm row has no drift
        assert_eq!(table[0].drift_in, 0.0);
        assert_eq!(table[0].windage.moa, 0.0);
        // Right wind pushes left, correction dials right
        assert!(table[1].drift_in < 0.0 && table[1].windage.moa > 0.0);
        // Doubling the wind roughly doubles the drift
        let ratio = table[2].drift_in / table[1].drift_in;
        assert!((ratio - 2.0).abs() < 0.05, "ratio {ratio}");
        assert!(table[4].drift_in.abs() > table[1].drift_in.abs());
    }

    #[test]
    fn test_rejects_bad_grids() {
        let atmo = AtmosphericConditions::standard();
        let call = |d: &[f64], s: &[f64], dir: f64| {
            generate_wind_table(&rifle(), &ammo(), d, DistanceUnit::Yards, &atmo, s, dir)
        };
        assert!(call(&[100.0, 100.0], &[5.0], 90.0).is_err());
        assert!(call(&[100.0], &[5.0, 5.0], 90.0).is_err());
        assert!(call(&[-100.0], &[5.0], 90.0).is_err());
        assert!(call(&[100.0], &[-5.0], 90.0).is_err());
        assert!(call(&[100.0], &[5.0], 400.0).is_err());
        assert_eq!(call(&[], &[5.0], 90.0).unwrap(), vec![]);
    }
}
