//! Subsonic and transonic analysis of a computed trajectory.
//!
//! [`analyze_subsonic_transition`] works on integrator output. The
//! `will_remain_supersonic` family below it are single-call approximations
//! for when no trajectory is at hand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::atmosphere::calculate_speed_of_sound;
use crate::trajectory_solver::{point_at_distance, TrajectoryPoint};

/// Mach at or above which flight is supersonic
pub const SUPERSONIC_MACH: f64 = 1.2;
/// Mach at or below which flight is subsonic
pub const SUBSONIC_MACH: f64 = 0.8;
/// Speed of sound
pub const SONIC_MACH: f64 = 1.0;

/// Crossing earlier than this fraction of the target distance is flagged as severe
const EARLY_TRANSITION_FRACTION: f64 = 0.7;

/// Decay constant numerator for the exponential velocity approximation (per yard)
const DECAY_K_NUMERATOR: f64 = 0.0002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightRegime {
    Supersonic,
    Transonic,
    Subsonic,
}

impl fmt::Display for FlightRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightRegime::Supersonic => f.pad("supersonic"),
            FlightRegime::Transonic => f.pad("transonic"),
            FlightRegime::Subsonic => f.pad("subsonic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsonicTransitionResult {
    /// Mach 1.0 is crossed at or before the target
    pub goes_subsonic: bool,
    /// First Mach 1.0 crossing (yards)
    pub transonic_distance_yd: Option<f64>,
    /// First Mach 0.8 crossing (yards)
    pub subsonic_distance_yd: Option<f64>,
    /// First Mach 1.2 crossing (yards)
    pub max_supersonic_distance_yd: Option<f64>,
    pub flight_regime: FlightRegime,
    pub mach_at_target: f64,
    pub velocity_at_target_fps: f64,
    pub speed_of_sound_fps: f64,
    pub warning: Option<String>,
    /// Mach 1.0 distance, extrapolated past the samples when not crossed
    pub estimated_supersonic_range_yd: Option<f64>,
}

/// Mach number, 0 when the speed of sound is not positive
pub fn calculate_mach(velocity_fps: f64, speed_of_sound_fps: f64) -> f64 {
    if speed_of_sound_fps <= 0.0 {
        return 0.0;
    }
    velocity_fps / speed_of_sound_fps
}

pub fn get_flight_regime(mach: f64) -> FlightRegime {
    if mach >= SUPERSONIC_MACH {
        FlightRegime::Supersonic
    } else if mach <= SUBSONIC_MACH {
        FlightRegime::Subsonic
    } else {
        FlightRegime::Transonic
    }
}

/// First downward crossing of `threshold`, interpolated between samples
fn find_crossing(distances: &[f64], machs: &[f64], threshold: f64) -> Option<f64> {
    distances
        .windows(2)
        .zip(machs.windows(2))
        .find(|(_, m)| m[0] >= threshold && m[1] < threshold)
        .map(|(d, m)| d[0] + (m[0] - threshold) / (m[0] - m[1]) * (d[1] - d[0]))
}

/// Fit `v = v0 × e^(−k·d)` through the first and last samples and solve for Mach 1.0
fn extrapolate_sonic_distance(points: &[TrajectoryPoint], speed_of_sound_fps: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    let span = last.distance_yd - first.distance_yd;

    if span <= 0.0 || last.velocity_fps <= 0.0 || first.velocity_fps <= speed_of_sound_fps {
        return None;
    }
    let k = (first.velocity_fps / last.velocity_fps).ln() / span;
    if k <= 0.0 {
        return None;
    }
    Some(first.distance_yd + (first.velocity_fps / speed_of_sound_fps).ln() / k)
}

/// Classify a trajectory against the sound barrier.
///
/// `temperature_f` sets the speed of sound. An empty trajectory yields a
/// zero-velocity subsonic result with no crossings and no warning.
pub fn analyze_subsonic_transition(
    trajectory: &[TrajectoryPoint],
    temperature_f: f64,
    target_distance_yd: f64,
) -> SubsonicTransitionResult {
    let speed_of_sound = calculate_speed_of_sound(temperature_f);

    let Some(last) = trajectory.last() else {
        return SubsonicTransitionResult {
            goes_subsonic: false,
            transonic_distance_yd: None,
            subsonic_distance_yd: None,
            max_supersonic_distance_yd: None,
            flight_regime: FlightRegime::Subsonic,
            mach_at_target: 0.0,
            velocity_at_target_fps: 0.0,
            speed_of_sound_fps: speed_of_sound,
            warning: None,
            estimated_supersonic_range_yd: None,
        };
    };

    let distances: Vec<f64> = trajectory.iter().map(|p| p.distance_yd).collect();
    let machs: Vec<f64> = trajectory
        .iter()
        .map(|p| calculate_mach(p.velocity_fps, speed_of_sound))
        .collect();

    let max_supersonic = find_crossing(&distances, &machs, SUPERSONIC_MACH);
    let transonic = find_crossing(&distances, &machs, SONIC_MACH);
    let subsonic = find_crossing(&distances, &machs, SUBSONIC_MACH);

    let velocity_at_target = point_at_distance(trajectory, target_distance_yd)
        .unwrap_or(*last)
        .velocity_fps;
    let mach_at_target = calculate_mach(velocity_at_target, speed_of_sound);
    let flight_regime = get_flight_regime(mach_at_target);

    let goes_subsonic = transonic.map_or(false, |d| d <= target_distance_yd);

    let warning = match transonic {
        Some(d) if d < EARLY_TRANSITION_FRACTION * target_distance_yd => Some(format!(
            "Bullet goes subsonic at {:.0} yd, well before the {:.0} yd target; expect unstable flight and poor accuracy",
            d, target_distance_yd
        )),
        Some(d) if d <= target_distance_yd => Some(format!(
            "Bullet goes subsonic at {:.0} yd before the {:.0} yd target; consider a higher-velocity load",
            d, target_distance_yd
        )),
        _ if flight_regime == FlightRegime::Transonic => Some(format!(
            "Bullet is transonic (Mach {:.2}) at the target; stability may suffer",
            mach_at_target
        )),
        _ => None,
    };

    let estimated_supersonic_range_yd = transonic.or_else(|| extrapolate_sonic_distance(trajectory, speed_of_sound));

    SubsonicTransitionResult {
        goes_subsonic,
        transonic_distance_yd: transonic,
        subsonic_distance_yd: subsonic,
        max_supersonic_distance_yd: max_supersonic,
        flight_regime,
        mach_at_target,
        velocity_at_target_fps: velocity_at_target,
        speed_of_sound_fps: speed_of_sound,
        warning,
        estimated_supersonic_range_yd,
    }
}

// Exponential-decay approximations.
//
// v(d) ≈ v0 × e^(−k·d), k = 0.0002 / BC, d in yards. The constant is a rule
// of thumb that does not come from the drag tables; results can differ from
// the integrator by a wide margin, so they are estimates only.

fn decay_constant(ballistic_coefficient: f64) -> f64 {
    DECAY_K_NUMERATOR / ballistic_coefficient
}

/// Approximate velocity (fps) at `distance_yd`
pub fn estimate_velocity(muzzle_velocity_fps: f64, ballistic_coefficient: f64, distance_yd: f64) -> f64 {
    muzzle_velocity_fps * (-decay_constant(ballistic_coefficient) * distance_yd).exp()
}

/// Approximate check that the bullet is still above Mach 1.0 at `distance_yd`
pub fn will_remain_supersonic(
    muzzle_velocity_fps: f64,
    ballistic_coefficient: f64,
    distance_yd: f64,
    temperature_f: f64,
) -> bool {
    let velocity = estimate_velocity(muzzle_velocity_fps, ballistic_coefficient, distance_yd);
    calculate_mach(velocity, calculate_speed_of_sound(temperature_f)) > SONIC_MACH
}

/// Approximate distance (yards) at which velocity decays to the speed of sound.
///
/// `None` when the muzzle velocity is not supersonic.
pub fn estimate_max_supersonic_range(
    muzzle_velocity_fps: f64,
    ballistic_coefficient: f64,
    temperature_f: f64,
) -> Option<f64> {
    let speed_of_sound = calculate_speed_of_sound(temperature_f);
    if speed_of_sound <= 0.0 || muzzle_velocity_fps <= speed_of_sound {
        return None;
    }
    Some((muzzle_velocity_fps / speed_of_sound).ln() / decay_constant(ballistic_coefficient))
}

/// Velocity above the speed of sound (fps); negative when subsonic
pub fn get_supersonic_margin(velocity_fps: f64, temperature_f: f64) -> f64 {
    velocity_fps - calculate_speed_of_sound(temperature_f)
}

/// Mach above 1.0; negative when subsonic
pub fn get_mach_margin(velocity_fps: f64, temperature_f: f64) -> f64 {
    calculate_mach(velocity_fps, calculate_speed_of_sound(temperature_f)) - SONIC_MACH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(distance_yd: f64, velocity_fps: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            distance_yd,
            time_s: 0.0,
            velocity_fps,
            drop_in: 0.0,
            path_in: 0.0,
            windage_in: 0.0,
            energy_ftlb: 0.0,
        }
    }

    /// .308 175 gr: linear decay to 1120 fps at 1600 yd, then 1020 fps at 1700 yd
    fn worked_example() -> Vec<TrajectoryPoint> {
        let mut points: Vec<TrajectoryPoint> = (0..=16)
            .map(|i| point(i as f64 * 100.0, 2600.0 - i as f64 * 92.5))
            .collect();
        points.push(point(1700.0, 1020.0));
        points
    }

    #[test]
    fn test_flight_regime_thresholds() {
        assert_eq!(get_flight_regime(1.2), FlightRegime::Supersonic);
        assert_eq!(get_flight_regime(1.19), FlightRegime::Transonic);
        assert_eq!(get_flight_regime(0.8), FlightRegime::Subsonic);
        assert_eq!(get_flight_regime(0.81), FlightRegime::Transonic);
        assert_eq!(FlightRegime::Transonic.to_string(), "transonic");
    }

    #[test]
    fn test_mach_guards_zero_speed_of_sound() {
        assert_eq!(calculate_mach(1000.0, 0.0), 0.0);
        assert!((calculate_mach(1116.45, 1116.45) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worked_example_short_target() {
        let result = analyze_subsonic_transition(&worked_example(), 59.0, 1000.0);
        assert!(!result.goes_subsonic);
        assert_eq!(result.flight_regime, FlightRegime::Supersonic);
        assert!(result.warning.is_none());
        assert!((result.velocity_at_target_fps - 1675.0).abs() < 1e-9);
    }

    #[test]
    fn test_worked_example_long_target() {
        let result = analyze_subsonic_transition(&worked_example(), 59.0, 1700.0);
        assert!(result.goes_subsonic);
        let transonic = result.transonic_distance_yd.unwrap();
        assert!(transonic > 1500.0 && transonic < 1700.0, "crossing at {transonic}");
        assert_eq!(result.flight_regime, FlightRegime::Transonic);
        assert!(result.warning.as_deref().unwrap().contains("higher-velocity"));
        // Mach 1.2 is crossed earlier, Mach 0.8 never
        assert!(result.max_supersonic_distance_yd.unwrap() < transonic);
        assert!(result.subsonic_distance_yd.is_none());
        assert_eq!(result.estimated_supersonic_range_yd, Some(transonic));
    }

    #[test]
    fn test_early_transition_warning() {
        let result = analyze_subsonic_transition(&worked_example(), 59.0, 2500.0);
        assert!(result.goes_subsonic);
        assert!(result.warning.as_deref().unwrap().contains("well before"));
        // Target past the last sample reads the last sample
        assert_eq!(result.velocity_at_target_fps, 1020.0);
    }

    #[test]
    fn test_transonic_without_crossing() {
        let points = vec![point(0.0, 1500.0), point(500.0, 1200.0)];
        let result = analyze_subsonic_transition(&points, 59.0, 500.0);
        assert!(!result.goes_subsonic);
        assert_eq!(result.flight_regime, FlightRegime::Transonic);
        assert!(result.warning.as_deref().unwrap().contains("transonic"));
        assert!(result.transonic_distance_yd.is_none());
        // Extrapolated past the samples
        assert!(result.estimated_supersonic_range_yd.unwrap() > 500.0);
    }

    #[test]
    fn test_empty_trajectory() {
        let result = analyze_subsonic_transition(&[], 59.0, 500.0);
        assert!(!result.goes_subsonic);
        assert_eq!(result.velocity_at_target_fps, 0.0);
        assert!(result.warning.is_none());
        assert!(result.transonic_distance_yd.is_none());
        assert!(result.subsonic_distance_yd.is_none());
        assert!(result.max_supersonic_distance_yd.is_none());
        assert!(result.estimated_supersonic_range_yd.is_none());
    }

    #[test]
    fn test_fast_approximations() {
        // 2600 fps, BC 0.5: k = 0.0004/yd, Mach 1 near ln(2600/1116.45)/0.0004 ≈ 2113 yd
        let range = estimate_max_supersonic_range(2600.0, 0.5, 59.0).unwrap();
        assert!((range - 2113.0).abs() < 5.0, "range {range}");
        assert!(will_remain_supersonic(2600.0, 0.5, 1000.0, 59.0));
        assert!(!will_remain_supersonic(2600.0, 0.5, 2500.0, 59.0));
        assert!(estimate_max_supersonic_range(1000.0, 0.5, 59.0).is_none());

        assert!((get_supersonic_margin(1216.45, 59.0) - 100.0).abs() < 0.1);
        assert!(get_supersonic_margin(1000.0, 59.0) < 0.0);
        assert!(get_mach_margin(1116.45, 59.0).abs() < 1e-4);
        assert!(get_mach_margin(2232.9, 59.0) > 0.99);
    }
}
