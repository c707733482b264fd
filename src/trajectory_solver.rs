//! Point-mass trajectory integration.
//!
//! The state is integrated with classic 4th-order Runge-Kutta in the
//! line-of-sight frame: x runs from the scope toward the target along the
//! sight line, y is perpendicular to it in the vertical plane (up), z points
//! to the shooter's right. The muzzle sits `sight_height` below the origin.

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::atmosphere::AirProperties;
use crate::constants::{G_ACCEL_FPS2, INCHES_PER_FOOT, MIN_VELOCITY_THRESHOLD};
use crate::drag::drag_deceleration;
use crate::inputs::AmmoConfig;
use crate::units::{feet_to_yards, kinetic_energy_ftlb, yards_to_feet};
use crate::wind::Wind;
use crate::DragModel;

/// Integrator tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    /// Fixed RK4 step (s)
    pub time_step_s: f64,
    /// Hard cap on steps per integration
    pub max_steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            time_step_s: 0.001,
            max_steps: 60_000,
        }
    }
}

/// One integrator sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Distance along the line of sight (yards)
    pub distance_yd: f64,
    pub time_s: f64,
    pub velocity_fps: f64,
    /// Vertical offset from the line of departure (inches, negative below)
    pub drop_in: f64,
    /// Vertical offset from the line of sight (inches, negative below)
    pub path_in: f64,
    /// Lateral offset (inches, positive right)
    pub windage_in: f64,
    pub energy_ftlb: f64,
}

impl TrajectoryPoint {
    /// Componentwise linear blend, `t` in [0, 1]
    pub fn lerp(&self, other: &TrajectoryPoint, t: f64) -> TrajectoryPoint {
        let mix = |a: f64, b: f64| a + t * (b - a);
        TrajectoryPoint {
            distance_yd: mix(self.distance_yd, other.distance_yd),
            time_s: mix(self.time_s, other.time_s),
            velocity_fps: mix(self.velocity_fps, other.velocity_fps),
            drop_in: mix(self.drop_in, other.drop_in),
            path_in: mix(self.path_in, other.path_in),
            windage_in: mix(self.windage_in, other.windage_in),
            energy_ftlb: mix(self.energy_ftlb, other.energy_ftlb),
        }
    }
}

/// Interpolated sample at `distance_yd`.
///
/// Returns `None` for an empty trajectory or a distance past the last sample.
/// Distances before the first sample return the first sample.
pub fn point_at_distance(points: &[TrajectoryPoint], distance_yd: f64) -> Option<TrajectoryPoint> {
    let first = points.first()?;
    let last = points.last()?;

    if distance_yd > last.distance_yd || distance_yd.is_nan() {
        return None;
    }
    if distance_yd <= first.distance_yd {
        return Some(*first);
    }

    let idx = points.partition_point(|p| p.distance_yd < distance_yd);
    let hi = &points[idx];
    let lo = &points[idx - 1];
    let span = hi.distance_yd - lo.distance_yd;
    if span <= 0.0 {
        return Some(*hi);
    }
    Some(lo.lerp(hi, (distance_yd - lo.distance_yd) / span))
}

/// Why an integration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    ReachedDistance,
    Stalled,
    StepLimit,
}

/// RK4 trajectory integrator for one rifle/ammo/air combination
#[derive(Debug, Clone)]
pub struct TrajectorySolver {
    muzzle_velocity_fps: f64,
    ballistic_coefficient: f64,
    drag_model: DragModel,
    bullet_weight_gr: f64,
    sight_height_ft: f64,
    launch_angle_rad: f64,
    incline_rad: f64,
    wind: Wind,
    air: AirProperties,
    settings: IntegratorSettings,
}

impl TrajectorySolver {
    pub fn new(ammo: &AmmoConfig, sight_height_in: f64, air: AirProperties) -> Self {
        Self {
            muzzle_velocity_fps: ammo.muzzle_velocity_fps(),
            ballistic_coefficient: ammo.ballistic_coefficient(),
            drag_model: ammo.drag_model(),
            bullet_weight_gr: ammo.bullet_weight_gr(),
            sight_height_ft: sight_height_in / INCHES_PER_FOOT,
            launch_angle_rad: 0.0,
            incline_rad: 0.0,
            wind: Wind::calm(),
            air,
            settings: IntegratorSettings::default(),
        }
    }

    /// Bore angle relative to the line of sight (radians)
    pub fn set_launch_angle(&mut self, angle_rad: f64) {
        self.launch_angle_rad = angle_rad;
    }

    /// Line-of-sight incline (radians, positive uphill)
    pub fn set_incline(&mut self, incline_rad: f64) {
        self.incline_rad = incline_rad;
    }

    pub fn set_wind(&mut self, wind: Wind) {
        self.wind = wind;
    }

    pub fn set_settings(&mut self, settings: IntegratorSettings) {
        self.settings = settings;
    }

    /// Integrate from the muzzle until `max_distance_yd` is reached.
    ///
    /// Every step is recorded, starting with the muzzle sample, so distances
    /// are strictly increasing. Each call builds a fresh sequence.
    pub fn solve(&self, max_distance_yd: f64) -> Vec<TrajectoryPoint> {
        self.solve_with_termination(max_distance_yd).0
    }

    pub fn solve_with_termination(&self, max_distance_yd: f64) -> (Vec<TrajectoryPoint>, Termination) {
        let dt = self.settings.time_step_s;
        let max_x = yards_to_feet(max_distance_yd);
        let tan_launch = self.launch_angle_rad.tan();

        let gravity = Vector3::new(
            -G_ACCEL_FPS2 * self.incline_rad.sin(),
            -G_ACCEL_FPS2 * self.incline_rad.cos(),
            0.0,
        );
        let air_velocity = self.wind.air_velocity_fps(self.incline_rad);

        let mut time = 0.0;
        let mut position = Vector3::new(0.0, -self.sight_height_ft, 0.0);
        let mut velocity = Vector3::new(
            self.muzzle_velocity_fps * self.launch_angle_rad.cos(),
            self.muzzle_velocity_fps * self.launch_angle_rad.sin(),
            0.0,
        );

        let mut points = Vec::with_capacity(self.estimated_steps(max_x));
        points.push(self.sample(time, &position, &velocity, tan_launch));

        let mut steps = 0;
        let termination = loop {
            if position.x >= max_x {
                break Termination::ReachedDistance;
            }
            if velocity.x <= MIN_VELOCITY_THRESHOLD {
                break Termination::Stalled;
            }
            if steps >= self.settings.max_steps {
                break Termination::StepLimit;
            }

            // k1
            let acc1 = self.calculate_acceleration(&velocity, &gravity, &air_velocity);

            // k2
            let vel2 = velocity + acc1 * (dt * 0.5);
            let acc2 = self.calculate_acceleration(&vel2, &gravity, &air_velocity);

            // k3
            let vel3 = velocity + acc2 * (dt * 0.5);
            let acc3 = self.calculate_acceleration(&vel3, &gravity, &air_velocity);

            // k4
            let vel4 = velocity + acc3 * dt;
            let acc4 = self.calculate_acceleration(&vel4, &gravity, &air_velocity);

            position += (velocity + vel2 * 2.0 + vel3 * 2.0 + vel4) * (dt / 6.0);
            velocity += (acc1 + acc2 * 2.0 + acc3 * 2.0 + acc4) * (dt / 6.0);
            time += dt;
            steps += 1;

            points.push(self.sample(time, &position, &velocity, tan_launch));
        };

        match termination {
            Termination::StepLimit => warn!(
                "integration hit the {}-step cap at {:.1} yd (target {:.1} yd)",
                self.settings.max_steps,
                feet_to_yards(position.x),
                max_distance_yd
            ),
            _ => debug!(
                "integration stopped ({:?}) after {} steps at {:.1} yd, {:.1} fps",
                termination,
                steps,
                feet_to_yards(position.x),
                velocity.norm()
            ),
        }

        (points, termination)
    }

    fn estimated_steps(&self, max_x: f64) -> usize {
        let steps = max_x / (self.muzzle_velocity_fps * self.settings.time_step_s).max(MIN_VELOCITY_THRESHOLD);
        (steps * 1.5).min(self.settings.max_steps as f64) as usize + 2
    }

    fn sample(&self, time: f64, position: &Vector3<f64>, velocity: &Vector3<f64>, tan_launch: f64) -> TrajectoryPoint {
        let speed = velocity.norm();
        let departure_y = -self.sight_height_ft + position.x * tan_launch;
        TrajectoryPoint {
            distance_yd: feet_to_yards(position.x),
            time_s: time,
            velocity_fps: speed,
            drop_in: (position.y - departure_y) * INCHES_PER_FOOT,
            path_in: position.y * INCHES_PER_FOOT,
            windage_in: position.z * INCHES_PER_FOOT,
            energy_ftlb: kinetic_energy_ftlb(self.bullet_weight_gr, speed),
        }
    }

    /// Gravity plus drag on the air-relative velocity.
    ///
    /// Mach is taken from the air-relative speed, so range wind changes drag
    /// while crosswind produces drift.
    fn calculate_acceleration(
        &self,
        velocity: &Vector3<f64>,
        gravity: &Vector3<f64>,
        air_velocity: &Vector3<f64>,
    ) -> Vector3<f64> {
        let relative_velocity = velocity - air_velocity;
        let speed = relative_velocity.norm();

        if speed < MIN_VELOCITY_THRESHOLD {
            return *gravity;
        }

        let mach = if self.air.speed_of_sound_fps > 0.0 {
            speed / self.air.speed_of_sound_fps
        } else {
            0.0
        };
        let deceleration = drag_deceleration(
            speed,
            mach,
            self.air.density_ratio,
            self.ballistic_coefficient,
            self.drag_model,
        );

        gravity - relative_velocity * (deceleration / speed)
    }
}
