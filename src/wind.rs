use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::MPH_TO_FPS;
use crate::error::{BallisticsError, Result};

/// Uniform wind over the whole flight path.
///
/// `direction_deg` is the clock direction the wind blows FROM, measured
/// clockwise from the line of fire: 0° is a headwind, 90° comes from the
/// shooter's right (3 o'clock) and pushes the bullet left, 180° is a tailwind.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mph: f64,
    pub direction_deg: f64,
}

impl Wind {
    pub fn new(speed_mph: f64, direction_deg: f64) -> Self {
        Self { speed_mph, direction_deg }
    }

    pub fn calm() -> Self {
        Self::default()
    }

    /// Speed must be >= 0 and direction within [0, 360)
    pub fn validate(&self) -> Result<()> {
        if !self.speed_mph.is_finite() || self.speed_mph < 0.0 {
            return Err(BallisticsError::invalid(format!("wind speed {} mph must be >= 0", self.speed_mph)));
        }
        if !self.direction_deg.is_finite() || !(0.0..360.0).contains(&self.direction_deg) {
            return Err(BallisticsError::invalid(format!(
                "wind direction {}° must be within [0, 360)",
                self.direction_deg
            )));
        }
        Ok(())
    }

    pub fn is_calm(&self) -> bool {
        self.speed_mph == 0.0
    }

    /// Component blowing against the shooter (mph). Negative is a tailwind.
    pub fn headwind_mph(&self) -> f64 {
        self.speed_mph * self.direction_deg.to_radians().cos()
    }

    /// Component blowing from right to left (mph). Negative blows left to right.
    pub fn crosswind_mph(&self) -> f64 {
        self.speed_mph * self.direction_deg.to_radians().sin()
    }

    /// Clock position the wind comes from, 1 through 12
    pub fn clock_position(&self) -> u8 {
        let hours = (self.direction_deg.rem_euclid(360.0) / 30.0).round() as u8 % 12;
        if hours == 0 {
            12
        } else {
            hours
        }
    }

    /// Air velocity (fps) in the line-of-sight frame.
    ///
    /// x runs along the sight line, y is perpendicular to it in the vertical
    /// plane, z points right. The horizontal wind component along the line of
    /// fire is tilted into x/y by the incline angle.
    pub fn air_velocity_fps(&self, incline_rad: f64) -> Vector3<f64> {
        if self.is_calm() {
            return Vector3::zeros();
        }

        let speed_fps = self.speed_mph * MPH_TO_FPS;
        let angle_rad = self.direction_deg.to_radians();

        // Wind vector points where the air is going, opposite to where it comes from
        let along = -speed_fps * angle_rad.cos();
        let cross = -speed_fps * angle_rad.sin();

        Vector3::new(along * incline_rad.cos(), -along * incline_rad.sin(), cross)
    }
}
