//! Rifle, ammunition and shot inputs.
//!
//! Each record validates its values at construction (and on deserialization),
//! so the solver never sees out-of-range data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BallisticsError, Result};
use crate::units::DistanceUnit;
use crate::wind::Wind;
use crate::DragModel;

/// Highest muzzle velocity accepted from profile forms (fps)
pub const MAX_MUZZLE_VELOCITY_FPS: f64 = 5000.0;

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BallisticsError::invalid(format!("{name} must be positive, got {value}")))
    }
}

/// Barrel twist, one turn in `inches_per_turn` inches ("1:N").
///
/// Informational only: spin drift is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TwistRate {
    inches_per_turn: f64,
}

impl TwistRate {
    pub fn new(inches_per_turn: f64) -> Result<Self> {
        require_positive("twist rate", inches_per_turn)?;
        Ok(Self { inches_per_turn })
    }

    pub fn inches_per_turn(&self) -> f64 {
        self.inches_per_turn
    }
}

impl FromStr for TwistRate {
    type Err = BallisticsError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let turns = trimmed
            .strip_prefix("1:")
            .or_else(|| trimmed.strip_prefix("1 in "))
            .unwrap_or(trimmed)
            .trim()
            .trim_end_matches('"');
        let inches: f64 = turns
            .parse()
            .map_err(|_| BallisticsError::invalid(format!("twist rate '{s}' is not of the form 1:N")))?;
        TwistRate::new(inches)
    }
}

impl TryFrom<String> for TwistRate {
    type Error = BallisticsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TwistRate> for String {
    fn from(t: TwistRate) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TwistRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.inches_per_turn)
    }
}

/// Rifle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRifle")]
pub struct RifleConfig {
    sight_height_in: f64,
    zero_distance_yd: f64,
    twist_rate: TwistRate,
    barrel_length_in: f64,
}

#[derive(Deserialize)]
struct RawRifle {
    sight_height_in: f64,
    zero_distance_yd: f64,
    twist_rate: TwistRate,
    barrel_length_in: f64,
}

impl TryFrom<RawRifle> for RifleConfig {
    type Error = BallisticsError;

    fn try_from(raw: RawRifle) -> Result<Self> {
        RifleConfig::new(raw.sight_height_in, raw.zero_distance_yd, raw.twist_rate, raw.barrel_length_in)
    }
}

impl RifleConfig {
    /// # Arguments
    /// * `sight_height_in` - Bore axis to sight axis (inches, > 0)
    /// * `zero_distance_yd` - Distance the sight line and trajectory cross (yards, > 0)
    /// * `twist_rate` - Barrel twist
    /// * `barrel_length_in` - Barrel length (inches, > 0)
    pub fn new(sight_height_in: f64, zero_distance_yd: f64, twist_rate: TwistRate, barrel_length_in: f64) -> Result<Self> {
        require_positive("sight height", sight_height_in)?;
        require_positive("zero distance", zero_distance_yd)?;
        require_positive("barrel length", barrel_length_in)?;
        Ok(Self {
            sight_height_in,
            zero_distance_yd,
            twist_rate,
            barrel_length_in,
        })
    }

    pub fn sight_height_in(&self) -> f64 {
        self.sight_height_in
    }

    pub fn zero_distance_yd(&self) -> f64 {
        self.zero_distance_yd
    }

    pub fn twist_rate(&self) -> TwistRate {
        self.twist_rate
    }

    pub fn barrel_length_in(&self) -> f64 {
        self.barrel_length_in
    }
}

/// Ammunition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAmmo")]
pub struct AmmoConfig {
    muzzle_velocity_fps: f64,
    ballistic_coefficient: f64,
    drag_model: DragModel,
    bullet_weight_gr: f64,
}

#[derive(Deserialize)]
struct RawAmmo {
    muzzle_velocity_fps: f64,
    ballistic_coefficient: f64,
    drag_model: DragModel,
    bullet_weight_gr: f64,
}

impl TryFrom<RawAmmo> for AmmoConfig {
    type Error = BallisticsError;

    fn try_from(raw: RawAmmo) -> Result<Self> {
        AmmoConfig::new(raw.muzzle_velocity_fps, raw.ballistic_coefficient, raw.drag_model, raw.bullet_weight_gr)
    }
}

impl AmmoConfig {
    /// # Arguments
    /// * `muzzle_velocity_fps` - (0, 5000]
    /// * `ballistic_coefficient` - (0, 1], against `drag_model`
    /// * `drag_model` - G1 or G7
    /// * `bullet_weight_gr` - grains, > 0
    pub fn new(muzzle_velocity_fps: f64, ballistic_coefficient: f64, drag_model: DragModel, bullet_weight_gr: f64) -> Result<Self> {
        require_positive("muzzle velocity", muzzle_velocity_fps)?;
        if muzzle_velocity_fps > MAX_MUZZLE_VELOCITY_FPS {
            return Err(BallisticsError::invalid(format!(
                "muzzle velocity {muzzle_velocity_fps} fps exceeds {MAX_MUZZLE_VELOCITY_FPS} fps"
            )));
        }
        require_positive("ballistic coefficient", ballistic_coefficient)?;
        if ballistic_coefficient > 1.0 {
            return Err(BallisticsError::invalid(format!(
                "ballistic coefficient {ballistic_coefficient} exceeds 1.0"
            )));
        }
        require_positive("bullet weight", bullet_weight_gr)?;
        Ok(Self {
            muzzle_velocity_fps,
            ballistic_coefficient,
            drag_model,
            bullet_weight_gr,
        })
    }

    pub fn muzzle_velocity_fps(&self) -> f64 {
        self.muzzle_velocity_fps
    }

    pub fn ballistic_coefficient(&self) -> f64 {
        self.ballistic_coefficient
    }

    pub fn drag_model(&self) -> DragModel {
        self.drag_model
    }

    pub fn bullet_weight_gr(&self) -> f64 {
        self.bullet_weight_gr
    }
}

/// Parameters of a single shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShot")]
pub struct ShotParameters {
    distance: f64,
    unit: DistanceUnit,
    angle_deg: f64,
    wind_speed_mph: f64,
    wind_direction_deg: f64,
}

#[derive(Deserialize)]
struct RawShot {
    distance: f64,
    #[serde(default)]
    unit: DistanceUnit,
    #[serde(default)]
    angle_deg: f64,
    #[serde(default)]
    wind_speed_mph: f64,
    #[serde(default)]
    wind_direction_deg: f64,
}

impl TryFrom<RawShot> for ShotParameters {
    type Error = BallisticsError;

    fn try_from(raw: RawShot) -> Result<Self> {
        ShotParameters::new(raw.distance, raw.unit, raw.angle_deg, raw.wind_speed_mph, raw.wind_direction_deg)
    }
}

impl ShotParameters {
    /// # Arguments
    /// * `distance` - Target distance in `unit` (> 0)
    /// * `unit` - Yards or meters; results come back in the same unit
    /// * `angle_deg` - Line-of-sight incline, positive uphill, (-90, 90)
    /// * `wind_speed_mph` - >= 0
    /// * `wind_direction_deg` - Clock direction the wind blows from, [0, 360)
    pub fn new(distance: f64, unit: DistanceUnit, angle_deg: f64, wind_speed_mph: f64, wind_direction_deg: f64) -> Result<Self> {
        require_positive("distance", distance)?;
        if !angle_deg.is_finite() || angle_deg.abs() >= 90.0 {
            return Err(BallisticsError::invalid(format!("shot angle {angle_deg}° must be within (-90, 90)")));
        }
        Wind::new(wind_speed_mph, wind_direction_deg).validate()?;
        Ok(Self {
            distance,
            unit,
            angle_deg,
            wind_speed_mph,
            wind_direction_deg,
        })
    }

    /// Level shot with no wind
    pub fn at(distance: f64, unit: DistanceUnit) -> Result<Self> {
        Self::new(distance, unit, 0.0, 0.0, 0.0)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn distance_yd(&self) -> f64 {
        self.unit.to_yards(self.distance)
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn wind_speed_mph(&self) -> f64 {
        self.wind_speed_mph
    }

    pub fn wind_direction_deg(&self) -> f64 {
        self.wind_direction_deg
    }

    pub fn wind(&self) -> Wind {
        Wind::new(self.wind_speed_mph, self.wind_direction_deg)
    }
}
