//! Unit conversions at the engine boundary.
//!
//! Linear distances are normalised to yards/feet/inches on the way in and
//! converted back to the caller's unit on the way out. Angular corrections are
//! always derived from inches of displacement at a distance in yards.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ENERGY_DIVISOR_GR_FPS, FEET_PER_YARD, INCHES_PER_MIL_AT_100YD, INCHES_PER_MOA_AT_100YD, MPH_TO_FPS,
    YARDS_TO_METERS,
};

/// Linear distance unit used by callers for shot distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Yards,
    Meters,
}

impl DistanceUnit {
    pub fn to_yards(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Yards => value,
            DistanceUnit::Meters => value / YARDS_TO_METERS,
        }
    }

    pub fn from_yards(self, yards: f64) -> f64 {
        match self {
            DistanceUnit::Yards => yards,
            DistanceUnit::Meters => yards * YARDS_TO_METERS,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DistanceUnit::Yards => "yd",
            DistanceUnit::Meters => "m",
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = crate::BallisticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yd" | "yds" | "yard" | "yards" => Ok(DistanceUnit::Yards),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(DistanceUnit::Meters),
            other => Err(crate::BallisticsError::invalid(format!("unknown distance unit '{other}'"))),
        }
    }
}

/// Angular unit used on scope turrets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngularUnit {
    #[default]
    Mil,
    Moa,
}

impl AngularUnit {
    /// Inches subtended by one unit at 100 yards
    pub fn inches_at_100_yards(self) -> f64 {
        match self {
            AngularUnit::Mil => INCHES_PER_MIL_AT_100YD,
            AngularUnit::Moa => INCHES_PER_MOA_AT_100YD,
        }
    }
}

impl std::str::FromStr for AngularUnit {
    type Err = crate::BallisticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mil" | "mils" | "mrad" => Ok(AngularUnit::Mil),
            "moa" => Ok(AngularUnit::Moa),
            other => Err(crate::BallisticsError::invalid(format!("unknown angular unit '{other}'"))),
        }
    }
}

impl std::fmt::Display for AngularUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AngularUnit::Mil => f.pad("MIL"),
            AngularUnit::Moa => f.pad("MOA"),
        }
    }
}

/// Angular correction carried in both turret units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularCorrection {
    pub mil: f64,
    pub moa: f64,
}

impl AngularCorrection {
    /// Correction for a displacement in inches at a distance in yards
    pub fn from_inches(inches: f64, distance_yards: f64) -> Self {
        Self {
            mil: inches_to_angle(inches, distance_yards, AngularUnit::Mil),
            moa: inches_to_angle(inches, distance_yards, AngularUnit::Moa),
        }
    }

    pub fn in_unit(&self, unit: AngularUnit) -> f64 {
        match unit {
            AngularUnit::Mil => self.mil,
            AngularUnit::Moa => self.moa,
        }
    }
}

/// Convert inches at a distance to an angle.
///
/// `MOA = inches / yards × (100 / 1.047)`, `MIL = inches / yards × (100 / 3.6)`.
/// Zero or negative distances give 0.
pub fn inches_to_angle(inches: f64, distance_yards: f64, unit: AngularUnit) -> f64 {
    if distance_yards <= 0.0 {
        return 0.0;
    }
    inches / distance_yards * (100.0 / unit.inches_at_100_yards())
}

/// Convert an angle to inches subtended at a distance
pub fn angle_to_inches(angle: f64, distance_yards: f64, unit: AngularUnit) -> f64 {
    angle * unit.inches_at_100_yards() * distance_yards / 100.0
}

pub fn yards_to_feet(yards: f64) -> f64 {
    yards * FEET_PER_YARD
}

pub fn feet_to_yards(feet: f64) -> f64 {
    feet / FEET_PER_YARD
}

pub fn mph_to_fps(mph: f64) -> f64 {
    mph * MPH_TO_FPS
}

/// Kinetic energy in ft-lb for a bullet weight in grains at a velocity in fps
pub fn kinetic_energy_ftlb(weight_grains: f64, velocity_fps: f64) -> f64 {
    weight_grains * velocity_fps * velocity_fps / ENERGY_DIVISOR_GR_FPS
}
