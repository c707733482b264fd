//! Shooter profiles stored as JSON.
//!
//! ```json
//! {
//!   "name": "308 match",
//!   "rifle": { "sight_height_in": 1.5, "zero_distance_yd": 100, "twist_rate": "1:10", "barrel_length_in": 24 },
//!   "ammo": { "muzzle_velocity_fps": 2600, "ballistic_coefficient": 0.505, "drag_model": "G1", "bullet_weight_gr": 175 },
//!   "atmosphere": { "temperature_f": 59, "pressure_inhg": 29.92 }
//! }
//! ```
//!
//! Every record is validated on load; `atmosphere` is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::atmosphere::AtmosphericConditions;
use crate::error::Result;
use crate::inputs::{AmmoConfig, RifleConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rifle: RifleConfig,
    pub ammo: AmmoConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<AtmosphericConditions>,
}

impl ShooterProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Profile atmosphere, or the standard atmosphere when none is stored
    pub fn atmosphere_or_standard(&self) -> AtmosphericConditions {
        self.atmosphere.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BallisticsError;
    use crate::DragModel;
    use tempfile::TempDir;

    const PROFILE: &str = r#"{
        "name": "308 match",
        "rifle": { "sight_height_in": 1.5, "zero_distance_yd": 100, "twist_rate": "1:10", "barrel_length_in": 24 },
        "ammo": { "muzzle_velocity_fps": 2600, "ballistic_coefficient": 0.505, "drag_model": "G1", "bullet_weight_gr": 175 }
    }"#;

    #[test]
    fn test_parse_profile() {
        let profile = ShooterProfile::from_json(PROFILE).unwrap();
        assert_eq!(profile.name.as_deref(), Some("308 match"));
        assert_eq!(profile.rifle.zero_distance_yd(), 100.0);
        assert_eq!(profile.rifle.twist_rate().inches_per_turn(), 10.0);
        assert_eq!(profile.ammo.drag_model(), DragModel::G1);
        assert_eq!(profile.atmosphere_or_standard(), AtmosphericConditions::standard());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad = PROFILE.replace("2600", "6200");
        assert!(matches!(
            ShooterProfile::from_json(&bad),
            Err(BallisticsError::Profile(msg)) if msg.contains("muzzle velocity")
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.json");
        let profile = ShooterProfile::from_json(PROFILE).unwrap();
        fs::write(&path, profile.to_json().unwrap()).unwrap();
        let loaded = ShooterProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, PROFILE.replace("0.505", "1.4")).unwrap();
        assert!(matches!(
            ShooterProfile::load(&path),
            Err(BallisticsError::Profile(msg)) if msg.contains("ballistic coefficient")
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ShooterProfile::load("/nonexistent/dope-profile.json"),
            Err(BallisticsError::Profile(_))
        ));
    }
}
