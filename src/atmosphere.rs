//! Atmospheric calculations for ballistics.
//!
//! Converts raw field readings (°F, inHg, % humidity, feet of altitude) into
//! the quantities the integrator needs: speed of sound, air density relative
//! to the standard atmosphere, and pressure/density altitude for display.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FEET_PER_DEGREE_F, FEET_PER_INHG, ISA_LAPSE_F_PER_FT, RANKINE_OFFSET, SPEED_OF_SOUND_COEFF,
    STANDARD_PRESSURE_INHG, STANDARD_TEMPERATURE_F,
};
use crate::error::{BallisticsError, Result};

const R_DRY: f64 = 287.058; // Gas constant for dry air (J/(kg·K))
const R_VAPOR: f64 = 461.495; // Gas constant for water vapor (J/(kg·K))
const PA_PER_INHG: f64 = 3386.389;

pub const TEMPERATURE_RANGE_F: (f64, f64) = (-50.0, 150.0);
pub const PRESSURE_RANGE_INHG: (f64, f64) = (20.0, 35.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);
pub const ALTITUDE_RANGE_FT: (f64, f64) = (-1000.0, 30000.0);

/// Raw atmospheric readings at the firing point.
///
/// Construction validates every reading; the derived quantities are computed
/// on demand rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAtmosphere")]
pub struct AtmosphericConditions {
    temperature_f: f64,
    pressure_inhg: f64,
    humidity_pct: f64,
    altitude_ft: f64,
}

#[derive(Deserialize)]
struct RawAtmosphere {
    temperature_f: f64,
    pressure_inhg: f64,
    #[serde(default)]
    humidity_pct: f64,
    #[serde(default)]
    altitude_ft: f64,
}

impl TryFrom<RawAtmosphere> for AtmosphericConditions {
    type Error = BallisticsError;

    fn try_from(raw: RawAtmosphere) -> Result<Self> {
        AtmosphericConditions::new(raw.temperature_f, raw.pressure_inhg, raw.humidity_pct, raw.altitude_ft)
    }
}

fn check_range(name: &str, value: f64, (lo, hi): (f64, f64), unit: &str) -> Result<()> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(BallisticsError::invalid(format!(
            "{name} {value} {unit} outside [{lo}, {hi}]"
        )))
    }
}

impl AtmosphericConditions {
    /// Validate and build atmospheric conditions.
    ///
    /// # Arguments
    /// * `temperature_f` - Air temperature in °F, [-50, 150]
    /// * `pressure_inhg` - Barometric pressure in inHg, [20, 35]
    /// * `humidity_pct` - Relative humidity in percent, [0, 100]
    /// * `altitude_ft` - Altitude in feet, [-1000, 30000]
    pub fn new(temperature_f: f64, pressure_inhg: f64, humidity_pct: f64, altitude_ft: f64) -> Result<Self> {
        check_range("temperature", temperature_f, TEMPERATURE_RANGE_F, "°F")?;
        check_range("pressure", pressure_inhg, PRESSURE_RANGE_INHG, "inHg")?;
        check_range("humidity", humidity_pct, HUMIDITY_RANGE_PCT, "%")?;
        check_range("altitude", altitude_ft, ALTITUDE_RANGE_FT, "ft")?;
        Ok(Self {
            temperature_f,
            pressure_inhg,
            humidity_pct,
            altitude_ft,
        })
    }

    /// ICAO standard atmosphere at sea level: 59°F, 29.92 inHg, dry air
    pub fn standard() -> Self {
        Self {
            temperature_f: STANDARD_TEMPERATURE_F,
            pressure_inhg: STANDARD_PRESSURE_INHG,
            humidity_pct: 0.0,
            altitude_ft: 0.0,
        }
    }

    pub fn temperature_f(&self) -> f64 {
        self.temperature_f
    }

    pub fn pressure_inhg(&self) -> f64 {
        self.pressure_inhg
    }

    pub fn humidity_pct(&self) -> f64 {
        self.humidity_pct
    }

    pub fn altitude_ft(&self) -> f64 {
        self.altitude_ft
    }

    pub fn speed_of_sound_fps(&self) -> f64 {
        calculate_speed_of_sound(self.temperature_f)
    }

    pub fn density_ratio(&self) -> f64 {
        air_density_ratio(self.temperature_f, self.pressure_inhg, self.humidity_pct)
    }

    pub fn pressure_altitude_ft(&self) -> f64 {
        pressure_altitude(self.altitude_ft, self.pressure_inhg)
    }

    pub fn density_altitude_ft(&self) -> f64 {
        density_altitude(self.altitude_ft, self.pressure_inhg, self.temperature_f)
    }
}

impl Default for AtmosphericConditions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derived air properties consumed by the integrator and shown to the shooter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    pub temperature_f: f64,
    pub speed_of_sound_fps: f64,
    pub density_ratio: f64,
    pub pressure_altitude_ft: f64,
    pub density_altitude_ft: f64,
}

impl AirProperties {
    /// Density altitude rounded to the nearest foot for display
    pub fn density_altitude_display_ft(&self) -> i64 {
        self.density_altitude_ft.round() as i64
    }
}

/// Compute every derived atmospheric quantity from validated readings.
pub fn calculate_atmospheric_conditions(conditions: &AtmosphericConditions) -> AirProperties {
    AirProperties {
        temperature_f: conditions.temperature_f,
        speed_of_sound_fps: conditions.speed_of_sound_fps(),
        density_ratio: conditions.density_ratio(),
        pressure_altitude_ft: conditions.pressure_altitude_ft(),
        density_altitude_ft: conditions.density_altitude_ft(),
    }
}

/// Speed of sound in dry air (fps) from temperature in °F.
///
/// Returns 0.0 at or below absolute zero.
pub fn calculate_speed_of_sound(temperature_f: f64) -> f64 {
    let rankine = temperature_f + RANKINE_OFFSET;
    if rankine <= 0.0 {
        return 0.0;
    }
    SPEED_OF_SOUND_COEFF * rankine.sqrt()
}

/// `altitude + 1000 × (29.92 − pressure)`
pub fn pressure_altitude(altitude_ft: f64, pressure_inhg: f64) -> f64 {
    altitude_ft + FEET_PER_INHG * (STANDARD_PRESSURE_INHG - pressure_inhg)
}

/// ISA temperature (°F) at an altitude
pub fn isa_temperature_f(altitude_ft: f64) -> f64 {
    STANDARD_TEMPERATURE_F - ISA_LAPSE_F_PER_FT * altitude_ft
}

/// `pressure_altitude + 120 × (temperature − ISA_temp(altitude))`
pub fn density_altitude(altitude_ft: f64, pressure_inhg: f64, temperature_f: f64) -> f64 {
    pressure_altitude(altitude_ft, pressure_inhg)
        + FEET_PER_DEGREE_F * (temperature_f - isa_temperature_f(altitude_ft))
}

/// Saturation vapor pressure in Pa (Arden Buck, over water above 0°C, over ice below)
fn saturation_vapor_pressure_pa(temp_c: f64) -> f64 {
    let es_hpa = if temp_c >= 0.0 {
        6.1121 * ((18.678 - temp_c / 234.5) * (temp_c / (257.14 + temp_c))).exp()
    } else {
        6.1115 * ((23.036 - temp_c / 333.7) * (temp_c / (279.82 + temp_c))).exp()
    };
    es_hpa * 100.0
}

/// Moist air density (kg/m³) from the partial pressures of dry air and vapor
pub fn moist_air_density(temperature_f: f64, pressure_inhg: f64, humidity_pct: f64) -> f64 {
    let temp_c = (temperature_f - 32.0) * 5.0 / 9.0;
    let temp_k = temp_c + 273.15;
    let pressure_pa = pressure_inhg * PA_PER_INHG;

    let vapor_pressure_pa = humidity_pct.clamp(0.0, 100.0) / 100.0 * saturation_vapor_pressure_pa(temp_c);
    let dry_pressure_pa = (pressure_pa - vapor_pressure_pa).max(0.0);

    dry_pressure_pa / (R_DRY * temp_k) + vapor_pressure_pa / (R_VAPOR * temp_k)
}

/// Air density relative to the standard atmosphere (29.92 inHg, 59°F, dry)
pub fn air_density_ratio(temperature_f: f64, pressure_inhg: f64, humidity_pct: f64) -> f64 {
    let standard = moist_air_density(STANDARD_TEMPERATURE_F, STANDARD_PRESSURE_INHG, 0.0);
    moist_air_density(temperature_f, pressure_inhg, humidity_pct) / standard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_of_sound_standard() {
        let c = calculate_speed_of_sound(59.0);
        assert!((c - 1116.45).abs() < 0.1, "c at 59°F: {c}");
    }

    #[test]
    fn test_speed_of_sound_increases_with_temperature() {
        assert!(calculate_speed_of_sound(100.0) > calculate_speed_of_sound(59.0));
        assert!(calculate_speed_of_sound(0.0) < calculate_speed_of_sound(59.0));
        assert_eq!(calculate_speed_of_sound(-500.0), 0.0);
    }

    #[test]
    fn test_standard_density_ratio_is_unity() {
        let ratio = AtmosphericConditions::standard().density_ratio();
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn test_standard_density_value() {
        let rho = moist_air_density(59.0, 29.92, 0.0);
        assert!((rho - 1.225).abs() < 0.002, "standard density {rho}");
    }

    #[test]
    fn test_density_ratio_trends() {
        // Hot air is thinner, high pressure is denser
        assert!(air_density_ratio(95.0, 29.92, 0.0) < 1.0);
        assert!(air_density_ratio(20.0, 29.92, 0.0) > 1.0);
        assert!(air_density_ratio(59.0, 31.0, 0.0) > 1.0);
        assert!(air_density_ratio(59.0, 25.0, 0.0) < 1.0);
    }

    #[test]
    fn test_humidity_lowers_density() {
        let dry = air_density_ratio(85.0, 29.92, 0.0);
        let humid = air_density_ratio(85.0, 29.92, 90.0);
        assert!(humid < dry);
        // Second-order effect: well under 2% at 85°F
        assert!((dry - humid) / dry < 0.02);
    }

    #[test]
    fn test_pressure_altitude() {
        assert_eq!(pressure_altitude(0.0, 29.92), 0.0);
        assert!((pressure_altitude(5000.0, 29.42) - 5500.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_altitude_standard_day() {
        // Standard day at any altitude: density altitude equals altitude
        let alt = 4000.0;
        let da = density_altitude(alt, 29.92, isa_temperature_f(alt));
        assert!((da - alt).abs() < 1e-9);
    }

    #[test]
    fn test_density_altitude_hot_day() {
        let atmo = AtmosphericConditions::new(90.0, 29.92, 0.0, 0.0).unwrap();
        // 31°F above ISA → 3720 ft
        assert!((atmo.density_altitude_ft() - 3720.0).abs() < 1e-9);
        let props = calculate_atmospheric_conditions(&atmo);
        assert_eq!(props.density_altitude_display_ft(), 3720);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        assert!(AtmosphericConditions::new(160.0, 29.92, 50.0, 0.0).is_err());
        assert!(AtmosphericConditions::new(59.0, 19.0, 50.0, 0.0).is_err());
        assert!(AtmosphericConditions::new(59.0, 29.92, 101.0, 0.0).is_err());
        assert!(AtmosphericConditions::new(59.0, 29.92, 50.0, 31000.0).is_err());
        assert!(AtmosphericConditions::new(f64::NAN, 29.92, 50.0, 0.0).is_err());
        assert!(AtmosphericConditions::new(-50.0, 35.0, 0.0, -1000.0).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: AtmosphericConditions =
            serde_json::from_str(r#"{"temperature_f": 70, "pressure_inhg": 29.5, "humidity_pct": 40}"#).unwrap();
        assert_eq!(ok.altitude_ft(), 0.0);

        let bad = serde_json::from_str::<AtmosphericConditions>(r#"{"temperature_f": 70, "pressure_inhg": 12}"#);
        assert!(bad.is_err());
    }
}
