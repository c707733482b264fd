/// Physical constants used in ballistics calculations
///
/// The engine works internally in imperial units: feet, feet per second,
/// inches for sight-plane offsets, grains for bullet weight and °F / inHg for
/// the atmosphere. Conversions to and from caller units happen at the edges.

/// Gravitational acceleration in ft/s²
pub const G_ACCEL_FPS2: f64 = 32.174;

/// Conversion factor: miles per hour to feet per second
pub const MPH_TO_FPS: f64 = 5280.0 / 3600.0;

/// Conversion factor: yards to meters (exact)
pub const YARDS_TO_METERS: f64 = 0.9144;

/// Feet per yard
pub const FEET_PER_YARD: f64 = 3.0;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Grains per pound (avoirdupois)
pub const GRAINS_PER_POUND: f64 = 7000.0;

/// Kinetic energy divisor for grains and fps to ft-lb
///
/// E = w * v² / (2 * g * 7000), with w in grains and v in fps.
pub const ENERGY_DIVISOR_GR_FPS: f64 = 2.0 * G_ACCEL_FPS2 * GRAINS_PER_POUND;

/// Standard air density at sea level (lb/ft³), ICAO 59°F / 29.92 inHg, dry air
pub const STANDARD_AIR_DENSITY_LB_FT3: f64 = 0.076_474_2;

/// Drag coefficient to retardation conversion constant
///
/// Converts a reference drag coefficient to a deceleration for a projectile
/// of unit ballistic coefficient (sectional density 1 lb/in²):
///
/// ```text
/// a_drag = DRAG_CONSTANT * density_ratio * Cd(M) * v² / BC      (ft/s²)
/// DRAG_CONSTANT = ρ0 * π / (8 * 144)
/// ```
///
/// where ρ0 is the standard density in lb/ft³ and the 144 folds the
/// in² → ft² conversion of the reference cross-section.
pub const DRAG_CONSTANT: f64 = STANDARD_AIR_DENSITY_LB_FT3 * std::f64::consts::PI / (8.0 * 144.0);

/// Standard sea-level pressure (inHg)
pub const STANDARD_PRESSURE_INHG: f64 = 29.92;

/// Standard sea-level temperature (°F)
pub const STANDARD_TEMPERATURE_F: f64 = 59.0;

/// Offset from °F to °R
pub const RANKINE_OFFSET: f64 = 459.67;

/// Speed of sound coefficient: c = SPEED_OF_SOUND_COEFF * sqrt(T_rankine) fps
///
/// sqrt(γ * R_air) with γ = 1.4 and R_air = 1716.49 ft·lbf/(slug·°R).
/// At 59°F this gives 1116.45 fps.
pub const SPEED_OF_SOUND_COEFF: f64 = 49.0223;

/// ISA temperature lapse used for density altitude (°F per ft)
pub const ISA_LAPSE_F_PER_FT: f64 = 0.00356;

/// Pressure altitude gained per inHg below standard (ft)
pub const FEET_PER_INHG: f64 = 1000.0;

/// Density altitude gained per °F above ISA temperature (ft)
pub const FEET_PER_DEGREE_F: f64 = 120.0;

/// Inches subtended by one MOA at 100 yards
pub const INCHES_PER_MOA_AT_100YD: f64 = 1.047;

/// Inches subtended by one milliradian at 100 yards
pub const INCHES_PER_MIL_AT_100YD: f64 = 3.6;

// Numerical stability constants
/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
