//! # DOPE Engine
//!
//! Point-mass external ballistics for long-range shooting: G1/G7 drag,
//! moist-air atmosphere, RK4 trajectories, zeroing, firing solutions in MIL
//! and MOA, wind tables and subsonic transition analysis.
//!
//! ```no_run
//! use dope_engine::{solve, AmmoConfig, AtmosphericConditions, DistanceUnit, DragModel, RifleConfig, ShotParameters};
//!
//! # fn main() -> dope_engine::Result<()> {
//! let rifle = RifleConfig::new(1.5, 100.0, "1:10".parse()?, 24.0)?;
//! let ammo = AmmoConfig::new(2600.0, 0.505, DragModel::G1, 175.0)?;
//! let shot = ShotParameters::new(600.0, DistanceUnit::Yards, 0.0, 10.0, 90.0)?;
//! let solution = solve(&rifle, &ammo, &shot, &AtmosphericConditions::standard())?;
//! println!("up {:.1} MOA, right {:.1} MOA", solution.elevation.moa, solution.windage.moa);
//! # Ok(())
//! # }
//! ```

// Re-export the main types and functions
pub use atmosphere::{calculate_atmospheric_conditions, calculate_speed_of_sound, AirProperties, AtmosphericConditions};
pub use drag::drag_coefficient;
pub use drag_model::DragModel;
pub use error::{BallisticsError, Result};
pub use inputs::{AmmoConfig, RifleConfig, ShotParameters, TwistRate};
pub use profile::ShooterProfile;
pub use solution::{
    assemble_solution, compute_trajectory, generate_dope_card, solve, solve_with_settings, BallisticSolution,
    DopeCardRange,
};
pub use subsonic::{
    analyze_subsonic_transition, calculate_mach, estimate_max_supersonic_range, get_flight_regime, get_mach_margin,
    get_supersonic_margin, will_remain_supersonic, FlightRegime, SubsonicTransitionResult,
};
pub use trajectory_solver::{IntegratorSettings, TrajectoryPoint, TrajectorySolver};
pub use units::{AngularCorrection, AngularUnit, DistanceUnit};
pub use wind::Wind;
pub use wind_table::{generate_wind_table, WindTableEntry};
pub use zero::{solve_zero_angle, ZeroResult, ZeroSettings};

// Module declarations
pub mod atmosphere;
pub mod constants;
pub mod drag;
mod drag_model;
mod drag_tables;
mod error;
pub mod inputs;
pub mod profile;
pub mod solution;
pub mod subsonic;
pub mod trajectory_solver;
pub mod units;
pub mod wind;
pub mod wind_table;
pub mod zero;
