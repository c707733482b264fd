use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;

use dope_engine::{
    analyze_subsonic_transition, calculate_atmospheric_conditions, compute_trajectory, estimate_max_supersonic_range,
    generate_dope_card, generate_wind_table, solve, AmmoConfig, AngularCorrection, AngularUnit,
    AtmosphericConditions, BallisticSolution, BallisticsError, DistanceUnit, DopeCardRange, DragModel, RifleConfig,
    ShooterProfile, ShotParameters, TwistRate, Wind,
};

#[derive(Parser)]
#[command(name = "dope-cli")]
#[command(version)]
#[command(about = "Long-range firing solutions, wind tables and DOPE cards", long_about = None)]
struct Cli {
    /// Log solver progress (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Firing solution for a single shot
    Solve {
        #[command(flatten)]
        setup: SetupArgs,

        /// Target distance
        #[arg(short = 'd', long)]
        distance: f64,

        /// Distance unit (yards, meters)
        #[arg(long, default_value = "yards")]
        unit: DistanceUnit,

        /// Line-of-sight angle (degrees, positive uphill)
        #[arg(long, default_value_t = 0.0)]
        angle: f64,

        #[command(flatten)]
        wind: WindArgs,

        /// Turret unit (mil, moa)
        #[arg(long, default_value = "mil")]
        turret: AngularUnit,

        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Windage holds over distances and wind speeds
    WindTable {
        #[command(flatten)]
        setup: SetupArgs,

        /// Comma-separated distances
        #[arg(long, value_delimiter = ',', default_values_t = [100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 900.0, 1000.0])]
        distances: Vec<f64>,

        /// Comma-separated wind speeds (mph)
        #[arg(long, value_delimiter = ',', default_values_t = [5.0, 10.0, 15.0, 20.0])]
        wind_speeds: Vec<f64>,

        /// Clock direction the wind blows from (degrees, 90 = from the right)
        #[arg(long, default_value_t = 90.0)]
        wind_direction: f64,

        #[arg(long, default_value = "yards")]
        unit: DistanceUnit,

        #[arg(long, default_value = "mil")]
        turret: AngularUnit,

        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Elevation and windage every STEP from START to END
    DopeCard {
        #[command(flatten)]
        setup: SetupArgs,

        #[arg(long, default_value_t = 100.0)]
        start: f64,

        #[arg(long, default_value_t = 1000.0)]
        end: f64,

        #[arg(long, default_value_t = 100.0)]
        step: f64,

        #[arg(long, default_value = "yards")]
        unit: DistanceUnit,

        #[command(flatten)]
        wind: WindArgs,

        #[arg(long, default_value = "mil")]
        turret: AngularUnit,

        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Where the bullet goes transonic and subsonic
    Subsonic {
        #[command(flatten)]
        setup: SetupArgs,

        /// Target distance (yards)
        #[arg(short = 'd', long)]
        distance: f64,

        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Derived air properties for the given conditions
    Atmosphere {
        #[command(flatten)]
        atmosphere: AtmosphereArgs,

        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display engine information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Args, Debug)]
struct SetupArgs {
    /// JSON shooter profile; replaces the rifle and ammo flags
    #[arg(long)]
    profile: Option<PathBuf>,

    #[command(flatten)]
    rifle: RifleArgs,

    #[command(flatten)]
    ammo: AmmoArgs,

    #[command(flatten)]
    atmosphere: AtmosphereArgs,
}

#[derive(Args, Debug)]
struct RifleArgs {
    /// Sight height above bore (inches)
    #[arg(long, default_value_t = 1.5)]
    sight_height: f64,

    /// Zero distance (yards)
    #[arg(long, default_value_t = 100.0)]
    zero_distance: f64,

    /// Barrel twist (1:N)
    #[arg(long, default_value = "1:10")]
    twist: TwistRate,

    /// Barrel length (inches)
    #[arg(long, default_value_t = 24.0)]
    barrel_length: f64,
}

#[derive(Args, Debug)]
struct AmmoArgs {
    /// Muzzle velocity (fps)
    #[arg(short = 'v', long, default_value_t = 2600.0)]
    velocity: f64,

    /// Ballistic coefficient
    #[arg(short = 'b', long, default_value_t = 0.505)]
    bc: f64,

    /// Drag model (G1, G7)
    #[arg(long, default_value = "G1")]
    drag_model: DragModel,

    /// Bullet weight (grains)
    #[arg(short = 'w', long, default_value_t = 175.0)]
    weight: f64,
}

/// Unset readings fall back to the profile atmosphere, then to standard
#[derive(Args, Debug)]
struct AtmosphereArgs {
    /// Temperature (°F)
    #[arg(long)]
    temperature: Option<f64>,

    /// Station pressure (inHg)
    #[arg(long)]
    pressure: Option<f64>,

    /// Relative humidity (%)
    #[arg(long)]
    humidity: Option<f64>,

    /// Altitude (ft)
    #[arg(long)]
    altitude: Option<f64>,
}

#[derive(Args, Debug)]
struct WindArgs {
    /// Wind speed (mph)
    #[arg(long, default_value_t = 0.0)]
    wind_speed: f64,

    /// Clock direction the wind blows from (degrees, 90 = from the right)
    #[arg(long, default_value_t = 90.0)]
    wind_direction: f64,
}

impl AtmosphereArgs {
    fn resolve(&self, base: AtmosphericConditions) -> Result<AtmosphericConditions, BallisticsError> {
        AtmosphericConditions::new(
            self.temperature.unwrap_or(base.temperature_f()),
            self.pressure.unwrap_or(base.pressure_inhg()),
            self.humidity.unwrap_or(base.humidity_pct()),
            self.altitude.unwrap_or(base.altitude_ft()),
        )
    }
}

impl SetupArgs {
    fn resolve(&self) -> Result<(RifleConfig, AmmoConfig, AtmosphericConditions), BallisticsError> {
        if let Some(path) = &self.profile {
            let profile = ShooterProfile::load(path)?;
            let atmosphere = self.atmosphere.resolve(profile.atmosphere_or_standard())?;
            return Ok((profile.rifle, profile.ammo, atmosphere));
        }

        let rifle = RifleConfig::new(
            self.rifle.sight_height,
            self.rifle.zero_distance,
            self.rifle.twist,
            self.rifle.barrel_length,
        )?;
        let ammo = AmmoConfig::new(self.ammo.velocity, self.ammo.bc, self.ammo.drag_model, self.ammo.weight)?;
        let atmosphere = self.atmosphere.resolve(AtmosphericConditions::standard())?;
        Ok((rifle, ammo, atmosphere))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Solve {
            setup,
            distance,
            unit,
            angle,
            wind,
            turret,
            output,
        } => {
            let (rifle, ammo, atmosphere) = setup.resolve()?;
            let shot = ShotParameters::new(distance, unit, angle, wind.wind_speed, wind.wind_direction)?;
            let solution = solve(&rifle, &ammo, &shot, &atmosphere)?;
            display_solution(&solution, turret, output)?;
        }

        Commands::WindTable {
            setup,
            distances,
            wind_speeds,
            wind_direction,
            unit,
            turret,
            output,
        } => {
            let (rifle, ammo, atmosphere) = setup.resolve()?;
            let table = generate_wind_table(&rifle, &ammo, &distances, unit, &atmosphere, &wind_speeds, wind_direction)?;

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
                OutputFormat::Csv => {
                    println!("distance,unit,wind_speed_mph,windage_{},drift_in", turret.to_string().to_lowercase());
                    for e in &table {
                        println!(
                            "{:.1},{},{:.1},{:.2},{:.2}",
                            e.distance,
                            e.unit.abbreviation(),
                            e.wind_speed_mph,
                            e.windage.in_unit(turret),
                            e.drift_in
                        );
                    }
                }
                OutputFormat::Table => {
                    println!(
                        "WIND TABLE ({} {}, wind from {:.0}°)",
                        turret,
                        unit.abbreviation(),
                        wind_direction
                    );
                    print!("{:>8}", "Dist");
                    for speed in &wind_speeds {
                        print!(" {:>9}", format!("{speed} mph"));
                    }
                    println!();
                    for row in table.chunks(wind_speeds.len().max(1)) {
                        print!("{:>8.0}", row[0].distance);
                        for e in row {
                            print!(" {:>9.2}", e.windage.in_unit(turret));
                        }
                        println!();
                    }
                }
            }
        }

        Commands::DopeCard {
            setup,
            start,
            end,
            step,
            unit,
            wind,
            turret,
            output,
        } => {
            let (rifle, ammo, atmosphere) = setup.resolve()?;
            let range = DopeCardRange::new(start, end, step, unit)?;
            let wind = Wind::new(wind.wind_speed, wind.wind_direction);
            let card = generate_dope_card(&rifle, &ammo, &atmosphere, &range, wind)?;
            display_dope_card(&card, turret, output)?;
        }

        Commands::Subsonic {
            setup,
            distance,
            output,
        } => {
            let (rifle, ammo, atmosphere) = setup.resolve()?;
            let shot = ShotParameters::at(distance, DistanceUnit::Yards)?;
            let trajectory = compute_trajectory(&rifle, &ammo, &shot, &atmosphere)?;
            let result = analyze_subsonic_transition(&trajectory, atmosphere.temperature_f(), distance);
            let rule_of_thumb = estimate_max_supersonic_range(
                ammo.muzzle_velocity_fps(),
                ammo.ballistic_coefficient(),
                atmosphere.temperature_f(),
            );

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => {
                    println!("metric,value");
                    println!("goes_subsonic,{}", result.goes_subsonic);
                    println!("flight_regime,{}", result.flight_regime);
                    println!("mach_at_target,{:.3}", result.mach_at_target);
                    println!("velocity_at_target_fps,{:.1}", result.velocity_at_target_fps);
                    println!("speed_of_sound_fps,{:.1}", result.speed_of_sound_fps);
                    println!("transonic_distance_yd,{}", optional(result.transonic_distance_yd));
                    println!("subsonic_distance_yd,{}", optional(result.subsonic_distance_yd));
                    println!("max_supersonic_distance_yd,{}", optional(result.max_supersonic_distance_yd));
                }
                OutputFormat::Table => {
                    println!("╔════════════════════════════════════════╗");
                    println!("║        SUBSONIC TRANSITION             ║");
                    println!("╠════════════════════════════════════════╣");
                    println!("║ Target:            {:>8.0} yd         ║", distance);
                    println!("║ Regime:            {:>11}         ║", result.flight_regime.to_string());
                    println!("║ Mach at Target:    {:>8.3}            ║", result.mach_at_target);
                    println!("║ Velocity:          {:>8.1} fps        ║", result.velocity_at_target_fps);
                    println!("║ Speed of Sound:    {:>8.1} fps        ║", result.speed_of_sound_fps);
                    println!("║ Mach 1.2 at:       {:>8} yd         ║", optional(result.max_supersonic_distance_yd));
                    println!("║ Mach 1.0 at:       {:>8} yd         ║", optional(result.transonic_distance_yd));
                    println!("║ Mach 0.8 at:       {:>8} yd         ║", optional(result.subsonic_distance_yd));
                    println!("║ Est. Supersonic:   {:>8} yd         ║", optional(result.estimated_supersonic_range_yd));
                    println!("║ Rule of Thumb:     {:>8} yd         ║", optional(rule_of_thumb));
                    println!("╚════════════════════════════════════════╝");
                    if let Some(warning) = &result.warning {
                        println!("WARNING: {warning}");
                    }
                }
            }
        }

        Commands::Atmosphere { atmosphere, output } => {
            let conditions = atmosphere.resolve(AtmosphericConditions::standard())?;
            let air = calculate_atmospheric_conditions(&conditions);

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&air)?),
                OutputFormat::Csv => {
                    println!("metric,value");
                    println!("speed_of_sound_fps,{:.2}", air.speed_of_sound_fps);
                    println!("density_ratio,{:.5}", air.density_ratio);
                    println!("pressure_altitude_ft,{:.0}", air.pressure_altitude_ft);
                    println!("density_altitude_ft,{}", air.density_altitude_display_ft());
                }
                OutputFormat::Table => {
                    println!("╔════════════════════════════════════════╗");
                    println!("║         AIR PROPERTIES                 ║");
                    println!("╠════════════════════════════════════════╣");
                    println!("║ Temperature:       {:>8.1} °F         ║", conditions.temperature_f());
                    println!("║ Pressure:          {:>8.2} inHg       ║", conditions.pressure_inhg());
                    println!("║ Humidity:          {:>8.0} %          ║", conditions.humidity_pct());
                    println!("║ Speed of Sound:    {:>8.1} fps        ║", air.speed_of_sound_fps);
                    println!("║ Density Ratio:     {:>8.4}            ║", air.density_ratio);
                    println!("║ Pressure Altitude: {:>8.0} ft         ║", air.pressure_altitude_ft);
                    println!("║ Density Altitude:  {:>8} ft         ║", air.density_altitude_display_ft());
                    println!("╚════════════════════════════════════════╝");
                }
            }
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║        DOPE ENGINE v{:<8}           ║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Point-mass external ballistics for     ║");
            println!("║ long-range firing solutions.           ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • G1 / G7 drag tables                  ║");
            println!("║ • RK4 integration, bisection zeroing   ║");
            println!("║ • Moist-air atmosphere                 ║");
            println!("║ • MIL / MOA solutions and wind tables  ║");
            println!("║ • Subsonic transition analysis         ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"))
}

fn dial(correction: &AngularCorrection, turret: AngularUnit) -> f64 {
    correction.in_unit(turret)
}

fn display_solution(solution: &BallisticSolution, turret: AngularUnit, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(solution)?),
        OutputFormat::Csv => {
            println!("distance,unit,elevation_{0},windage_{0},drop_in,drift_in,velocity_fps,energy_ftlb,time_s",
                turret.to_string().to_lowercase());
            print_solution_csv(solution, turret);
        }
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         FIRING SOLUTION                ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Distance:          {:>8.1} {:<3}        ║", solution.distance, solution.unit.abbreviation());
            println!("║ Elevation:         {:>8.2} {:<3}        ║", dial(&solution.elevation, turret), turret);
            println!("║ Windage:           {:>8.2} {:<3}        ║", dial(&solution.windage, turret), turret);
            println!("║ Drop:              {:>8.2} in         ║", solution.drop_in);
            println!("║ Drift:             {:>8.2} in         ║", solution.windage_in);
            println!("║ Velocity:          {:>8.1} fps        ║", solution.velocity_fps);
            println!("║ Energy:            {:>8.0} ft-lb      ║", solution.energy_ftlb);
            println!("║ Time of Flight:    {:>8.3} s          ║", solution.time_of_flight_s);
            println!("╚════════════════════════════════════════╝");
        }
    }
    Ok(())
}

fn print_solution_csv(s: &BallisticSolution, turret: AngularUnit) {
    println!(
        "{:.1},{},{:.2},{:.2},{:.2},{:.2},{:.1},{:.0},{:.3}",
        s.distance,
        s.unit.abbreviation(),
        dial(&s.elevation, turret),
        dial(&s.windage, turret),
        s.drop_in,
        s.windage_in,
        s.velocity_fps,
        s.energy_ftlb,
        s.time_of_flight_s
    );
}

fn display_dope_card(card: &[BallisticSolution], turret: AngularUnit, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Csv => {
            println!("distance,unit,elevation_{0},windage_{0},drop_in,drift_in,velocity_fps,energy_ftlb,time_s",
                turret.to_string().to_lowercase());
            for s in card {
                print_solution_csv(s, turret);
            }
        }
        OutputFormat::Table => {
            println!("DOPE CARD ({turret})");
            println!("┌──────────┬──────────┬──────────┬──────────┬──────────┬──────────┐");
            println!("│   Dist   │   Elev   │   Wind   │ Drop(in) │ Vel(fps) │ Energy   │");
            println!("├──────────┼──────────┼──────────┼──────────┼──────────┼──────────┤");
            for s in card {
                println!(
                    "│ {:>8.0} │ {:>8.2} │ {:>8.2} │ {:>8.1} │ {:>8.0} │ {:>8.0} │",
                    s.distance,
                    dial(&s.elevation, turret),
                    dial(&s.windage, turret),
                    s.drop_in,
                    s.velocity_fps,
                    s.energy_ftlb
                );
            }
            println!("└──────────┴──────────┴──────────┴──────────┴──────────┴──────────┘");
        }
    }
    Ok(())
}
