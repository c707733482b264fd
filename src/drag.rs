/// Drag coefficient calculations for ballistics using standard drag table data
use once_cell::sync::Lazy;

use crate::constants::{DRAG_CONSTANT, MIN_DIVISION_THRESHOLD};
use crate::drag_tables::{G1_TABLE, G7_TABLE};
use crate::DragModel;

/// Drag table data structure
#[derive(Debug, Clone)]
pub struct DragTable {
    pub mach_values: Vec<f64>,
    pub cd_values: Vec<f64>,
}

impl DragTable {
    /// Create a new drag table from mach and cd arrays
    pub fn new(mach_values: Vec<f64>, cd_values: Vec<f64>) -> Self {
        Self { mach_values, cd_values }
    }

    /// Create a drag table from (mach, cd) pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let mach_values = pairs.iter().map(|(m, _)| *m).collect();
        let cd_values = pairs.iter().map(|(_, cd)| *cd).collect();
        Self::new(mach_values, cd_values)
    }

    pub fn len(&self) -> usize {
        self.mach_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mach_values.is_empty()
    }

    /// Interpolate drag coefficient for given Mach number.
    ///
    /// Linear between the two bracketing entries. Mach values outside the
    /// table clamp to the nearest endpoint. NaN maps to the first entry.
    pub fn interpolate(&self, mach: f64) -> f64 {
        let n = self.mach_values.len();

        if n == 0 {
            return 0.0;
        }

        if n == 1 || !(mach > self.mach_values[0]) {
            return self.cd_values[0];
        }

        if mach >= self.mach_values[n - 1] {
            return self.cd_values[n - 1];
        }

        // First entry strictly greater than mach; mach_values[0] < mach guarantees idx >= 1
        let idx = self.mach_values.partition_point(|&m| m <= mach);
        self.linear_interpolate(mach, idx - 1)
    }

    /// Linear interpolation between entries idx and idx + 1
    pub fn linear_interpolate(&self, mach: f64, idx: usize) -> f64 {
        if idx + 1 >= self.mach_values.len() || idx + 1 >= self.cd_values.len() {
            return self.cd_values.get(idx).copied().unwrap_or(0.0);
        }

        let x0 = self.mach_values[idx];
        let x1 = self.mach_values[idx + 1];
        let y0 = self.cd_values[idx];
        let y1 = self.cd_values[idx + 1];

        if (x1 - x0).abs() < MIN_DIVISION_THRESHOLD {
            return y0;
        }

        let t = (mach - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }
}

static G1_DRAG_TABLE: Lazy<DragTable> = Lazy::new(|| DragTable::from_pairs(&G1_TABLE));

static G7_DRAG_TABLE: Lazy<DragTable> = Lazy::new(|| DragTable::from_pairs(&G7_TABLE));

/// Reference table for a drag model
pub fn drag_table(drag_model: DragModel) -> &'static DragTable {
    match drag_model {
        DragModel::G1 => &G1_DRAG_TABLE,
        DragModel::G7 => &G7_DRAG_TABLE,
    }
}

/// Get drag coefficient for given Mach number and drag model
pub fn drag_coefficient(mach: f64, drag_model: DragModel) -> f64 {
    drag_table(drag_model).interpolate(mach)
}

/// Drag deceleration magnitude in ft/s².
///
/// `k × density_ratio × Cd(mach) × v²` with `k = DRAG_CONSTANT / bc`.
pub fn drag_deceleration(
    velocity_fps: f64,
    mach: f64,
    density_ratio: f64,
    ballistic_coefficient: f64,
    drag_model: DragModel,
) -> f64 {
    let k = DRAG_CONSTANT / ballistic_coefficient;
    k * density_ratio * drag_coefficient(mach, drag_model) * velocity_fps * velocity_fps
}
