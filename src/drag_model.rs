use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BallisticsError;

/// Reference drag function the ballistic coefficient is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragModel {
    /// Flat-base spitzer reference projectile
    G1,
    /// Long boat-tail spitzer reference projectile
    G7,
}

impl DragModel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "G1" => Some(DragModel::G1),
            "G7" => Some(DragModel::G7),
            _ => None,
        }
    }
}

impl FromStr for DragModel {
    type Err = BallisticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DragModel::from_str(s)
            .ok_or_else(|| BallisticsError::invalid(format!("unknown drag model '{s}' (expected G1 or G7)")))
    }
}

impl std::fmt::Display for DragModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_model_from_str() {
        assert_eq!(DragModel::from_str("G1"), Some(DragModel::G1));
        assert_eq!(DragModel::from_str("G7"), Some(DragModel::G7));
    }

    #[test]
    fn test_drag_model_from_str_case_insensitive() {
        assert_eq!(DragModel::from_str("g1"), Some(DragModel::G1));
        assert_eq!(DragModel::from_str(" g7 "), Some(DragModel::G7));
    }

    #[test]
    fn test_drag_model_from_str_invalid() {
        assert_eq!(DragModel::from_str("G2"), None);
        assert_eq!(DragModel::from_str("GS"), None);
        assert_eq!(DragModel::from_str(""), None);
        assert_eq!(DragModel::from_str("invalid"), None);
    }

    #[test]
    fn test_drag_model_parse_trait() {
        let model: DragModel = "g7".parse().unwrap();
        assert_eq!(model, DragModel::G7);

        let err = "G8".parse::<DragModel>().unwrap_err();
        assert!(matches!(err, BallisticsError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_drag_model_display() {
        assert_eq!(format!("{}", DragModel::G1), "G1");
        assert_eq!(format!("{}", DragModel::G7), "G7");
    }

    #[test]
    fn test_drag_model_serde() {
        let json = serde_json::to_string(&DragModel::G7).unwrap();
        assert_eq!(json, "\"G7\"");
        let back: DragModel = serde_json::from_str("\"G1\"").unwrap();
        assert_eq!(back, DragModel::G1);
    }
}
