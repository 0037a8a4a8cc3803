//! Substance types
//!
//! A substance is one row of the `substances` table: a display name, a
//! formula used as the natural lookup key while loading, a category tag and
//! the physical attributes the lab UI renders.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical state a substance is presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalState {
    Gas,
    Liquid,
    Solid,
    /// Finely divided solid, rendered differently from a lump
    Powder,
}

impl PhysicalState {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicalState::Gas => "gas",
            PhysicalState::Liquid => "liquid",
            PhysicalState::Solid => "solid",
            PhysicalState::Powder => "powder",
        }
    }

    /// Get all physical states
    pub fn all() -> &'static [PhysicalState] {
        &[
            PhysicalState::Gas,
            PhysicalState::Liquid,
            PhysicalState::Solid,
            PhysicalState::Powder,
        ]
    }
}

impl FromStr for PhysicalState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gas" => Ok(PhysicalState::Gas),
            "liquid" => Ok(PhysicalState::Liquid),
            "solid" => Ok(PhysicalState::Solid),
            "powder" => Ok(PhysicalState::Powder),
            _ => Err(Error::InvalidDataset(format!("Unknown physical state: {}", s))),
        }
    }
}

impl std::fmt::Display for PhysicalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fill color used when drawing a substance.
///
/// Either a CSS color code (usually `#rrggbb`) or the `transparent`
/// sentinel for colorless gases and liquids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayColor {
    Code(String),
    Transparent,
}

impl DisplayColor {
    pub const TRANSPARENT: &'static str = "transparent";

    pub fn as_str(&self) -> &str {
        match self {
            DisplayColor::Code(code) => code,
            DisplayColor::Transparent => Self::TRANSPARENT,
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, DisplayColor::Transparent)
    }
}

impl From<String> for DisplayColor {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case(Self::TRANSPARENT) {
            DisplayColor::Transparent
        } else {
            DisplayColor::Code(s)
        }
    }
}

impl From<DisplayColor> for String {
    fn from(color: DisplayColor) -> Self {
        color.as_str().to_string()
    }
}

impl std::fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A substance record as it appears in the dataset.
///
/// The database id is not part of the record: it is assigned by SQLite on
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    /// Display label
    pub name: String,
    /// Chemical notation, e.g. `Ca(OH)2`
    pub formula: String,
    /// Classification tag (oxide, acid, base, salt, metal, ...)
    pub category: String,
    pub state: PhysicalState,
    pub color: DisplayColor,
    pub description: String,
    /// Grams per mole
    pub molar_mass: f64,
}

impl Substance {
    /// Create a new substance with an empty description
    pub fn new(
        name: impl Into<String>,
        formula: impl Into<String>,
        category: impl Into<String>,
        state: PhysicalState,
        color: impl Into<String>,
        molar_mass: f64,
    ) -> Self {
        Self {
            name: name.into(),
            formula: formula.into(),
            category: category.into(),
            state,
            color: DisplayColor::from(color.into()),
            description: String::new(),
            molar_mass,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parse() {
        assert_eq!(PhysicalState::from_str("GAS").unwrap(), PhysicalState::Gas);
        assert_eq!(PhysicalState::from_str("powder").unwrap(), PhysicalState::Powder);
        assert!(PhysicalState::from_str("plasma").is_err());
    }

    #[test]
    fn test_state_as_str_roundtrip() {
        for state in PhysicalState::all() {
            assert_eq!(PhysicalState::from_str(state.as_str()).unwrap(), *state);
        }
    }

    #[test]
    fn test_color_sentinel() {
        assert!(DisplayColor::from("transparent".to_string()).is_transparent());
        assert!(DisplayColor::from("Transparent".to_string()).is_transparent());

        let red = DisplayColor::from("#7f1d1d".to_string());
        assert!(!red.is_transparent());
        assert_eq!(red.as_str(), "#7f1d1d");
    }

    #[test]
    fn test_substance_builder() {
        let water = Substance::new("水", "H2O", "氧化物", PhysicalState::Liquid, "#3b82f6", 18.015)
            .with_description("生命之源");
        assert_eq!(water.formula, "H2O");
        assert_eq!(water.color, DisplayColor::Code("#3b82f6".to_string()));
        assert_eq!(water.description, "生命之源");
    }
}
