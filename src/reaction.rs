//! Reaction types
//!
//! A reaction relates input substances to output substances. Participants
//! reference substances by formula; the loader resolves formulas to
//! database ids when writing the junction rows.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Which junction table a participant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Consumed by the reaction (`reaction_inputs`)
    Input,
    /// Produced by the reaction (`reaction_outputs`)
    Output,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Input => "input",
            Side::Output => "output",
        }
    }

    /// Junction table holding rows for this side
    pub fn table(&self) -> &'static str {
        match self {
            Side::Input => "reaction_inputs",
            Side::Output => "reaction_outputs",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A substance taking part in a reaction, with its stoichiometric coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub formula: String,
    /// Number of formula units
    pub coefficient: NonZeroU32,
}

impl Participant {
    pub fn new(formula: impl Into<String>, coefficient: NonZeroU32) -> Self {
        Self {
            formula: formula.into(),
            coefficient,
        }
    }
}

/// A reaction record as it appears in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Human-readable balanced equation, e.g. `2H2 + O2 -> 2H2O`
    pub equation: String,
    /// Classification tag (synthesis, decomposition, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// What triggers the reaction (ignite, heat, mix, ...)
    pub conditions: String,
    #[serde(default)]
    pub description: String,
    pub inputs: Vec<Participant>,
    pub outputs: Vec<Participant>,
}

impl Reaction {
    pub fn new(
        equation: impl Into<String>,
        kind: impl Into<String>,
        conditions: impl Into<String>,
    ) -> Self {
        Self {
            equation: equation.into(),
            kind: kind.into(),
            conditions: conditions.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn input(mut self, formula: impl Into<String>, coefficient: NonZeroU32) -> Self {
        self.inputs.push(Participant::new(formula, coefficient));
        self
    }

    pub fn output(mut self, formula: impl Into<String>, coefficient: NonZeroU32) -> Self {
        self.outputs.push(Participant::new(formula, coefficient));
        self
    }

    /// Participants on the given side
    pub fn participants(&self, side: Side) -> &[Participant] {
        match side {
            Side::Input => &self.inputs,
            Side::Output => &self.outputs,
        }
    }

    /// Every formula this reaction references, inputs first
    pub fn formulas(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .map(|p| p.formula.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coef(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_builder_sides() {
        let r = Reaction::new("2H2 + O2 -> 2H2O", "化合反应", "点燃")
            .input("H2", coef(2))
            .input("O2", coef(1))
            .output("H2O", coef(2));

        assert_eq!(r.participants(Side::Input).len(), 2);
        assert_eq!(r.participants(Side::Output).len(), 1);
        assert_eq!(r.inputs[0].coefficient.get(), 2);
        assert_eq!(r.formulas().collect::<Vec<_>>(), vec!["H2", "O2", "H2O"]);
    }

    #[test]
    fn test_zero_coefficient_rejected() {
        let zero: std::result::Result<Participant, _> = toml::from_str("formula = \"X\"\ncoefficient = 0");
        assert!(zero.is_err());

        let negative: std::result::Result<Participant, _> = toml::from_str("formula = \"X\"\ncoefficient = -2");
        assert!(negative.is_err());

        let two: Participant = toml::from_str("formula = \"X\"\ncoefficient = 2").unwrap();
        assert_eq!(two, Participant::new("X", coef(2)));
    }

    #[test]
    fn test_side_tables() {
        assert_eq!(Side::Input.table(), "reaction_inputs");
        assert_eq!(Side::Output.table(), "reaction_outputs");
    }
}
