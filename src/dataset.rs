//! Declarative knowledge base
//!
//! The dataset is kept apart from the loading logic: the built-in one is a
//! TOML document embedded at compile time, and an alternative can be read
//! from disk with the same format.

use crate::reaction::{Reaction, Side};
use crate::substance::Substance;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The knowledge base shipped with the lab application
const BUILTIN_DATASET: &str = include_str!("../data/knowledge_base.toml");

/// An ordered list of substances followed by the reactions between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub substances: Vec<Substance>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Dataset {
    /// Parse the embedded knowledge base
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_DATASET)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let dataset: Dataset = toml::from_str(source)?;
        Ok(dataset)
    }

    /// Read a dataset file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Structural checks run before anything touches the database.
    ///
    /// A formula may appear at most once per side of a reaction, so each
    /// side produces one junction row per distinct formula.
    ///
    /// Formulas are not parsed and equations are not balanced. A reaction
    /// referencing a formula with no matching substance passes; the loader's
    /// miss policy decides what happens to it.
    pub fn validate(&self) -> Result<()> {
        if self.substances.is_empty() {
            return Err(Error::InvalidDataset("dataset has no substances".to_string()));
        }

        for (i, s) in self.substances.iter().enumerate() {
            if s.name.trim().is_empty() || s.formula.trim().is_empty() {
                return Err(Error::InvalidDataset(format!(
                    "substance #{} has an empty name or formula",
                    i + 1
                )));
            }
            if !s.molar_mass.is_finite() || s.molar_mass <= 0.0 {
                return Err(Error::InvalidDataset(format!(
                    "substance {} has non-positive molar mass {}",
                    s.formula, s.molar_mass
                )));
            }
        }

        for (i, r) in self.reactions.iter().enumerate() {
            if r.equation.trim().is_empty() {
                return Err(Error::InvalidDataset(format!("reaction #{} has an empty equation", i + 1)));
            }
            if r.inputs.is_empty() || r.outputs.is_empty() {
                return Err(Error::InvalidDataset(format!(
                    "reaction '{}' needs at least one input and one output",
                    r.equation
                )));
            }
            for side in [Side::Input, Side::Output] {
                let mut seen = HashSet::new();
                if let Some(dup) = r.participants(side).iter().find(|p| !seen.insert(p.formula.as_str())) {
                    return Err(Error::InvalidDataset(format!(
                        "reaction '{}' lists {} twice as an {}",
                        r.equation, dup.formula, side
                    )));
                }
            }
        }

        Ok(())
    }

    /// First substance with exactly this formula
    pub fn find_substance(&self, formula: &str) -> Option<&Substance> {
        self.substances.iter().find(|s| s.formula == formula)
    }

    /// `(equation, formula)` pairs that reference no known substance
    pub fn missing_formulas(&self) -> Vec<(&str, &str)> {
        let known: HashSet<&str> = self.substances.iter().map(|s| s.formula.as_str()).collect();
        self.reactions
            .iter()
            .flat_map(|r| {
                r.formulas()
                    .filter(|f| !known.contains(f))
                    .map(move |f| (r.equation.as_str(), f))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substance::PhysicalState;

    #[test]
    fn test_builtin_parses_and_validates() {
        let dataset = Dataset::builtin().unwrap();
        dataset.validate().unwrap();

        assert_eq!(dataset.substances.len(), 22);
        assert_eq!(dataset.reactions.len(), 8);
        assert!(dataset.missing_formulas().is_empty());
    }

    #[test]
    fn test_builtin_first_entries() {
        let dataset = Dataset::builtin().unwrap();

        let water = &dataset.substances[0];
        assert_eq!(water.formula, "H2O");
        assert_eq!(water.state, PhysicalState::Liquid);

        let co2 = dataset.find_substance("CO2").unwrap();
        assert!(co2.color.is_transparent());

        let first = &dataset.reactions[0];
        assert_eq!(first.equation, "2H2 + O2 -> 2H2O");
        assert_eq!(first.kind, "化合反应");
        assert_eq!(first.conditions, "点燃");
    }

    #[test]
    fn test_zero_coefficient_rejected_at_parse() {
        let source = r##"
            [[substances]]
            name = "x"
            formula = "X"
            category = "c"
            state = "solid"
            color = "#000000"
            description = ""
            molar_mass = 1.0

            [[reactions]]
            equation = "X -> X"
            type = "t"
            conditions = "mix"
            inputs = [{ formula = "X", coefficient = 0 }]
            outputs = [{ formula = "X", coefficient = 1 }]
        "##;
        assert!(matches!(Dataset::from_toml_str(source), Err(Error::DatasetParse(_))));
    }

    #[test]
    fn test_unknown_state_rejected_at_parse() {
        let source = r##"
            [[substances]]
            name = "x"
            formula = "X"
            category = "c"
            state = "plasma"
            color = "#000000"
            description = ""
            molar_mass = 1.0
        "##;
        assert!(Dataset::from_toml_str(source).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_molar_mass() {
        let mut dataset = Dataset::builtin().unwrap();
        dataset.substances[3].molar_mass = 0.0;
        assert!(matches!(dataset.validate(), Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn test_validate_rejects_one_sided_reaction() {
        let mut dataset = Dataset::builtin().unwrap();
        dataset.reactions[0].outputs.clear();
        assert!(matches!(dataset.validate(), Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn test_validate_rejects_repeated_formula_on_one_side() {
        let mut dataset = Dataset::builtin().unwrap();
        let h2 = dataset.reactions[0].inputs[0].clone();
        dataset.reactions[0].inputs.push(h2);
        match dataset.validate() {
            Err(Error::InvalidDataset(msg)) => assert!(msg.contains("H2 twice as an input")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_allows_formula_on_both_sides() {
        let mut dataset = Dataset::builtin().unwrap();
        let h2o = dataset.reactions[0].outputs[0].clone();
        dataset.reactions[0].inputs.push(h2o);
        dataset.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(Dataset::default().validate().is_err());
    }

    #[test]
    fn test_missing_formulas_reported() {
        let mut dataset = Dataset::builtin().unwrap();
        dataset.reactions[6].outputs.push(crate::reaction::Participant::new(
            "FeSO4",
            std::num::NonZeroU32::MIN,
        ));
        let missing = dataset.missing_formulas();
        assert_eq!(missing, vec![("Fe + CuSO4 -> FeSO4 + Cu", "FeSO4")]);
    }
}
