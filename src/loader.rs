//! Data Loader
//!
//! Two passes over a [`Dataset`]:
//! 1. insert every substance, letting SQLite assign ids
//! 2. insert each reaction, then one junction row per participant whose
//!    formula resolves to a substance id
//!
//! [`seed_database`] wraps both passes in the full rebuild: delete the old
//! file, open a fresh one, create the schema, load, commit, close.

use crate::dataset::Dataset;
use crate::reaction::{Reaction, Side};
use crate::storage::{SeedStore, SubstanceId};
use crate::substance::Substance;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "chemistry.db";

/// What to do with a participant whose formula matches no substance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissPolicy {
    /// Omit the junction row without a warning
    #[default]
    Skip,
    /// Omit the junction row and log a warning
    Warn,
    /// Abort the load; nothing is committed
    Fail,
}

impl MissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissPolicy::Skip => "skip",
            MissPolicy::Warn => "warn",
            MissPolicy::Fail => "fail",
        }
    }
}

impl FromStr for MissPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skip" | "ignore" => Ok(MissPolicy::Skip),
            "warn" => Ok(MissPolicy::Warn),
            "fail" | "error" => Ok(MissPolicy::Fail),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-memory formula → id map built once after the substance pass.
///
/// When a formula occurs more than once the lowest id wins, matching what
/// [`SeedStore::find_substance_id`] returns.
#[derive(Debug, Default)]
pub struct FormulaIndex {
    ids: HashMap<String, SubstanceId>,
}

impl FormulaIndex {
    pub fn from_store(store: &SeedStore) -> Result<Self> {
        let mut ids = HashMap::new();
        for (formula, id) in store.formula_ids()? {
            ids.entry(formula).or_insert(id);
        }
        Ok(Self { ids })
    }

    pub fn resolve(&self, formula: &str) -> Option<SubstanceId> {
        self.ids.get(formula).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A participant that produced no junction row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLink {
    pub equation: String,
    pub side: Side,
    pub formula: String,
}

/// Outcome of a load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub database: PathBuf,
    /// A previous database file was deleted before rebuilding
    pub replaced_existing: bool,
    pub substances: usize,
    pub reactions: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub skipped: Vec<SkippedLink>,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Seed Report ({}):", self.database.display())?;
        writeln!(f, "  Substances: {}", self.substances)?;
        writeln!(f, "  Reactions: {}", self.reactions)?;
        writeln!(f, "  Input links: {}", self.inputs)?;
        writeln!(f, "  Output links: {}", self.outputs)?;
        write!(f, "  Skipped links: {}", self.skipped.len())?;
        for s in &self.skipped {
            write!(f, "\n    - {} ({}) in '{}'", s.formula, s.side, s.equation)?;
        }
        Ok(())
    }
}

/// Runs the two load passes against an open store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    policy: MissPolicy,
}

impl Loader {
    pub fn new(policy: MissPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MissPolicy {
        self.policy
    }

    /// Load a whole dataset. The schema must already exist.
    pub fn load(&self, store: &SeedStore, dataset: &Dataset, report: &mut SeedReport) -> Result<()> {
        report.substances += self.insert_substances(store, &dataset.substances)?;

        let index = FormulaIndex::from_store(store)?;
        tracing::debug!("Formula index holds {} entries", index.len());

        for reaction in &dataset.reactions {
            self.insert_reaction(store, &index, reaction, report)?;
        }
        Ok(())
    }

    /// Pass 1: insert substances in dataset order
    pub fn insert_substances(&self, store: &SeedStore, substances: &[Substance]) -> Result<usize> {
        tracing::info!("Inserting {} substances", substances.len());
        for substance in substances {
            let id = store.insert_substance(substance)?;
            tracing::debug!("substance {} ({}) -> id {}", substance.formula, substance.name, id);
        }
        Ok(substances.len())
    }

    /// Pass 2, one entry: the reaction row followed by its junction rows
    pub fn insert_reaction(
        &self,
        store: &SeedStore,
        index: &FormulaIndex,
        reaction: &Reaction,
        report: &mut SeedReport,
    ) -> Result<()> {
        let reaction_id = store.insert_reaction(reaction)?;
        tracing::debug!("reaction '{}' -> id {}", reaction.equation, reaction_id);
        report.reactions += 1;

        for side in [Side::Input, Side::Output] {
            for participant in reaction.participants(side) {
                let Some(substance_id) = index.resolve(&participant.formula) else {
                    self.handle_miss(reaction, side, &participant.formula, report)?;
                    continue;
                };

                store.insert_link(side, reaction_id, substance_id, participant.coefficient.get())?;
                match side {
                    Side::Input => report.inputs += 1,
                    Side::Output => report.outputs += 1,
                }
            }
        }
        Ok(())
    }

    fn handle_miss(
        &self,
        reaction: &Reaction,
        side: Side,
        formula: &str,
        report: &mut SeedReport,
    ) -> Result<()> {
        match self.policy {
            MissPolicy::Skip => {
                tracing::debug!("No substance for {} {} of '{}', skipping", side, formula, reaction.equation);
            }
            MissPolicy::Warn => {
                tracing::warn!("No substance for {} {} of '{}', skipping", side, formula, reaction.equation);
            }
            MissPolicy::Fail => {
                return Err(Error::UnresolvedFormula {
                    equation: reaction.equation.clone(),
                    formula: formula.to_string(),
                });
            }
        }
        report.skipped.push(SkippedLink {
            equation: reaction.equation.clone(),
            side,
            formula: formula.to_string(),
        });
        Ok(())
    }
}

/// Where and how to rebuild the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    pub database: PathBuf,
    pub on_missing: MissPolicy,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            on_missing: MissPolicy::default(),
        }
    }
}

impl SeedOptions {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, on_missing: MissPolicy) -> Self {
        self.on_missing = on_missing;
        self
    }
}

/// Delete a database file if present. Returns whether one was removed.
pub fn remove_existing(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Removed existing database {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Rebuild the database at `options.database` from `dataset`.
///
/// All rows are written in a single transaction. On failure the
/// transaction is rolled back and the error returned; the file left behind
/// holds at most the empty schema and should be discarded.
pub fn seed_database(options: &SeedOptions, dataset: &Dataset) -> Result<SeedReport> {
    dataset.validate()?;

    let path = options.database.as_path();
    let mut report = SeedReport {
        database: path.to_path_buf(),
        replaced_existing: remove_existing(path)?,
        ..SeedReport::default()
    };

    let mut store = SeedStore::open(path)?;
    tracing::info!("Created schema in {}", path.display());

    let loader = Loader::new(options.on_missing);
    store.begin_transaction()?;
    if let Err(e) = loader.load(&store, dataset, &mut report) {
        if store.in_transaction() {
            if let Err(rollback_err) = store.rollback() {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
        }
        return Err(e);
    }
    store.commit()?;
    store.close()?;

    tracing::info!(
        "Loaded {} substances, {} reactions ({} input / {} output links, {} skipped)",
        report.substances,
        report.reactions,
        report.inputs,
        report.outputs,
        report.skipped.len()
    );
    Ok(report)
}
