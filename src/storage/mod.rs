//! Storage Layer - SQLite-backed persistence
//!
//! The lab database holds four tables:
//! - substances(id, name, formula, category, state, color, description, molar_mass)
//! - reactions(id, equation, type, conditions, description)
//! - reaction_inputs(reaction_id, substance_id, coefficient)
//! - reaction_outputs(reaction_id, substance_id, coefficient)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SeedStore, DbStats, LinkRow, SubstanceId, ReactionId};
