//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, params, OptionalExtension};
use crate::{Result, Error};
use crate::reaction::{Reaction, Side};
use crate::substance::{DisplayColor, PhysicalState, Substance};
use super::schema;

/// Store-assigned key of a `substances` row
pub type SubstanceId = i64;

/// Store-assigned key of a `reactions` row
pub type ReactionId = i64;

/// SQLite-backed storage for the lab knowledge base
pub struct SeedStore {
    conn: Connection,
}

impl SeedStore {
    /// Open a database file (creates if doesn't exist) and ensure the schema
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an existing database read-only, without touching the schema
    pub fn open_existing(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create the four tables and their indexes. No-op if they exist.
    pub fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }

    // ========== Substance Operations ==========

    /// Insert a substance and return its assigned id
    pub fn insert_substance(&self, substance: &Substance) -> Result<SubstanceId> {
        self.conn.execute(
            r#"
            INSERT INTO substances (name, formula, category, state, color, description, molar_mass)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                substance.name,
                substance.formula,
                substance.category,
                substance.state.as_str(),
                substance.color.as_str(),
                substance.description,
                substance.molar_mass,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Id of the first substance whose formula matches exactly
    pub fn find_substance_id(&self, formula: &str) -> Result<Option<SubstanceId>> {
        self.conn
            .query_row(
                "SELECT id FROM substances WHERE formula = ?1 ORDER BY id LIMIT 1",
                [formula],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// All substances with this formula, in insertion order
    pub fn find_substances_by_formula(&self, formula: &str) -> Result<Vec<(SubstanceId, Substance)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, formula, category, state, color, description, molar_mass FROM substances WHERE formula = ?1 ORDER BY id"
        )?;

        let substances = stmt
            .query_map([formula], |row| self.row_to_substance(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(substances)
    }

    /// `(formula, id)` for every substance, in insertion order
    pub fn formula_ids(&self) -> Result<Vec<(String, SubstanceId)>> {
        let mut stmt = self.conn.prepare("SELECT formula, id FROM substances ORDER BY id")?;

        let pairs = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(pairs)
    }

    /// Count all substances
    pub fn count_substances(&self) -> Result<usize> {
        self.count_rows("substances")
    }

    /// Helper to convert a row to an (id, Substance) pair
    fn row_to_substance(&self, row: &rusqlite::Row) -> rusqlite::Result<(SubstanceId, Substance)> {
        let state_str: String = row.get(4)?;
        let color: String = row.get(5)?;

        let state: PhysicalState = state_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok((
            row.get(0)?,
            Substance {
                name: row.get(1)?,
                formula: row.get(2)?,
                category: row.get(3)?,
                state,
                color: DisplayColor::from(color),
                description: row.get(6)?,
                molar_mass: row.get(7)?,
            },
        ))
    }

    // ========== Reaction Operations ==========

    /// Insert a reaction row (without participants) and return its assigned id
    pub fn insert_reaction(&self, reaction: &Reaction) -> Result<ReactionId> {
        self.conn.execute(
            "INSERT INTO reactions (equation, type, conditions, description) VALUES (?1, ?2, ?3, ?4)",
            params![
                reaction.equation,
                reaction.kind,
                reaction.conditions,
                reaction.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Id of the first reaction with this equation
    pub fn find_reaction_id(&self, equation: &str) -> Result<Option<ReactionId>> {
        self.conn
            .query_row(
                "SELECT id FROM reactions WHERE equation = ?1 ORDER BY id LIMIT 1",
                [equation],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all reactions
    pub fn count_reactions(&self) -> Result<usize> {
        self.count_rows("reactions")
    }

    // ========== Link Operations ==========

    /// Insert a junction row binding a reaction to a substance
    pub fn insert_link(
        &self,
        side: Side,
        reaction_id: ReactionId,
        substance_id: SubstanceId,
        coefficient: u32,
    ) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (reaction_id, substance_id, coefficient) VALUES (?1, ?2, ?3)",
            side.table()
        );
        self.conn.execute(&sql, params![reaction_id, substance_id, coefficient])?;
        Ok(())
    }

    /// Junction rows of one reaction on one side, joined to the substance formula.
    ///
    /// Rows whose substance id dangles are returned with `formula: None`.
    pub fn links_for(&self, side: Side, reaction_id: ReactionId) -> Result<Vec<LinkRow>> {
        let sql = format!(
            "SELECT l.substance_id, s.formula, l.coefficient
             FROM {} l LEFT JOIN substances s ON s.id = l.substance_id
             WHERE l.reaction_id = ?1
             ORDER BY l.rowid",
            side.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let links = stmt
            .query_map([reaction_id], |row| {
                Ok(LinkRow {
                    substance_id: row.get(0)?,
                    formula: row.get(1)?,
                    coefficient: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(links)
    }

    /// Count junction rows on one side
    pub fn count_links(&self, side: Side) -> Result<usize> {
        self.count_rows(side.table())
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            substances: self.count_substances()?,
            reactions: self.count_reactions()?,
            inputs: self.count_links(Side::Input)?,
            outputs: self.count_links(Side::Output)?,
        })
    }
}

/// A junction row as read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub substance_id: SubstanceId,
    pub formula: Option<String>,
    pub coefficient: u32,
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub substances: usize,
    pub reactions: usize,
    pub inputs: usize,
    pub outputs: usize,
}

impl DbStats {
    /// Label/value pairs in table order
    pub fn rows(&self) -> [(&'static str, String); 4] {
        [
            ("Substances", self.substances.to_string()),
            ("Reactions", self.reactions.to_string()),
            ("Reaction inputs", self.inputs.to_string()),
            ("Reaction outputs", self.outputs.to_string()),
        ]
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Substances: {}", self.substances)?;
        writeln!(f, "  Reactions: {}", self.reactions)?;
        writeln!(f, "  Reaction inputs: {}", self.inputs)?;
        writeln!(f, "  Reaction outputs: {}", self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Substance {
        Substance::new("水", "H2O", "氧化物", PhysicalState::Liquid, "#3b82f6", 18.015)
    }

    fn hydrogen() -> Substance {
        Substance::new("氢气", "H2", "非金属", PhysicalState::Gas, "transparent", 2.016)
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SeedStore::open_in_memory().unwrap();
        store.initialize_schema().unwrap();
        store.initialize_schema().unwrap();
        assert_eq!(store.count_substances().unwrap(), 0);
    }

    #[test]
    fn test_substance_roundtrip() {
        let store = SeedStore::open_in_memory().unwrap();

        let id = store.insert_substance(&water()).unwrap();
        assert_eq!(store.find_substance_id("H2O").unwrap(), Some(id));

        let found = store.find_substances_by_formula("H2O").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, id);
        assert_eq!(found[0].1, water());
    }

    #[test]
    fn test_ids_are_store_assigned() {
        let store = SeedStore::open_in_memory().unwrap();

        let a = store.insert_substance(&water()).unwrap();
        let b = store.insert_substance(&hydrogen()).unwrap();
        assert!(b > a);
        assert_eq!(
            store.formula_ids().unwrap(),
            vec![("H2O".to_string(), a), ("H2".to_string(), b)]
        );
    }

    #[test]
    fn test_find_missing_formula() {
        let store = SeedStore::open_in_memory().unwrap();
        store.insert_substance(&water()).unwrap();
        assert_eq!(store.find_substance_id("FeSO4").unwrap(), None);
    }

    #[test]
    fn test_duplicate_formula_first_wins() {
        let store = SeedStore::open_in_memory().unwrap();
        let first = store.insert_substance(&water()).unwrap();
        store.insert_substance(&water().with_description("again")).unwrap();

        assert_eq!(store.find_substance_id("H2O").unwrap(), Some(first));
        assert_eq!(store.find_substances_by_formula("H2O").unwrap().len(), 2);
    }

    #[test]
    fn test_molar_mass_check() {
        let store = SeedStore::open_in_memory().unwrap();
        let mut bad = water();
        bad.molar_mass = -1.0;
        assert!(matches!(store.insert_substance(&bad), Err(Error::Storage(_))));
    }

    #[test]
    fn test_link_crud() {
        let store = SeedStore::open_in_memory().unwrap();
        let h2 = store.insert_substance(&hydrogen()).unwrap();
        let h2o = store.insert_substance(&water()).unwrap();

        let reaction = Reaction::new("2H2 + O2 -> 2H2O", "化合反应", "点燃");
        let rid = store.insert_reaction(&reaction).unwrap();
        assert_eq!(store.find_reaction_id("2H2 + O2 -> 2H2O").unwrap(), Some(rid));

        store.insert_link(Side::Input, rid, h2, 2).unwrap();
        store.insert_link(Side::Output, rid, h2o, 2).unwrap();

        let inputs = store.links_for(Side::Input, rid).unwrap();
        assert_eq!(inputs, vec![LinkRow { substance_id: h2, formula: Some("H2".to_string()), coefficient: 2 }]);
        assert_eq!(store.count_links(Side::Output).unwrap(), 1);
    }

    #[test]
    fn test_coefficient_check() {
        let store = SeedStore::open_in_memory().unwrap();
        let h2 = store.insert_substance(&hydrogen()).unwrap();
        let rid = store.insert_reaction(&Reaction::new("H2 -> H2", "t", "c")).unwrap();
        assert!(store.insert_link(Side::Input, rid, h2, 0).is_err());
    }

    #[test]
    fn test_rollback_discards_rows() {
        let mut store = SeedStore::open_in_memory().unwrap();
        store.begin_transaction().unwrap();
        assert!(store.in_transaction());
        store.insert_substance(&water()).unwrap();
        store.rollback().unwrap();

        assert!(!store.in_transaction());
        assert_eq!(store.count_substances().unwrap(), 0);
    }

    #[test]
    fn test_stats() {
        let store = SeedStore::open_in_memory().unwrap();
        store.insert_substance(&water()).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats, DbStats { substances: 1, reactions: 0, inputs: 0, outputs: 0 });
        assert!(stats.to_string().contains("Substances: 1"));
    }
}
