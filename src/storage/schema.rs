//! Database schema definitions

/// SQL to create the substances table
///
/// `formula` is the natural lookup key during loading but is deliberately
/// not declared UNIQUE.
pub const CREATE_SUBSTANCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS substances (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    formula TEXT NOT NULL,
    category TEXT,
    state TEXT,
    color TEXT,
    description TEXT,
    molar_mass REAL CHECK (molar_mass > 0)
)
"#;

/// SQL to create the reactions table
pub const CREATE_REACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    equation TEXT,
    type TEXT,
    conditions TEXT,
    description TEXT
)
"#;

/// SQL to create the reaction_inputs junction table
pub const CREATE_REACTION_INPUTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reaction_inputs (
    reaction_id INTEGER,
    substance_id INTEGER,
    coefficient INTEGER CHECK (coefficient > 0),
    FOREIGN KEY(reaction_id) REFERENCES reactions(id),
    FOREIGN KEY(substance_id) REFERENCES substances(id)
)
"#;

/// SQL to create the reaction_outputs junction table
pub const CREATE_REACTION_OUTPUTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reaction_outputs (
    reaction_id INTEGER,
    substance_id INTEGER,
    coefficient INTEGER CHECK (coefficient > 0),
    FOREIGN KEY(reaction_id) REFERENCES reactions(id),
    FOREIGN KEY(substance_id) REFERENCES substances(id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_substances_formula ON substances(formula)",
    "CREATE INDEX IF NOT EXISTS idx_reaction_inputs_reaction ON reaction_inputs(reaction_id)",
    "CREATE INDEX IF NOT EXISTS idx_reaction_outputs_reaction ON reaction_outputs(reaction_id)",
];

/// Tables in creation order
pub const TABLES: &[&str] = &["substances", "reactions", "reaction_inputs", "reaction_outputs"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_SUBSTANCES_TABLE,
        CREATE_REACTIONS_TABLE,
        CREATE_REACTION_INPUTS_TABLE,
        CREATE_REACTION_OUTPUTS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
