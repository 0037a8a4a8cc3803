use crate::loader::{MissPolicy, SeedOptions, DEFAULT_DATABASE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings read from `chemseed.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SeedConfig {
    /// Database file to rebuild
    pub database: Option<String>,
    /// Dataset file to load instead of the built-in knowledge base
    pub dataset: Option<String>,
    pub on_missing: Option<MissPolicy>,
}

impl SeedConfig {
    /// Config with every field set to its built-in default, for `init-config`
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
            dataset: None,
            on_missing: Some(MissPolicy::default()),
        }
    }

    /// Merge command-line values over this config. Flags win, then config, then defaults.
    pub fn resolve(
        &self,
        database: Option<PathBuf>,
        on_missing: Option<MissPolicy>,
    ) -> SeedOptions {
        let database = database
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        let on_missing = on_missing.or(self.on_missing).unwrap_or_default();
        SeedOptions { database, on_missing }
    }

    /// Dataset path, if one was configured
    pub fn dataset_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.dataset.as_ref().map(PathBuf::from))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("chemseed.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SeedConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SeedConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SeedConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let config = SeedConfig {
            database: Some("lab/kb.db".to_string()),
            dataset: None,
            on_missing: Some(MissPolicy::Warn),
        };

        let opts = config.resolve(None, None);
        assert_eq!(opts.database, PathBuf::from("lab/kb.db"));
        assert_eq!(opts.on_missing, MissPolicy::Warn);

        let opts = config.resolve(Some(PathBuf::from("other.db")), Some(MissPolicy::Fail));
        assert_eq!(opts.database, PathBuf::from("other.db"));
        assert_eq!(opts.on_missing, MissPolicy::Fail);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let opts = SeedConfig::default().resolve(None, None);
        assert_eq!(opts, SeedOptions::default());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chemseed.toml");

        write_config(&path, &SeedConfig::with_defaults(), false).unwrap();
        assert!(write_config(&path, &SeedConfig::default(), false).is_err());

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, SeedConfig::with_defaults());
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_policy_from_toml() {
        let config: SeedConfig = toml::from_str("on_missing = \"fail\"\ndataset = \"kb.toml\"").unwrap();
        assert_eq!(config.on_missing, Some(MissPolicy::Fail));
        assert_eq!(config.dataset_path(None), Some(PathBuf::from("kb.toml")));
    }
}
