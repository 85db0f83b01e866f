//! Configuration handling for ingparse.
//!
//! The only configuration is the rule table. It is resolved once at startup from the first of
//! these that exists:
//!
//! 1. the file given with `--rules`
//! 2. `$INGPARSE_HOME/rules_local.json`
//! 3. `$INGPARSE_HOME/rules.json`
//! 4. the table built into the program
//!
//! Tables are never merged.

use crate::model::RuleTable;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) const RULES_JSON: &str = "rules.json";
pub(crate) const RULES_LOCAL_JSON: &str = "rules_local.json";

/// Where the active rule table came from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum RulesSource {
    /// Passed explicitly on the command line.
    Explicit(PathBuf),
    /// `rules_local.json` in the home directory.
    Local(PathBuf),
    /// `rules.json` in the home directory.
    Default(PathBuf),
    /// Compiled into the program.
    Builtin,
}

impl RulesSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            RulesSource::Explicit(p) | RulesSource::Local(p) | RulesSource::Default(p) => Some(p),
            RulesSource::Builtin => None,
        }
    }
}

impl Display for RulesSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => f.write_str("built-in rules"),
        }
    }
}

/// The `Config` object holds the resolved rule table for the run. You instantiate it by providing
/// the path to `$INGPARSE_HOME` and, optionally, an explicit rules file.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    rules_source: RulesSource,
    rules: RuleTable,
}

impl Config {
    /// Resolves and loads the rule table.
    ///
    /// # Errors
    /// - The explicit rules file does not exist.
    /// - The chosen rules file cannot be read or parsed.
    pub fn load(home: impl Into<PathBuf>, rules: Option<&Path>) -> Result<Self> {
        let root = home.into();
        let rules_source = resolve(&root, rules)?;
        let rules = match rules_source.path() {
            Some(p) => load_rules(p)?,
            None => RuleTable::builtin()?,
        };
        debug!(
            "Loaded {} rule(s) from {}",
            rules.len(),
            rules_source
        );
        Ok(Self {
            root,
            rules_source,
            rules,
        })
    }

    /// Creates the home directory and writes the built-in rule table to `rules.json` so that it
    /// can be edited.
    ///
    /// # Errors
    /// - `rules.json` already exists.
    /// - Any file operation fails.
    pub fn create(home: impl Into<PathBuf>) -> Result<Self> {
        let root = home.into();
        utils::create_dir_all(&root).context("Unable to create the home directory")?;
        let path = root.join(RULES_JSON);
        if path.exists() {
            bail!("Refusing to overwrite the existing '{}'", path.display());
        }
        let rules = RuleTable::builtin()?;
        utils::write(&path, rules.to_json()?)?;
        Ok(Self {
            root,
            rules_source: RulesSource::Default(path),
            rules,
        })
    }

    #[cfg(test)]
    pub(crate) fn new(rules: RuleTable) -> Self {
        Self {
            root: PathBuf::new(),
            rules_source: RulesSource::Builtin,
            rules,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn rules_source(&self) -> &RulesSource {
        &self.rules_source
    }
}

fn resolve(root: &Path, explicit: Option<&Path>) -> Result<RulesSource> {
    if let Some(p) = explicit {
        if !p.is_file() {
            bail!("The rules file is missing '{}'", p.display());
        }
        return Ok(RulesSource::Explicit(p.to_path_buf()));
    }
    let local = root.join(RULES_LOCAL_JSON);
    if local.is_file() {
        return Ok(RulesSource::Local(local));
    }
    let default = root.join(RULES_JSON);
    if default.is_file() {
        return Ok(RulesSource::Default(default));
    }
    Ok(RulesSource::Builtin)
}

fn load_rules(path: &Path) -> Result<RuleTable> {
    let content = utils::read_to_string(path)?;
    RuleTable::from_json(&content)
        .with_context(|| format!("Failed to parse rules file at {}", path.display()))
}
