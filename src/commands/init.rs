use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and writes the built-in rule table to `rules.json`.
///
/// # Arguments
/// - `home` - The directory that will hold the rule files, e.g. `$HOME/.ingparse`
///
/// # Errors
/// - Returns an error if `rules.json` already exists or any file operation fails.
pub fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home).context("Unable to create the home directory and rules")?;
    Ok(format!(
        "Wrote {} rules to {}, copy it to rules_local.json or edit it in place",
        config.rules().len(),
        config.rules_source()
    )
    .into())
}
