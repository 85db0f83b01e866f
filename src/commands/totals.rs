use crate::aggregate::Totals;
use crate::categorize::Categorizer;
use crate::commands::Out;
use crate::{parse, Config, Result};
use anyhow::Context;
use std::path::PathBuf;
use tracing::debug;

/// Reads each of `files` in order and adds its transactions to one set of totals per month and
/// category.
///
/// # Errors
/// - Returns an error for the first file that cannot be read or contains a bad record, or when a
///   total overflows. Nothing is printed in that case.
pub fn totals(config: &Config, files: &[PathBuf]) -> Result<Out<Totals>> {
    let categorizer = Categorizer::new(config.rules());
    let mut totals = Totals::new();
    for path in files {
        let transactions = parse::read_file(path)?;
        totals
            .add(&categorizer, &transactions)
            .with_context(|| format!("Unable to add {} to the totals", path.display()))?;
        debug!("Added {} to the totals", path.display());
    }
    let message = if totals.is_empty() {
        "No transactions found".to_string()
    } else {
        totals.to_string()
    };
    Ok(Out::new(message, totals))
}
