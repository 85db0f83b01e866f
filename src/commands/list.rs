use crate::categorize::Categorizer;
use crate::commands::Out;
use crate::model::{Category, Transaction};
use crate::{parse, Config, Result};
use serde::Serialize;
use std::path::PathBuf;

/// A transaction together with the category it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct Listed {
    pub category: Category,
    pub transaction: Transaction,
}

/// Prints every transaction of `files`, in file order, prefixed with its category.
pub fn list(config: &Config, files: &[PathBuf]) -> Result<Out<Vec<Listed>>> {
    let categorizer = Categorizer::new(config.rules());
    let mut listed = Vec::new();
    for path in files {
        for transaction in parse::read_file(path)? {
            listed.push(Listed {
                category: categorizer.categorize(&transaction),
                transaction,
            });
        }
    }
    let message = listed
        .iter()
        .map(|l| format!("{}: {}", l.category, l.transaction))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, listed))
}
