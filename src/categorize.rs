use crate::model::{Category, RuleTable, Transaction};

/// Resolves transactions to categories using a borrowed `RuleTable`. Rules are tried in table
/// order and the first rule with a matching predicate decides the category.
#[derive(Debug, Clone, Copy)]
pub struct Categorizer<'a> {
    rules: &'a RuleTable,
}

impl<'a> Categorizer<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    /// Returns `Category::Uncategorized` when no rule matches.
    pub fn categorize(&self, transaction: &Transaction) -> Category {
        self.rules
            .rules()
            .iter()
            .find(|rule| rule.matches(transaction))
            .map(|rule| Category::named(rule.category()))
            .unwrap_or_default()
    }
}
