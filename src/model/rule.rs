use crate::model::category::UNCATEGORIZED_STR;
use crate::model::{MutationType, Transaction};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// A single test over a transaction. Every field is an optional condition; the conditions that
/// are present must all hold and absent ones are ignored, so an empty predicate matches
/// everything.
///
/// # Example
///
/// ```json
/// { "mutation_type": "Betaalautomaat", "withdrawal": true, "description_contains": ["JUMBO"] }
/// ```
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct MatchPredicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mutation_type: Option<MutationType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    withdrawal: Option<bool>,

    /// Matches when the description contains any of these, case-sensitive. An empty list is the
    /// same as no list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description_contains: Option<Vec<String>>,
}

impl MatchPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mutation_type(mut self, mutation_type: MutationType) -> Self {
        self.mutation_type = Some(mutation_type);
        self
    }

    pub fn withdrawal(mut self, withdrawal: bool) -> Self {
        self.withdrawal = Some(withdrawal);
        self
    }

    pub fn description_contains<S, I>(mut self, needles: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.description_contains = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(mutation_type) = self.mutation_type {
            if mutation_type != transaction.mutation_type() {
                return false;
            }
        }

        if let Some(withdrawal) = self.withdrawal {
            if withdrawal != transaction.withdrawal() {
                return false;
            }
        }

        match &self.description_contains {
            Some(needles) if !needles.is_empty() => needles
                .iter()
                .any(|needle| transaction.description().contains(needle.as_str())),
            _ => true,
        }
    }
}

/// A category label together with the predicates that select it. The rule applies when any of
/// its predicates matches.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Rule {
    category: String,
    #[serde(default)]
    matches: Vec<MatchPredicate>,
}

impl Rule {
    pub fn new(category: impl Into<String>, matches: Vec<MatchPredicate>) -> Self {
        Self {
            category: category.into(),
            matches,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn predicates(&self) -> &[MatchPredicate] {
        &self.matches
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches.iter().any(|m| m.matches(transaction))
    }
}

/// The ordered rule set. Earlier rules win over later ones. It is loaded once, see `Config`, and
/// never modified while transactions are being categorized.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

const DEFAULT_RULES_JSON: &str = include_str!("default_rules.json");

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The table that ships with the program, used when no rules file exists.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_RULES_JSON).context("The built-in rule table is invalid")
    }

    /// Parses a rule table.
    ///
    /// # Errors
    /// - The JSON does not describe a rule table.
    /// - A rule is labeled `uncategorized`, which would be indistinguishable from no match.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json).context("Unable to parse rule table")?;
        if let Some(ix) = table
            .rules
            .iter()
            .position(|r| r.category == UNCATEGORIZED_STR)
        {
            bail!(
                "Rule {} uses the reserved category name '{UNCATEGORIZED_STR}'",
                ix + 1
            );
        }
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Unable to serialize rule table")
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
