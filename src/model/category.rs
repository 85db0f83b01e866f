use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

pub(super) const UNCATEGORIZED_STR: &str = "uncategorized";

/// The result of categorizing a transaction: either the label of the first matching rule, or
/// `Uncategorized` when no rule matched. `Uncategorized` sorts before every named category.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum Category {
    #[default]
    Uncategorized,
    Named(String),
}

impl Category {
    pub fn named(label: impl Into<String>) -> Self {
        Category::Named(label.into())
    }

    /// The rule label, `None` for `Uncategorized`.
    pub fn label(&self) -> Option<&str> {
        match self {
            Category::Uncategorized => None,
            Category::Named(label) => Some(label),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Category::Uncategorized)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Uncategorized => f.write_str(UNCATEGORIZED_STR),
            Category::Named(label) => f.write_str(label),
        }
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncategorized_sorts_first() {
        let mut v = vec![
            Category::named("b"),
            Category::Uncategorized,
            Category::named("a"),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Category::Uncategorized,
                Category::named("a"),
                Category::named("b")
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Category::Uncategorized.to_string(), "uncategorized");
        assert_eq!(Category::named("Groceries").to_string(), "Groceries");
        assert_eq!(Category::named("Groceries").label(), Some("Groceries"));
        assert!(Category::default().is_uncategorized());
    }
}
