//! Types that represent the core data model, such as `Transaction` and `RuleTable`.
mod amount;
mod category;
mod mutation_type;
mod rule;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use mutation_type::{Direction, MutationType};
pub use rule::{MatchPredicate, Rule, RuleTable};
pub use transaction::Transaction;
