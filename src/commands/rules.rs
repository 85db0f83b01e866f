use crate::commands::{plural, Out};
use crate::model::RuleTable;
use crate::{Config, Result};

/// Shows the active rule table, in evaluation order, and where it was loaded from.
pub fn rules(config: &Config) -> Result<Out<RuleTable>> {
    let table = config.rules();
    let mut message = format!(
        "{} rule{} from {}",
        table.len(),
        plural(table.len()),
        config.rules_source()
    );
    for (ix, rule) in table.rules().iter().enumerate() {
        let count = rule.predicates().len();
        message.push_str(&format!(
            "\n{:>3}. {} ({} predicate{})",
            ix + 1,
            rule.category(),
            count,
            plural(count)
        ));
    }
    Ok(Out::new(message, table.clone()))
}
