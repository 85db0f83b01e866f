use crate::model::{Amount, MutationType};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One transaction from an ING export. It is built once by the parser and never changes
/// afterwards. The category is not stored here, ask a `Categorizer` for it.
///
/// Only the parser creates transactions, so the sign of the amount always agrees with
/// `withdrawal`. There is no way to deserialize one:
///
/// ```compile_fail
/// let t: ingparse::model::Transaction = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    account: String,
    contra_account: String,
    mutation_type: MutationType,
    /// Signed: negative when `withdrawal` is true.
    amount: Amount,
    announcement: String,
    withdrawal: bool,
}

impl Transaction {
    /// `magnitude` must not be negative, the sign is derived from `withdrawal`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        date: NaiveDate,
        description: impl Into<String>,
        account: impl Into<String>,
        contra_account: impl Into<String>,
        mutation_type: MutationType,
        magnitude: Amount,
        announcement: impl Into<String>,
        withdrawal: bool,
    ) -> Self {
        debug_assert!(!magnitude.is_negative());
        let amount = if withdrawal { -magnitude } else { magnitude };
        Self {
            date,
            description: description.into(),
            account: account.into(),
            contra_account: contra_account.into(),
            mutation_type,
            amount,
            announcement: announcement.into(),
            withdrawal,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn contra_account(&self) -> &str {
        &self.contra_account
    }

    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// The signed amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    pub fn withdrawal(&self) -> bool {
        self.withdrawal
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.date, self.amount, self.description, self.contra_account
        )
    }
}
