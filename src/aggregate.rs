//! Summarizes categorized transactions.
//!
//! - `Totals` sums signed amounts per month number and category.
//! - `group` sorts transactions by year, month, category and date and nests them into
//!   `YearGroup` > `MonthGroup` > `CategoryGroup` for the workbook writer.

use crate::categorize::Categorizer;
use crate::model::{Amount, Category, Transaction};
use crate::Result;
use anyhow::Context;
use chrono::{Month, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Sums per month and category.
///
/// The key is the month number only, so January 2015 and January 2016 share one bucket. Use
/// `group` to keep years apart.
// TODO: decide with users whether totals should be keyed by (year, month) instead.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Totals {
    months: BTreeMap<u32, BTreeMap<Category, Amount>>,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `transactions` to the running totals. Call once per file; totals accumulate.
    ///
    /// # Errors
    /// - A sum no longer fits in a `Decimal`. Totals added before the failing transaction remain.
    pub fn add<'t>(
        &mut self,
        categorizer: &Categorizer<'_>,
        transactions: impl IntoIterator<Item = &'t Transaction>,
    ) -> Result<()> {
        for transaction in transactions {
            self.add_one(categorizer.categorize(transaction), transaction)?;
        }
        Ok(())
    }

    fn add_one(&mut self, category: Category, transaction: &Transaction) -> Result<()> {
        let month = transaction.month();
        let sum = self
            .months
            .entry(month)
            .or_default()
            .entry(category)
            .or_default();
        *sum = sum.checked_add(transaction.amount()).with_context(|| {
            format!(
                "The {} total overflows when adding '{transaction}'",
                month_name(month)
            )
        })?;
        Ok(())
    }

    pub fn months(&self) -> &BTreeMap<u32, BTreeMap<Category, Amount>> {
        &self.months
    }

    pub fn month(&self, month: u32) -> Option<&BTreeMap<Category, Amount>> {
        self.months.get(&month)
    }

    pub fn get(&self, month: u32, category: &Category) -> Option<Amount> {
        self.month(month).and_then(|m| m.get(category)).copied()
    }

    /// Sum over all categories of `month`, zero for a month without transactions.
    pub fn month_total(&self, month: u32) -> Result<Amount> {
        let Some(categories) = self.month(month) else {
            return Ok(Amount::ZERO);
        };
        Amount::checked_sum(categories.values())
            .with_context(|| format!("The {} total overflows", month_name(month)))
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

impl Display for Totals {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self
            .months
            .values()
            .flat_map(|m| m.keys())
            .map(|c| c.to_string().chars().count())
            .max()
            .unwrap_or_default();
        for (month, categories) in &self.months {
            writeln!(f, "{month:>2} {}:", month_name(*month))?;
            for (category, amount) in categories {
                let label = category.to_string();
                let amount = amount.to_string();
                writeln!(f, "    {label:<width$}  {amount:>12}")?;
            }
        }
        Ok(())
    }
}

/// One transaction line of a detailed report, or a summary or sum line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReportRow {
    Summary {
        category: Category,
        total: Amount,
    },
    Detail {
        date: NaiveDate,
        amount: Amount,
        description: String,
        contra_account: String,
    },
    Sum {
        total: Amount,
    },
}

/// The transactions of one category within one month, in date order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryGroup {
    category: Category,
    transactions: Vec<Transaction>,
    total: Amount,
}

impl CategoryGroup {
    fn new(category: Category) -> Self {
        Self {
            category,
            transactions: Vec::new(),
            total: Amount::ZERO,
        }
    }

    fn push(&mut self, transaction: Transaction) -> Result<()> {
        self.total = self
            .total
            .checked_add(transaction.amount())
            .with_context(|| format!("The {} sum overflows at '{transaction}'", self.category))?;
        self.transactions.push(transaction);
        Ok(())
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Either a single `Summary` row, or a `Detail` row per transaction followed by a `Sum` row.
    pub fn rows(&self, detail: bool) -> Vec<ReportRow> {
        if !detail {
            return vec![ReportRow::Summary {
                category: self.category.clone(),
                total: self.total,
            }];
        }
        self.transactions
            .iter()
            .map(|t| ReportRow::Detail {
                date: t.date(),
                amount: t.amount(),
                description: t.description().to_string(),
                contra_account: t.contra_account().to_string(),
            })
            .chain(std::iter::once(ReportRow::Sum { total: self.total }))
            .collect()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthGroup {
    month: u32,
    categories: Vec<CategoryGroup>,
    total: Amount,
}

impl MonthGroup {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }

    pub fn categories(&self) -> &[CategoryGroup] {
        &self.categories
    }

    /// Sum over all categories.
    pub fn total(&self) -> Amount {
        self.total
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct YearGroup {
    year: i32,
    months: Vec<MonthGroup>,
}

impl YearGroup {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[MonthGroup] {
        &self.months
    }

    /// All transactions of the year in report order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.months
            .iter()
            .flat_map(|m| m.categories.iter())
            .flat_map(|c| c.transactions.iter())
    }
}

/// Sorts `transactions` by (year, month, category, date) and nests them into groups. The sort is
/// stable, so transactions with equal keys keep their input order.
///
/// # Errors
/// - A category or month sum no longer fits in a `Decimal`.
pub fn group(
    categorizer: &Categorizer<'_>,
    transactions: impl IntoIterator<Item = Transaction>,
) -> Result<Vec<YearGroup>> {
    let mut keyed: Vec<(Category, Transaction)> = transactions
        .into_iter()
        .map(|t| (categorizer.categorize(&t), t))
        .collect();

    keyed.sort_by(|(c1, t1), (c2, t2)| {
        (t1.year(), t1.month(), c1, t1.date()).cmp(&(t2.year(), t2.month(), c2, t2.date()))
    });

    let mut years: Vec<YearGroup> = Vec::new();
    for (category, transaction) in keyed {
        let year = last_or_push(
            &mut years,
            |y| y.year == transaction.year(),
            || YearGroup {
                year: transaction.year(),
                months: Vec::new(),
            },
        );
        let month = last_or_push(
            &mut year.months,
            |m| m.month == transaction.month(),
            || MonthGroup {
                month: transaction.month(),
                categories: Vec::new(),
                total: Amount::ZERO,
            },
        );
        month.total = month
            .total
            .checked_add(transaction.amount())
            .with_context(|| format!("The {} total overflows at '{transaction}'", month.name()))?;
        let group = last_or_push(
            &mut month.categories,
            |c| c.category == category,
            || CategoryGroup::new(category.clone()),
        );
        group.push(transaction)?;
    }
    Ok(years)
}

/// Returns the last element if `is_same` holds for it, otherwise appends `make()` and returns it.
fn last_or_push<T>(
    items: &mut Vec<T>,
    is_same: impl Fn(&T) -> bool,
    make: impl FnOnce() -> T,
) -> &mut T {
    if !items.last().is_some_and(is_same) {
        items.push(make());
    }
    let ix = items.len() - 1;
    &mut items[ix]
}

pub(crate) fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchPredicate, Rule, RuleTable};
    use crate::parse::parse_row;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn t(date: &str, description: &str, af_bij: &str, amount: &str) -> Transaction {
        parse_row(&[
            date,
            description,
            "NL00",
            "NL99",
            "BA",
            af_bij,
            amount,
            "Betaalautomaat",
            "",
        ])
        .unwrap()
    }

    fn rules() -> RuleTable {
        RuleTable::new(vec![
            Rule::new(
                "Groceries",
                vec![MatchPredicate::new().description_contains(["JUMBO", "LIDL"])],
            ),
            Rule::new(
                "Books",
                vec![MatchPredicate::new().description_contains(["BOEKHANDEL"])],
            ),
        ])
    }

    fn dec(s: &str) -> Amount {
        Amount::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_totals_per_month_and_category() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150103", "JUMBO", "Af", "10,00"),
            t("20150110", "LIDL", "Af", "5,50"),
            t("20150111", "BOEKHANDEL", "Af", "20,00"),
            t("20150112", "REFUND", "Bij", "3,00"),
            t("20150201", "JUMBO", "Af", "1,00"),
        ];
        let mut totals = Totals::new();
        totals.add(&c, &transactions).unwrap();

        let groceries = Category::named("Groceries");
        assert_eq!(totals.get(1, &groceries), Some(dec("-15.50")));
        assert_eq!(totals.get(1, &Category::named("Books")), Some(dec("-20.00")));
        assert_eq!(totals.get(1, &Category::Uncategorized), Some(dec("3.00")));
        assert_eq!(totals.get(2, &groceries), Some(dec("-1.00")));
        assert_eq!(totals.get(3, &groceries), None);
        assert_eq!(totals.months().len(), 2);
    }

    #[test]
    fn test_month_total_equals_sum_of_transactions() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150103", "JUMBO", "Af", "10,01"),
            t("20150110", "X", "Bij", "0,02"),
            t("20150111", "BOEKHANDEL", "Af", "20,10"),
        ];
        let mut totals = Totals::new();
        totals.add(&c, &transactions).unwrap();
        let amounts: Vec<Amount> = transactions.iter().map(Transaction::amount).collect();
        let expected = Amount::checked_sum(&amounts).unwrap();
        assert_eq!(totals.month_total(1).unwrap(), expected);
        assert_eq!(totals.month_total(5).unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_totals_merge_years_and_files() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let file_1 = vec![t("20150214", "JUMBO", "Af", "10,00")];
        let file_2 = vec![t("20160203", "JUMBO", "Af", "2,50")];
        let mut totals = Totals::new();
        totals.add(&c, &file_1).unwrap();
        totals.add(&c, &file_2).unwrap();
        assert_eq!(totals.months().len(), 1);
        assert_eq!(
            totals.get(2, &Category::named("Groceries")),
            Some(dec("-12.50"))
        );
    }

    #[test]
    fn test_totals_display() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let mut totals = Totals::new();
        totals.add(&c, &[t("20150103", "JUMBO", "Af", "10,00")]).unwrap();
        let s = totals.to_string();
        assert!(s.starts_with(" 1 January:\n"));
        assert!(s.contains("Groceries"));
        assert!(s.contains("-10.00"));
    }

    #[test]
    fn test_totals_serialize() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let mut totals = Totals::new();
        totals.add(&c, &[t("20150103", "JUMBO", "Af", "10,00")]).unwrap();
        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"1":{"Groceries":"-10.00"}}"#);
    }

    #[test]
    fn test_group_nesting_and_order() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20160105", "JUMBO", "Af", "1,00"),
            t("20150220", "LIDL", "Af", "2,00"),
            t("20150215", "BOEKHANDEL", "Af", "3,00"),
            t("20150210", "JUMBO", "Af", "4,00"),
            t("20150201", "OTHER", "Bij", "5,00"),
        ];
        let years = group(&c, transactions).unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year(), 2015);
        assert_eq!(years[1].year(), 2016);

        let feb = &years[0].months()[0];
        assert_eq!(feb.month(), 2);
        assert_eq!(feb.name(), "February");
        let labels: Vec<String> = feb
            .categories()
            .iter()
            .map(|g| g.category().to_string())
            .collect();
        assert_eq!(labels, vec!["uncategorized", "Books", "Groceries"]);

        let groceries = &feb.categories()[2];
        let dates: Vec<String> = groceries
            .transactions()
            .iter()
            .map(|t| t.date().to_string())
            .collect();
        assert_eq!(dates, vec!["2015-02-10", "2015-02-20"]);
        assert_eq!(groceries.total(), dec("-6.00"));
        assert_eq!(feb.total(), dec("-4.00"));
    }

    #[test]
    fn test_group_is_stable_for_equal_keys() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150210", "JUMBO B", "Af", "1,00"),
            t("20150210", "JUMBO A", "Af", "2,00"),
            t("20150210", "LIDL C", "Af", "3,00"),
        ];
        let years = group(&c, transactions).unwrap();
        let descriptions: Vec<&str> = years[0]
            .transactions()
            .map(Transaction::description)
            .collect();
        assert_eq!(descriptions, vec!["JUMBO B", "JUMBO A", "LIDL C"]);
    }

    #[test]
    fn test_group_concatenation_is_sorted() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150320", "LIDL", "Af", "1,00"),
            t("20150105", "X", "Af", "1,00"),
            t("20150315", "BOEKHANDEL", "Af", "1,00"),
            t("20150101", "JUMBO", "Af", "1,00"),
            t("20140301", "JUMBO", "Af", "1,00"),
        ];
        let years = group(&c, transactions).unwrap();
        let keys: Vec<_> = years
            .iter()
            .flat_map(YearGroup::transactions)
            .map(|t| (t.year(), t.month(), c.categorize(t), t.date()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_group_empty() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        assert!(group(&c, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_rows_summary_and_detail() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let years = group(
            &c,
            vec![
                t("20150103", "JUMBO", "Af", "10,00"),
                t("20150104", "LIDL", "Af", "2,25"),
            ],
        )
        .unwrap();
        let g = &years[0].months()[0].categories()[0];

        assert_eq!(
            g.rows(false),
            vec![ReportRow::Summary {
                category: Category::named("Groceries"),
                total: dec("-12.25"),
            }]
        );

        let rows = g.rows(true);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            ReportRow::Detail {
                date: NaiveDate::from_ymd_opt(2015, 1, 3).unwrap(),
                amount: dec("-10.00"),
                description: "JUMBO".to_string(),
                contra_account: "NL99".to_string(),
            }
        );
        assert_eq!(rows[2], ReportRow::Sum { total: dec("-12.25") });
    }

    const MAX: &str = "79228162514264337593543950335";

    #[test]
    fn test_totals_overflow_is_an_error() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150103", "JUMBO", "Bij", MAX),
            t("20150104", "JUMBO", "Bij", MAX),
        ];
        let mut totals = Totals::new();
        let err = totals.add(&c, &transactions).unwrap_err();
        assert!(format!("{err:#}").contains("January total overflows"));
    }

    #[test]
    fn test_month_total_overflow_is_an_error() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let transactions = vec![
            t("20150103", "JUMBO", "Bij", MAX),
            t("20150104", "BOEKHANDEL", "Bij", MAX),
        ];
        let mut totals = Totals::new();
        totals.add(&c, &transactions).unwrap();
        assert!(totals.month_total(1).is_err());
    }

    #[test]
    fn test_group_overflow_is_an_error() {
        let rules = rules();
        let c = Categorizer::new(&rules);
        let same_category = vec![
            t("20150103", "JUMBO", "Af", MAX),
            t("20150104", "LIDL", "Af", MAX),
        ];
        assert!(group(&c, same_category).is_err());
        let across_categories = vec![
            t("20150103", "JUMBO", "Bij", MAX),
            t("20150104", "BOEKHANDEL", "Bij", MAX),
        ];
        let err = group(&c, across_categories).unwrap_err();
        assert!(format!("{err:#}").contains("January total overflows"));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
