//! Writes grouped transactions as one CSV workbook per year.
//!
//! Each month is a page that starts with a title row such as `January 2015` and ends with an
//! empty row. A summary page lists `Category,Amount` rows and a closing `Total` row. A detailed
//! page has, per category, a title row, a `Date,Amount,Description,Contra Account` header, one
//! row per transaction and a closing `Sum` row.

use crate::aggregate::{MonthGroup, ReportRow, YearGroup};
use crate::Result;
use anyhow::Context;
use csv::WriterBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUMMARY_HEADER: [&str; 2] = ["Category", "Amount"];
const DETAIL_HEADER: [&str; 4] = ["Date", "Amount", "Description", "Contra Account"];
const TOTAL: &str = "Total";
const SUM: &str = "Sum";

/// Writes one workbook per year into `dir` and returns the paths, named `<year>.csv`.
pub fn write_workbooks(dir: &Path, years: &[YearGroup], detail: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create directory {}", dir.display()))?;
    let mut paths = Vec::with_capacity(years.len());
    for year in years {
        let path = dir.join(format!("{}.csv", year.year()));
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Unable to create file {}", path.display()))?;
        write_workbook(file, year, detail)
            .with_context(|| format!("Unable to write workbook {}", path.display()))?;
        debug!("Wrote {} month(s) to {}", year.months().len(), path.display());
        paths.push(path);
    }
    Ok(paths)
}

/// Writes the pages of `year` to `writer`.
pub fn write_workbook<W: Write>(writer: W, year: &YearGroup, detail: bool) -> Result<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    for month in year.months() {
        wtr.write_record([format!("{} {}", month.name(), year.year())])?;
        let rows = if detail {
            detail_page(month)
        } else {
            summary_page(month)
        };
        for row in rows {
            wtr.write_record(&row)?;
        }
        wtr.write_record([""])?;
    }
    wtr.flush()?;
    Ok(())
}

fn summary_page(month: &MonthGroup) -> Vec<Vec<String>> {
    let mut rows = vec![to_strings(&SUMMARY_HEADER)];
    for group in month.categories() {
        rows.extend(group.rows(false).iter().map(to_cells));
    }
    rows.push(vec![TOTAL.to_string(), month.total().to_string()]);
    rows
}

fn detail_page(month: &MonthGroup) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for group in month.categories() {
        rows.push(vec![group.category().to_string()]);
        rows.push(to_strings(&DETAIL_HEADER));
        rows.extend(group.rows(true).iter().map(to_cells));
    }
    rows
}

fn to_cells(row: &ReportRow) -> Vec<String> {
    match row {
        ReportRow::Summary { category, total } => vec![category.to_string(), total.to_string()],
        ReportRow::Detail {
            date,
            amount,
            description,
            contra_account,
        } => vec![
            date.to_string(),
            amount.to_string(),
            description.clone(),
            contra_account.clone(),
        ],
        ReportRow::Sum { total } => vec![SUM.to_string(), total.to_string()],
    }
}

fn to_strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}
