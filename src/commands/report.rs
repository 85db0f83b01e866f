use crate::aggregate::group;
use crate::args::ReportArgs;
use crate::categorize::Categorizer;
use crate::commands::{plural, Out};
use crate::{parse, workbook, Config, Result};
use std::path::PathBuf;

/// Reads all files, groups their transactions by year, month and category, and writes one
/// workbook per year into the output directory.
///
/// # Returns
///
/// On success, returns an `Out` containing the paths of the written workbooks.
///
/// # Errors
/// - Returns an error for the first file that cannot be read or contains a bad record, when a sum
///   overflows, or when a workbook cannot be written. No workbook is written if any input fails to
///   parse or a sum overflows.
pub fn report(config: &Config, args: &ReportArgs) -> Result<Out<Vec<PathBuf>>> {
    let mut transactions = Vec::new();
    for path in args.files() {
        transactions.extend(parse::read_file(path)?);
    }
    let categorizer = Categorizer::new(config.rules());
    let years = group(&categorizer, transactions)?;
    let paths = workbook::write_workbooks(args.out_dir(), &years, args.detail())?;

    let mut message = format!("Wrote {} workbook{}", paths.len(), plural(paths.len()));
    for path in &paths {
        message.push_str(&format!("\n  {}", path.display()));
    }
    Ok(Out::new(message, paths))
}
