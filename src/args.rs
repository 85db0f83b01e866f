//! These structs provide the CLI interface for the ingparse CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ingparse: Categorize and summarize ING bank statement exports.
///
/// Download your transactions from Mijn ING as a comma-separated file and pass one or more of
/// those files to this program. Each transaction is given a category by the first matching rule
/// from your rule table. You can then see totals per month and category, or write a report
/// workbook per year.
///
/// Rules are read from $INGPARSE_HOME/rules_local.json or, if that does not exist,
/// $INGPARSE_HOME/rules.json. Without either, a built-in table is used. Run `ingparse init` to get
/// an editable copy of the built-in table.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and write the built-in rules to rules.json for editing.
    Init,
    /// Print the totals per month and category of all given files.
    ///
    /// The totals are keyed by month number only: February 2015 and February 2016 are added
    /// together.
    Totals(FilesArgs),
    /// Write a report workbook per year, with a page per month and a section per category.
    Report(ReportArgs),
    /// Print every transaction with its category.
    List(FilesArgs),
    /// Print the active rule table and where it was loaded from.
    Rules,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the rule files are held. Defaults to ~/.ingparse
    #[arg(long, env = "INGPARSE_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// Use this rules file instead of the ones in the home directory.
    #[arg(long)]
    rules: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf, rules: Option<PathBuf>) -> Self {
        Self {
            log_level,
            home: home.into(),
            rules,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn rules(&self) -> Option<&Path> {
        self.rules.as_deref()
    }
}

/// (Not shown): Args for the `ingparse totals` and `ingparse list` commands.
#[derive(Debug, Parser, Clone)]
pub struct FilesArgs {
    /// The ING export files to read, processed in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl FilesArgs {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// (Not shown): Args for the `ingparse report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// List every transaction under its category instead of only the category totals.
    #[arg(long, short)]
    detail: bool,

    /// The directory the workbooks are written to, one `<year>.csv` per year.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// The ING export files to read, processed in the order given.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl ReportArgs {
    pub fn new(detail: bool, out_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            detail,
            out_dir: out_dir.into(),
            files,
        }
    }

    pub fn detail(&self) -> bool {
        self.detail
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".ingparse"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or INGPARSE_HOME. Without it, only the built-in rules \
                are available.",
            );
            PathBuf::from(".ingparse")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
