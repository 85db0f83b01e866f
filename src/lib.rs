pub mod aggregate;
pub mod args;
pub mod categorize;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod parse;
mod utils;
pub mod workbook;


pub use config::{Config, RulesSource};
pub use error::{Error, ErrorKind, ParseError, Result};
