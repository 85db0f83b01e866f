use clap::Parser;
use ingparse::args::{Args, Command};
use ingparse::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home)?.print(),

        Command::Totals(files_args) => {
            let config = Config::load(home, args.common().rules())?;
            commands::totals(&config, files_args.files())?.print()
        }

        Command::Report(report_args) => {
            let config = Config::load(home, args.common().rules())?;
            commands::report(&config, report_args)?.print()
        }

        Command::List(files_args) => {
            let config = Config::load(home, args.common().rules())?;
            commands::list(&config, files_args.files())?.print()
        }

        Command::Rules => {
            let config = Config::load(home, args.common().rules())?;
            commands::rules(&config)?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only. The library and
            // the binary share the crate name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
