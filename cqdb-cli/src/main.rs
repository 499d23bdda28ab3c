/*!
  Binary for the CLI of cqdb
*/

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates
)]

pub mod cli;

use clap::Parser;
use colored::Colorize;
use cqdb::{api, error::Error};

use crate::cli::{CliApp, Command};

fn run(cli: CliApp) -> Result<(), Error> {
    match cli.command {
        Command::Minimize { input, output } => {
            log::info!("Minimizing query ...");

            api::minimize_query_file(&input, &output)?;

            println!(
                "Minimized query written to \"{}\".",
                output.display().to_string().green().bold()
            );
        }
        Command::Evaluate {
            database,
            query,
            output,
        } => {
            log::info!("Evaluating query ...");

            let count = api::evaluate_query_file(&database, &query, &output)?;

            println!(
                "Evaluation completed. Wrote {} result {}.",
                count.to_string().green().bold(),
                if count == 1 { "tuple" } else { "tuples" },
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = CliApp::parse();

    cli.logging.initialize_logging();
    log::info!("Version: {}", clap::crate_version!());

    run(cli).unwrap_or_else(|err| {
        log::error!("{} {err}", "error:".red().bold());
        std::process::exit(1)
    })
}
