//! Contains structures and functionality for the binary
use std::path::PathBuf;

/// Cli Arguments related to logging
#[derive(clap::Args, Debug)]
pub(crate) struct LoggingArgs {
    /// Increase log verbosity (multiple uses increase verbosity further)
    #[arg(short, long, action = clap::builder::ArgAction::Count, group = "verbosity", global = true)]
    verbose: u8,
    /// Reduce log verbosity to show only errors (equivalent to --log error)
    #[arg(short, long, group = "verbosity", global = true)]
    quiet: bool,
    /// Set log verbosity (default is "warn")
    #[arg(long = "log", value_parser=clap::builder::PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"]), group = "verbosity", global = true)]
    log_level: Option<String>,
}

impl LoggingArgs {
    /// Initialising Logging
    ///
    /// Sets the logging verbosity to the given log-level in the following order:
    ///  * `Info`, `Debug`, `Trace`; depending on the count of `-v`
    ///  * `Error` when `-q` is used
    ///  * The `CQDB_LOG` environment variable value
    ///  * `Warn` otherwise
    pub(crate) fn initialize_logging(&self) {
        let mut builder = env_logger::Builder::new();

        // Default log level
        builder.filter_level(log::LevelFilter::Warn);

        builder.parse_env("CQDB_LOG");
        if let Some(ref level) = self.log_level {
            builder.parse_filters(level);
        } else if self.quiet {
            builder.filter_level(log::LevelFilter::Error);
        } else if self.verbose > 0 {
            builder.filter_level(match self.verbose {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                3 => log::LevelFilter::Trace,
                _ => log::LevelFilter::Warn,
            });
        }
        builder.init();
    }
}

/// The task to perform.
#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// Minimize a conjunctive query
    Minimize {
        /// File holding the query to minimize
        #[arg(value_parser)]
        input: PathBuf,
        /// File the minimized query is written to
        #[arg(value_parser)]
        output: PathBuf,
    },
    /// Evaluate a conjunctive query over a database directory
    Evaluate {
        /// Database directory holding schema.txt and the relation files
        #[arg(value_parser)]
        database: PathBuf,
        /// File holding the query to evaluate
        #[arg(value_parser)]
        query: PathBuf,
        /// File the result tuples are written to
        #[arg(value_parser)]
        output: PathBuf,
    },
}

/// cqdb CLI
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct CliApp {
    /// The task to perform
    #[command(subcommand)]
    pub(crate) command: Command,
    /// Arguments related to logging
    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}
