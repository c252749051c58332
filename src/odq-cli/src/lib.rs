//! odq-cli library
//!
//! Argument parsing and the execution pipeline behind the `odq` binary:
//! parse an OData query expression, then either apply it to a JSON array
//! of documents or emit the translated MongoDB query spec.

mod cli;
mod executor;

pub use cli::{parse_args, Cli};
pub use executor::Executor;

/// Parses arguments, configures logging and runs the query pipeline.
pub fn run() -> anyhow::Result<()> {
    let cli = parse_args();
    init_logging(&cli);
    Executor::new(cli).execute()
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Off
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    // RUST_LOG still wins when set explicitly.
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
}
