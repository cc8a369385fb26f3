//! donegate - completion quality gate for AI coding tools.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use donegate::cli::{self, Cli, Commands};
use donegate::Error;

fn main() -> Result<(), Error> {
    // Initialize logging. stdout carries the hook response, so logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("donegate=info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { root } => cli::check::run(root)?,
        Commands::Init => cli::init::run()?,
        Commands::Config => cli::config::show()?,
        Commands::Log { count } => cli::log::show(count)?,
    }

    Ok(())
}
