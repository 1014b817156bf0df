//! Cmdweave - declarative command discovery

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmdweave::cli::{Cli, Commands};
use cmdweave::commands;
use cmdweave::commands::helpers::resolve_discovery;
use cmdweave::error::Result;

/// Log to stderr, honouring `RUST_LOG` when set
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "cmdweave=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List(args) => {
            let discovery = resolve_discovery(cli.directory, cli.config)?;
            commands::list::run(&discovery, args)
        }
        Commands::Show(args) => {
            let discovery = resolve_discovery(cli.directory, cli.config)?;
            commands::show::run(&discovery, args)
        }
        Commands::Validate => {
            let discovery = resolve_discovery(cli.directory, cli.config)?;
            commands::validate::run(&discovery)
        }
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
