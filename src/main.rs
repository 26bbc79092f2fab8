//! # tileslim CLI
//!
//! Command-line tool for shrinking vector-tile MBTiles archives.
//!
//! ## Subcommands
//! - **slim**: Rewrite an archive, keeping only selected layers and road classes.
//! - **probe**: Show information about an archive.
//! - **profile**: Manage named layer selections.
//!
//! ## Example
//! ```sh
//! tileslim slim germany.mbtiles germany-slim.mbtiles --profile Touring
//! ```

mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = false,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(
		long,
		short = 'q',
		action = clap::ArgAction::Count,
		global = true,
		help = "Decrease logging verbosity",
		conflicts_with = "verbose",
		display_order = 100,
	)]
	quiet: u8,

	#[arg(
		long,
		short = 'v',
		action = clap::ArgAction::Count,
		global = true,
		help = "Increase logging verbosity\n(add more 'v' for greater detail, e.g., '-vvvv' for trace-level logs).",
		display_order = 100,
	)]
	verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Rewrite an archive, keeping only selected layers and road classes
	Slim(tools::slim::Subcommand),

	/// Show information about an archive
	Probe(tools::probe::Subcommand),

	/// Manage named layer selections
	Profile(tools::profile::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let verbosity = cli.verbose as i16 - cli.quiet as i16;
	let log_level = match verbosity {
		i16::MIN..=-1 => LevelFilter::Off,
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		3..=i16::MAX => LevelFilter::Trace,
	};

	env_logger::Builder::new()
		.filter_level(log_level)
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Slim(arguments) => tools::slim::run(arguments),
		Commands::Probe(arguments) => tools::probe::run(arguments),
		Commands::Profile(arguments) => tools::profile::run(arguments),
	}
}
