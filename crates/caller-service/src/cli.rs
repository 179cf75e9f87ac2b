//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contract-caller")]
#[command(about = "Calls an ink! flipper contract on a Substrate node", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file; built-in defaults are used without one
	#[arg(short, long, env = "CALLER_CONFIG", value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long, env = "CALLER_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// Emit logs as JSON lines
	#[arg(long)]
	pub json_logs: bool,

	/// Subcommand to execute
	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	/// Read the value, flip it and read it again
	Run,

	/// Read the stored value
	Get,

	/// Flip the stored value
	Flip,

	/// Validate the configuration and contract metadata without connecting
	Validate,
}
