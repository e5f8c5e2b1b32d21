use std::path::PathBuf;

use clap::{
	Args,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flags shared by every binary that boots from a configuration file.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}
