//! CLI argument handling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

pub fn args() -> Args {
	Args::parse()
}

/// Log in with Steam from the command line.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
	/// Path to a TOML configuration file.
	///
	/// If unspecified, configuration is read from `STEAM_AUTH_*` environment variables.
	#[arg(short, long = "config", global = true)]
	pub config_path: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Prints the URL users should be redirected to for logging in.
	LoginUrl {
		/// The URL of the page the login is started from.
		#[arg(long)]
		request_uri: Url,
	},

	/// Verifies the URL Steam redirected a user to, and prints their profile as JSON.
	Verify {
		/// The full callback URL, including the `openid.*` query parameters.
		callback_uri: Url,

		/// Use this Web API key instead of the configured ones.
		#[arg(long, env = "STEAM_AUTH_CUSTOM_API_KEY", hide_env_values = true)]
		api_key: Option<String>,
	},
}
