use std::num::ParseIntError;
use std::result::Result as StdResult;
use std::str::ParseBoolError;
use std::io;

use thiserror::Error as ThisError;

pub type Result<T, E = Error> = StdResult<T, E>;

/// Any errors that can occur while constructing a [Config].
///
/// [Config]: crate::config::Config
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
	#[error("Missing environment variable `{0}`.")]
	MissingEnvironmentVariable(&'static str),

	#[error("Environment variable `{0}` is not valid unicode.")]
	InvalidEnvironmentVariable(&'static str),

	#[error("At least one Steam WebAPI key is required.")]
	NoApiKeys,

	#[error("`{value}` is neither an absolute URL nor an absolute path.")]
	InvalidRedirectUrl { value: String },

	#[error("Failed to parse URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("Failed to parse boolean: {0}")]
	InvalidBool(#[from] ParseBoolError),

	#[error("Failed to parse number: {0}")]
	InvalidNumber(#[from] ParseIntError),

	#[error("Failed to read config file: {0}")]
	Io(#[from] io::Error),

	#[error("Failed to parse config file: {0}")]
	Toml(#[from] toml::de::Error),
}

