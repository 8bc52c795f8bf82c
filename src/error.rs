//! Errors produced while authenticating a Steam user.
//!
//! Every failure falls in one of two buckets, see [`ErrorKind`]:
//!
//! - the callback was rejected ([`ValidationError`], [`AuthenticationError`], [`ProfileError`]);
//!   the user should simply log in again
//! - something went wrong talking to Steam (transport failures, bad status codes, undecodable
//!   responses); this most likely means Steam is having an outage and deserves an alert
//!
//! This module also exposes a [`Result`] type alias, which sets [`Error`] as the default `E` type
//! parameter.

use reqwest::StatusCode;
use steam_openid::{MissingParameter, SteamId};
use thiserror::Error;

use crate::http::BoxError;

/// Type alias for a [`Result<T, E>`] with its `E` parameter set to [`Error`].
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error that can occur during [`Authenticator::auth()`].
///
/// [`Authenticator::auth()`]: crate::Authenticator::auth
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	#[error(transparent)]
	Profile(#[from] ProfileError),

	#[error("Error communicating with Steam: {0}")]
	Http(#[source] BoxError),

	#[error("Steam returned {status}")]
	BadStatus {
		/// The status code of the last attempt.
		status: StatusCode,

		/// The response body, for diagnostics.
		body: String,
	},

	#[error("Failed to decode Steam response: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("Failed to build URL: {0}")]
	InvalidUrl(#[from] url::ParseError),
}

/// Which bucket an [`Error`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The login attempt itself was invalid; the user should restart the login flow.
	Rejected,

	/// Steam could not be reached or answered with something we couldn't understand.
	Fault,
}

/// The callback request is malformed or was not meant for us.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("The \"{0}\" parameter is required")]
	MissingParameter(&'static str),

	#[error("openid_return_to does not match redirect url")]
	ReturnToMismatch {
		/// The URL we would have sent the user to Steam with.
		expected: String,

		/// The URL Steam claims to redirect to.
		actual: String,
	},
}

/// Steam did not vouch for the callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
	#[error("Steam did not confirm the login")]
	ResponseNotValid {
		/// Whatever Steam answered with.
		body: String,
	},

	#[error("`{claimed_id}` does not contain a SteamID")]
	SteamIdNotFound {
		/// The `openid.claimed_id` we received.
		claimed_id: String,
	},
}

/// The Web API did not return a usable profile for the verified user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
	#[error("No Steam profile found for {steam_id}")]
	NotFound { steam_id: SteamId },

	#[error("Steam returned the profile of {actual} instead of {expected}")]
	SteamIdMismatch { expected: SteamId, actual: SteamId },
}

impl Error {
	/// Classifies this error.
	pub const fn kind(&self) -> ErrorKind {
		match self {
			Self::Validation(_) | Self::Authentication(_) | Self::Profile(_) => ErrorKind::Rejected,
			Self::Http(_) | Self::BadStatus { .. } | Self::Decode(_) | Self::InvalidUrl(_) => {
				ErrorKind::Fault
			}
		}
	}

	/// Whether the user should be asked to log in again.
	pub const fn is_rejection(&self) -> bool {
		matches!(self.kind(), ErrorKind::Rejected)
	}
}

impl From<MissingParameter> for ValidationError {
	fn from(MissingParameter { parameter }: MissingParameter) -> Self {
		Self::MissingParameter(parameter)
	}
}

impl From<MissingParameter> for Error {
	fn from(error: MissingParameter) -> Self {
		Self::Validation(error.into())
	}
}
