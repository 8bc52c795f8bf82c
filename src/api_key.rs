//! Picking which Steam Web API key to use for a request.

use std::fmt;

use rand::seq::SliceRandom;

use crate::config::ApiKeys;

/// Strategy for choosing one of the configured API keys.
pub trait SelectApiKey: fmt::Debug + Send + Sync {
	/// Picks a key out of `keys`.
	fn select<'a>(&'a self, keys: &'a ApiKeys) -> &'a str;
}

/// Picks a key uniformly at random for every request.
///
/// This is the default, and spreads rate limits across all configured keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKey;

impl SelectApiKey for RandomKey {
	fn select<'a>(&'a self, keys: &'a ApiKeys) -> &'a str {
		keys.as_slice()
			.choose(&mut rand::thread_rng())
			.map(String::as_str)
			.expect("`ApiKeys` is never empty")
	}
}

/// Always uses the same key, ignoring the configured ones.
#[derive(Clone, PartialEq, Eq)]
pub struct PinnedKey(String);

impl PinnedKey {
	/// Pins `key`.
	pub fn new<K>(key: K) -> Self
	where
		K: Into<String>,
	{
		Self(key.into())
	}
}

impl fmt::Debug for PinnedKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PinnedKey(…)")
	}
}

impl SelectApiKey for PinnedKey {
	fn select<'a>(&'a self, _: &'a ApiKeys) -> &'a str {
		&self.0
	}
}
