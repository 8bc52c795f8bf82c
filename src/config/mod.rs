//! This module holds the [`Config`] struct for authenticating with Steam.
//!
//! A [`Config`] is built once, either from environment variables ([`Config::from_env()`]) or a
//! TOML file ([`Config::from_file()`]), and then handed to every [`Authenticator`] explicitly.
//!
//! [`Authenticator`]: crate::Authenticator

use std::env;
use std::fmt;
use std::num::NonZeroU32;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

mod error;
pub use error::{Error, Result};

/// Steam authentication configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// Where Steam should redirect users after they logged in.
	///
	/// If this is `None`, users are sent back to the URL they started the login from (minus the
	/// query string).
	#[serde(default)]
	pub redirect_url: Option<RedirectUrl>,

	/// [Steam WebAPI] keys.
	///
	/// One of these is picked for every API request, to spread requests across keys.
	///
	/// [Steam WebAPI]: https://steamcommunity.com/dev
	pub api_keys: ApiKeys,

	/// Whether to make an extra request for the user's Steam level.
	#[serde(default = "default_fetch_level")]
	pub fetch_level: bool,

	/// How many times a Web API request is attempted before giving up.
	#[serde(default = "default_retries")]
	pub retries: NonZeroU32,

	/// Steam's endpoints.
	#[serde(default)]
	pub endpoints: Endpoints,
}

impl Config {
	/// Creates a [`Config`] with default settings and the given API keys.
	pub fn new(api_keys: ApiKeys) -> Self {
		Self {
			redirect_url: None,
			api_keys,
			fetch_level: default_fetch_level(),
			retries: default_retries(),
			endpoints: Endpoints::default(),
		}
	}

	/// Creates a new [`Config`] by parsing relevant environment variables.
	///
	/// | Variable                  | Required | Format                    |
	/// |---------------------------|----------|---------------------------|
	/// | `STEAM_AUTH_API_KEYS`     | yes      | comma-separated keys      |
	/// | `STEAM_AUTH_REDIRECT_URL` | no       | absolute URL or path      |
	/// | `STEAM_AUTH_FETCH_LEVEL`  | no       | `true` / `false`          |
	/// | `STEAM_AUTH_RETRIES`      | no       | integer greater than zero |
	pub fn from_env() -> Result<Self> {
		let api_keys = get_env_var::<ApiKeys>("STEAM_AUTH_API_KEYS")?;
		let mut config = Self::new(api_keys);

		if let Some(redirect_url) = get_optional_env_var("STEAM_AUTH_REDIRECT_URL")? {
			config.redirect_url = Some(redirect_url);
		}

		if let Some(fetch_level) = get_optional_env_var("STEAM_AUTH_FETCH_LEVEL")? {
			config.fetch_level = fetch_level;
		}

		if let Some(retries) = get_optional_env_var("STEAM_AUTH_RETRIES")? {
			config.retries = retries;
		}

		Ok(config)
	}

	/// Reads a [`Config`] from a TOML file.
	pub fn from_file<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let contents = std::fs::read_to_string(path)?;
		let config = toml::from_str(&contents)?;

		Ok(config)
	}
}

fn default_fetch_level() -> bool {
	true
}

fn default_retries() -> NonZeroU32 {
	NonZeroU32::MIN
}

/// A non-empty list of Steam Web API keys.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct ApiKeys(Vec<String>);

impl ApiKeys {
	/// Creates a new key set.
	///
	/// Blank keys are skipped; if none remain, this returns [`Error::NoApiKeys`].
	pub fn new<I>(keys: I) -> Result<Self>
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		let keys = keys
			.into_iter()
			.map(Into::into)
			.map(|key: String| key.trim().to_owned())
			.filter(|key| !key.is_empty())
			.collect::<Vec<_>>();

		if keys.is_empty() {
			return Err(Error::NoApiKeys);
		}

		Ok(Self(keys))
	}

	/// The configured keys, in order.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	/// How many keys are configured. Never zero.
	#[allow(clippy::len_without_is_empty)]
	pub fn len(&self) -> usize {
		self.0.len()
	}
}

impl fmt::Debug for ApiKeys {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ApiKeys")
			.field(&format_args!("<{} redacted>", self.0.len()))
			.finish()
	}
}

impl TryFrom<Vec<String>> for ApiKeys {
	type Error = Error;

	fn try_from(keys: Vec<String>) -> Result<Self> {
		Self::new(keys)
	}
}

impl FromStr for ApiKeys {
	type Err = Error;

	fn from_str(keys: &str) -> Result<Self> {
		Self::new(keys.split(','))
	}
}

/// Where Steam should send users back to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RedirectUrl {
	/// A full URL, used as-is.
	Absolute(Url),

	/// A path, resolved against the origin of the request that started the login.
	Relative(String),
}

impl RedirectUrl {
	/// Turns this into an absolute URL, resolving relative paths against `current`.
	pub fn resolve(&self, current: &Url) -> Result<Url, url::ParseError> {
		match self {
			Self::Absolute(url) => Ok(url.clone()),
			Self::Relative(path) => current.join(path),
		}
	}
}

impl FromStr for RedirectUrl {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		match Url::parse(value) {
			Ok(url) => Ok(Self::Absolute(url)),
			Err(url::ParseError::RelativeUrlWithoutBase) if value.starts_with('/') => {
				Ok(Self::Relative(value.to_owned()))
			}
			Err(url::ParseError::RelativeUrlWithoutBase) => Err(Error::InvalidRedirectUrl {
				value: value.to_owned(),
			}),
			Err(error) => Err(error.into()),
		}
	}
}

impl TryFrom<String> for RedirectUrl {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		value.parse()
	}
}

/// The Steam endpoints we talk to.
///
/// These only need changing for tests or when going through a proxy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Endpoints {
	/// Steam's OpenID 2.0 provider endpoint.
	pub openid: Url,

	/// Base URL of the Steam Web API.
	pub web_api: Url,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			openid: Url::parse(steam_openid::LOGIN_URL).expect("hard-coded URL should be valid"),
			web_api: Url::parse("https://api.steampowered.com").expect("hard-coded URL should be valid"),
		}
	}
}

fn get_env_var<T>(var: &'static str) -> Result<T>
where
	T: FromStr,
	<T as FromStr>::Err: Into<Error>,
{
	get_optional_env_var(var)?.ok_or(Error::MissingEnvironmentVariable(var))
}

fn get_optional_env_var<T>(var: &'static str) -> Result<Option<T>>
where
	T: FromStr,
	<T as FromStr>::Err: Into<Error>,
{
	match env::var(var) {
		Ok(value) if value.trim().is_empty() => Ok(None),
		Ok(value) => value.trim().parse().map(Some).map_err(Into::into),
		Err(env::VarError::NotPresent) => Ok(None),
		Err(env::VarError::NotUnicode(_)) => Err(Error::InvalidEnvironmentVariable(var)),
	}
}

#[cfg(test)]
mod tests {
	use std::env;
	use std::num::NonZeroU32;

	use url::Url;

	use super::{ApiKeys, Config, Error, RedirectUrl};

	#[test]
	fn api_keys_must_not_be_empty() {
		assert!(matches!(ApiKeys::new(Vec::<String>::new()), Err(Error::NoApiKeys)), "no keys");
		assert!(matches!(" , ,".parse::<ApiKeys>(), Err(Error::NoApiKeys)), "only blank keys");

		let keys = "first, second,".parse::<ApiKeys>().unwrap();

		assert_eq!(keys.as_slice(), ["first", "second"], "keys are trimmed");
	}

	#[test]
	fn api_keys_are_redacted() {
		let keys = ApiKeys::new(["super-secret"]).unwrap();

		assert!(!format!("{keys:?}").contains("super-secret"), "keys must not leak into logs");
	}

	#[test]
	fn parses_redirect_urls() {
		let current = Url::parse("https://example.test/login?openid.mode=id_res").unwrap();

		let absolute = "https://used.test/login".parse::<RedirectUrl>().unwrap();
		let relative = "/auth/callback".parse::<RedirectUrl>().unwrap();

		assert_eq!(
			absolute.resolve(&current).unwrap().as_str(),
			"https://used.test/login",
			"absolute URLs are used as-is",
		);

		assert_eq!(
			relative.resolve(&current).unwrap().as_str(),
			"https://example.test/auth/callback",
			"relative URLs are resolved against the current origin",
		);

		assert!("not a url".parse::<RedirectUrl>().is_err(), "garbage is rejected");
	}

	#[test]
	fn reads_toml() {
		let config = toml::from_str::<Config>(
			r#"
			redirect-url = "https://used.test/login"
			api-keys = ["a", "b"]
			fetch-level = false
			retries = 3
			"#,
		)
		.unwrap();

		assert_eq!(config.api_keys.len(), 2, "both keys are read");
		assert!(!config.fetch_level, "fetch-level is read");
		assert_eq!(config.retries, NonZeroU32::new(3).unwrap(), "retries are read");
		assert_eq!(
			config.endpoints.openid.as_str(),
			steam_openid::LOGIN_URL,
			"endpoints default to Steam",
		);
	}

	#[test]
	fn toml_rejects_empty_key_list() {
		assert!(toml::from_str::<Config>("api-keys = []").is_err(), "empty key list is an error");
	}

	#[test]
	fn defaults() {
		let config = Config::new(ApiKeys::new(["key"]).unwrap());

		assert!(config.redirect_url.is_none(), "no redirect URL by default");
		assert!(config.fetch_level, "level is fetched by default");
		assert_eq!(config.retries.get(), 1, "one attempt by default");
	}

	/// Every case touches the process environment, so they all run in one test.
	#[test]
	fn reads_environment() {
		const VARS: [&str; 4] = [
			"STEAM_AUTH_API_KEYS",
			"STEAM_AUTH_REDIRECT_URL",
			"STEAM_AUTH_FETCH_LEVEL",
			"STEAM_AUTH_RETRIES",
		];

		fn with_env(vars: &[(&str, &str)]) -> super::Result<Config> {
			for var in VARS {
				env::remove_var(var);
			}

			for (var, value) in vars {
				env::set_var(var, value);
			}

			Config::from_env()
		}

		assert!(
			matches!(with_env(&[]), Err(Error::MissingEnvironmentVariable("STEAM_AUTH_API_KEYS"))),
			"api keys are required",
		);

		assert!(
			matches!(
				with_env(&[("STEAM_AUTH_API_KEYS", "  ")]),
				Err(Error::MissingEnvironmentVariable("STEAM_AUTH_API_KEYS")),
			),
			"blank values count as unset",
		);

		let config = with_env(&[("STEAM_AUTH_API_KEYS", "a,b"), ("STEAM_AUTH_FETCH_LEVEL", "")]).unwrap();

		assert_eq!(config.api_keys.as_slice(), ["a", "b"], "keys are split on commas");
		assert!(config.fetch_level, "blank fetch level keeps the default");
		assert!(config.redirect_url.is_none(), "no redirect url");

		assert!(
			matches!(
				with_env(&[("STEAM_AUTH_API_KEYS", "a"), ("STEAM_AUTH_FETCH_LEVEL", "maybe")]),
				Err(Error::InvalidBool(_)),
			),
			"fetch level must be a bool",
		);

		assert!(
			matches!(
				with_env(&[("STEAM_AUTH_API_KEYS", "a"), ("STEAM_AUTH_RETRIES", "0")]),
				Err(Error::InvalidNumber(_)),
			),
			"retries must be greater than zero",
		);

		let config = with_env(&[
			("STEAM_AUTH_API_KEYS", "a"),
			("STEAM_AUTH_REDIRECT_URL", "/auth/callback"),
			("STEAM_AUTH_FETCH_LEVEL", "false"),
			("STEAM_AUTH_RETRIES", "3"),
		])
		.unwrap();

		assert_eq!(
			config.redirect_url,
			Some(RedirectUrl::Relative(String::from("/auth/callback"))),
			"paths are kept relative",
		);
		assert!(!config.fetch_level, "fetch level is read");
		assert_eq!(config.retries.get(), 3, "retries are read");

		for var in VARS {
			env::remove_var(var);
		}
	}
}
