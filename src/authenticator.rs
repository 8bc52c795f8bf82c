//! The login flow.
//!
//! A login consists of two requests made by the user's browser:
//!
//! 1. The user asks to log in, and gets redirected to the URL returned by
//!    [`Authenticator::build_auth_url()`].
//! 2. After logging in, Steam redirects the user back to us, with a bunch of `openid.*` query
//!    parameters attached. [`Authenticator::auth()`] asks Steam whether those are legit, and then
//!    loads the user's profile.
//!
//! An [`Authenticator`] is bound to a single incoming request; create a new one for every
//! request you handle.

use std::fmt;

use steam_openid::{CallbackQuery, SteamId, VerificationRequest};
use url::Url;

use crate::api_key::{PinnedKey, RandomKey, SelectApiKey};
use crate::http::{HttpClient, RetryingClient};
use crate::profile::ProfileLoader;
use crate::{AuthenticationError, Config, Error, Result, SteamUser, ValidationError};

/// Authenticates a single request with Steam.
pub struct Authenticator<'a, C = RetryingClient> {
	/// The shared configuration.
	config: &'a Config,

	/// Used for talking to Steam.
	http_client: C,

	/// The URI of the request we are handling.
	request_uri: Url,

	/// Picks the API key for profile requests.
	key_selector: Box<dyn SelectApiKey>,

	/// Overrides `key_selector` if set.
	custom_api_key: Option<PinnedKey>,

	/// The authenticated user, once [`Authenticator::auth()`] succeeded.
	steam_user: Option<SteamUser>,
}

impl<'a, C> Authenticator<'a, C>
where
	C: HttpClient,
{
	/// Creates an [`Authenticator`] for the request to `request_uri`.
	///
	/// API keys are picked at random from [`Config::api_keys`] unless a different strategy is set
	/// with [`Authenticator::with_key_selector()`].
	pub fn new(config: &'a Config, http_client: C, request_uri: Url) -> Self {
		Self {
			config,
			http_client,
			request_uri,
			key_selector: Box::new(RandomKey),
			custom_api_key: None,
			steam_user: None,
		}
	}

	/// Changes how API keys are picked.
	pub fn with_key_selector<S>(mut self, key_selector: S) -> Self
	where
		S: SelectApiKey + 'static,
	{
		self.key_selector = Box::new(key_selector);
		self
	}

	/// Uses `api_key` for every Web API request instead of the configured keys.
	pub fn set_custom_api_key<K>(&mut self, api_key: K)
	where
		K: Into<String>,
	{
		self.custom_api_key = Some(PinnedKey::new(api_key));
	}

	/// The URL Steam should send the user back to.
	///
	/// This is [`Config::redirect_url`] if it is set, and the current request's URL without its
	/// query string otherwise.
	pub fn return_to(&self) -> Result<Url> {
		match &self.config.redirect_url {
			Some(redirect_url) => Ok(redirect_url.resolve(&self.request_uri)?),
			None => Ok(steam_openid::return_to(&self.request_uri)),
		}
	}

	/// Builds the URL to redirect users to so they can log in with Steam.
	///
	/// This does not perform any I/O and always returns the same URL for the same request.
	pub fn build_auth_url(&self) -> Result<Url> {
		let return_to = self.return_to()?;

		Ok(steam_openid::login_url(&self.config.endpoints.openid, &return_to))
	}

	/// Authenticates the current request.
	///
	/// The request is expected to be Steam redirecting a user back to us after they logged in.
	/// On success, the user's profile is available via [`Authenticator::steam_user()`].
	#[tracing::instrument(
		level = "debug",
		skip_all,
		fields(path = %self.request_uri.path(), steam_id = tracing::field::Empty),
		err(level = "debug"),
	)]
	pub async fn auth(&mut self) -> Result<()> {
		self.steam_user = None;

		let query = CallbackQuery::from_url(&self.request_uri);
		query.validate()?;

		let expected = self.return_to()?;
		let actual = query.return_to().unwrap_or_default();

		if expected.as_str() != actual {
			return Err(ValidationError::ReturnToMismatch {
				expected: expected.into(),
				actual: actual.to_owned(),
			}
			.into());
		}

		self.verify(&query).await?;

		let claimed_id = query.claimed_id().unwrap_or_default();
		let steam_id = SteamId::from_claimed_id(claimed_id).ok_or_else(|| {
			AuthenticationError::SteamIdNotFound { claimed_id: claimed_id.to_owned() }
		})?;

		tracing::Span::current().record("steam_id", tracing::field::display(&steam_id));

		let key_selector: &dyn SelectApiKey = match &self.custom_api_key {
			Some(api_key) => api_key,
			None => &*self.key_selector,
		};

		let steam_user = ProfileLoader::new(self.config, &self.http_client, key_selector)
			.load(&steam_id)
			.await?;

		tracing::info!(%steam_id, "user logged in with steam");

		self.steam_user = Some(steam_user);

		Ok(())
	}

	/// Asks Steam whether the assertion in `query` is valid.
	async fn verify(&self, query: &CallbackQuery) -> Result<()> {
		let url = VerificationRequest::new(query).to_url(&self.config.endpoints.openid);
		let response = self.http_client.get(&url).await.map_err(Error::Http)?;

		if !steam_openid::is_valid_response(&response.body) {
			tracing::debug!(status = response.status.as_u16(), body = %response.body, "steam rejected login");

			return Err(AuthenticationError::ResponseNotValid { body: response.body }.into());
		}

		Ok(())
	}
}

impl<C> Authenticator<'_, C> {
	/// The authenticated user.
	///
	/// This is `None` until [`Authenticator::auth()`] returned successfully.
	pub fn steam_user(&self) -> Option<&SteamUser> {
		self.steam_user.as_ref()
	}

	/// The authenticated user's SteamID.
	pub fn steam_id(&self) -> Option<&SteamId> {
		self.steam_user.as_ref().map(SteamUser::steam_id)
	}

	/// Consumes the [`Authenticator`] and returns the authenticated user, if any.
	pub fn into_steam_user(self) -> Option<SteamUser> {
		self.steam_user
	}
}

impl<C> fmt::Debug for Authenticator<'_, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Authenticator")
			.field("request_uri", &self.request_uri.path())
			.field("key_selector", &self.key_selector)
			.field("custom_api_key", &self.custom_api_key)
			.field("steam_user", &self.steam_user)
			.finish_non_exhaustive()
	}
}
