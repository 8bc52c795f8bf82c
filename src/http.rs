//! The HTTP client used to talk to Steam.
//!
//! The authentication flow only ever needs to make `GET` requests and look at the status code
//! and body of the response, so that is all [`HttpClient`] requires. [`RetryingClient`] is the
//! [`reqwest`]-backed implementation used by default; retries are handled by
//! [`reqwest_retry`] middleware.

use std::borrow::Cow;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use tracing::warn;
use url::Url;

/// Type-erased transport error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How long a single request may take.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shortest and longest wait between two attempts.
const RETRY_BOUNDS: (Duration, Duration) = (Duration::from_millis(100), Duration::from_secs(2));

/// A buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	/// The response's status code.
	pub status: StatusCode,

	/// The response body, decoded as text.
	pub body: String,
}

impl HttpResponse {
	/// Creates a `200 OK` response with the given body.
	pub fn ok<B>(body: B) -> Self
	where
		B: Into<String>,
	{
		Self { status: StatusCode::OK, body: body.into() }
	}
}

/// Something that can `GET` a URL.
///
/// Errors are returned as-is to the caller of [`Authenticator::auth()`]; retrying is up to the
/// implementation.
///
/// [`Authenticator::auth()`]: crate::Authenticator::auth
pub trait HttpClient: Send + Sync {
	/// Sends a `GET` request to `url` and buffers the response.
	fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

impl<C> HttpClient for &C
where
	C: HttpClient,
{
	fn get(&self, url: &Url) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
		(**self).get(url)
	}
}

/// [`reqwest`]-backed [`HttpClient`] that retries transient failures.
///
/// A request is attempted up to `attempts` times, with exponential backoff in between.
/// Connection errors, timeouts, `408`, `429` and `5xx` responses are retried; any other status
/// is returned right away. Once all attempts are used up, the last outcome is returned.
#[derive(Debug, Clone)]
pub struct RetryingClient {
	/// The underlying client, wrapped in the retry middleware.
	client: ClientWithMiddleware,
}

impl RetryingClient {
	/// Creates a new client with sensible defaults.
	pub fn new(attempts: NonZeroU32) -> reqwest::Result<Self> {
		let client = reqwest::Client::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.timeout(REQUEST_TIMEOUT)
			.build()?;

		Ok(Self::with_client(client, attempts))
	}

	/// Wraps an existing [`reqwest::Client`].
	pub fn with_client(client: reqwest::Client, attempts: NonZeroU32) -> Self {
		let (min_delay, max_delay) = RETRY_BOUNDS;
		let retry_policy = ExponentialBackoff::builder()
			.retry_bounds(min_delay, max_delay)
			.build_with_max_retries(attempts.get() - 1);

		let client = ClientBuilder::new(client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy))
			.build();

		Self { client }
	}
}

impl HttpClient for RetryingClient {
	#[tracing::instrument(level = "debug", skip_all, fields(url = %redact(url)), err(level = "debug"))]
	async fn get(&self, url: &Url) -> Result<HttpResponse, BoxError> {
		let response = self.client.get(url.clone()).send().await?;
		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			warn!(status = status.as_u16(), "request failed");
		}

		Ok(HttpResponse { status, body })
	}
}

/// Strips API keys from a URL so it can be logged.
pub(crate) fn redact(url: &Url) -> Cow<'_, str> {
	if !url.query_pairs().any(|(key, _)| key == "key") {
		return Cow::Borrowed(url.as_str());
	}

	let mut redacted = url.clone();
	let pairs = url
		.query_pairs()
		.map(|(key, value)| if key == "key" { (key, Cow::Borrowed("…")) } else { (key, value) })
		.collect::<Vec<_>>();

	redacted.query_pairs_mut().clear().extend_pairs(pairs);

	Cow::Owned(redacted.into())
}
