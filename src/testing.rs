//! Test fixtures.

use std::sync::Mutex;

use reqwest::StatusCode;
use serde_json::json;
use url::Url;

use crate::config::ApiKeys;
use crate::http::{BoxError, HttpClient, HttpResponse};
use crate::Config;

pub const STEAM_ID: &str = "76561198019153518";
pub const CLAIMED_ID: &str = "https://steamcommunity.com/openid/id/76561198019153518";
pub const SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
pub const LEVEL_PATH: &str = "/IPlayerService/GetSteamLevel/v1/";
pub const OPENID_PATH: &str = "/openid/login";

pub fn config() -> Config {
	Config::new(ApiKeys::new(["first-key", "second-key"]).unwrap())
}

/// A callback URL as Steam would produce it for a login that started at `return_to`.
pub fn callback_url(return_to: &str, claimed_id: &str) -> Url {
	let mut url = Url::parse(return_to).unwrap();

	url.query_pairs_mut()
		.append_pair("openid.ns", "http://specs.openid.net/auth/2.0")
		.append_pair("openid.mode", "id_res")
		.append_pair("openid.op_endpoint", "https://steamcommunity.com/openid/login")
		.append_pair("openid.claimed_id", claimed_id)
		.append_pair("openid.identity", claimed_id)
		.append_pair("openid.return_to", return_to)
		.append_pair("openid.response_nonce", "2023-05-21T18:07:30Z8X7lqO7qjMaYy0x2dh8E6/nb3Wk=")
		.append_pair("openid.assoc_handle", "1234567890")
		.append_pair(
			"openid.signed",
			"signed,op_endpoint,claimed_id,identity,return_to,response_nonce,assoc_handle",
		)
		.append_pair("openid.sig", "c3+QpiCj+U1v9Bnjhp60s7ywFI4=");

	url
}

pub fn player_summaries() -> serde_json::Value {
	json!({
		"response": {
			"players": [{
				"steamid": STEAM_ID,
				"communityvisibilitystate": 3,
				"profilestate": 1,
				"personaname": "AlphaKeks",
				"commentpermission": 1,
				"profileurl": "https://steamcommunity.com/id/AlphaKeks/",
				"avatar": "https://avatars.steamstatic.com/c5d56249ee5d28a07db4ac9f7f60af961fab5426.jpg",
				"avatarmedium": "https://avatars.steamstatic.com/c5d56249ee5d28a07db4ac9f7f60af961fab5426_medium.jpg",
				"avatarfull": "https://avatars.steamstatic.com/c5d56249ee5d28a07db4ac9f7f60af961fab5426_full.jpg",
				"avatarhash": "c5d56249ee5d28a07db4ac9f7f60af961fab5426",
				"lastlogoff": 1_684_692_450,
				"personastate": 1,
				"primaryclanid": "103582791429521408",
				"timecreated": 1_262_304_000,
				"personastateflags": 0,
				"loccountrycode": "DE"
			}]
		}
	})
}

/// In-memory [`HttpClient`] that answers by path and records every request.
///
/// Unknown paths get a `404`.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
	routes: Vec<(String, Result<HttpResponse, String>)>,
	requests: Mutex<Vec<Url>>,
}

impl FakeHttpClient {
	pub fn route(mut self, path: &str, response: HttpResponse) -> Self {
		self.routes.push((path.to_owned(), Ok(response)));
		self
	}

	pub fn fail(mut self, path: &str, message: &str) -> Self {
		self.routes.push((path.to_owned(), Err(message.to_owned())));
		self
	}

	pub fn requests(&self) -> Vec<Url> {
		self.requests.lock().unwrap().clone()
	}
}

impl HttpClient for FakeHttpClient {
	async fn get(&self, url: &Url) -> Result<HttpResponse, BoxError> {
		self.requests.lock().unwrap().push(url.clone());

		match self.routes.iter().find(|(path, _)| path == url.path()) {
			Some((_, Ok(response))) => Ok(response.clone()),
			Some((_, Err(message))) => Err(message.clone().into()),
			None => Ok(HttpResponse { status: StatusCode::NOT_FOUND, body: String::new() }),
		}
	}
}

#[ctor::ctor]
fn setup() {
	use std::{env, io};

	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::EnvFilter;

	if let Ok(rust_log) = env::var("RUST_TEST_LOG") {
		tracing_subscriber::fmt()
			.with_target(true)
			.with_writer(io::stderr)
			.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
			.compact()
			.with_env_filter(EnvFilter::new(rust_log))
			.init();
	}
}
