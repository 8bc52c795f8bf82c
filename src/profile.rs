//! Steam user profiles.
//!
//! After a login has been verified, the user's public profile is fetched from Steam's
//! [WebAPI], and optionally their Steam level.
//!
//! [WebAPI]: https://developer.valvesoftware.com/wiki/Steam_Web_API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use steam_openid::SteamId;
use url::Url;

use crate::api_key::SelectApiKey;
use crate::http::HttpClient;
use crate::{Config, Error, ProfileError, Result};

/// Path of the endpoint for fetching information about players.
const PLAYER_SUMMARIES_PATH: &str = "ISteamUser/GetPlayerSummaries/v0002/";

/// Path of the endpoint for fetching a player's Steam level.
const STEAM_LEVEL_PATH: &str = "IPlayerService/GetSteamLevel/v1/";

/// Information about a Steam user.
///
/// Apart from [`steam_id()`], every field is optional: Steam leaves out whatever the user's
/// privacy settings hide, and we don't fill in defaults for it.
///
/// [`steam_id()`]: SteamUser::steam_id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamUser {
	steam_id: SteamId,
	community_visibility_state: Option<u8>,
	profile_state: Option<u8>,
	persona_name: Option<String>,
	real_name: Option<String>,
	comment_permission: Option<u8>,
	profile_url: Option<Url>,
	avatar: Option<Url>,
	avatar_medium: Option<Url>,
	avatar_full: Option<Url>,
	avatar_hash: Option<String>,
	#[serde(default, with = "chrono::serde::ts_seconds_option")]
	last_logoff: Option<DateTime<Utc>>,
	persona_state: Option<u8>,
	persona_state_flags: Option<u32>,
	primary_clan_id: Option<String>,
	#[serde(default, with = "chrono::serde::ts_seconds_option")]
	time_created: Option<DateTime<Utc>>,
	country_code: Option<String>,
	player_level: Option<u32>,
}

impl SteamUser {
	/// The user's SteamID.
	pub fn steam_id(&self) -> &SteamId {
		&self.steam_id
	}

	/// `1` if the profile is private (or friends-only), `3` if it is public.
	pub fn community_visibility_state(&self) -> Option<u8> {
		self.community_visibility_state
	}

	/// `1` if the user has set up their community profile.
	pub fn profile_state(&self) -> Option<u8> {
		self.profile_state
	}

	/// The user's display name.
	pub fn persona_name(&self) -> Option<&str> {
		self.persona_name.as_deref()
	}

	/// The user's "real" name, if they chose to share it.
	pub fn real_name(&self) -> Option<&str> {
		self.real_name.as_deref()
	}

	/// Whether the profile allows public comments.
	pub fn comment_permission(&self) -> Option<u8> {
		self.comment_permission
	}

	/// URL to the user's community profile.
	pub fn profile_url(&self) -> Option<&Url> {
		self.profile_url.as_ref()
	}

	/// 32x32 avatar.
	pub fn avatar(&self) -> Option<&Url> {
		self.avatar.as_ref()
	}

	/// 64x64 avatar.
	pub fn avatar_medium(&self) -> Option<&Url> {
		self.avatar_medium.as_ref()
	}

	/// 184x184 avatar.
	pub fn avatar_full(&self) -> Option<&Url> {
		self.avatar_full.as_ref()
	}

	/// Hash identifying the avatar image.
	pub fn avatar_hash(&self) -> Option<&str> {
		self.avatar_hash.as_deref()
	}

	/// When the user was last online.
	pub fn last_logoff(&self) -> Option<DateTime<Utc>> {
		self.last_logoff
	}

	/// Online status (offline, online, busy, away, ...).
	pub fn persona_state(&self) -> Option<u8> {
		self.persona_state
	}

	/// Extra online status bits, e.g. whether the user is in Big Picture mode.
	pub fn persona_state_flags(&self) -> Option<u32> {
		self.persona_state_flags
	}

	/// The user's primary Steam group.
	pub fn primary_clan_id(&self) -> Option<&str> {
		self.primary_clan_id.as_deref()
	}

	/// When the account was created.
	pub fn time_created(&self) -> Option<DateTime<Utc>> {
		self.time_created
	}

	/// ISO 3166 country code.
	pub fn country_code(&self) -> Option<&str> {
		self.country_code.as_deref()
	}

	/// The user's Steam level.
	///
	/// This is only ever set if [`Config::fetch_level`] is enabled.
	pub fn player_level(&self) -> Option<u32> {
		self.player_level
	}

	fn new(steam_id: SteamId, player: Player, player_level: Option<u32>) -> Self {
		Self {
			steam_id,
			community_visibility_state: player.communityvisibilitystate,
			profile_state: player.profilestate,
			persona_name: player.personaname,
			real_name: player.realname,
			comment_permission: player.commentpermission,
			profile_url: player.profileurl,
			avatar: player.avatar,
			avatar_medium: player.avatarmedium,
			avatar_full: player.avatarfull,
			avatar_hash: player.avatarhash,
			last_logoff: player.lastlogoff,
			persona_state: player.personastate,
			persona_state_flags: player.personastateflags,
			primary_clan_id: player.primaryclanid,
			time_created: player.timecreated,
			country_code: player.loccountrycode,
			player_level,
		}
	}
}

/// Fetches [`SteamUser`]s from the Steam WebAPI.
#[derive(Debug)]
pub struct ProfileLoader<'a, C> {
	/// Endpoints and API keys.
	config: &'a Config,

	/// Used for all API requests.
	http_client: &'a C,

	/// Decides which API key each load uses.
	key_selector: &'a dyn SelectApiKey,
}

impl<'a, C> ProfileLoader<'a, C>
where
	C: HttpClient,
{
	/// Creates a new loader.
	pub fn new(config: &'a Config, http_client: &'a C, key_selector: &'a dyn SelectApiKey) -> Self {
		Self { config, http_client, key_selector }
	}

	/// Fetches the profile of `steam_id`, and their level if [`Config::fetch_level`] is set.
	///
	/// Both requests use the same API key.
	#[tracing::instrument(level = "debug", skip_all, fields(%steam_id), err(level = "debug"))]
	pub async fn load(&self, steam_id: &SteamId) -> Result<SteamUser> {
		let api_key = self.key_selector.select(&self.config.api_keys);

		let url = self.api_url(PLAYER_SUMMARIES_PATH, [
			("key", api_key),
			("steamids", steam_id.as_str()),
		])?;

		let PlayerSummaries { response: PlayerList { players } } = self.fetch(&url).await?;

		let player = players
			.into_iter()
			.next()
			.ok_or_else(|| ProfileError::NotFound { steam_id: steam_id.clone() })?;

		if let Some(actual) = player.steamid.as_ref().filter(|&actual| actual != steam_id) {
			return Err(ProfileError::SteamIdMismatch {
				expected: steam_id.clone(),
				actual: actual.clone(),
			}
			.into());
		}

		let player_level = if self.config.fetch_level {
			let url = self.api_url(STEAM_LEVEL_PATH, [
				("key", api_key),
				("format", "json"),
				("steamid", steam_id.as_str()),
			])?;

			let SteamLevel { response: LevelResponse { player_level } } = self.fetch(&url).await?;

			player_level
		} else {
			None
		};

		tracing::debug!(persona_name = ?player.personaname, ?player_level, "loaded steam user");

		Ok(SteamUser::new(steam_id.clone(), player, player_level))
	}

	fn api_url<const N: usize>(&self, path: &str, params: [(&str, &str); N]) -> Result<Url> {
		let mut url = self.config.endpoints.web_api.join(path)?;
		url.query_pairs_mut().extend_pairs(params);

		Ok(url)
	}

	async fn fetch<T>(&self, url: &Url) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let response = self.http_client.get(url).await.map_err(Error::Http)?;

		if !response.status.is_success() {
			tracing::error!(
				status = response.status.as_u16(),
				body = %response.body,
				"steam web api returned bad status",
			);

			return Err(Error::BadStatus { status: response.status, body: response.body });
		}

		Ok(serde_json::from_str(&response.body)?)
	}
}

/// `GetPlayerSummaries` response body.
#[derive(Deserialize)]
struct PlayerSummaries {
	response: PlayerList,
}

#[derive(Deserialize)]
struct PlayerList {
	players: Vec<Player>,
}

/// A single player, as returned by Steam.
#[derive(Deserialize)]
#[allow(clippy::missing_docs_in_private_items)]
struct Player {
	steamid: Option<SteamId>,
	communityvisibilitystate: Option<u8>,
	profilestate: Option<u8>,
	personaname: Option<String>,
	realname: Option<String>,
	commentpermission: Option<u8>,
	profileurl: Option<Url>,
	avatar: Option<Url>,
	avatarmedium: Option<Url>,
	avatarfull: Option<Url>,
	avatarhash: Option<String>,
	#[serde(default, with = "chrono::serde::ts_seconds_option")]
	lastlogoff: Option<DateTime<Utc>>,
	personastate: Option<u8>,
	personastateflags: Option<u32>,
	primaryclanid: Option<String>,
	#[serde(default, with = "chrono::serde::ts_seconds_option")]
	timecreated: Option<DateTime<Utc>>,
	loccountrycode: Option<String>,
}

/// `GetSteamLevel` response body.
#[derive(Deserialize)]
struct SteamLevel {
	response: LevelResponse,
}

/// Private profiles get an empty object here.
#[derive(Deserialize)]
struct LevelResponse {
	player_level: Option<u32>,
}
