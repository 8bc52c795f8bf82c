/* Copyright (C) 2024  AlphaKeks <alphakeks@dawn.sh>
 *
 * This library is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this repository.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Helper functions & types for using Steam as an OpenID 2.0 provider.
//!
//! Nothing in here performs I/O. The crate builds the URLs a relying party has to send users
//! and Steam to, and interprets what comes back.

#[macro_use]
extern crate derive_more;

/// Steam's OpenID 2.0 endpoint.
///
/// Users are redirected here to log in, and callback payloads are verified against it.
pub const LOGIN_URL: &str = "https://steamcommunity.com/openid/login";

/// The OpenID 2.0 namespace.
pub const NAMESPACE: &str = "http://specs.openid.net/auth/2.0";

/// Sentinel used for `openid.identity` and `openid.claimed_id` when the provider should pick
/// the identity.
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";

mod login_url;
pub use login_url::{login_url, realm, return_to};

mod callback_query;
pub use callback_query::{CallbackQuery, MissingParameter, REQUIRED_PARAMETERS};

mod verification;
pub use verification::{is_valid_response, VerificationRequest, SIGNABLE_FIELDS};

mod steam_id;
pub use steam_id::{ParseSteamIdError, SteamId};
