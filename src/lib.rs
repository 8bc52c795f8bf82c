#![doc = include_str!("../README.md")]
// TODO: remove once https://github.com/tokio-rs/tracing/issues/2912 lands
#![allow(clippy::blocks_in_conditions)]

mod error;
pub use error::{AuthenticationError, Error, ErrorKind, ProfileError, Result, ValidationError};

pub mod config;
pub use config::Config;

#[cfg(test)]
mod testing;

pub mod http;
pub mod api_key;
pub mod profile;
pub use profile::{ProfileLoader, SteamUser};

mod authenticator;
pub use authenticator::Authenticator;

pub use steam_openid::SteamId;
