use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static CLAIMED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://steamcommunity\.com/openid/id/([0-9]{17,25})/?$")
        .expect("hard-coded regex should be valid")
});

/// A SteamID64 as asserted by Steam's OpenID provider.
///
/// This is kept in its decimal string form (17 to 25 digits), which is how both the OpenID
/// provider and the Web API exchange it.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Serialize)]
#[serde(transparent)]
pub struct SteamId(String);

/// A string was not a valid [`SteamId`].
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseSteamIdError {
    /// The string contained something other than ASCII digits.
    #[display("SteamID must contain only digits")]
    NotNumeric,

    /// The string had the wrong number of digits.
    #[display("SteamID must be 17 to 25 digits long, got {len}")]
    InvalidLength {
        /// How many digits there were.
        len: usize,
    },
}

impl SteamId {
    /// Extracts the SteamID from an `openid.claimed_id` URL of the form
    /// `https://steamcommunity.com/openid/id/<id>`.
    pub fn from_claimed_id(claimed_id: &str) -> Option<Self> {
        CLAIMED_ID
            .captures(claimed_id)
            .and_then(|captures| captures.get(1))
            .and_then(|id| id.as_str().parse::<Self>().ok())
    }

    /// The decimal representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its decimal representation.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for SteamId {
    type Err = ParseSteamIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !value.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ParseSteamIdError::NotNumeric);
        }

        if !(17..=25).contains(&value.len()) {
            return Err(ParseSteamIdError::InvalidLength { len: value.len() });
        }

        Ok(Self(value.to_owned()))
    }
}

impl<'de> Deserialize<'de> for SteamId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for SteamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SteamId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SteamId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseSteamIdError, SteamId};

    #[test]
    fn extracts_id_from_claimed_id() {
        for claimed_id in [
            "https://steamcommunity.com/openid/id/76561198019153518",
            "http://steamcommunity.com/openid/id/76561198019153518",
            "https://steamcommunity.com/openid/id/76561198019153518/",
        ] {
            assert_eq!(
                SteamId::from_claimed_id(claimed_id).as_deref().map(String::as_str),
                Some("76561198019153518"),
                "`{claimed_id}` should yield an id",
            );
        }
    }

    #[test]
    fn rejects_malformed_claimed_ids() {
        for claimed_id in [
            "data",
            "https://steamcommunity.com/openid/id/",
            "https://steamcommunity.com/openid/id/1234",
            "https://steamcommunity.com/openid/id/abcdefghijklmnopq",
            "https://evil.test/?https://steamcommunity.com/openid/id/76561198019153518",
            "https://steamcommunityXcom/openid/id/76561198019153518",
            "https://steamcommunity.com/openid/id/76561198019153518123456789",
            "https://steamcommunity.com/openid/id/76561198019153518/extra",
        ] {
            assert_eq!(SteamId::from_claimed_id(claimed_id), None, "`{claimed_id}` should be rejected");
        }
    }

    #[test]
    fn parse_checks_digits_and_length() {
        assert!("76561198019153518".parse::<SteamId>().is_ok(), "17 digits");
        assert_eq!("7656119801915351a".parse::<SteamId>(), Err(ParseSteamIdError::NotNumeric), "letters");
        assert_eq!(
            "1234".parse::<SteamId>(),
            Err(ParseSteamIdError::InvalidLength { len: 4 }),
            "too short",
        );
    }

    #[test]
    fn serializes_as_string() {
        let steam_id = "76561198019153518".parse::<SteamId>().unwrap();

        assert_eq!(serde_json::to_string(&steam_id).unwrap(), r#""76561198019153518""#, "serialize");
        assert_eq!(
            serde_json::from_str::<SteamId>(r#""76561198019153518""#).unwrap(),
            steam_id,
            "deserialize",
        );
        assert!(serde_json::from_str::<SteamId>(r#""nope""#).is_err(), "invalid ids are rejected");
    }
}
