use std::collections::BTreeMap;

use url::{form_urlencoded, Url};

/// Fields Steam's callback has to carry before we even bother asking Steam about it.
///
/// Validation reports the first missing field in exactly this order.
pub const REQUIRED_PARAMETERS: [&str; 5] = [
    "openid_assoc_handle",
    "openid_signed",
    "openid_sig",
    "openid_return_to",
    "openid_claimed_id",
];

/// The query string Steam attaches when redirecting a user back to us.
///
/// Keys are normalized by replacing `.` with `_`, so `openid.claimed_id` and `openid_claimed_id`
/// refer to the same field. If a key occurs more than once, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    fields: BTreeMap<String, String>,
}

/// A required field was absent from the callback query.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("The \"{parameter}\" parameter is required")]
pub struct MissingParameter {
    /// The normalized name of the missing field, e.g. `openid_sig`.
    pub parameter: &'static str,
}

impl CallbackQuery {
    /// Parses a raw (still percent-encoded) query string.
    pub fn parse(query: &str) -> Self {
        let fields = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (normalize_key(&key), value.into_owned()))
            .collect();

        Self { fields }
    }

    /// Parses the query string of `url`.
    pub fn from_url(url: &Url) -> Self {
        Self::parse(url.query().unwrap_or_default())
    }

    /// Looks up a field by name.
    ///
    /// `field` may be given in either the dotted or the underscored form.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(&normalize_key(field)).map(String::as_str)
    }

    /// Checks that every field in [`REQUIRED_PARAMETERS`] is present.
    pub fn validate(&self) -> Result<(), MissingParameter> {
        match REQUIRED_PARAMETERS
            .into_iter()
            .find(|&parameter| !self.fields.contains_key(parameter))
        {
            None => Ok(()),
            Some(parameter) => Err(MissingParameter { parameter }),
        }
    }

    /// `openid.return_to`, as echoed by Steam.
    pub fn return_to(&self) -> Option<&str> {
        self.get("openid_return_to")
    }

    /// `openid.claimed_id`, the identity URL the browser claims to belong to the user.
    pub fn claimed_id(&self) -> Option<&str> {
        self.get("openid_claimed_id")
    }

    /// The field names listed in `openid.signed`, without the `openid.` prefix.
    pub fn signed_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.get("openid_signed")
            .into_iter()
            .flat_map(|signed| signed.split(','))
            .filter(|field| !field.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for CallbackQuery
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (normalize_key(key.as_ref()), value.into()))
            .collect();

        Self { fields }
    }
}

fn normalize_key(key: &str) -> String {
    key.replace('.', "_")
}
