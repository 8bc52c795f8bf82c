use std::sync::LazyLock;

use regex::Regex;
use url::{form_urlencoded, Url};

use crate::{CallbackQuery, NAMESPACE};

/// Fields that may be copied from `openid.signed` into a verification request.
///
/// Anything else named in the signed list is dropped instead of being echoed back to Steam.
/// `mode` is never copied; it is always `check_authentication`.
pub const SIGNABLE_FIELDS: [&str; 9] = [
    "signed",
    "op_endpoint",
    "claimed_id",
    "identity",
    "return_to",
    "response_nonce",
    "assoc_handle",
    "invalidate_handle",
    "ns",
];

static IS_VALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)is_valid\s*:\s*true").expect("hard-coded regex should be valid")
});

/// The `check_authentication` request we send to Steam to confirm a callback.
///
/// Parameters keep their insertion order. Signed fields that are already present (e.g.
/// `assoc_handle`) replace the existing value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    params: Vec<(String, String)>,
}

impl VerificationRequest {
    /// Builds the verification request for `query`.
    ///
    /// `query` is expected to have passed [`CallbackQuery::validate()`]; missing fields are
    /// simply left out.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn new(query: &CallbackQuery) -> Self {
        let mut request = Self { params: Vec::with_capacity(16) };

        for field in ["assoc_handle", "signed", "sig"] {
            request.copy_from(query, field);
        }

        request.set("openid.ns", query.get("openid_ns").unwrap_or(NAMESPACE));
        request.set("openid.mode", "check_authentication");

        for field in query.signed_fields() {
            if SIGNABLE_FIELDS.contains(&field) {
                request.copy_from(query, field);
            } else {
                tracing::warn!(field, "ignoring unexpected field in `openid.signed`");
            }
        }

        request
    }

    /// Looks up a parameter by its full name, e.g. `openid.sig`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// All parameters in the order they will be sent.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.params.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Encodes the parameters as a query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }

    /// The full URL to `GET` in order to verify the callback.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.set_query(Some(&self.to_query_string()));
        url
    }

    fn copy_from(&mut self, query: &CallbackQuery, field: &str) {
        let inbound = format!("openid_{}", field.replace('.', "_"));

        if let Some(value) = query.get(&inbound) {
            self.set(&format!("openid.{field}"), value);
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_owned(),
            None => self.params.push((key.to_owned(), value.to_owned())),
        }
    }
}

/// Checks whether Steam's answer to a verification request confirms the assertion.
///
/// The body is free-form text; we look for `is_valid:true`, ignoring case and whitespace
/// around the colon.
pub fn is_valid_response(body: &str) -> bool {
    IS_VALID.is_match(body)
}
