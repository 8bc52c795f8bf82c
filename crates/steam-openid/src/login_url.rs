use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use url::Url;

use crate::{IDENTIFIER_SELECT, NAMESPACE};

/// Constructs a URL for OpenID 2.0 login with Steam.
///
/// Steam will redirect the user to `return_to` after the login process is complete. The realm
/// is derived from `return_to` (see [`realm()`]).
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(endpoint = endpoint.as_str(), return_to = return_to.as_str()),
    ret(Display, level = "debug"),
)]
pub fn login_url(endpoint: &Url, return_to: &Url) -> Url {
    let query_string = serde_urlencoded::to_string(&Form { return_to })
        .expect("`Form` only contains strings and should always serialize");

    let mut url = endpoint.clone();
    url.set_query(Some(&query_string));
    url
}

/// Strips everything but scheme, host, port and path from `url`.
///
/// This is the value sent as `openid.return_to`, and it is what Steam will echo back in the
/// callback.
pub fn return_to(url: &Url) -> Url {
    let mut return_to = url.clone();

    // Both only fail for URLs that cannot be a base, which cannot be redirected to anyway.
    let _ = return_to.set_username("");
    let _ = return_to.set_password(None);

    return_to.set_query(None);
    return_to.set_fragment(None);
    return_to
}

/// The OpenID realm for a given `return_to` URL.
///
/// This is `scheme://host`, with an explicit port appended only if it isn't the scheme's
/// default. Dropping a non-default port, as a plain `scheme://host` realm would, leaves a realm
/// that doesn't cover `return_to`, and Steam rejects such logins.
pub fn realm(return_to: &Url) -> String {
    let host = return_to.host_str().unwrap_or_default();

    match return_to.port() {
        None => format!("{}://{host}", return_to.scheme()),
        Some(port) => format!("{}://{host}:{port}", return_to.scheme()),
    }
}

/// Query parameters for the login redirect, in the order Steam expects them.
struct Form<'a> {
    return_to: &'a Url,
}

impl Serialize for Form<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut serializer = serializer.serialize_map(Some(6))?;

        serializer.serialize_entry("openid.ns", NAMESPACE)?;
        serializer.serialize_entry("openid.mode", "checkid_setup")?;
        serializer.serialize_entry("openid.return_to", self.return_to.as_str())?;
        serializer.serialize_entry("openid.realm", &realm(self.return_to))?;

        for key in ["openid.identity", "openid.claimed_id"] {
            serializer.serialize_entry(key, IDENTIFIER_SELECT)?;
        }

        serializer.end()
    }
}
