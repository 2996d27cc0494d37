//! Validated WebSocket endpoint.

use url::Url;

use crate::error::{Error, Result};

/// A syntactically valid `ws://` or `wss://` URL.
///
/// The original input string is kept verbatim so the host reads back
/// exactly the URL it passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    raw: String,
    url: Url,
}

impl Endpoint {
    /// Parse and validate an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the input does not parse, uses a
    /// scheme other than `ws`/`wss`, or has no host.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| Error::InvalidUrl(format!("{input}: {e}")))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::InvalidUrl(format!(
                    "{input}: unsupported scheme {other:?}"
                )));
            }
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidUrl(format!("{input}: missing host")));
        }

        if url.fragment().is_some() {
            return Err(Error::InvalidUrl(format!(
                "{input}: fragments are not allowed"
            )));
        }

        Ok(Self {
            raw: input.to_owned(),
            url,
        })
    }

    /// The URL exactly as given to [`Endpoint::parse`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns `true` for `wss://` endpoints.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "wss"
    }

    /// Host name of the endpoint.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Port, falling back to the scheme default (80 or 443).
    #[must_use]
    pub fn port(&self) -> u16 {
        self.url
            .port()
            .unwrap_or(if self.is_secure() { 443 } else { 80 })
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::parse(s)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
