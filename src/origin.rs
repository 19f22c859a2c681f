use std::fmt;

use url::Url;

use crate::error::FetchError;

/// Absolute URL of the remote file. Always has a scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginUrl(Url);

impl OriginUrl {
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidUrl {
            input: input.to_string(),
        };

        let url = Url::parse(input).map_err(|_| invalid())?;
        if url.scheme().is_empty() || !url.host_str().is_some_and(|h| !h.is_empty()) {
            return Err(invalid());
        }

        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for OriginUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
