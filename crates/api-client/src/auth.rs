use std::fmt;

/// The provider API key.
///
/// Financial Modeling Prep authenticates with an `apikey` query parameter, so
/// the key ends up in every request URL. It is kept out of `Debug` output and
/// out of the URLs that reqwest attaches to its errors.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for a blank key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The query pair to attach to every request.
    pub(crate) fn query(&self) -> [(&'static str, &str); 1] {
        [("apikey", self.0.as_str())]
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Drops the request URL (and with it the key) from a reqwest error.
pub(crate) fn scrub(error: reqwest::Error) -> reqwest::Error {
    error.without_url()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("  \t").is_none());
        assert!(ApiKey::new("abc").is_some());
    }

    #[test]
    fn debug_never_prints_the_key() {
        let key = ApiKey::new("super-secret").unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(<redacted>)");
    }

    #[test]
    fn key_is_sent_as_apikey_parameter() {
        let key = ApiKey::new(" abc ").unwrap();
        assert_eq!(key.query(), [("apikey", "abc")]);
    }
}
