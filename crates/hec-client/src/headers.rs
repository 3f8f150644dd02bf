//! Request headers and the authorization header builder.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ClientConfig, TRACING_TARGET_CLIENT};

/// Name of the authorization header.
pub const AUTHORIZATION: &str = "Authorization";

/// Token type the collector expects in front of the token.
pub const AUTHORIZATION_SCHEME: &str = "Splunk";

/// Header mapping whose names compare case-insensitively.
///
/// Inserting a name that differs only in case from an existing one replaces
/// the existing entry, so `authorization` and `Authorization` never coexist.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Creates an empty header mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any entry with the same name in any case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let previous = self.remove(&name);
        self.entries.insert(name, value.into());
        previous
    }

    /// Adds a header and returns the mapping.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value of a header, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether a header is present, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes a header, ignoring case.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let key = self
            .entries
            .keys()
            .find(|key| key.eq_ignore_ascii_case(name))
            .cloned()?;
        self.entries.remove(&key)
    }

    /// Applies `other` on top of this mapping; `other` wins on conflict.
    pub fn merge(&mut self, other: Headers) {
        for (name, value) in other {
            self.insert(name, value);
        }
    }

    /// Consuming variant of [`merge`](Self::merge).
    #[must_use]
    pub fn merged(mut self, other: Headers) -> Self {
        self.merge(other);
        self
    }

    /// Iterates over header names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION) {
                    (name, "<redacted>")
                } else {
                    (name, value)
                }
            }))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Headers {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl IntoIterator for Headers {
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;
    type Item = (String, String);

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Headers> for BTreeMap<String, String> {
    fn from(headers: Headers) -> Self {
        headers.entries
    }
}

/// Builds the headers sent with every request.
///
/// Starts from the configured default headers and adds
/// `Authorization: Splunk <token>` unless the defaults already carry an
/// authorization header, in which case the caller's value is kept.
pub fn base_headers(config: &ClientConfig) -> Headers {
    let mut headers: Headers = config.headers.clone().into();

    if headers.contains(AUTHORIZATION) {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            "Default headers define Authorization, configured token is not used"
        );
    } else {
        headers.insert(
            AUTHORIZATION,
            format!("{AUTHORIZATION_SCHEME} {}", config.token),
        );
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        let previous = headers.insert("content-type", "application/json");

        assert_eq!(previous.as_deref(), Some("text/plain"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_deserialize_folds_names_by_case() {
        let headers: Headers = serde_json::from_value(serde_json::json!({
            "Authorization": "a",
            "authorization": "b",
            "X-Custom": "1"
        }))
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert!(headers.contains("AUTHORIZATION"));
        assert_eq!(headers.get("x-custom"), Some("1"));
        assert_eq!(
            serde_json::to_value(&headers).unwrap()["X-Custom"],
            serde_json::json!("1")
        );
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = Headers::new().with("Authorization", "Splunk T1").with("X-A", "1");
        let call = Headers::new().with("authorization", "Splunk T2").with("X-B", "2");

        let merged = base.merged(call);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("Authorization"), Some("Splunk T2"));
        assert_eq!(merged.get("x-a"), Some("1"));
        assert_eq!(merged.get("x-b"), Some("2"));
    }

    #[test]
    fn test_base_headers_adds_token() {
        let config = ClientConfig::new("T1").with_header("X-Custom", "value");
        let headers = base_headers(&config);

        assert_eq!(headers.get(AUTHORIZATION), Some("Splunk T1"));
        assert_eq!(headers.get("X-Custom"), Some("value"));
    }

    #[test]
    fn test_base_headers_keeps_caller_authorization() {
        for name in ["Authorization", "authorization", "AUTHORIZATION"] {
            let config = ClientConfig::new("T1").with_header(name, "Bearer abc");
            let headers = base_headers(&config);

            assert_eq!(headers.len(), 1);
            assert_eq!(headers.get(AUTHORIZATION), Some("Bearer abc"));
            assert!(headers.iter().all(|(_, value)| !value.contains("T1")));
        }
    }

    #[test]
    fn test_debug_redacts_authorization() {
        let headers = Headers::new().with("Authorization", "Splunk secret");
        assert!(!format!("{headers:?}").contains("secret"));
    }
}
