use std::fmt;

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_VARS: &[&str] = &["DATABRICKS_TOKEN", "OPENAI_API_KEY"];

/// Environment variables consulted for the serving endpoint, in priority order.
pub const BASE_URL_VARS: &[&str] = &["DATABRICKS_SERVING_ENDPOINT", "OPENAI_BASE_URL"];

/// API key and endpoint a client is bound to for its whole lifetime.
///
/// The client does not care where these came from; `from_env` is only one
/// source. The key is redacted from `Debug` output so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    api_key: String,
    base_url: String,
}

impl ClientCredentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, MissingCredential> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve credentials through an arbitrary lookup (environment, secret
    /// store, test map). Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MissingCredential>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |vars: &'static [&'static str]| {
            vars.iter()
                .filter_map(|k| lookup(*k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
                .ok_or(MissingCredential { candidates: vars })
        };

        let api_key = first(API_KEY_VARS)?;
        let base_url = first(BASE_URL_VARS)?;
        Ok(Self { api_key, base_url })
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// None of the candidate variables held a usable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("none of {candidates:?} is set")]
pub struct MissingCredential {
    pub candidates: &'static [&'static str],
}
