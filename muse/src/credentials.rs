//! API key resolution.
//!
//! The key can come from three places, checked in priority order:
//! 1. the `MUSE_API_KEY` environment variable
//! 2. a remote configuration document (JSON with an `apiKey` field)
//! 3. a locally stored settings value supplied by the caller
//!
//! Each source is awaited before the next is consulted, so the winner is
//! a function of priority, never of completion order. A failed remote
//! fetch is not an error; resolution falls through to the next source.

use crate::Error;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Environment variable holding the API key.
pub const ENV_KEY: &str = "MUSE_API_KEY";

/// Which source produced the resolved key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    RemoteConfig,
    Stored,
}

impl KeySource {
    pub fn name(&self) -> &'static str {
        match self {
            KeySource::Environment => "environment",
            KeySource::RemoteConfig => "remote config",
            KeySource::Stored => "stored settings",
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A resolved API key and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub key: String,
    pub source: KeySource,
}

/// Shape of the remote configuration document.
#[derive(Debug, Deserialize)]
struct RemoteConfig {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Fetch the API key field from a remote configuration document.
pub async fn fetch_remote_key(url: &str) -> Result<Option<String>, Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(|e| Error::Config(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status,
            message: body,
        });
    }

    let config: RemoteConfig = response
        .json()
        .await
        .map_err(|e| Error::Parse(e.to_string()))?;

    Ok(config.api_key.filter(|k| !k.trim().is_empty()))
}

/// Resolve the API key from the three candidate sources.
///
/// `stored` is the value persisted through in-app settings, read by the
/// caller from its own store.
pub async fn resolve(config_url: Option<&str>, stored: Option<String>) -> Option<ResolvedKey> {
    let env = async { std::env::var(ENV_KEY).ok() };
    let remote = async {
        match config_url {
            // Fetch failure leaves this source unset rather than failing
            // resolution outright.
            Some(url) => fetch_remote_key(url).await.unwrap_or(None),
            None => None,
        }
    };

    resolve_from_sources(env, remote, stored).await
}

/// Resolve from already-prepared source futures.
///
/// Sources are awaited strictly in priority order; a later source is only
/// consulted when every earlier one yields nothing.
pub async fn resolve_from_sources<E, R>(
    env: E,
    remote: R,
    stored: Option<String>,
) -> Option<ResolvedKey>
where
    E: Future<Output = Option<String>>,
    R: Future<Output = Option<String>>,
{
    if let Some(key) = env.await.filter(|k| !k.trim().is_empty()) {
        return Some(ResolvedKey {
            key,
            source: KeySource::Environment,
        });
    }

    if let Some(key) = remote.await.filter(|k| !k.trim().is_empty()) {
        return Some(ResolvedKey {
            key,
            source: KeySource::RemoteConfig,
        });
    }

    stored
        .filter(|k| !k.trim().is_empty())
        .map(|key| ResolvedKey {
            key,
            source: KeySource::Stored,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn slow(value: Option<&str>, delay_ms: u64) -> Option<String> {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        value.map(str::to_string)
    }

    #[tokio::test(start_paused = true)]
    async fn test_env_wins_even_when_slow() {
        // A slower higher-priority source must still win: the original
        // web build let whichever async source finished last clobber the
        // rest, and this pins the deterministic replacement.
        let resolved = resolve_from_sources(
            slow(Some("env-key"), 500),
            slow(Some("remote-key"), 1),
            Some("stored-key".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(resolved.key, "env-key");
        assert_eq!(resolved.source, KeySource::Environment);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_beats_stored() {
        let resolved = resolve_from_sources(
            slow(None, 1),
            slow(Some("remote-key"), 800),
            Some("stored-key".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(resolved.key, "remote-key");
        assert_eq!(resolved.source, KeySource::RemoteConfig);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stored_is_last_resort() {
        let resolved = resolve_from_sources(
            slow(None, 1),
            slow(None, 1),
            Some("stored-key".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(resolved.key, "stored-key");
        assert_eq!(resolved.source, KeySource::Stored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_values_are_skipped() {
        let resolved =
            resolve_from_sources(slow(Some("  "), 1), slow(Some(""), 1), Some("k".to_string()))
                .await
                .unwrap();

        assert_eq!(resolved.source, KeySource::Stored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sources_yields_none() {
        let resolved = resolve_from_sources(slow(None, 1), slow(None, 1), None).await;
        assert!(resolved.is_none());
    }
}
