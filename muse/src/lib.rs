//! Minimal client for the Muse drafting service.
//!
//! The service backend is not wired up yet: every call resolves after a
//! fixed artificial delay with a templated placeholder payload, so callers
//! exercise the full async surface a real integration will need:
//! - Prose suggestions, full and streamed
//! - Cover image generation
//! - API key resolution from env, remote config, or stored settings

pub mod credentials;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio_stream::Stream;

const DEFAULT_MODEL: &str = "muse-draft-1";

/// Simulated service latency for a full suggestion.
const SUGGEST_DELAY: Duration = Duration::from_millis(1200);

/// Simulated service latency for image generation.
const IMAGE_DELAY: Duration = Duration::from_millis(1500);

/// Inter-chunk delay when streaming a suggestion.
const CHUNK_DELAY: Duration = Duration::from_millis(40);

/// Errors that can occur when using the Muse client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A request for a prose continuation.
#[derive(Debug, Clone, Default)]
pub struct SuggestRequest {
    /// Working title of the draft.
    pub title: String,

    /// Genre name, if one is set.
    pub genre: Option<String>,

    /// Tail of the manuscript to continue from. May be empty.
    pub excerpt: String,
}

/// A prose suggestion returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Continuation text for the manuscript.
    pub text: String,

    /// Model that produced it.
    pub model: String,
}

/// A request for a generated image.
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    /// Free-text description of the desired image.
    pub prompt: String,
}

/// A generated image, delivered inline as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Data URI holding the encoded image.
    pub src: String,

    /// Display name derived from the prompt.
    pub name: String,
}

/// Muse service client.
///
/// There is no cancellation, timeout, or retry on the stub calls; each
/// resolves exactly once after its fixed delay.
#[derive(Clone)]
pub struct Muse {
    api_key: String,
    model: String,
}

impl Muse {
    /// Create a new Muse client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a Muse client from the MUSE_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var(credentials::ENV_KEY).map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Set the default model for this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model this client requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a prose continuation and return the full suggestion.
    pub async fn suggest(&self, request: SuggestRequest) -> Result<Suggestion, Error> {
        self.require_key()?;
        tokio::time::sleep(SUGGEST_DELAY).await;

        Ok(Suggestion {
            text: placeholder_prose(&request),
            model: self.model.clone(),
        })
    }

    /// Request a prose continuation and stream it chunk by chunk.
    pub async fn suggest_stream(
        &self,
        request: SuggestRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>, Error> {
        self.require_key()?;
        tokio::time::sleep(SUGGEST_DELAY).await;

        let text = placeholder_prose(&request);
        let chunks: Vec<String> = text.split_inclusive(' ').map(str::to_string).collect();

        let stream = futures::stream::iter(chunks).then(|chunk| async move {
            tokio::time::sleep(CHUNK_DELAY).await;
            Ok::<String, Error>(chunk)
        });

        Ok(Box::pin(stream))
    }

    /// Generate a placeholder cover image for the given prompt.
    pub async fn generate_image(&self, request: ImageRequest) -> Result<GeneratedImage, Error> {
        self.require_key()?;
        tokio::time::sleep(IMAGE_DELAY).await;

        Ok(placeholder_image(&request))
    }

    fn require_key(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::NoApiKey);
        }
        Ok(())
    }
}

/// Templated placeholder continuation, stable for a given request.
fn placeholder_prose(request: &SuggestRequest) -> String {
    let genre = request
        .genre
        .as_deref()
        .unwrap_or("story")
        .to_lowercase();

    if request.excerpt.trim().is_empty() {
        format!(
            "The first line of \"{}\" arrives almost unbidden. A quiet {genre} opening: \
             someone wakes before dawn, certain that today will not go the way it was planned.",
            request.title
        )
    } else {
        let tail = excerpt_tail(&request.excerpt, 6);
        format!(
            "Picking up from \"{tail}\", the {genre} tightens its grip. A door that should \
             have been locked stands open, and whatever waits beyond it has been waiting a long time."
        )
    }
}

/// Last `words` whitespace-separated words of an excerpt.
fn excerpt_tail(excerpt: &str, words: usize) -> String {
    let mut tail: Vec<&str> = excerpt.split_whitespace().rev().take(words).collect();
    tail.reverse();
    tail.join(" ")
}

fn placeholder_image(request: &ImageRequest) -> GeneratedImage {
    let label: String = request.prompt.chars().take(24).collect();
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='256' height='384'>\
         <rect width='256' height='384' fill='#2b2b3a'/>\
         <text x='16' y='192' fill='#e8e0cf' font-size='14'>{label}</text></svg>"
    );

    GeneratedImage {
        src: format!("data:image/svg+xml;utf8,{svg}"),
        name: cover_name(&request.prompt),
    }
}

fn cover_name(prompt: &str) -> String {
    let slug: String = prompt
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect();
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "cover".to_string()
    } else {
        format!("cover-{slug}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Muse {
        Muse::new("test-key")
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_opens_empty_draft() {
        let request = SuggestRequest {
            title: "The Hollow Season".to_string(),
            genre: Some("Mystery".to_string()),
            excerpt: String::new(),
        };

        let suggestion = client().suggest(request).await.unwrap();

        assert!(suggestion.text.contains("The Hollow Season"));
        assert!(suggestion.text.contains("mystery"));
        assert_eq!(suggestion.model, DEFAULT_MODEL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_continues_from_excerpt() {
        let request = SuggestRequest {
            title: "T".to_string(),
            genre: None,
            excerpt: "She turned the key and the engine finally caught".to_string(),
        };

        let suggestion = client().suggest(request).await.unwrap();

        assert!(suggestion.text.contains("the engine finally caught"));
    }

    #[tokio::test]
    async fn test_suggest_without_key() {
        let muse = Muse::new("");
        let err = muse.suggest(SuggestRequest::default()).await.unwrap_err();
        assert!(matches!(err, Error::NoApiKey));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_matches_full_suggestion() {
        let request = SuggestRequest {
            title: "T".to_string(),
            genre: Some("Horror".to_string()),
            excerpt: "The house settled around them".to_string(),
        };

        let full = client().suggest(request.clone()).await.unwrap();

        let mut stream = client().suggest_stream(request).await.unwrap();
        let mut streamed = String::new();
        while let Some(chunk) = stream.next().await {
            streamed.push_str(&chunk.unwrap());
        }

        assert_eq!(streamed, full.text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_image() {
        let request = ImageRequest {
            prompt: "A lighthouse at midnight".to_string(),
        };

        let image = client().generate_image(request).await.unwrap();

        assert!(image.src.starts_with("data:image/svg+xml"));
        assert_eq!(image.name, "cover-a-lighthouse-at-midnight");
    }

    #[test]
    fn test_cover_name_fallback() {
        assert_eq!(cover_name("!!!"), "cover");
        assert_eq!(cover_name(""), "cover");
    }

    #[test]
    fn test_with_model() {
        let muse = Muse::new("k").with_model("muse-draft-2");
        assert_eq!(muse.model(), "muse-draft-2");
    }
}
