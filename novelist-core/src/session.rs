//! StudioSession - the primary public API for drafting.
//!
//! This module ties the slot store, the in-memory draft, and the Muse
//! client into a single interface: restore on open, write-on-change for
//! every mutation, an explicit snapshot save, and the stub generation
//! calls.

use crate::draft::{Character, CharacterId, Draft, Genre, ImageId, ImageRetention};
use crate::export;
use crate::persist::{self, Snapshot};
use crate::store::{DraftStore, Slot};
use futures::StreamExt;
use muse::credentials::{self, KeySource};
use muse::{ImageRequest, Muse, SuggestRequest, Suggestion};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How much manuscript tail is sent along with a suggestion request.
const EXCERPT_CHARS: usize = 600;

/// Errors from StudioSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("muse error: {0}")]
    Muse(#[from] muse::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("character name must not be empty")]
    EmptyCharacterName,

    #[error("no character with id {0}")]
    UnknownCharacter(CharacterId),

    #[error("genre '{}' requires age verification and adult content enabled", .0.name())]
    GenreGated(Genre),
}

/// Configuration for opening a studio session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding the slot files.
    pub data_dir: PathBuf,

    /// Directory export artifacts are written into.
    pub export_dir: PathBuf,

    /// Fixed interval for the autosave timestamp tick.
    pub autosave_interval: Duration,

    /// Retention bound for attached images.
    pub retention: ImageRetention,

    /// URL of the optional remote configuration document.
    pub remote_config_url: Option<String>,

    /// Model override for the Muse client.
    pub model: Option<String>,
}

impl SessionConfig {
    /// Create a config rooted at a data directory, with defaults for
    /// everything else.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let export_dir = data_dir.join("exports");
        Self {
            data_dir,
            export_dir,
            autosave_interval: Duration::from_secs(30),
            retention: ImageRetention::default(),
            remote_config_url: None,
            model: None,
        }
    }

    /// Set the export directory.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Set the autosave tick interval.
    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// Set the image retention bound.
    pub fn with_retention(mut self, retention: ImageRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Set the remote configuration document URL.
    pub fn with_remote_config_url(mut self, url: impl Into<String>) -> Self {
        self.remote_config_url = Some(url.into());
        self
    }

    /// Set the model the Muse client requests.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A drafting session.
///
/// Holds the restored draft, writes each mutation through to its slot,
/// and drives the placeholder generation calls.
pub struct StudioSession {
    muse: Muse,
    store: DraftStore,
    draft: Draft,
    retention: ImageRetention,
    export_dir: PathBuf,
    autosave_interval: Duration,
    model: Option<String>,
    last_saved: Option<u64>,
    key_source: Option<KeySource>,
}

impl StudioSession {
    /// Open a session: resolve the API key, then restore every slot.
    ///
    /// Storage problems never fail the open; the session starts from
    /// defaults instead.
    pub async fn open(config: SessionConfig) -> Self {
        let store = DraftStore::open_dir(&config.data_dir);
        let stored_key = store.read_optional_string(Slot::ApiKey);
        let resolved =
            credentials::resolve(config.remote_config_url.as_deref(), stored_key).await;
        Self::from_parts(store, resolved, config)
    }

    /// Build a session over an already-constructed store, skipping key
    /// resolution. Used by tests and the headless runner.
    pub fn with_store(store: DraftStore, api_key: impl Into<String>, config: SessionConfig) -> Self {
        let resolved = Some(credentials::ResolvedKey {
            key: api_key.into(),
            source: KeySource::Stored,
        });
        Self::from_parts(store, resolved, config)
    }

    fn from_parts(
        store: DraftStore,
        resolved: Option<credentials::ResolvedKey>,
        config: SessionConfig,
    ) -> Self {
        let (key, key_source) = match resolved {
            Some(r) => (r.key, Some(r.source)),
            None => (String::new(), None),
        };

        let mut muse = Muse::new(key);
        if let Some(model) = &config.model {
            muse = muse.with_model(model.clone());
        }

        let Snapshot { draft, last_saved } = persist::restore(&store);

        Self {
            muse,
            store,
            draft,
            retention: config.retention,
            export_dir: config.export_dir,
            autosave_interval: config.autosave_interval,
            model: config.model,
            last_saved,
            key_source,
        }
    }

    // ========================================================================
    // Manuscript and metadata
    // ========================================================================

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn body(&self) -> &str {
        &self.draft.body
    }

    /// Replace the manuscript text.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.draft.body = body.into();
        self.store.write_string(Slot::Draft, &self.draft.body);
    }

    /// Append to the manuscript text.
    pub fn append_body(&mut self, text: &str) {
        self.draft.body.push_str(text);
        self.store.write_string(Slot::Draft, &self.draft.body);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.store.write_string(Slot::Title, &self.draft.title);
    }

    pub fn set_world_notes(&mut self, notes: impl Into<String>) {
        self.draft.world_notes = notes.into();
        self.store
            .write_string(Slot::WorldNotes, &self.draft.world_notes);
    }

    /// Set the genre. Adult-only options are rejected unless both
    /// content flags allow them.
    pub fn set_genre(&mut self, genre: Genre) -> Result<(), SessionError> {
        if genre.is_adult_only() && !(self.draft.age_verified && self.draft.adult_content) {
            return Err(SessionError::GenreGated(genre));
        }
        self.draft.genre = genre;
        self.store.write_string(Slot::Genre, genre.name());
        Ok(())
    }

    pub fn selectable_genres(&self) -> Vec<Genre> {
        self.draft.selectable_genres()
    }

    // ========================================================================
    // Characters and images
    // ========================================================================

    pub fn add_character(
        &mut self,
        name: impl Into<String>,
        bio: impl Into<String>,
    ) -> Result<CharacterId, SessionError> {
        let id = self
            .draft
            .add_character(name, bio)
            .ok_or(SessionError::EmptyCharacterName)?;
        self.store
            .write_list(Slot::Characters, &self.draft.characters);
        Ok(id)
    }

    pub fn remove_character(&mut self, id: CharacterId) -> Result<(), SessionError> {
        if !self.draft.remove_character(id) {
            return Err(SessionError::UnknownCharacter(id));
        }
        self.store
            .write_list(Slot::Characters, &self.draft.characters);
        Ok(())
    }

    /// Update a character's name and/or bio.
    pub fn update_character(
        &mut self,
        id: CharacterId,
        name: Option<String>,
        bio: Option<String>,
    ) -> Result<(), SessionError> {
        if let Some(name) = &name {
            if name.trim().is_empty() {
                return Err(SessionError::EmptyCharacterName);
            }
        }

        let character = self
            .draft
            .character_mut(id)
            .ok_or(SessionError::UnknownCharacter(id))?;
        if let Some(name) = name {
            character.name = name;
        }
        if let Some(bio) = bio {
            character.bio = bio;
        }

        self.store
            .write_list(Slot::Characters, &self.draft.characters);
        Ok(())
    }

    pub fn characters(&self) -> &[Character] {
        &self.draft.characters
    }

    /// Attach an image record, applying the retention bound.
    pub fn attach_image(&mut self, src: impl Into<String>, name: impl Into<String>) -> ImageId {
        let id = self.draft.attach_image(src, name, &self.retention);
        self.store.write_list(Slot::Images, &self.draft.images);
        id
    }

    // ========================================================================
    // Content flags
    // ========================================================================

    pub fn set_adult_content(&mut self, enabled: bool) {
        self.draft.adult_content = enabled;
        self.store.write_bool(Slot::AdultContent, enabled);
    }

    pub fn verify_age(&mut self) {
        self.draft.verify_age();
        self.store.write_bool(Slot::AgeVerified, true);
    }

    /// The explicit "under 18" decline. Drops both flags.
    pub fn decline_age(&mut self) {
        self.draft.decline_age();
        self.store.write_bool(Slot::AgeVerified, false);
        self.store.write_bool(Slot::AdultContent, false);
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Store a new API key through in-app settings and switch the client
    /// to it.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.store.write_string(Slot::ApiKey, &key);

        let mut muse = Muse::new(key);
        if let Some(model) = &self.model {
            muse = muse.with_model(model.clone());
        }
        self.muse = muse;
        self.key_source = Some(KeySource::Stored);
    }

    /// Where the active API key came from, if one resolved.
    pub fn key_source(&self) -> Option<KeySource> {
        self.key_source
    }

    pub fn autosave_interval(&self) -> Duration {
        self.autosave_interval
    }

    // ========================================================================
    // Muse calls
    // ========================================================================

    fn suggest_request(&self) -> SuggestRequest {
        let excerpt: String = self
            .draft
            .body
            .chars()
            .rev()
            .take(EXCERPT_CHARS)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        SuggestRequest {
            title: self.draft.title.clone(),
            genre: Some(self.draft.genre.name().to_string()),
            excerpt,
        }
    }

    /// Ask the muse for a continuation of the current manuscript.
    pub async fn request_suggestion(&self) -> Result<Suggestion, SessionError> {
        Ok(self.muse.suggest(self.suggest_request()).await?)
    }

    /// Streamed variant; `on_chunk` sees each chunk as it arrives and the
    /// assembled suggestion is returned at the end.
    pub async fn request_suggestion_streamed(
        &self,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<Suggestion, SessionError> {
        let mut stream = self.muse.suggest_stream(self.suggest_request()).await?;

        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            on_chunk(&chunk);
            text.push_str(&chunk);
        }

        Ok(Suggestion {
            text,
            model: self.muse.model().to_string(),
        })
    }

    /// Fold an accepted suggestion into the manuscript.
    pub fn accept_suggestion(&mut self, suggestion: &Suggestion) {
        if !self.draft.body.is_empty() && !self.draft.body.ends_with(char::is_whitespace) {
            self.draft.body.push(' ');
        }
        self.draft.body.push_str(&suggestion.text);
        self.store.write_string(Slot::Draft, &self.draft.body);
    }

    /// Generate a cover image and attach it to the draft.
    pub async fn generate_cover(&mut self) -> Result<ImageId, SessionError> {
        let prompt = format!("{} ({})", self.draft.title, self.draft.genre.name());
        let image = self.muse.generate_image(ImageRequest { prompt }).await?;
        Ok(self.attach_image(image.src, image.name))
    }

    // ========================================================================
    // Persistence and export
    // ========================================================================

    /// Persist a consistent snapshot of every slot. Returns the stamp.
    pub fn save(&mut self) -> u64 {
        self.retention.apply(&mut self.draft.images);
        let stamp = persist::save(&mut self.store, &self.draft);
        self.last_saved = Some(stamp);
        stamp
    }

    /// The periodic autosave tick: refresh the last-save stamp.
    pub fn touch(&mut self) -> u64 {
        let stamp = persist::touch(&mut self.store);
        self.last_saved = Some(stamp);
        stamp
    }

    /// Unix seconds of the last save, if any.
    pub fn last_saved(&self) -> Option<u64> {
        self.last_saved
    }

    /// Write the export artifact into the configured export directory.
    pub async fn export(&self) -> Result<PathBuf, SessionError> {
        self.export_to(&self.export_dir).await
    }

    /// Write the export artifact into an arbitrary directory.
    pub async fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SessionError> {
        Ok(export::write_export(dir, &self.draft.title, &self.draft.body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testing::FailingStore;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> SessionConfig {
        SessionConfig::new(dir.path())
    }

    fn memory_session() -> StudioSession {
        let dir = std::env::temp_dir();
        StudioSession::with_store(
            DraftStore::new(MemoryStore::new()),
            "test-key",
            SessionConfig::new(dir),
        )
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new("/tmp/novelist")
            .with_export_dir("/tmp/out")
            .with_autosave_interval(Duration::from_secs(5))
            .with_retention(ImageRetention { max_images: 8 })
            .with_remote_config_url("https://example.com/config.json")
            .with_model("muse-draft-2");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/novelist"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.autosave_interval, Duration::from_secs(5));
        assert_eq!(config.retention.max_images, 8);
        assert_eq!(
            config.remote_config_url.as_deref(),
            Some("https://example.com/config.json")
        );
        assert_eq!(config.model.as_deref(), Some("muse-draft-2"));
    }

    #[tokio::test]
    async fn test_session_round_trip_via_dir_store() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        {
            let mut session = StudioSession::with_store(
                DraftStore::open_dir(dir.path()),
                "k",
                config(&dir),
            );
            session.set_title("The Hollow Season");
            session.set_body("It began with a letter.");
            session.set_world_notes("Fenland town, floods every spring.");
            session.add_character("Anya", "Cartographer").unwrap();
            session.verify_age();
            session.set_adult_content(true);
            session.set_genre(Genre::DarkRomance).unwrap();
            session.save();
        }

        let session =
            StudioSession::with_store(DraftStore::open_dir(dir.path()), "k", config(&dir));
        assert_eq!(session.title(), "The Hollow Season");
        assert_eq!(session.body(), "It began with a letter.");
        assert_eq!(session.draft().genre, Genre::DarkRomance);
        assert_eq!(session.characters().len(), 1);
        assert!(session.last_saved().is_some());
    }

    #[test]
    fn test_open_with_failing_store_starts_from_defaults() {
        let dir = std::env::temp_dir();
        let session = StudioSession::with_store(
            DraftStore::new(FailingStore),
            "k",
            SessionConfig::new(dir),
        );

        assert_eq!(session.title(), crate::draft::DEFAULT_TITLE);
        assert!(session.body().is_empty());
        assert!(session.characters().is_empty());
    }

    #[test]
    fn test_add_character_validation() {
        let mut session = memory_session();
        let err = session.add_character("  ", "bio").unwrap_err();
        assert!(matches!(err, SessionError::EmptyCharacterName));

        let id = session.add_character("Anya", "").unwrap();
        assert!(session.remove_character(id).is_ok());
        assert!(matches!(
            session.remove_character(id),
            Err(SessionError::UnknownCharacter(_))
        ));
    }

    #[test]
    fn test_update_character() {
        let mut session = memory_session();
        let id = session.add_character("Anya", "Cartographer").unwrap();

        session
            .update_character(id, None, Some("Cartographer, retired".to_string()))
            .unwrap();
        assert_eq!(session.characters()[0].name, "Anya");
        assert_eq!(session.characters()[0].bio, "Cartographer, retired");

        let err = session
            .update_character(id, Some("  ".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyCharacterName));
    }

    #[test]
    fn test_adult_genre_requires_flags() {
        let mut session = memory_session();

        let err = session.set_genre(Genre::Erotica).unwrap_err();
        assert!(matches!(err, SessionError::GenreGated(Genre::Erotica)));

        session.verify_age();
        session.set_adult_content(true);
        session.set_genre(Genre::Erotica).unwrap();
        assert_eq!(session.draft().genre, Genre::Erotica);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_flow() {
        let mut session = memory_session();
        session.set_title("The Hollow Season");
        session.set_body("She counted the boats twice.");

        let suggestion = session.request_suggestion().await.unwrap();
        assert!(suggestion.text.contains("counted the boats twice"));

        session.accept_suggestion(&suggestion);
        assert!(session.body().starts_with("She counted the boats twice. "));
        assert!(session.body().ends_with(&suggestion.text));
    }

    #[tokio::test(start_paused = true)]
    async fn test_streamed_suggestion_matches_assembly() {
        let mut session = memory_session();
        session.set_body("The tide went out and stayed out.");

        let mut seen = String::new();
        let suggestion = session
            .request_suggestion_streamed(|chunk| seen.push_str(chunk))
            .await
            .unwrap();

        assert_eq!(seen, suggestion.text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_cover_attaches_image() {
        let mut session = memory_session();
        session.set_title("The Hollow Season");

        let id = session.generate_cover().await.unwrap();
        let images = &session.draft().images;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, id);
        assert!(images[0].src.starts_with("data:image/"));
    }

    #[tokio::test]
    async fn test_export_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut session = memory_session();
        session.set_title("T");
        session.set_body("B");

        let path = session.export_to(dir.path()).await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "T\n\nB");
    }

    #[test]
    fn test_set_api_key_switches_source() {
        let mut session = memory_session();
        session.set_api_key("sk-new");
        assert_eq!(session.key_source(), Some(KeySource::Stored));
    }
}
