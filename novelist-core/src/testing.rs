//! Testing utilities for the drafting studio.
//!
//! This module provides tools for integration testing:
//! - `FailingStore` for exercising the best-effort storage policy
//! - `MockMuse` for deterministic suggestions without delays
//! - `StudioHarness` for scripted drafting scenarios

use crate::draft::{Draft, ImageRetention};
use crate::persist::{self, Snapshot};
use crate::store::{DraftStore, MemoryStore, StorageBackend, StoreError};

/// A backend whose every operation fails, standing in for durable
/// storage that is unavailable or throwing.
pub struct FailingStore;

impl StorageBackend for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    fn put(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }
}

/// A scripted suggestion.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Suggestion text to return.
    pub text: String,
}

impl MockResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A mock muse that returns scripted suggestions in order, with no
/// artificial delay.
pub struct MockMuse {
    responses: Vec<MockResponse>,
    response_index: usize,
}

impl MockMuse {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses,
            response_index: 0,
        }
    }

    /// Return the next scripted suggestion, or a fixed fallback once the
    /// script runs out.
    pub fn suggest(&mut self) -> String {
        if self.response_index < self.responses.len() {
            let r = self.responses[self.response_index].clone();
            self.response_index += 1;
            r.text
        } else {
            "The muse has no more scripted suggestions.".to_string()
        }
    }

    /// Add a response to the queue.
    pub fn queue_response(&mut self, response: MockResponse) {
        self.responses.push(response);
    }

    /// Replay the script from the beginning.
    pub fn reset(&mut self) {
        self.response_index = 0;
    }
}

/// Test harness for running drafting scenarios against a real store.
pub struct StudioHarness {
    /// The mock muse.
    pub muse: MockMuse,
    /// The in-memory draft.
    pub draft: Draft,
    /// The slot store.
    pub store: DraftStore,
    /// Retention applied on save.
    pub retention: ImageRetention,
}

impl StudioHarness {
    /// Create a harness over an in-memory backend.
    pub fn new() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    /// Create a harness over a custom backend.
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        Self {
            muse: MockMuse::new(Vec::new()),
            draft: Draft::new(),
            store: DraftStore::new(backend),
            retention: ImageRetention::default(),
        }
    }

    /// Queue a scripted suggestion.
    pub fn expect_suggestion(&mut self, text: impl Into<String>) -> &mut Self {
        self.muse.queue_response(MockResponse::new(text));
        self
    }

    /// Take the next suggestion and fold it into the manuscript.
    pub fn suggest(&mut self) -> String {
        let text = self.muse.suggest();
        if !self.draft.body.is_empty() && !self.draft.body.ends_with(char::is_whitespace) {
            self.draft.body.push(' ');
        }
        self.draft.body.push_str(&text);
        text
    }

    /// Persist the current draft.
    pub fn save(&mut self) -> u64 {
        self.retention.apply(&mut self.draft.images);
        persist::save(&mut self.store, &self.draft)
    }

    /// Restore a snapshot from the store, as a fresh session would.
    pub fn restore(&self) -> Snapshot {
        persist::restore(&self.store)
    }

    /// Names of characters in bible order.
    pub fn character_names(&self) -> Vec<&str> {
        self.draft.characters.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for StudioHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the draft's characters match the expected names, in order.
#[track_caller]
pub fn assert_characters(harness: &StudioHarness, expected: &[&str]) {
    let actual = harness.character_names();
    assert_eq!(
        actual, expected,
        "Expected characters {expected:?}, got {actual:?}"
    );
}

/// Assert a freshly restored snapshot equals the in-memory draft.
#[track_caller]
pub fn assert_round_trips(harness: &StudioHarness) {
    let restored = harness.restore();
    assert_eq!(
        restored.draft, harness.draft,
        "Restored draft diverged from the in-memory draft"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Genre;

    #[test]
    fn test_mock_muse_script_order() {
        let mut harness = StudioHarness::new();
        harness
            .expect_suggestion("First.")
            .expect_suggestion("Second.");

        assert_eq!(harness.suggest(), "First.");
        assert_eq!(harness.suggest(), "Second.");
        assert!(harness.suggest().contains("no more scripted"));
        assert_eq!(harness.draft.body, "First. Second. The muse has no more scripted suggestions.");
    }

    #[test]
    fn test_mock_muse_reset() {
        let mut muse = MockMuse::new(vec![MockResponse::new("Only.")]);
        assert_eq!(muse.suggest(), "Only.");
        muse.reset();
        assert_eq!(muse.suggest(), "Only.");
    }

    #[test]
    fn test_harness_round_trip() {
        let mut harness = StudioHarness::new();
        harness.draft.title = "The Hollow Season".to_string();
        harness.draft.genre = Genre::Mystery;
        harness.draft.add_character("Anya", "Cartographer");
        harness.expect_suggestion("The letter arrived on a Tuesday.");
        harness.suggest();
        harness.save();

        assert_round_trips(&harness);
        assert_characters(&harness, &["Anya"]);
    }

    #[test]
    fn test_harness_with_failing_backend() {
        let mut harness = StudioHarness::with_backend(FailingStore);
        harness.draft.body = "unsaved".to_string();
        harness.save();

        // Nothing persisted; restore yields defaults.
        let restored = harness.restore();
        assert_eq!(restored, Snapshot::default_state());
    }
}
