//! Draft data model.
//!
//! The manuscript, its metadata, characters, attached images, and the
//! content flags that gate the adult genre options. Everything here is
//! plain serializable state; the store decides how each piece maps onto
//! durable slots.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Title used when the author has not picked one.
pub const DEFAULT_TITLE: &str = "Untitled";

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
///
/// Allocated from the creation timestamp, bumped past the highest
/// existing id so ids stay strictly monotonic even when two characters
/// are created within the same millisecond. Never reused within a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for images.
///
/// Derived from the creation timestamp plus random entropy, so uniqueness
/// is probabilistic. Good enough for locally attached media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u64);

impl ImageId {
    pub fn new() -> Self {
        let entropy: u64 = rand::thread_rng().gen_range(0..1000);
        Self(now_millis() * 1000 + entropy)
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ============================================================================
// Characters and Images
// ============================================================================

/// A character in the story bible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,

    /// Display name. Never empty.
    pub name: String,

    /// Free-form biography.
    pub bio: String,
}

/// An attached image record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: ImageId,

    /// Data URI holding the encoded image bytes.
    pub src: String,

    /// Display name.
    pub name: String,
}

/// Retention policy for attached images.
///
/// The original kept every record forever; a count bound keeps the list
/// from growing without limit. Zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRetention {
    pub max_images: usize,
}

impl Default for ImageRetention {
    fn default() -> Self {
        Self { max_images: 64 }
    }
}

impl ImageRetention {
    /// Evict the oldest records until the list fits the bound.
    pub fn apply(&self, images: &mut Vec<ImageRecord>) {
        if self.max_images == 0 {
            return;
        }
        let excess = images.len().saturating_sub(self.max_images);
        images.drain(..excess);
    }
}

// ============================================================================
// Genre
// ============================================================================

/// Genre options offered by the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Genre {
    #[default]
    Fantasy,
    ScienceFiction,
    Mystery,
    Thriller,
    Romance,
    Horror,
    HistoricalFiction,
    YoungAdult,
    /// Adult-only.
    Erotica,
    /// Adult-only.
    DarkRomance,
}

impl Genre {
    pub fn name(&self) -> &'static str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Mystery => "Mystery",
            Genre::Thriller => "Thriller",
            Genre::Romance => "Romance",
            Genre::Horror => "Horror",
            Genre::HistoricalFiction => "Historical Fiction",
            Genre::YoungAdult => "Young Adult",
            Genre::Erotica => "Erotica",
            Genre::DarkRomance => "Dark Romance",
        }
    }

    /// Parse a stored genre name. Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether this option is gated behind the content flags.
    pub fn is_adult_only(&self) -> bool {
        matches!(self, Genre::Erotica | Genre::DarkRomance)
    }

    pub fn all() -> [Genre; 10] {
        [
            Genre::Fantasy,
            Genre::ScienceFiction,
            Genre::Mystery,
            Genre::Thriller,
            Genre::Romance,
            Genre::Horror,
            Genre::HistoricalFiction,
            Genre::YoungAdult,
            Genre::Erotica,
            Genre::DarkRomance,
        ]
    }

    /// Genres selectable under the given content flags. Adult-only
    /// options require both the age check and the adult-content toggle.
    pub fn selectable(age_verified: bool, adult_content: bool) -> Vec<Genre> {
        Self::all()
            .iter()
            .copied()
            .filter(|g| !g.is_adult_only() || (age_verified && adult_content))
            .collect()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Draft
// ============================================================================

/// The complete in-memory drafting state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub genre: Genre,

    /// The manuscript text.
    pub body: String,

    /// Free-form worldbuilding notes.
    pub world_notes: String,

    pub characters: Vec<Character>,
    pub images: Vec<ImageRecord>,

    /// Shows the adult genre options when set (with age verification).
    pub adult_content: bool,

    /// Set once by the age gate; cleared only by an explicit
    /// "under 18" decline.
    pub age_verified: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            genre: Genre::default(),
            body: String::new(),
            world_notes: String::new(),
            characters: Vec::new(),
            images: Vec::new(),
            adult_content: false,
            age_verified: false,
        }
    }

    /// Add a character to the story bible.
    ///
    /// Returns `None` for a blank name; ids are allocated monotonically
    /// and never reused.
    pub fn add_character(
        &mut self,
        name: impl Into<String>,
        bio: impl Into<String>,
    ) -> Option<CharacterId> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }

        let id = self.next_character_id();
        self.characters.push(Character {
            id,
            name,
            bio: bio.into(),
        });
        Some(id)
    }

    fn next_character_id(&self) -> CharacterId {
        let floor = self
            .characters
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0);
        CharacterId(now_millis().max(floor))
    }

    /// Remove a character by id. Returns whether anything was removed;
    /// the order of the remaining characters is unchanged.
    pub fn remove_character(&mut self, id: CharacterId) -> bool {
        let before = self.characters.len();
        self.characters.retain(|c| c.id != id);
        self.characters.len() != before
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Attach an image record, applying the retention bound.
    pub fn attach_image(
        &mut self,
        src: impl Into<String>,
        name: impl Into<String>,
        retention: &ImageRetention,
    ) -> ImageId {
        let id = ImageId::new();
        self.images.push(ImageRecord {
            id,
            src: src.into(),
            name: name.into(),
        });
        retention.apply(&mut self.images);
        id
    }

    /// Genres currently selectable under this draft's content flags.
    pub fn selectable_genres(&self) -> Vec<Genre> {
        Genre::selectable(self.age_verified, self.adult_content)
    }

    /// Record a passed age check.
    pub fn verify_age(&mut self) {
        self.age_verified = true;
    }

    /// Record an explicit "under 18" decline. Also drops the adult
    /// content toggle so the gated options disappear with it.
    pub fn decline_age(&mut self) {
        self.age_verified = false;
        self.adult_content = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_character_rejects_blank_names() {
        let mut draft = Draft::new();
        assert!(draft.add_character("", "bio").is_none());
        assert!(draft.add_character("   ", "bio").is_none());
        assert!(draft.characters.is_empty());
    }

    #[test]
    fn test_character_ids_are_monotonic() {
        let mut draft = Draft::new();
        let a = draft.add_character("Anya", "").unwrap();
        let b = draft.add_character("Brin", "").unwrap();
        let c = draft.add_character("Cole", "").unwrap();

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_remove_character_preserves_order() {
        let mut draft = Draft::new();
        let _a = draft.add_character("Anya", "").unwrap();
        let b = draft.add_character("Brin", "").unwrap();
        let _c = draft.add_character("Cole", "").unwrap();

        assert!(draft.remove_character(b));
        let names: Vec<_> = draft.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Anya", "Cole"]);

        // Removing again is a no-op.
        assert!(!draft.remove_character(b));
        assert_eq!(draft.characters.len(), 2);
    }

    #[test]
    fn test_ids_stay_monotonic_after_removal() {
        let mut draft = Draft::new();
        let _a = draft.add_character("Anya", "").unwrap();
        let b = draft.add_character("Brin", "").unwrap();
        let c = draft.add_character("Cole", "").unwrap();
        draft.remove_character(b);

        let d = draft.add_character("Dara", "").unwrap();
        assert!(d > c);
        assert!(d > b);
    }

    #[test]
    fn test_adult_genres_gated() {
        // Both flags are required for the two adult-only options.
        let open = Genre::selectable(true, true);
        assert!(open.contains(&Genre::Erotica));
        assert!(open.contains(&Genre::DarkRomance));
        assert_eq!(open.len(), Genre::all().len());

        for (age, adult) in [(false, false), (true, false), (false, true)] {
            let gated = Genre::selectable(age, adult);
            assert!(!gated.contains(&Genre::Erotica));
            assert!(!gated.contains(&Genre::DarkRomance));
            assert_eq!(gated.len(), Genre::all().len() - 2);
        }
    }

    #[test]
    fn test_genre_name_round_trip() {
        for genre in Genre::all() {
            assert_eq!(Genre::from_name(genre.name()), Some(genre));
        }
        assert_eq!(Genre::from_name("science fiction"), Some(Genre::ScienceFiction));
        assert_eq!(Genre::from_name("no such genre"), None);
    }

    #[test]
    fn test_decline_age_clears_both_flags() {
        let mut draft = Draft::new();
        draft.verify_age();
        draft.adult_content = true;
        assert!(draft.selectable_genres().contains(&Genre::Erotica));

        draft.decline_age();
        assert!(!draft.age_verified);
        assert!(!draft.adult_content);
        assert!(!draft.selectable_genres().contains(&Genre::Erotica));
    }

    #[test]
    fn test_image_retention_evicts_oldest() {
        let mut draft = Draft::new();
        let retention = ImageRetention { max_images: 3 };

        for i in 0..5 {
            draft.attach_image(format!("data:image/png;base64,{i}"), format!("img-{i}"), &retention);
        }

        assert_eq!(draft.images.len(), 3);
        let names: Vec<_> = draft.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["img-2", "img-3", "img-4"]);
    }

    #[test]
    fn test_image_retention_zero_is_unbounded() {
        let mut draft = Draft::new();
        let retention = ImageRetention { max_images: 0 };

        for i in 0..100 {
            draft.attach_image("data:,", format!("img-{i}"), &retention);
        }

        assert_eq!(draft.images.len(), 100);
    }
}
