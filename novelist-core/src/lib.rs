//! Novel drafting engine with local-first persistence.
//!
//! This crate provides:
//! - The draft data model: manuscript, characters, images, genre gating
//! - A slot-based persisted draft store with best-effort durability
//! - Snapshot save/restore and plain-text export
//! - A high-level `StudioSession` API driving the Muse stub calls
//!
//! # Quick Start
//!
//! ```ignore
//! use novelist_core::{SessionConfig, StudioSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("/home/me/.novelist");
//!     let mut session = StudioSession::open(config).await;
//!
//!     session.set_title("The Hollow Season");
//!     session.set_body("It began, as these things do, with a letter.");
//!
//!     let suggestion = session.request_suggestion().await?;
//!     session.accept_suggestion(&suggestion);
//!
//!     session.save();
//!     session.export().await?;
//!     Ok(())
//! }
//! ```

pub mod draft;
pub mod export;
pub mod persist;
pub mod session;
pub mod store;
pub mod testing;

// Re-export the client crate for downstream consumers.
pub use muse;

// Primary public API
pub use draft::{
    Character, CharacterId, Draft, Genre, ImageId, ImageRecord, ImageRetention, DEFAULT_TITLE,
};
pub use persist::Snapshot;
pub use session::{SessionConfig, SessionError, StudioSession};
pub use store::{DirStore, DraftStore, MemoryStore, Slot, StorageBackend, StoreError};
pub use testing::{MockMuse, MockResponse, StudioHarness};
