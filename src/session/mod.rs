//! In-memory session cache
//!
//! A session remembers the uploaded photo and the outfit suggestions produced
//! for it, so later requests can regenerate the photo in another style.

pub mod store;

pub use store::{PendingSession, SessionStore};

use crate::models::EventDetails;

/// Opaque session identifier handed to callers in `X-Session-ID`.
pub type SessionId = String;

/// Everything needed to regenerate a styled photo. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub styles: Vec<String>,
    pub image: Vec<u8>,
    pub mime_type: String,
    pub event: EventDetails,
}

impl SessionRecord {
    pub fn style(&self, index: usize) -> Option<&str> {
        self.styles.get(index).map(String::as_str)
    }
}
