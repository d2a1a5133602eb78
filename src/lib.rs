//! Backend for the event outfitter - restyles a user's photo for an event
//!
//! Accepts a photo plus event details, asks a multimodal model for outfit
//! suggestions, and renders the photo in those outfits. Sessions are kept in
//! memory so callers can swap between suggestions without re-uploading.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;
pub mod session;

pub use error::{Error, Result};
