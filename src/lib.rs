//! Stone identifier - describes the geology of a stone from a photo
//!
//! Takes either a bundled default photo or a user-selected image, sends it to
//! a multimodal model with a fixed educational prompt, and formats the answer
//! into section headers, labeled properties, bullets and paragraphs.

pub mod ai;
pub mod app;
pub mod error;
pub mod format;
pub mod image;
pub mod models;
pub mod prompts;
pub mod view;

pub use error::{Error, Result};
