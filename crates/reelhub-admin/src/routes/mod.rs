//! HTTP routes of the admin API

pub mod content;
pub mod health;
pub mod webhooks;

pub use content::{Video, VideoLibrary};
