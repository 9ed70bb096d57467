//! # TodoCast Jobs
//!
//! - [`image_refresh`]: periodically downloads a fresh background image.
//! - [`reminder`]: one-shot job that adds a "Read <random article>" todo.

pub mod image_refresh;
pub mod reminder;

pub use image_refresh::ImageRefresher;
