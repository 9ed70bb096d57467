//! # TodoCast Core
//! Shared types, error taxonomy, environment configuration and the
//! capability traits that every service crate plugs into.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, TodoCastError};
pub use types::{InboundMessage, TodoEvent, TodoItem};
