//! # TodoCast Frontend
//! Serves the single-page UI and the background image, and forwards
//! `/api/todos` calls to the todo backend.

pub mod routes;
pub mod server;

pub use server::{FrontendState, build_router, start};
