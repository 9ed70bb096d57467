//! # TodoCast Gateway
//! The todo backend: list/create/complete over the Todo Store, with one
//! best-effort notification published per successful mutation.

pub mod events;
pub mod routes;
pub mod server;
pub mod service;

pub use events::EventQueue;
pub use server::{AppState, build_router, start};
pub use service::TodoService;

#[cfg(test)]
pub(crate) mod test_support;
