// --- File: crates/roombook_graph/src/lib.rs ---
pub mod auth;
pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod models;
pub mod release;
pub mod routes;

pub use client::GraphClient;
pub use error::{AuthError, GraphError};
pub use handlers::GraphState;
pub use routes::routes;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod test_support;
