//! Query API: read-only JSON endpoints over the shared catalog

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
