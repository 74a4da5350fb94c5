//! Bearer-protected task service: list, filter, create, fetch and update
//! tasks over HTTP, backed by a pluggable [`store::TaskStore`].

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use auth::AuthToken;
pub use config::Config;
pub use routes::{router, AppState};
