pub mod admin;
pub mod auth;
pub mod dto;
pub mod middleware;
pub mod quiz;
pub mod rest;
pub mod router;
pub mod state;
pub mod validation;

// Re-export the router builder to make it easily accessible
// to the binary that runs the web server.
pub use middleware::require_auth;
pub use router::build_router;
