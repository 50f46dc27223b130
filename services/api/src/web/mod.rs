pub mod cookies;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder to make it easily accessible to the
// binary that starts the web server.
pub use rest::ApiDoc;
pub use router::api_router;
