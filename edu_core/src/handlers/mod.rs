//! HTTP handlers and route wiring

pub mod fallback;
pub mod health;
pub mod resources;
pub mod routes;
pub mod users;

pub use routes::create_routes;
