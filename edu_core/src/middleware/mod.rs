//! Tower layers wrapped around the router

pub mod cors;
pub mod logging;
