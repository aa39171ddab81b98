//! Presentation Layer
//!
//! HTTP API: DTOs, handlers, bearer-token middleware, and the router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{auth_router, auth_router_generic};
