//! Callable HTTP surface for the mobile clients.
//!
//! Deliberately thin: an authenticated username-existence check plus a
//! health endpoint. The dispatch pipeline lives in `savora-dispatch` and
//! is driven by the relay, not by this server.

pub mod middleware;
pub mod routes;
pub mod state;
