//! Native client for the marketplace REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Carries the browser client's session lifecycle into Rust: a credential
//! cookie attached to every request, a session store that believes in a user
//! only after the server confirms one, a route guard in front of the
//! authenticated pages, and cache-keyed query/mutation bindings over the REST
//! endpoints. [`app::MarketplaceApp`] wires the pieces together.

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod query;
pub mod router;
pub mod state;
pub mod util;
