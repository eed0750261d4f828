//! Client-side stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stores own mutable client state behind async locks. Each store is the
//! only writer of its state; the router and views read snapshots.

pub mod items;
pub mod session;

pub use items::{ItemsState, ItemsStore};
pub use session::{InitOutcome, LogoutOutcome, SessionState, SessionStore, SessionUser};
