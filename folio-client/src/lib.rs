//! Folio Client - Content store access for CLI and service
//!
//! Fetches the index tree and document bodies from the remote content store,
//! resolves slugs with folder-index fallback, and wraps both in a `Session`
//! so callers share one read-only tree per navigation session.

pub mod resolver;
pub mod session;
pub mod store;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use resolver::{ContentResolver, UNTITLED};
pub use session::{Navigation, Session};
pub use store::{ContentSource, RemoteStore};
pub use tracker::{RequestTracker, Ticket};
