//! Latest-request tracking, so superseded resolutions can be dropped

use folio_core::Slug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issued when a request starts; compared against the tracker when it ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    slug: Slug,
}

impl Ticket {
    pub fn slug(&self) -> &Slug {
        &self.slug
    }
}

/// Remembers which request was issued last.
///
/// Requesting the same slug twice still supersedes the first request.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, slug: Slug) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { generation, slug }
    }

    /// True if no request was issued after `ticket`
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }
}
