//! Request counters and the GET /metrics handler.

use crate::state::SharedState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub index_cache_hits: AtomicU64,
    pub index_cache_misses: AtomicU64,
    pub index_reloads: AtomicU64,
    pub pages_served: AtomicU64,
    pub pages_not_found: AtomicU64,
    pub placeholder_pages: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub index_cache_hits: u64,
    pub index_cache_misses: u64,
    pub index_cache_hit_rate: f64,
    pub index_reloads: u64,
    pub pages_served: u64,
    pub pages_not_found: u64,
    /// Pages whose body exists but whose index entry is missing
    pub placeholder_pages: u64,
}

impl Metrics {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsResponse {
        let hits = self.index_cache_hits.load(Ordering::Relaxed);
        let misses = self.index_cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        MetricsResponse {
            index_cache_hits: hits,
            index_cache_misses: misses,
            index_cache_hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            index_reloads: self.index_reloads.load(Ordering::Relaxed),
            pages_served: self.pages_served.load(Ordering::Relaxed),
            pages_not_found: self.pages_not_found.load(Ordering::Relaxed),
            placeholder_pages: self.placeholder_pages.load(Ordering::Relaxed),
        }
    }
}

pub async fn metrics(State(state): State<SharedState>) -> Json<MetricsResponse> {
    Json(state.metrics.snapshot())
}
