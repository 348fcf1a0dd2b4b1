//! In-memory session store using moka
//!
//! Booking sessions live only in memory. A session that is not touched
//! within the idle window (or outlives the TTL) is dropped, which is how an
//! abandoned booking is discarded.

use moka::future::Cache;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::session::BookingSession;
use crate::config::Config;

/// Upper bound on how long a submission claim is held if its request dies
const SUBMISSION_CLAIM_TTL: Duration = Duration::from_secs(60);

/// Application cache holding in-progress booking sessions
#[derive(Clone)]
pub struct AppCache {
    /// Booking sessions (session id -> session)
    pub sessions: Cache<Uuid, BookingSession>,
    /// Sessions whose booking is being handed off right now
    submissions: Cache<Uuid, ()>,
}

impl AppCache {
    /// Create a new cache instance with configured limits
    pub fn new(config: &Config) -> Self {
        Self::with_limits(config.max_sessions, config.session_ttl, config.session_idle)
    }

    pub fn with_limits(max_sessions: u64, ttl: Duration, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_live(ttl)
                .time_to_idle(idle)
                .build(),
            submissions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_live(SUBMISSION_CLAIM_TTL)
                .build(),
        }
    }

    pub async fn session(&self, id: Uuid) -> Option<BookingSession> {
        let session = self.sessions.get(&id).await;
        if session.is_none() {
            debug!("Cache MISS for session: {}", id);
        }
        session
    }

    /// Store the session, replacing any previous version
    pub async fn save(&self, session: BookingSession) {
        self.sessions.insert(session.id, session).await;
    }

    pub async fn discard(&self, id: Uuid) {
        self.sessions.invalidate(&id).await;
        info!("Session discarded: {}", id);
    }

    /// Claim the right to submit a session's booking.
    ///
    /// Returns `false` if another request already holds the claim.
    pub async fn begin_submission(&self, id: Uuid) -> bool {
        self.submissions.entry(id).or_insert(()).await.is_fresh()
    }

    pub async fn end_submission(&self, id: Uuid) {
        self.submissions.invalidate(&id).await;
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sessions: self.sessions.entry_count(),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub sessions: u64,
}
