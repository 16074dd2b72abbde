use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::debug;

use crate::utils;

/// A browser session holding the bearer token obtained at `/callback`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session table with a per-entry time-to-live and a size bound.
///
/// Expired entries are dropped lazily on lookup and eagerly by
/// [`SessionStore::purge_expired`]. When the table is full, inserting purges
/// expired entries first and then evicts the oldest session.
pub struct SessionStore {
    ttl: TimeDelta,
    capacity: usize,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        SessionStore {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            capacity: capacity.max(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stores `access_token` under a freshly generated session id.
    pub async fn create(&self, access_token: String) -> Session {
        self.create_at(access_token, Utc::now()).await
    }

    async fn create_at(&self, access_token: String, now: DateTime<Utc>) -> Session {
        let session = Session {
            id: utils::generate_session_id(),
            access_token,
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.capacity {
            sessions.retain(|_, s| !s.is_expired_at(now));
        }
        while sessions.len() >= self.capacity {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id.clone());
            match oldest {
                Some(id) => {
                    debug!("session store full, evicting oldest session");
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Looks up a live session. An expired entry is removed and not returned.
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.get_at(id, Utc::now()).await
    }

    async fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => return Some(session.clone()),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.get(id).is_some_and(|s| s.is_expired_at(now)) {
            sessions.remove(id);
        }
        None
    }

    pub async fn access_token(&self, id: &str) -> Option<String> {
        self.get(id).await.map(|session| session.access_token)
    }

    pub async fn remove(&self, id: &str) -> Option<Session> {
        self.sessions.write().await.remove(id)
    }

    /// Drops every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawns the background task that purges expired sessions every `every`.
pub fn spawn_sweeper(store: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                debug!(purged, "purged expired sessions");
            }
        }
    })
}
