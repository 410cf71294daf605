//! In-process revocation list for logged-out access tokens.
//!
//! Entries are keyed by the token's `jti` and kept until the token would
//! have expired anyway, after which [`TokenBlocklist::purge_expired`] drops
//! them.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct TokenBlocklist {
    revoked: Arc<RwLock<HashMap<String, usize>>>,
}

impl TokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes `jti` until `exp` (Unix seconds).
    pub fn revoke(&self, jti: impl Into<String>, exp: usize) {
        let mut revoked = self.revoked.write().unwrap_or_else(PoisonError::into_inner);
        revoked.insert(jti.into(), exp);
        Self::retain_live(&mut revoked, now());
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(jti)
    }

    /// Drops entries whose tokens have expired. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut revoked = self.revoked.write().unwrap_or_else(PoisonError::into_inner);
        Self::retain_live(&mut revoked, now())
    }

    pub fn len(&self) -> usize {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain_live(revoked: &mut HashMap<String, usize>, now: usize) -> usize {
        let before = revoked.len();
        revoked.retain(|_, exp| *exp > now);
        before - revoked.len()
    }
}

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}
