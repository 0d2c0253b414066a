//! CAPTCHA challenge store.
//!
//! Holds short-lived human-verification codes keyed by an opaque token.
//! A challenge is consumed by its first verification attempt regardless of
//! the outcome; expired entries are swept lazily on access, so no background
//! task is involved. Rendering the code as an image is the caller's concern.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use uuid::Uuid;

use crate::clock::Clock;

/// Code alphabet with ambiguous glyphs (I, O, 0, 1) excluded
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// A freshly generated challenge handed back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct CaptchaChallenge {
    pub token: String,
    pub code: String,
}

#[derive(Debug, Clone)]
struct ChallengeEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

impl ChallengeEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory challenge store.
///
/// Thread-safety: DashMap gives per-key locking, so unrelated tokens never
/// serialize on each other and `remove` is atomic per key.
pub struct CaptchaStore {
    entries: DashMap<String, ChallengeEntry>,
    ttl: Duration,
    code_length: usize,
    clock: Arc<dyn Clock>,
}

impl CaptchaStore {
    pub fn new(ttl: Duration, code_length: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            code_length,
            clock,
        }
    }

    /// Create a new challenge and remember its code until the TTL elapses.
    pub fn generate(&self) -> CaptchaChallenge {
        self.sweep_expired();

        let code = random_code(self.code_length);
        let token = Uuid::new_v4().to_string();

        self.entries.insert(
            token.clone(),
            ChallengeEntry {
                code: code.clone(),
                expires_at: self.clock.now() + self.ttl,
            },
        );

        CaptchaChallenge { token, code }
    }

    /// Check `answer` against the challenge behind `token`, consuming it.
    ///
    /// The entry is removed before the comparison, so the token is spent by
    /// the first attempt whatever the answer; under concurrent duplicate
    /// requests at most one caller observes the entry.
    pub fn verify_and_consume(&self, token: &str, answer: &str) -> bool {
        self.sweep_expired();

        let Some((_, entry)) = self.entries.remove(token) else {
            return false;
        };
        if entry.is_expired(self.clock.now()) {
            return false;
        }

        entry.code.eq_ignore_ascii_case(answer.trim())
    }

    /// Drop entries past their expiry. Amortized over generate/verify calls.
    fn sweep_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn random_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
