// src/attempt/session.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{
    error::AppError,
    models::attempt::{AttemptKey, AttemptSession, Mode},
};

/// Holder of in-progress attempts, keyed by (exam, student).
///
/// Every request handler must reach the same store; a multi-process
/// deployment needs a shared implementation of this trait. Attempts that
/// are started but never submitted are only dropped by the store's own
/// expiry policy, if it has one.
pub trait SessionStore: Send + Sync {
    /// Returns the existing session for `key`, or creates one stamped with
    /// `mode` and `now`. An existing session is returned unchanged: neither
    /// its start time nor its mode is re-stamped.
    fn start(&self, key: &AttemptKey, mode: Mode, now: i64) -> Result<AttemptSession, AppError>;

    fn get(&self, key: &AttemptKey) -> Result<Option<AttemptSession>, AppError>;

    fn question_ids(&self, key: &AttemptKey) -> Result<Option<Vec<i64>>, AppError> {
        Ok(self.get(key)?.and_then(|s| s.question_ids))
    }

    /// Stores the drawn question set, replacing any earlier draw.
    /// Fails with `NoActiveAttempt` if the attempt was never started.
    fn set_question_ids(&self, key: &AttemptKey, ids: Vec<i64>) -> Result<(), AppError>;

    /// Forgets the attempt. Clearing an absent key is not an error.
    fn clear(&self, key: &AttemptKey) -> Result<(), AppError>;
}

/// Abandoned attempts older than this are dropped on the next start.
pub const DEFAULT_MAX_AGE_SECS: i64 = 24 * 60 * 60;

pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<AttemptKey, AttemptSession>>,
    max_age_secs: i64,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_max_age(DEFAULT_MAX_AGE_SECS)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age_secs: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_age_secs,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AttemptKey, AttemptSession>>, AppError> {
        self.sessions
            .lock()
            .map_err(|e| AppError::InternalServerError(format!("session store poisoned: {}", e)))
    }
}

impl SessionStore for InMemorySessionStore {
    fn start(&self, key: &AttemptKey, mode: Mode, now: i64) -> Result<AttemptSession, AppError> {
        let mut sessions = self.lock()?;

        let before = sessions.len();
        let max_age = self.max_age_secs;
        sessions.retain(|_, s| now.saturating_sub(s.started_at) < max_age);
        if sessions.len() < before {
            tracing::debug!(evicted = before - sessions.len(), "Dropped abandoned attempts");
        }

        if let Some(existing) = sessions.get(key) {
            if existing.mode != mode {
                tracing::debug!(
                    exam_id = key.exam_id,
                    student = %key.student_name,
                    "Attempt already running in {} mode, ignoring requested {} mode",
                    existing.mode,
                    mode
                );
            }
            return Ok(existing.clone());
        }

        let session = AttemptSession {
            mode,
            started_at: now,
            question_ids: None,
        };
        sessions.insert(key.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, key: &AttemptKey) -> Result<Option<AttemptSession>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_question_ids(&self, key: &AttemptKey, ids: Vec<i64>) -> Result<(), AppError> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(key).ok_or(AppError::NoActiveAttempt)?;
        session.question_ids = Some(ids);
        Ok(())
    }

    fn clear(&self, key: &AttemptKey) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let store = InMemorySessionStore::new();
        let key = AttemptKey::new(1, "hanako");

        let first = store.start(&key, Mode::Exam, 1_000).unwrap();
        let second = store.start(&key, Mode::Exam, 1_030).unwrap();

        assert_eq!(first.started_at, 1_000);
        assert_eq!(second.started_at, 1_000);
    }

    #[test]
    fn test_start_drops_abandoned_attempts() {
        let store = InMemorySessionStore::with_max_age(3_600);
        let abandoned = AttemptKey::new(1, "hanako");
        let live = AttemptKey::new(1, "taro");

        store.start(&abandoned, Mode::Exam, 0).unwrap();
        store.start(&live, Mode::Exam, 3_000).unwrap();
        store.start(&AttemptKey::new(2, "jiro"), Mode::Study, 3_600).unwrap();

        assert!(store.get(&abandoned).unwrap().is_none());
        assert_eq!(store.get(&live).unwrap().unwrap().started_at, 3_000);

        // A stale attempt restarted after expiry gets a fresh clock.
        let restarted = store.start(&live, Mode::Exam, 7_000).unwrap();
        assert_eq!(restarted.started_at, 7_000);
    }

    #[test]
    fn test_restart_keeps_first_mode() {
        let store = InMemorySessionStore::new();
        let key = AttemptKey::new(1, "hanako");

        store.start(&key, Mode::Study, 1_000).unwrap();
        let again = store.start(&key, Mode::Exam, 1_010).unwrap();

        assert_eq!(again.mode, Mode::Study);
    }

    #[test]
    fn test_sessions_are_keyed_per_student() {
        let store = InMemorySessionStore::new();
        let a = AttemptKey::new(1, "hanako");
        let b = AttemptKey::new(1, "taro");

        store.start(&a, Mode::Exam, 100).unwrap();
        store.set_question_ids(&a, vec![3, 1, 2]).unwrap();

        assert_eq!(store.question_ids(&a).unwrap(), Some(vec![3, 1, 2]));
        assert_eq!(store.question_ids(&b).unwrap(), None);
    }

    #[test]
    fn test_reselection_overwrites_ids() {
        let store = InMemorySessionStore::new();
        let key = AttemptKey::new(2, "jiro");

        store.start(&key, Mode::Exam, 0).unwrap();
        store.set_question_ids(&key, vec![1, 2]).unwrap();
        store.set_question_ids(&key, vec![5, 4]).unwrap();

        assert_eq!(store.question_ids(&key).unwrap(), Some(vec![5, 4]));
    }

    #[test]
    fn test_set_ids_without_start_fails() {
        let store = InMemorySessionStore::new();
        let err = store
            .set_question_ids(&AttemptKey::new(9, "nobody"), vec![1])
            .unwrap_err();
        assert!(matches!(err, AppError::NoActiveAttempt));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = InMemorySessionStore::new();
        let key = AttemptKey::new(1, "hanako");

        store.start(&key, Mode::Exam, 0).unwrap();
        store.clear(&key).unwrap();
        store.clear(&key).unwrap();

        assert!(store.get(&key).unwrap().is_none());

        // A fresh start after clearing restarts the clock.
        let restarted = store.start(&key, Mode::Exam, 500).unwrap();
        assert_eq!(restarted.started_at, 500);
    }
}
