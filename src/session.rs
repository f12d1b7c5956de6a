use crate::analyzer::{AnalysisInput, AnalysisResult, ScamAnalyzer};
use crate::features::ExtractedIntelligence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Conversation-level state accumulated across messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub total_messages: u32,
    /// Sticky: once any message is judged a scam the session stays flagged.
    pub scam_detected: bool,
    pub highest_score: u32,
    pub intelligence: ExtractedIntelligence,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            total_messages: 0,
            scam_detected: false,
            highest_score: 0,
            intelligence: ExtractedIntelligence::default(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session id must not be empty")]
    EmptySessionId,
    #[error("session store lock poisoned")]
    LockPoisoned,
    #[error("session store backend error: {0}")]
    Backend(String),
}

/// Keyed storage for session records. The analysis engine never touches it;
/// only [`SessionTracker`] does.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError>;
    fn put(&self, record: SessionRecord) -> Result<(), SessionError>;
    /// Read-modify-write of one record as a single step, creating it when
    /// missing. Returns the record as stored.
    fn update(
        &self,
        session_id: &str,
        apply: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<SessionRecord, SessionError>;
    /// Returns the removed record, if there was one.
    fn delete(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError>;
    /// Session ids, sorted.
    fn list(&self) -> Result<Vec<String>, SessionError>;
}

type SessionMap = Arc<Mutex<HashMap<String, SessionRecord>>>;

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: SessionMap,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    fn put(&self, record: SessionRecord) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        sessions.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn update(
        &self,
        session_id: &str,
        apply: &mut dyn FnMut(&mut SessionRecord),
    ) -> Result<SessionRecord, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        let record = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(session_id));
        apply(record);
        Ok(record.clone())
    }

    fn delete(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.remove(session_id))
    }

    fn list(&self) -> Result<Vec<String>, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::LockPoisoned)?;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Runs each incoming message through the analyzer and folds the result
/// into the session's record.
pub struct SessionTracker<S: SessionStore> {
    analyzer: Arc<ScamAnalyzer>,
    store: S,
}

impl<S: SessionStore> SessionTracker<S> {
    pub fn new(analyzer: Arc<ScamAnalyzer>, store: S) -> Self {
        Self { analyzer, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record_message(
        &self,
        session_id: &str,
        input: &AnalysisInput,
    ) -> Result<(AnalysisResult, SessionRecord), SessionError> {
        if session_id.trim().is_empty() {
            return Err(SessionError::EmptySessionId);
        }

        let result = self.analyzer.analyze_input(input);
        let limits = &self.analyzer.config().limits;

        let record = self.store.update(session_id, &mut |record| {
            record.total_messages += 1;
            record.scam_detected |= result.is_scam();
            record.highest_score = record.highest_score.max(result.score());
            record.intelligence.merge(&result.intelligence, limits);
            record.notes = result.notes.clone();
            record.updated_at = Utc::now();
        })?;

        log::debug!(
            "Session {}: message {} scored {}, scam_detected={}",
            session_id,
            record.total_messages,
            result.score(),
            record.scam_detected
        );

        Ok((result, record))
    }

    pub fn session(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        self.store.get(session_id)
    }

    pub fn end_session(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        self.store.delete(session_id)
    }
}
