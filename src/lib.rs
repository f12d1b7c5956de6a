pub mod analyzer;
pub mod callback;
pub mod components;
pub mod config;
pub mod detection;
pub mod domain_utils;
pub mod features;
pub mod language;
pub mod normalization;
pub mod session;

pub use analyzer::{analyze, AnalysisInput, AnalysisResult, InputError, ScamAnalyzer};
pub use callback::{CallbackClient, CallbackError, CallbackPayload};
pub use components::{RiskAssessment, RiskLevel};
pub use config::{Config, ConfigError, EngineConfig, KeywordCategory};
pub use detection::CategoryMatchSet;
pub use features::ExtractedIntelligence;
pub use language::ScriptDetector;
pub use session::{InMemorySessionStore, SessionError, SessionRecord, SessionStore, SessionTracker};
