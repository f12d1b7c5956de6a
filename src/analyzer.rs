use crate::components::{NarrativeGenerator, RiskAssessment, RiskScorer};
use crate::config::{ConfigError, EngineConfig};
use crate::detection::{CategoryMatchSet, KeywordMatcher};
use crate::features::{ExtractedIntelligence, IntelligenceExtractor};
use crate::language::ScriptDetector;
use crate::normalization::TextNormalizer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message to analyze plus optional metadata.
///
/// `locale` and `channel` never influence the score; they are carried
/// through to the result and the channel is named in the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("input has no text field")]
    MissingText,
    #[error("text field must be a string, number or boolean, got {0}")]
    UnsupportedText(&'static str),
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Reads `{ "text": ..., "locale": ..., "channel": ... }`. A bare JSON
    /// string is taken as the text. Numbers and booleans are stringified.
    pub fn from_json(value: &Value) -> Result<Self, InputError> {
        let (text, object) = match value {
            Value::Object(map) => (map.get("text").ok_or(InputError::MissingText)?, Some(map)),
            other => (other, None),
        };

        let text = match text {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => return Err(InputError::MissingText),
            Value::Array(_) => return Err(InputError::UnsupportedText("array")),
            Value::Object(_) => return Err(InputError::UnsupportedText("object")),
        };

        let metadata = |key: &str| {
            object
                .and_then(|map| map.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Ok(Self {
            text,
            locale: metadata("locale"),
            channel: metadata("channel"),
        })
    }
}

/// Full verdict for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub matches: CategoryMatchSet,
    pub intelligence: ExtractedIntelligence,
    pub assessment: RiskAssessment,
    pub recommendations: Vec<String>,
    pub notes: String,
    pub character_count: usize,
    pub scripts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl AnalysisResult {
    pub fn score(&self) -> u32 {
        self.assessment.score
    }

    pub fn is_scam(&self) -> bool {
        self.assessment.is_scam
    }
}

/// The analysis engine. Configuration is validated and compiled once in
/// [`ScamAnalyzer::new`]; afterwards every call is a pure function of the
/// input text, so one analyzer can be shared freely across threads.
pub struct ScamAnalyzer {
    normalizer: TextNormalizer,
    matcher: KeywordMatcher,
    extractor: IntelligenceExtractor,
    scorer: RiskScorer,
    narrative: NarrativeGenerator,
    config: EngineConfig,
}

impl ScamAnalyzer {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let normalizer = TextNormalizer::new();
        let matcher = KeywordMatcher::new(&config.categories, config.phrase_gap, &normalizer)?;
        let extractor = IntelligenceExtractor::from_config(&config);
        let scorer = RiskScorer::new(config.scoring.clone(), &config.categories);
        let narrative = NarrativeGenerator::new(config.narrative.clone());

        Ok(Self {
            normalizer,
            matcher,
            extractor,
            scorer,
            narrative,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_input(&AnalysisInput::new(text))
    }

    pub fn analyze_input(&self, input: &AnalysisInput) -> AnalysisResult {
        let normalized = self.normalizer.normalize(&input.text);

        let matches = self.matcher.find_matches(&normalized.folded);
        let mut intelligence = self.extractor.extract(&normalized.cleaned);
        intelligence.suspicious_keywords = self.extractor.suspicious_keywords(&matches);

        let assessment = self.scorer.score(&matches, &intelligence);
        let character_count = input.text.chars().count();
        let (recommendations, notes) = self.narrative.narrate(
            character_count,
            &assessment,
            &matches,
            &intelligence,
            input.channel.as_deref(),
        );

        log::debug!(
            "Analyzed {} chars: {} phrase matches, score {} ({}), scam={}",
            character_count,
            matches.total(),
            assessment.score,
            assessment.risk_level,
            assessment.is_scam
        );

        AnalysisResult {
            scripts: ScriptDetector::detect_scripts(&normalized.cleaned),
            matches,
            intelligence,
            assessment,
            recommendations,
            notes,
            character_count,
            locale: input.locale.clone(),
            channel: input.channel.clone(),
        }
    }

    /// Analyzes a JSON document. Malformed input is logged and yields the
    /// empty-text result instead of an error.
    pub fn analyze_json(&self, value: &Value) -> AnalysisResult {
        match AnalysisInput::from_json(value) {
            Ok(input) => self.analyze_input(&input),
            Err(e) => {
                log::warn!("Invalid analysis input, treating as empty text: {e}");
                self.analyze("")
            }
        }
    }
}

/// One-shot analysis with an optional configuration override.
pub fn analyze(text: &str, config: Option<&EngineConfig>) -> Result<AnalysisResult, ConfigError> {
    let analyzer = ScamAnalyzer::new(config.cloned().unwrap_or_default())?;
    Ok(analyzer.analyze(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::RiskLevel;
    use crate::config::KeywordCategory;
    use serde_json::json;

    const SCENARIO_SCAM: &str = "URGENT! Your SBI account is blocked. Share your OTP immediately to avoid suspension. Call +919876543210";

    fn analyzer() -> ScamAnalyzer {
        ScamAnalyzer::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_bank_impersonation_scam() {
        let result = analyzer().analyze(SCENARIO_SCAM);

        assert_eq!(result.matches.get("urgency"), ["urgent", "immediately"]);
        assert_eq!(result.matches.get("impersonation"), ["sbi"]);
        assert_eq!(result.matches.get("dataRequest"), ["share otp"]);
        assert_eq!(result.matches.get("threat"), ["blocked", "suspension"]);
        assert!(result.matches.get("financial").is_empty());

        assert_eq!(result.intelligence.phone_numbers, vec!["+919876543210"]);
        assert!(result.intelligence.bank_accounts.is_empty());
        assert_eq!(
            result.intelligence.suspicious_keywords,
            vec!["urgent", "immediately", "sbi", "share otp", "blocked", "suspension"]
        );

        assert_eq!(result.score(), 84);
        assert_eq!(result.assessment.risk_level, RiskLevel::High);
        assert!(result.is_scam());
        assert!((result.assessment.confidence - 88.6).abs() < 1e-6);
        assert_eq!(result.recommendations, NarrativeConfigDefaults::scam());
    }

    #[test]
    fn test_benign_message() {
        let result = analyzer().analyze("Hi, just checking in about dinner plans tonight.");

        assert!(result.matches.is_empty());
        assert!(result.intelligence.is_empty());
        assert_eq!(result.score(), 0);
        assert_eq!(result.assessment.risk_level, RiskLevel::Minimal);
        assert!(!result.is_scam());
        assert_eq!(result.recommendations, NarrativeConfigDefaults::safe());
    }

    #[test]
    fn test_upi_request_below_threshold() {
        let result = analyzer().analyze("Please pay to scammer@upi now");

        // "upi" also hits inside the handle itself; both phrases count
        assert_eq!(result.matches.get("financial"), ["pay", "upi"]);
        assert_eq!(result.intelligence.upi_ids, vec!["scammer@upi"]);
        assert_eq!(result.score(), 35);
        assert_eq!(result.assessment.risk_level, RiskLevel::Low);
        assert!(!result.is_scam());
    }

    #[test]
    fn test_bare_phishing_link() {
        let result = analyzer().analyze("http://bit.ly/verify-now");

        assert_eq!(result.intelligence.phishing_links, vec!["http://bit.ly/verify-now"]);
        assert!(result.matches.is_empty());
        assert_eq!(result.score(), 20);
        assert_eq!(result.assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_phishing_link_behind_clean_links_still_scored() {
        let result = analyzer().analyze(
            "http://a.org http://b.org http://c.org http://d.org http://e.org http://bit.ly/verify-now",
        );

        assert_eq!(result.intelligence.phishing_links, vec!["http://bit.ly/verify-now"]);
        assert_eq!(result.intelligence.links.len(), 5);
        assert_eq!(result.score(), 20);
    }

    #[test]
    fn test_phone_cap_and_account_exclusion() {
        let result = analyzer().analyze(
            "Call 9000000001, 8000000002, 7000000003, 6000000004, 9111111115, 8222222226",
        );

        assert_eq!(
            result.intelligence.phone_numbers,
            vec!["9000000001", "8000000002", "7000000003", "6000000004", "9111111115"]
        );
        assert!(result.intelligence.bank_accounts.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let analyzer = analyzer();
        assert_eq!(analyzer.analyze(SCENARIO_SCAM), analyzer.analyze(SCENARIO_SCAM));
        assert_eq!(analyzer.analyze(SCENARIO_SCAM), analyze(SCENARIO_SCAM, None).unwrap());
    }

    #[test]
    fn test_score_bounds_and_threshold_consistency() {
        let analyzer = analyzer();
        let long_scam = format!(
            "{} pay via fraud@ybl, a/c 123456789012, http://bit.ly/x http://tinyurl.com/y legal action arrest warrant",
            SCENARIO_SCAM.repeat(3)
        );
        for text in ["", "hello", SCENARIO_SCAM, long_scam.as_str()] {
            let result = analyzer.analyze(text);
            assert!(result.score() <= 100);
            assert_eq!(result.is_scam(), result.score() >= 40);
        }
        assert_eq!(analyzer.analyze(&long_scam).score(), 100);
    }

    #[test]
    fn test_appending_keyword_never_lowers_score() {
        let analyzer = analyzer();
        let base = "Your account needs attention";
        let before = analyzer.analyze(base).score();
        let after = analyzer.analyze(&format!("{base}, act now")).score();
        assert!(after >= before);
        assert_eq!(after, before + 10);
    }

    #[test]
    fn test_allowlisted_link_not_flagged() {
        let result = analyzer().analyze(
            "Track at https://www.amazon.in/verify?id=1 not https://amazon-verify.suspicious.com/login",
        );
        assert_eq!(
            result.intelligence.phishing_links,
            vec!["https://amazon-verify.suspicious.com/login"]
        );
        assert_eq!(result.intelligence.links.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let result = analyzer().analyze("");
        assert_eq!(result.score(), 0);
        assert!(result.matches.is_empty());
        assert_eq!(result.matches.groups().len(), 5);
        assert!(result.intelligence.is_empty());
        assert_eq!(result.character_count, 0);
    }

    #[test]
    fn test_homoglyph_and_zero_width_evasion() {
        let result = analyzer().analyze("Your \u{0405}\u{0412}\u{0406} a\u{200B}ccount is bl\u{043E}cked");
        assert_eq!(result.matches.get("impersonation"), ["sbi"]);
        assert_eq!(result.matches.get("threat"), ["blocked"]);
        assert_eq!(result.scripts, vec!["Latin", "Cyrillic"]);
    }

    #[test]
    fn test_hindi_mixed_message() {
        let result = analyzer().analyze("Aapka khata बंद ho jayega, turant ओटीपी bhejo");
        assert_eq!(result.matches.get("threat"), ["बंद"]);
        assert_eq!(result.matches.get("urgency"), ["turant"]);
        assert_eq!(result.matches.get("dataRequest"), ["ओटीपी"]);
        assert!(result.scripts.contains(&"Devanagari".to_string()));
    }

    #[test]
    fn test_custom_configuration() {
        let mut config = EngineConfig::default();
        config.categories = vec![KeywordCategory::new("lottery", 50, &["jackpot"])];
        config.limits.phone_numbers = 1;

        let result = analyze("JACKPOT! call 9876543210 or 9123456780", Some(&config)).unwrap();
        assert_eq!(result.matches.get("lottery"), ["jackpot"]);
        assert_eq!(result.intelligence.phone_numbers, vec!["9876543210"]);
        assert_eq!(result.score(), 60);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let mut config = EngineConfig::default();
        config.scoring.scam_threshold = 0;
        assert!(matches!(
            ScamAnalyzer::new(config),
            Err(ConfigError::InvalidScamThreshold(0))
        ));
    }

    #[test]
    fn test_json_input_with_metadata() {
        let result = analyzer().analyze_json(&json!({
            "text": SCENARIO_SCAM,
            "locale": "en-IN",
            "channel": "SMS"
        }));
        assert_eq!(result.score(), 84);
        assert_eq!(result.locale.as_deref(), Some("en-IN"));
        assert_eq!(result.channel.as_deref(), Some("SMS"));
        assert!(result.notes.contains("via SMS"));
    }

    #[test]
    fn test_json_input_coercion_and_rejection() {
        assert_eq!(
            AnalysisInput::from_json(&json!({ "text": 9876543210u64 })).unwrap().text,
            "9876543210"
        );
        assert_eq!(AnalysisInput::from_json(&json!("hello")).unwrap().text, "hello");
        assert_eq!(
            AnalysisInput::from_json(&json!({ "message": "hi" })),
            Err(InputError::MissingText)
        );
        assert_eq!(
            AnalysisInput::from_json(&json!({ "text": ["a"] })),
            Err(InputError::UnsupportedText("array"))
        );

        let result = analyzer().analyze_json(&json!({ "text": { "nested": true } }));
        assert_eq!(result.score(), 0);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let value = serde_json::to_value(analyzer().analyze(SCENARIO_SCAM)).unwrap();
        assert_eq!(value["assessment"]["riskLevel"], "High");
        assert_eq!(value["assessment"]["isScam"], true);
        assert_eq!(value["intelligence"]["phoneNumbers"][0], "+919876543210");
        assert_eq!(value["matches"][0]["category"], "urgency");
        assert!(value.get("locale").is_none());
    }

    #[test]
    fn test_analyzer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScamAnalyzer>();
    }

    struct NarrativeConfigDefaults;

    impl NarrativeConfigDefaults {
        fn scam() -> Vec<String> {
            crate::config::NarrativeConfig::default().scam_recommendations
        }

        fn safe() -> Vec<String> {
            crate::config::NarrativeConfig::default().safe_recommendations
        }
    }
}
