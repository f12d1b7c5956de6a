use scam_honeypot::config::Config;
use scam_honeypot::session::{InMemorySessionStore, SessionTracker};
use scam_honeypot::{AnalysisInput, CallbackPayload, ScamAnalyzer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Testing a typical KYC-expiry scam conversation...");

    // Tighter tuning than the defaults: lower scam threshold, extra lottery category
    let config_yaml = r#"
engine:
  scoring:
    scam_threshold: 30
  categories:
    - name: urgency
      weight: 10
      phrases: ["urgent", "immediately", "today only", "turant"]
    - name: financial
      weight: 10
      phrases: ["kyc", "refund", "pay", "upi"]
    - name: lottery
      weight: 20
      phrases: ["you have won", "lucky draw"]
"#;

    let config: Config = serde_yaml::from_str(config_yaml)?;
    let analyzer = Arc::new(ScamAnalyzer::new(config.engine)?);
    let tracker = SessionTracker::new(analyzer, InMemorySessionStore::new());

    let conversation = [
        "Dear customer, your KYC has expired. Update immediately or your account will be blocked.",
        "Congratulations! You have won a lucky draw prize of Rs 25,00,000.",
        "Pay the processing fee to lottery.claims@okaxis or call +91 98765 43210... sorry, 9876543210",
        "Click http://bit.ly/kyc-update-now and enter your details today only",
    ];

    for message in conversation {
        let (result, record) = tracker.record_message("kyc-demo", &AnalysisInput::new(message))?;
        println!(
            "[{}] score {:>3} risk {:<7} scam {:<5} | {}",
            record.total_messages,
            result.score(),
            result.assessment.risk_level.to_string(),
            result.is_scam(),
            message
        );
    }

    let record = tracker
        .session("kyc-demo")?
        .ok_or_else(|| anyhow::anyhow!("session disappeared"))?;

    println!();
    println!("Callback payload:");
    println!(
        "{}",
        serde_json::to_string_pretty(&CallbackPayload::from(&record))?
    );

    if record.scam_detected {
        println!("✅ Conversation flagged as a scam");
    } else {
        println!("❌ Conversation was NOT flagged");
    }

    Ok(())
}
