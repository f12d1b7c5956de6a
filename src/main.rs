use anyhow::{bail, Context};
use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use scam_honeypot::callback::{CallbackClient, CallbackPayload};
use scam_honeypot::config::{CallbackConfig, Config};
use scam_honeypot::session::{InMemorySessionStore, SessionTracker};
use scam_honeypot::{AnalysisInput, AnalysisResult, ScamAnalyzer};
use std::io::Read;
use std::process;
use std::sync::Arc;

const DEMO_MESSAGES: &[(&str, &str)] = &[
    (
        "Bank impersonation",
        "URGENT! Your SBI account is blocked. Share your OTP immediately to avoid suspension. Call +919876543210",
    ),
    ("Benign", "Hi, just checking in about dinner plans tonight."),
    ("UPI request", "Please pay to scammer@upi now"),
    ("Bare phishing link", "http://bit.ly/verify-now"),
    (
        "Hinglish threat",
        "Aapka khata बंद ho jayega, turant ओटीपी bhejo warna legal action hoga",
    ),
];

#[tokio::main]
async fn main() {
    let matches = Command::new("scam-honeypot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scores messages for scam risk and extracts scammer intelligence")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("scam-honeypot.yaml"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .value_name("TEXT")
                .help("Analyze the given message text")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("FILE")
                .help("Analyze the contents of a file ('-' reads stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("input-json")
                .long("input-json")
                .value_name("FILE")
                .help("Analyze a JSON document with text, locale and channel fields ('-' reads stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("conversation")
                .long("conversation")
                .value_name("FILE")
                .help("Track a conversation (one message per line) and print the session report")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("session-id")
                .long("session-id")
                .value_name("ID")
                .help("Session id used with --conversation")
                .default_value("cli-session"),
        )
        .arg(
            Arg::new("callback-url")
                .long("callback-url")
                .value_name("URL")
                .help("Submit the session report of --conversation to this endpoint")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Analyze a set of built-in example messages")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Err(e) = run(&matches).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        init_logging(matches, "info");
        Config::default()
            .to_file(generate_path)
            .with_context(|| format!("failed to write {generate_path}"))?;
        println!("Default configuration written to: {generate_path}");
        return Ok(());
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("scam-honeypot.yaml");

    // The configured log level is only known once the file has parsed
    let config = match std::fs::metadata(config_path) {
        Ok(_) => {
            let config = Config::from_file(config_path)
                .with_context(|| format!("invalid configuration in {config_path}"))?;
            init_logging(matches, config.log_level());
            log::info!("Loaded configuration from: {config_path}");
            config
        }
        Err(_) => {
            init_logging(matches, "info");
            Config::load_or_default(config_path)?
        }
    };

    let analyzer = Arc::new(ScamAnalyzer::new(config.engine.clone())?);
    let as_json = matches.get_flag("json");

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!("Keyword categories: {}", config.engine.categories.len());
        for category in &config.engine.categories {
            println!(
                "  {} (weight {}): {} phrases",
                category.name,
                category.weight,
                category.phrases.len()
            );
        }
        println!(
            "Scam threshold: {}, bands: low {} / medium {} / high {}",
            config.engine.scoring.scam_threshold,
            config.engine.scoring.low_threshold,
            config.engine.scoring.medium_threshold,
            config.engine.scoring.high_threshold
        );
        println!(
            "Legitimate domains: {} (allowlist {})",
            config.engine.links.legitimate_domains.all_domains().len(),
            if config.engine.links.allowlist_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("✅ Configuration is valid");
        return Ok(());
    }

    if matches.get_flag("demo") {
        for (label, text) in DEMO_MESSAGES {
            println!("=== {label} ===");
            print_result(&analyzer.analyze(text), as_json)?;
            println!();
        }
        return Ok(());
    }

    if let Some(path) = matches.get_one::<String>("conversation") {
        let session_id = matches
            .get_one::<String>("session-id")
            .map(String::as_str)
            .unwrap_or("cli-session");
        let callback = matches
            .get_one::<String>("callback-url")
            .map(|url| match &config.callback {
                Some(configured) => CallbackConfig {
                    endpoint: url.clone(),
                    ..configured.clone()
                },
                None => CallbackConfig::new(url.clone()),
            });
        return run_conversation(analyzer, path, session_id, callback).await;
    }

    let input = if let Some(text) = matches.get_one::<String>("text") {
        AnalysisInput::new(text.clone())
    } else if let Some(path) = matches.get_one::<String>("file") {
        AnalysisInput::new(read_source(path)?)
    } else if let Some(path) = matches.get_one::<String>("input-json") {
        let value: serde_json::Value = serde_json::from_str(&read_source(path)?)
            .with_context(|| format!("{path} is not valid JSON"))?;
        print_result(&analyzer.analyze_json(&value), as_json)?;
        return Ok(());
    } else {
        bail!("nothing to analyze: pass --text, --file, --input-json, --conversation or --demo");
    };

    print_result(&analyzer.analyze_input(&input), as_json)
}

fn init_logging(matches: &ArgMatches, configured_level: &str) {
    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        configured_level.parse().unwrap_or(LevelFilter::Info)
    };

    let _ = env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .try_init();
}

fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
    }
}

async fn run_conversation(
    analyzer: Arc<ScamAnalyzer>,
    path: &str,
    session_id: &str,
    callback: Option<CallbackConfig>,
) -> anyhow::Result<()> {
    let content = read_source(path)?;
    let tracker = SessionTracker::new(analyzer, InMemorySessionStore::new());

    let mut last_record = None;
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let (result, record) = tracker.record_message(session_id, &AnalysisInput::new(line))?;
        log::info!(
            "Message {}: score {} ({}){}",
            record.total_messages,
            result.score(),
            result.assessment.risk_level,
            if result.is_scam() { " SCAM" } else { "" }
        );
        last_record = Some(record);
    }

    let Some(record) = last_record else {
        bail!("{path} contains no messages");
    };

    let payload = CallbackPayload::from(&record);
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if let Some(callback) = callback {
        let client = CallbackClient::new(callback)?;
        client
            .submit(&payload)
            .await
            .with_context(|| format!("failed to deliver report to {}", client.endpoint()))?;
        println!("✅ Report delivered to {}", client.endpoint());
    }

    Ok(())
}

fn print_result(result: &AnalysisResult, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let verdict = if result.is_scam() { "🚨 SCAM" } else { "✅ Not a scam" };
    println!(
        "{} | score {}/100 | risk {} | confidence {:.1}%",
        verdict,
        result.score(),
        result.assessment.risk_level,
        result.assessment.confidence
    );

    for group in result.matches.groups() {
        if !group.phrases.is_empty() {
            println!("  {}: {}", group.category, group.phrases.join(", "));
        }
    }

    let intel = &result.intelligence;
    for (label, values) in [
        ("Phone numbers", &intel.phone_numbers),
        ("UPI IDs", &intel.upi_ids),
        ("Bank accounts", &intel.bank_accounts),
        ("Phishing links", &intel.phishing_links),
    ] {
        if !values.is_empty() {
            println!("  {}: {}", label, values.join(", "));
        }
    }

    println!("Notes: {}", result.notes);
    println!("Recommendations:");
    for recommendation in &result.recommendations {
        println!("  - {recommendation}");
    }

    Ok(())
}
