use anyhow::Context;
use clap::Parser;
use finai_advisor::domain::filters::{document_type_from_filename, next_document_id};
use finai_advisor::domain::fixtures;
use finai_advisor::domain::model::{ChatMessage, DocumentStatus, TradeDocument};
use finai_advisor::utils::{logger, validation::Validate};
use finai_advisor::{Advice, AdvisorConfig, AdvisorError, AdvisoryClient, CliArgs, Command};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting finai-advisor");

    let config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match AdvisorConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    exit_on(&e);
                }
            }
        }
        None => AdvisorConfig::from_env(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        exit_on(&e);
    }

    let advisor = match AdvisoryClient::from_settings(&config) {
        Ok(advisor) => advisor,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            exit_on(&e);
        }
    };

    let profile = config.profile_or_demo();

    match args.command {
        Command::Sentiment => {
            let assets = config.portfolio_or_demo();
            print_json(advisor.analyze_sentiment(&assets).await)?;
        }
        Command::Roadmap => print_text(advisor.investment_roadmap(&profile).await),
        Command::Rebalance => {
            let assets = config.portfolio_or_demo();
            print_text(advisor.rebalance_strategy(&assets, &profile).await);
        }
        Command::Chat { message, history } => {
            let history: Vec<ChatMessage> = match history {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading chat history from {}", path))?;
                    serde_json::from_str(&raw)
                        .with_context(|| format!("parsing chat history in {}", path))?
                }
                None => Vec::new(),
            };
            print_text(advisor.chat(&profile, &history, &message).await.map(|m| m.text));
        }
        Command::Sector { name } => print_text(advisor.sector_outlook(&name).await),
        Command::Briefing => print_text(advisor.daily_briefing(&profile).await),
        Command::Matchmake { requirement } => {
            print_text(advisor.find_trade_partners(&profile, &requirement).await)
        }
        Command::Intelligence { regions } => {
            let regions = if regions.is_empty() {
                profile.regions_of_interest.clone()
            } else {
                regions
            };
            print_json(advisor.trade_intelligence(&regions).await)?;
        }
        Command::Audit {
            file_name,
            doc_type,
        } => {
            let doc_type = doc_type.unwrap_or_else(|| document_type_from_filename(&file_name));
            let audit = advisor.audit_document(&file_name, &doc_type).await;
            warn_on_fallback(&audit);
            let document = TradeDocument::from_audit(
                next_document_id(&fixtures::demo_documents()),
                doc_type,
                chrono::Utc::now().format("%Y-%m-%d").to_string(),
                audit,
            );
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Explain { doc_type, status } => {
            let status: DocumentStatus = match status.parse() {
                Ok(status) => status,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            print_text(advisor.explain_document(&doc_type, status).await);
        }
    }

    Ok(())
}

fn exit_on(e: &AdvisorError) -> ! {
    tracing::error!(
        "Stopping on error: {} (category: {:?}, severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    std::process::exit(e.severity().exit_code().max(1))
}

fn warn_on_fallback<T>(advice: &Advice<T>) {
    if let Some(failure) = advice.failure() {
        tracing::warn!("Advisory call failed ({:?}): {}", failure.kind, failure.detail);
        eprintln!("⚠️  {}", failure.message);
    }
}

// Prose fallbacks already carry the failure message as their value.
fn print_text(advice: Advice<String>) {
    if let Some(failure) = advice.failure() {
        tracing::warn!("Advisory call failed ({:?}): {}", failure.kind, failure.detail);
    }
    println!("{}", advice.into_value());
}

fn print_json<T: Serialize>(advice: Advice<T>) -> anyhow::Result<()> {
    warn_on_fallback(&advice);
    println!("{}", serde_json::to_string_pretty(advice.value())?);
    Ok(())
}
