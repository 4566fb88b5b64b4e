use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "finai-advisor")]
#[command(about = "Ask the FinAI advisory service about a portfolio, a sector or a trade document")]
pub struct CliArgs {
    /// Path to TOML configuration file. Without it, settings come from the environment.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sentiment for every asset in the portfolio
    Sentiment,
    /// Long-form investment roadmap for the profile
    Roadmap,
    /// Buy/sell suggestions for the portfolio
    Rebalance,
    /// One question to the advisor
    Chat {
        message: String,
        /// JSON file with prior messages ([{"role","text","timestamp"}])
        #[arg(long)]
        history: Option<String>,
    },
    /// Growth drivers and risks for a sector
    Sector { name: String },
    /// Daily trade and logistics briefing
    Briefing,
    /// Partner suggestions for a free-text requirement
    Matchmake { requirement: String },
    /// Regional trade intelligence (defaults to the profile's regions of interest)
    Intelligence {
        #[arg(long = "region")]
        regions: Vec<String>,
    },
    /// Audit an uploaded document by file name
    Audit {
        file_name: String,
        /// Declared document type; derived from the file name when omitted
        #[arg(long = "type")]
        doc_type: Option<String>,
    },
    /// Explain a document type and its verification status
    Explain { doc_type: String, status: String },
}
