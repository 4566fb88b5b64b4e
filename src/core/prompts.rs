use crate::domain::model::{Asset, DocumentStatus, UserProfile};

pub fn sentiment_prompt(assets: &[Asset]) -> String {
    let asset_list = assets
        .iter()
        .map(|a| format!("{} ({})", a.name, a.symbol))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Provide a brief sentiment analysis (Bullish, Bearish, or Neutral) and reasoning for the following assets: {}. \
         Also predict a short-term move. Return exactly one entry per asset, in the same order.",
        asset_list
    )
}

pub fn roadmap_prompt(profile: &UserProfile) -> String {
    format!(
        "Act as a senior financial advisor. User Profile: Age {}, Goal: {}, Risk: {}, Horizon: {} years. \
         Provide a comprehensive investment roadmap including suggested asset classes and strategy.",
        profile.age, profile.investment_goal, profile.risk_tolerance, profile.horizon_years
    )
}

pub fn rebalance_prompt(assets: &[Asset], profile: &UserProfile) -> String {
    let asset_data = assets
        .iter()
        .map(|a| format!("{}: {}%", a.symbol, a.allocation))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Analyze this portfolio for a {} investor: {}. \
         Recommend specific buy/sell actions to reach an optimal diversified state.",
        profile.risk_tolerance, asset_data
    )
}

pub fn advisor_persona(profile: &UserProfile) -> String {
    format!(
        "You are FinAI, an expert investment advisor. You are helping {} (Risk: {}). \
         Provide data-driven, professional, and compliant financial guidance.",
        profile.name, profile.risk_tolerance
    )
}

pub fn sector_prompt(sector: &str) -> String {
    format!(
        "Analyze the {} sector. Provide current growth drivers, primary risks, and top tickers to watch.",
        sector.trim()
    )
}

pub fn briefing_prompt(profile: &UserProfile) -> String {
    format!(
        "Provide a concise daily trade and logistics briefing for a {} profile professional. \
         Focus on global shipping, customs, and macroeconomic shifts that might impact international commerce.",
        profile.risk_tolerance
    )
}

pub fn matchmaking_prompt(profile: &UserProfile, requirements: &str) -> String {
    format!(
        "Act as an AI Trade Matchmaker. Based on the user requirements: \"{}\", suggest types of partners, \
         regions to focus on, and key vetting criteria. Consider the user's risk posture: {}.",
        requirements.trim(),
        profile.risk_tolerance
    )
}

pub fn intelligence_prompt(regions: &[String]) -> String {
    format!(
        "Analyze trade intelligence for the following regions: {}. \
         Identify specific trends, emerging opportunities, and current risk levels (Low, Moderate, or High). \
         Return exactly one entry per region.",
        regions.join(", ")
    )
}

pub fn audit_prompt(file_name: &str, doc_type: &str) -> String {
    format!(
        "Act as a trade compliance auditor. A document named \"{}\" was submitted as a {}. \
         Assess whether the filename and declared type are consistent with a legitimate trade document of that kind. \
         Return isConsistent, a list of findings (at least one finding when inconsistent), \
         and a confidence between 0 and 1.",
        file_name, doc_type
    )
}

pub fn explanation_prompt(doc_type: &str, status: DocumentStatus) -> String {
    format!(
        "In two sentences, explain what a {} is in international trade and what a '{}' verification status \
         means for the shipment it covers.",
        doc_type, status
    )
}
