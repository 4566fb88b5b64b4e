//! Demo records used when no profile or portfolio is configured.

use crate::domain::model::{
    AlertSeverity, Asset, AssetClass, ComplianceAlert, DocumentStatus, RiskTolerance,
    TradeDocument, TradePartner, TradeRole, UserProfile,
};

pub fn demo_profile() -> UserProfile {
    UserProfile {
        name: "Alex Johnson".to_string(),
        age: 32,
        investment_goal: "Long-term wealth accumulation for early retirement and family security."
            .to_string(),
        risk_tolerance: RiskTolerance::Moderate,
        horizon_years: 25,
        regions_of_interest: vec![
            "North America".to_string(),
            "Europe".to_string(),
            "APAC".to_string(),
        ],
    }
}

fn asset(
    symbol: &str,
    name: &str,
    class: AssetClass,
    allocation: f64,
    value: f64,
    change: f64,
) -> Asset {
    Asset {
        symbol: symbol.to_string(),
        name: name.to_string(),
        class,
        allocation,
        value,
        change_24h: change,
    }
}

pub fn demo_assets() -> Vec<Asset> {
    vec![
        asset("VOO", "S&P 500 ETF", AssetClass::Etf, 45.0, 85000.0, 0.8),
        asset("AAPL", "Apple Inc.", AssetClass::Stock, 15.0, 28000.0, 1.2),
        asset("BTC", "Bitcoin", AssetClass::Crypto, 10.0, 19000.0, -2.4),
        asset("BND", "Total Bond Market", AssetClass::Bond, 20.0, 38000.0, -0.1),
        asset("GLD", "SPDR Gold Shares", AssetClass::Commodity, 10.0, 19000.0, 0.5),
    ]
}

pub fn demo_documents() -> Vec<TradeDocument> {
    [
        (
            "DOC-001",
            "Bill of Lading",
            DocumentStatus::Verified,
            "2024-05-15",
            "0x742d...4f12",
        ),
        (
            "DOC-002",
            "Certificate of Origin",
            DocumentStatus::Pending,
            "2024-05-16",
            "0x911a...3c88",
        ),
        (
            "DOC-003",
            "Commercial Invoice",
            DocumentStatus::Verified,
            "2024-05-14",
            "0x32b5...e1f9",
        ),
    ]
    .into_iter()
    .map(|(id, doc_type, status, date, anchor)| TradeDocument {
        id: id.to_string(),
        doc_type: doc_type.to_string(),
        status,
        date: date.to_string(),
        blockchain_id: Some(anchor.to_string()),
        ai_verification: None,
    })
    .collect()
}

pub fn demo_alerts() -> Vec<ComplianceAlert> {
    [
        (
            "1",
            AlertSeverity::High,
            "2h ago",
            "EU",
            "New textile regulations pending implementation.",
        ),
        (
            "2",
            AlertSeverity::Medium,
            "5h ago",
            "APAC",
            "Customs port delay in Singapore due to weather.",
        ),
        (
            "3",
            AlertSeverity::Low,
            "1d ago",
            "Global",
            "Quarterly compliance review successfully completed.",
        ),
    ]
    .into_iter()
    .map(|(id, severity, timestamp, region, message)| ComplianceAlert {
        id: id.to_string(),
        severity,
        timestamp: timestamp.to_string(),
        region: region.to_string(),
        message: message.to_string(),
    })
    .collect()
}

pub fn demo_partners() -> Vec<TradePartner> {
    [
        (
            "P-01",
            "Shenzhen Precision Works",
            "China",
            TradeRole::Manufacturer,
            4.8,
            "Consumer electronics assembly",
            true,
        ),
        (
            "P-02",
            "Rotterdam Gateway Logistics",
            "Netherlands",
            TradeRole::Logistics,
            4.6,
            "Port handling and bonded storage",
            true,
        ),
        (
            "P-03",
            "Andes Fresh Distributors",
            "Chile",
            TradeRole::Distributor,
            4.1,
            "Cold-chain produce",
            false,
        ),
        (
            "P-04",
            "BlueWave Freight",
            "Singapore",
            TradeRole::FreightForwarder,
            4.4,
            "Trans-Pacific ocean freight",
            true,
        ),
    ]
    .into_iter()
    .map(|(id, name, country, role, score, specialization, verified)| TradePartner {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        role,
        reliability_score: score,
        specialization: specialization.to_string(),
        is_verified: verified,
    })
    .collect()
}
