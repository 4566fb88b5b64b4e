use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Closed string enums. Parsing ignores case and surrounding whitespace,
/// display and serialization use the canonical label.
macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

label_enum!(RiskTolerance, "risk tolerance" {
    Conservative => "Conservative",
    Moderate => "Moderate",
    Aggressive => "Aggressive",
});

label_enum!(AssetClass, "asset class" {
    Stock => "Stock",
    Crypto => "Crypto",
    Bond => "Bond",
    Commodity => "Commodity",
    Etf => "ETF",
});

label_enum!(Sentiment, "sentiment" {
    Bullish => "Bullish",
    Bearish => "Bearish",
    Neutral => "Neutral",
});

label_enum!(RiskLevel, "risk level" {
    Low => "Low",
    Moderate => "Moderate",
    High => "High",
});

label_enum!(DocumentStatus, "document status" {
    Verified => "Verified",
    Pending => "Pending",
    Rejected => "Rejected",
});

label_enum!(AlertSeverity, "alert severity" {
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

label_enum!(ChatRole, "chat role" {
    User => "user",
    Model => "model",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub investment_goal: String,
    pub risk_tolerance: RiskTolerance,
    pub horizon_years: u32,
    #[serde(default)]
    pub regions_of_interest: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub class: AssetClass,
    /// Percent of the portfolio. Allocations are not required to sum to 100.
    pub allocation: f64,
    pub value: f64,
    #[serde(rename = "change24h", default)]
    pub change_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub asset: String,
    pub sentiment: Sentiment,
    pub reasoning: String,
    pub predicted_move: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIntelligence {
    pub region: String,
    pub trend: String,
    pub opportunity: String,
    pub risk_level: RiskLevel,
}

// Models sometimes send `"findings": null` for a clean audit.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditVerdict {
    pub is_consistent: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub findings: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub status: DocumentStatus,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_verification: Option<AuditVerdict>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TradeRole {
    Manufacturer,
    Logistics,
    Distributor,
    Retailer,
    Supplier,
    FreightForwarder,
    Other(String),
}

impl TradeRole {
    const KNOWN: [TradeRole; 6] = [
        TradeRole::Manufacturer,
        TradeRole::Logistics,
        TradeRole::Distributor,
        TradeRole::Retailer,
        TradeRole::Supplier,
        TradeRole::FreightForwarder,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            TradeRole::Manufacturer => "Manufacturer",
            TradeRole::Logistics => "Logistics",
            TradeRole::Distributor => "Distributor",
            TradeRole::Retailer => "Retailer",
            TradeRole::Supplier => "Supplier",
            TradeRole::FreightForwarder => "Freight Forwarder",
            TradeRole::Other(role) => role,
        }
    }
}

impl fmt::Display for TradeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TradeRole {
    fn from(value: String) -> Self {
        let wanted = value.trim();
        TradeRole::KNOWN
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(TradeRole::Other(value))
    }
}

impl From<TradeRole> for String {
    fn from(value: TradeRole) -> Self {
        value.as_str().to_string()
    }
}

impl Serialize for TradeRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TradeRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TradeRole::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePartner {
    pub id: String,
    pub name: String,
    pub country: String,
    pub role: TradeRole,
    pub reliability_score: f64,
    pub specialization: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAlert {
    pub id: String,
    pub severity: AlertSeverity,
    pub timestamp: String,
    pub region: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing_is_lenient() {
        assert_eq!(" bullish ".parse::<Sentiment>().unwrap(), Sentiment::Bullish);
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("etf".parse::<AssetClass>().unwrap(), AssetClass::Etf);
        let err = "Sideways".parse::<Sentiment>().unwrap_err();
        assert_eq!(err.kind, "sentiment");
    }

    #[test]
    fn test_market_trend_wire_format() {
        let json = serde_json::json!({
            "asset": "AAPL",
            "sentiment": "bullish",
            "reasoning": "Strong services growth",
            "predictedMove": "+2%"
        });
        let trend: MarketTrend = serde_json::from_value(json).unwrap();
        assert_eq!(trend.sentiment, Sentiment::Bullish);

        let back = serde_json::to_value(&trend).unwrap();
        assert_eq!(back["sentiment"], "Bullish");
        assert_eq!(back["predictedMove"], "+2%");
    }

    #[test]
    fn test_unknown_sentiment_is_rejected() {
        let json = r#"{"asset":"BTC","sentiment":"Moon","reasoning":"","predictedMove":""}"#;
        assert!(serde_json::from_str::<MarketTrend>(json).is_err());
    }

    #[test]
    fn test_trade_role_keeps_unknown_labels() {
        let role: TradeRole = serde_json::from_str("\"freight forwarder\"").unwrap();
        assert_eq!(role, TradeRole::FreightForwarder);
        let custom: TradeRole = serde_json::from_str("\"Customs Broker\"").unwrap();
        assert_eq!(custom, TradeRole::Other("Customs Broker".to_string()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"Customs Broker\"");
    }

    #[test]
    fn test_asset_uses_original_field_names() {
        let json = r#"{"symbol":"VOO","name":"S&P 500 ETF","type":"ETF",
            "allocation":45,"value":85000,"change24h":0.8}"#;
        let asset: Asset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.class, AssetClass::Etf);
        assert_eq!(asset.change_24h, 0.8);
    }
}
