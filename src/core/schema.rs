//! Declared reply shapes for structured calls, and the decoder that checks
//! replies against them.
//!
//! The schema sent to the service is only a hint. Replies are always decoded
//! into typed records first and then validated, so a model that ignores the
//! hint produces a `MalformedResponseError` instead of bad data.

use crate::domain::model::{AuditVerdict, MarketIntelligence, MarketTrend, RiskLevel, Sentiment};
use crate::utils::error::{AdvisorError, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Enum(Vec<String>),
    Boolean,
    Number,
    StringArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    ArrayOfObjects,
    Object,
}

/// A flat object schema, optionally wrapped in an array. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    pub shape: SchemaShape,
    pub fields: Vec<SchemaField>,
}

impl ResponseSchema {
    pub fn array_of_objects() -> Self {
        Self {
            shape: SchemaShape::ArrayOfObjects,
            fields: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self {
            shape: SchemaShape::Object,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn string(self, name: &str) -> Self {
        self.field(name, FieldKind::String)
    }

    pub fn enumeration(self, name: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.field(name, FieldKind::Enum(values))
    }

    /// Renders the OpenAPI subset accepted as `generationConfig.responseSchema`.
    pub fn to_wire(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let property = match &field.kind {
                FieldKind::String => json!({ "type": "STRING" }),
                FieldKind::Enum(values) => json!({ "type": "STRING", "enum": values }),
                FieldKind::Boolean => json!({ "type": "BOOLEAN" }),
                FieldKind::Number => json!({ "type": "NUMBER" }),
                FieldKind::StringArray => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            };
            properties.insert(field.name.clone(), property);
        }
        let required: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        let object = json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        });

        match self.shape {
            SchemaShape::ArrayOfObjects => json!({ "type": "ARRAY", "items": object }),
            SchemaShape::Object => object,
        }
    }
}

pub fn market_trend_schema() -> ResponseSchema {
    ResponseSchema::array_of_objects()
        .string("asset")
        .enumeration("sentiment", &Sentiment::labels())
        .string("reasoning")
        .string("predictedMove")
}

pub fn market_intelligence_schema() -> ResponseSchema {
    ResponseSchema::array_of_objects()
        .string("region")
        .string("trend")
        .string("opportunity")
        .enumeration("riskLevel", &RiskLevel::labels())
}

pub fn audit_verdict_schema() -> ResponseSchema {
    ResponseSchema::object()
        .field("isConsistent", FieldKind::Boolean)
        .field("findings", FieldKind::StringArray)
        .field("confidence", FieldKind::Number)
}

/// Record-level checks applied after a reply has been deserialized.
pub trait ValidateReply {
    fn validate_reply(&self) -> Result<()>;
}

impl ValidateReply for MarketTrend {
    fn validate_reply(&self) -> Result<()> {
        if self.asset.trim().is_empty() {
            return Err(AdvisorError::malformed("sentiment entry without an asset"));
        }
        Ok(())
    }
}

impl ValidateReply for MarketIntelligence {
    fn validate_reply(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(AdvisorError::malformed("intelligence entry without a region"));
        }
        Ok(())
    }
}

impl ValidateReply for AuditVerdict {
    fn validate_reply(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(AdvisorError::malformed(format!(
                "audit confidence {} is outside [0, 1]",
                self.confidence
            )));
        }
        if !self.is_consistent && self.findings.iter().all(|f| f.trim().is_empty()) {
            return Err(AdvisorError::malformed(
                "inconsistent audit verdict without findings",
            ));
        }
        Ok(())
    }
}

/// Removes a surrounding Markdown code fence, which some models add even in JSON mode.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => {
            let rest = rest.trim_start();
            rest.strip_prefix("json")
                .or_else(|| rest.strip_prefix("JSON"))
                .unwrap_or(rest)
        }
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(AdvisorError::malformed("empty reply to a structured request"));
    }
    serde_json::from_str(body).map_err(|e| AdvisorError::malformed(format!("{} in reply", e)))
}

/// Decodes an array reply and requires exactly one validated record per input.
pub fn decode_records<T>(raw: &str, expected: usize) -> Result<Vec<T>>
where
    T: DeserializeOwned + ValidateReply,
{
    let records: Vec<T> = decode(raw)?;
    if records.len() != expected {
        return Err(AdvisorError::malformed(format!(
            "expected {} entries, got {}",
            expected,
            records.len()
        )));
    }
    for record in &records {
        record.validate_reply()?;
    }
    Ok(records)
}

pub fn decode_record<T>(raw: &str) -> Result<T>
where
    T: DeserializeOwned + ValidateReply,
{
    let record: T = decode(raw)?;
    record.validate_reply()?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FailureKind;

    #[test]
    fn test_trend_schema_wire_shape() {
        let wire = market_trend_schema().to_wire();
        assert_eq!(wire["type"], "ARRAY");
        assert_eq!(wire["items"]["type"], "OBJECT");
        assert_eq!(
            wire["items"]["properties"]["sentiment"]["enum"],
            json!(["Bullish", "Bearish", "Neutral"])
        );
        assert_eq!(
            wire["items"]["required"],
            json!(["asset", "sentiment", "reasoning", "predictedMove"])
        );
    }

    #[test]
    fn test_audit_schema_is_a_single_object() {
        let wire = audit_verdict_schema().to_wire();
        assert_eq!(wire["type"], "OBJECT");
        assert_eq!(wire["properties"]["findings"]["type"], "ARRAY");
        assert_eq!(wire["properties"]["confidence"]["type"], "NUMBER");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```json [1, 2] ```"), "[1, 2]");
        assert_eq!(strip_code_fence("```[{\"a\":1}]```"), "[{\"a\":1}]");
    }

    #[test]
    fn test_decode_records_rejects_wrong_count() {
        let raw = r#"[{"region":"EU","trend":"t","opportunity":"o","riskLevel":"Low"}]"#;
        let err = decode_records::<MarketIntelligence>(raw, 2).unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::MalformedResponse);
        assert_eq!(decode_records::<MarketIntelligence>(raw, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode::<Vec<MarketTrend>>("Sure! Here is the analysis").unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::MalformedResponse);
        assert!(decode::<Vec<MarketTrend>>("   ").is_err());
    }

    #[test]
    fn test_audit_verdict_validation() {
        let out_of_range = r#"{"isConsistent":true,"findings":[],"confidence":85}"#;
        assert!(decode_record::<AuditVerdict>(out_of_range).is_err());

        let silent_rejection = r#"{"isConsistent":false,"findings":[],"confidence":0.4}"#;
        assert!(decode_record::<AuditVerdict>(silent_rejection).is_err());

        let ok = r#"{"isConsistent":false,"findings":["Consignee mismatch"],"confidence":0.7}"#;
        let verdict = decode_record::<AuditVerdict>(ok).unwrap();
        assert_eq!(verdict.findings, vec!["Consignee mismatch".to_string()]);
    }

    #[test]
    fn test_clean_audit_with_null_findings() {
        let raw = r#"```json {"isConsistent":true,"findings":null,"confidence":0.93} ```"#;
        let verdict = decode_record::<AuditVerdict>(raw).unwrap();
        assert!(verdict.is_consistent);
        assert!(verdict.findings.is_empty());

        let missing = r#"{"isConsistent":true,"confidence":0.9}"#;
        assert!(decode_record::<AuditVerdict>(missing).unwrap().findings.is_empty());
    }
}
