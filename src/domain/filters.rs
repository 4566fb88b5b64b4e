use crate::domain::model::{
    AlertSeverity, ComplianceAlert, ParseEnumError, TradeDocument, TradePartner,
};
use std::str::FromStr;

pub fn search_documents<'a>(documents: &'a [TradeDocument], term: &str) -> Vec<&'a TradeDocument> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return documents.iter().collect();
    }
    documents
        .iter()
        .filter(|doc| {
            doc.id.to_lowercase().contains(&term) || doc.doc_type.to_lowercase().contains(&term)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(AlertSeverity),
}

impl FromStr for SeverityFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SeverityFilter::All);
        }
        s.parse().map(SeverityFilter::Only)
    }
}

pub fn filter_alerts(alerts: &[ComplianceAlert], filter: SeverityFilter) -> Vec<&ComplianceAlert> {
    alerts
        .iter()
        .filter(|alert| match filter {
            SeverityFilter::All => true,
            SeverityFilter::Only(severity) => alert.severity == severity,
        })
        .collect()
}

pub fn search_partners<'a>(partners: &'a [TradePartner], term: &str) -> Vec<&'a TradePartner> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return partners.iter().collect();
    }
    partners
        .iter()
        .filter(|p| {
            [
                p.name.as_str(),
                p.country.as_str(),
                p.role.as_str(),
                p.specialization.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

/// `bill_of_lading.pdf` -> `bill of lading`.
pub fn document_type_from_filename(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or_default();
    let doc_type = stem.replace('_', " ");
    if doc_type.trim().is_empty() {
        "Trade Document".to_string()
    } else {
        doc_type.trim().to_string()
    }
}

pub fn next_document_id(existing: &[TradeDocument]) -> String {
    format!("DOC-{:03}", existing.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;

    #[test]
    fn test_search_documents() {
        let docs = fixtures::demo_documents();
        assert_eq!(search_documents(&docs, "").len(), 3);
        assert_eq!(search_documents(&docs, "  invoice ").len(), 1);
        assert_eq!(search_documents(&docs, "doc-002")[0].doc_type, "Certificate of Origin");
        assert!(search_documents(&docs, "manifest").is_empty());
    }

    #[test]
    fn test_filter_alerts_by_severity() {
        let alerts = fixtures::demo_alerts();
        assert_eq!(filter_alerts(&alerts, SeverityFilter::All).len(), 3);

        let high: SeverityFilter = "High".parse().unwrap();
        let only_high = filter_alerts(&alerts, high);
        assert_eq!(only_high.len(), 1);
        assert_eq!(only_high[0].region, "EU");

        assert!("Critical".parse::<SeverityFilter>().is_err());
    }

    #[test]
    fn test_search_partners_matches_role_and_country() {
        let partners = fixtures::demo_partners();
        assert_eq!(search_partners(&partners, "freight").len(), 1);
        assert_eq!(search_partners(&partners, "chile")[0].id, "P-03");
        assert_eq!(search_partners(&partners, " ").len(), partners.len());
    }

    #[test]
    fn test_document_type_from_filename() {
        assert_eq!(document_type_from_filename("bill_of_lading.pdf"), "bill of lading");
        assert_eq!(document_type_from_filename(".pdf"), "Trade Document");
        assert_eq!(document_type_from_filename("invoice"), "invoice");
    }

    #[test]
    fn test_next_document_id() {
        let docs = fixtures::demo_documents();
        assert_eq!(next_document_id(&docs), "DOC-004");
        assert_eq!(next_document_id(&[]), "DOC-001");
    }
}
