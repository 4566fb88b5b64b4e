//! The advisory client: domain request in, typed advice out.
//!
//! Every operation makes at most one call to the generative service and
//! settles into an [`Advice`]. Errors never escape; a failed call yields the
//! operation's fallback value together with a [`RequestFailure`] describing
//! what went wrong. There is no retry, backoff or caching. Two calls issued
//! for the same panel may race and complete in either order; pair the client
//! with [`crate::core::inflight::RequestSlot`] to drop stale replies.

use crate::core::{prompts, schema};
use crate::domain::model::{
    Asset, AuditVerdict, ChatMessage, ChatRole, DocumentStatus, MarketIntelligence, MarketTrend,
    TradeDocument, UserProfile,
};
use crate::domain::ports::{AdvisorSettings, GenerationRequest, GenerativeService, Turn};
use crate::utils::error::{AdvisorError, FailureKind, Result};

/// Sentences shown in place of a missing result.
pub mod fallback {
    pub const SENTIMENT_FAILED: &str = "Failed to fetch AI analysis. Please try again.";
    pub const ROADMAP_EMPTY: &str = "No roadmap could be generated for this profile.";
    pub const ROADMAP_FAILED: &str =
        "Unable to synthesize an investment roadmap right now. Please try again.";
    pub const REBALANCE_EMPTY: &str =
        "Your current allocation perfectly matches your goals. No changes needed.";
    pub const REBALANCE_FAILED: &str =
        "Unable to connect to the advisor node. Please verify your connection and try again.";
    pub const CHAT_EMPTY: &str = "I am sorry, I am unable to process that at the moment.";
    pub const CHAT_FAILED: &str =
        "I encountered an error connecting to the financial data network. Please try again.";
    pub const SECTOR_EMPTY: &str = "No analysis available for this sector.";
    pub const SECTOR_FAILED: &str = "Failed to load AI sector analysis. Please try again later.";
    pub const BRIEFING_EMPTY: &str = "No briefing is available right now.";
    pub const BRIEFING_FAILED: &str =
        "Unable to synthesize today's trade briefing. Please try again.";
    pub const MATCHMAKING_EMPTY: &str = "No partner suggestions matched these requirements.";
    pub const MATCHMAKING_FAILED: &str =
        "Unable to process matchmaking right now. Please try again.";
    pub const INTELLIGENCE_FAILED: &str =
        "Unable to synthesize regional trade intelligence. Please try again.";
    pub const AUDIT_FAILED: &str = "Unable to process the document audit. Please try again.";
    pub const EXPLANATION_EMPTY: &str = "Explanation unavailable.";
    pub const EXPLANATION_FAILED: &str = "Failed to generate AI insight.";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: FailureKind,
    /// Human-readable text for the panel.
    pub message: String,
    /// The underlying error, for logs.
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advice<T> {
    Ready(T),
    Fallback { value: T, failure: RequestFailure },
}

impl<T> Advice<T> {
    fn settle(operation: &str, result: Result<T>, fallback: T, message: &str) -> Self {
        match result {
            Ok(value) => {
                tracing::info!("{} completed", operation);
                Advice::Ready(value)
            }
            Err(e) => {
                tracing::warn!(
                    "{} failed ({:?}): {}. Suggestion: {}",
                    operation,
                    e.failure_kind(),
                    e,
                    e.recovery_suggestion()
                );
                Advice::Fallback {
                    value: fallback,
                    failure: RequestFailure {
                        kind: e.failure_kind(),
                        message: message.to_string(),
                        detail: e.to_string(),
                    },
                }
            }
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Advice::Ready(value) | Advice::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Advice::Ready(value) | Advice::Fallback { value, .. } => value,
        }
    }

    pub fn failure(&self) -> Option<&RequestFailure> {
        match self {
            Advice::Ready(_) => None,
            Advice::Fallback { failure, .. } => Some(failure),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Advice::Ready(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Advice<U> {
        match self {
            Advice::Ready(value) => Advice::Ready(f(value)),
            Advice::Fallback { value, failure } => Advice::Fallback {
                value: f(value),
                failure,
            },
        }
    }
}

pub struct AdvisoryClient<G: GenerativeService> {
    service: G,
    fast_model: String,
    deep_model: String,
}

impl<G: GenerativeService> AdvisoryClient<G> {
    pub fn new<S: AdvisorSettings + ?Sized>(service: G, settings: &S) -> Self {
        Self::with_models(service, settings.fast_model(), settings.deep_model())
    }

    pub fn with_models(service: G, fast_model: &str, deep_model: &str) -> Self {
        Self {
            service,
            fast_model: fast_model.to_string(),
            deep_model: deep_model.to_string(),
        }
    }

    async fn call(&self, operation: &str, request: GenerationRequest) -> Result<String> {
        tracing::info!("{} started", operation);
        tracing::debug!(
            "{}: sending {} request to model {} ({} turns)",
            operation,
            if request.is_structured() { "structured" } else { "text" },
            request.model,
            request.contents.len()
        );
        self.service.generate(request).await
    }

    async fn prose(
        &self,
        operation: &str,
        request: GenerationRequest,
        empty: &str,
        failed: &str,
    ) -> Advice<String> {
        let result = self.call(operation, request).await.map(|text| {
            let text = text.trim();
            if text.is_empty() {
                tracing::info!("{}: service returned no text, using default sentence", operation);
                empty.to_string()
            } else {
                text.to_string()
            }
        });
        Advice::settle(operation, result, failed.to_string(), failed)
    }

    pub async fn analyze_sentiment(&self, assets: &[Asset]) -> Advice<Vec<MarketTrend>> {
        if assets.is_empty() {
            return Advice::Ready(Vec::new());
        }
        let request = GenerationRequest::structured(
            self.fast_model.as_str(),
            prompts::sentiment_prompt(assets),
            schema::market_trend_schema(),
        );
        let result = match self.call("sentiment analysis", request).await {
            Ok(raw) => schema::decode_records(&raw, assets.len()),
            Err(e) => Err(e),
        };
        Advice::settle(
            "sentiment analysis",
            result,
            Vec::new(),
            fallback::SENTIMENT_FAILED,
        )
    }

    pub async fn investment_roadmap(&self, profile: &UserProfile) -> Advice<String> {
        let request =
            GenerationRequest::text(self.deep_model.as_str(), prompts::roadmap_prompt(profile));
        self.prose(
            "investment roadmap",
            request,
            fallback::ROADMAP_EMPTY,
            fallback::ROADMAP_FAILED,
        )
        .await
    }

    pub async fn rebalance_strategy(
        &self,
        assets: &[Asset],
        profile: &UserProfile,
    ) -> Advice<String> {
        let request = GenerationRequest::text(
            self.fast_model.as_str(),
            prompts::rebalance_prompt(assets, profile),
        );
        self.prose(
            "rebalance strategy",
            request,
            fallback::REBALANCE_EMPTY,
            fallback::REBALANCE_FAILED,
        )
        .await
    }

    /// One conversational turn. `history` is only read; append the user
    /// message and the returned reply yourself if the conversation continues.
    pub async fn chat(
        &self,
        profile: &UserProfile,
        history: &[ChatMessage],
        message: &str,
    ) -> Advice<ChatMessage> {
        if message.trim().is_empty() {
            return Advice::Ready(ChatMessage::model(fallback::CHAT_EMPTY));
        }

        // The service expects the conversation to open with a user turn, so
        // greetings shown before the first question stay local.
        let mut contents: Vec<Turn> = history
            .iter()
            .skip_while(|m| m.role == ChatRole::Model)
            .map(|m| Turn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect();
        contents.push(Turn::user(message));

        let request = GenerationRequest {
            model: self.fast_model.clone(),
            system_instruction: Some(prompts::advisor_persona(profile)),
            contents,
            format: crate::domain::ports::ResponseFormat::Text,
        };

        self.prose("advisor chat", request, fallback::CHAT_EMPTY, fallback::CHAT_FAILED)
            .await
            .map(ChatMessage::model)
    }

    pub async fn sector_outlook(&self, sector: &str) -> Advice<String> {
        let request =
            GenerationRequest::text(self.fast_model.as_str(), prompts::sector_prompt(sector));
        self.prose(
            "sector outlook",
            request,
            fallback::SECTOR_EMPTY,
            fallback::SECTOR_FAILED,
        )
        .await
    }

    pub async fn daily_briefing(&self, profile: &UserProfile) -> Advice<String> {
        let request =
            GenerationRequest::text(self.fast_model.as_str(), prompts::briefing_prompt(profile));
        self.prose(
            "daily briefing",
            request,
            fallback::BRIEFING_EMPTY,
            fallback::BRIEFING_FAILED,
        )
        .await
    }

    pub async fn find_trade_partners(
        &self,
        profile: &UserProfile,
        requirements: &str,
    ) -> Advice<String> {
        let request = GenerationRequest::text(
            self.fast_model.as_str(),
            prompts::matchmaking_prompt(profile, requirements),
        );
        self.prose(
            "partner matchmaking",
            request,
            fallback::MATCHMAKING_EMPTY,
            fallback::MATCHMAKING_FAILED,
        )
        .await
    }

    pub async fn trade_intelligence(&self, regions: &[String]) -> Advice<Vec<MarketIntelligence>> {
        if regions.is_empty() {
            return Advice::Ready(Vec::new());
        }
        let request = GenerationRequest::structured(
            self.fast_model.as_str(),
            prompts::intelligence_prompt(regions),
            schema::market_intelligence_schema(),
        );
        let result = match self.call("trade intelligence", request).await {
            Ok(raw) => schema::decode_records(&raw, regions.len()),
            Err(e) => Err(e),
        };
        Advice::settle(
            "trade intelligence",
            result,
            Vec::new(),
            fallback::INTELLIGENCE_FAILED,
        )
    }

    pub async fn audit_document(
        &self,
        file_name: &str,
        doc_type: &str,
    ) -> Advice<AuditVerdict> {
        let request = GenerationRequest::structured(
            self.fast_model.as_str(),
            prompts::audit_prompt(file_name, doc_type),
            schema::audit_verdict_schema(),
        );
        let result = match self.call("document audit", request).await {
            Ok(raw) => schema::decode_record::<AuditVerdict>(&raw),
            Err(e) => Err(e),
        };
        let unverified = AuditVerdict {
            is_consistent: false,
            findings: vec![fallback::AUDIT_FAILED.to_string()],
            confidence: 0.0,
        };
        Advice::settle("document audit", result, unverified, fallback::AUDIT_FAILED)
    }

    pub async fn explain_document(
        &self,
        doc_type: &str,
        status: DocumentStatus,
    ) -> Advice<String> {
        let request = GenerationRequest::text(
            self.fast_model.as_str(),
            prompts::explanation_prompt(doc_type, status),
        );
        self.prose(
            "document explanation",
            request,
            fallback::EXPLANATION_EMPTY,
            fallback::EXPLANATION_FAILED,
        )
        .await
    }
}

impl TradeDocument {
    /// Files an uploaded document according to its audit outcome. A document
    /// whose audit could not run stays `Pending` with no verification attached.
    /// `Rejected` is informational only. No ledger anchor is assigned, so
    /// `blockchain_id` stays empty for new uploads.
    pub fn from_audit(
        id: String,
        doc_type: String,
        date: String,
        audit: Advice<AuditVerdict>,
    ) -> Self {
        let (status, ai_verification) = match audit {
            Advice::Ready(verdict) if verdict.is_consistent => {
                (DocumentStatus::Verified, Some(verdict))
            }
            Advice::Ready(verdict) => (DocumentStatus::Rejected, Some(verdict)),
            Advice::Fallback { .. } => (DocumentStatus::Pending, None),
        };
        Self {
            id,
            doc_type,
            status,
            date,
            blockchain_id: None,
            ai_verification,
        }
    }
}

impl From<AdvisorError> for RequestFailure {
    fn from(err: AdvisorError) -> Self {
        RequestFailure {
            kind: err.failure_kind(),
            message: err.user_friendly_message(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct ScriptedService {
        replies: Arc<Mutex<VecDeque<Result<String>>>>,
        requests: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl ScriptedService {
        fn replying(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().await.clone()
        }
    }

    #[async_trait]
    impl GenerativeService for ScriptedService {
        async fn generate(&self, request: GenerationRequest) -> Result<String> {
            self.requests.lock().await.push(request);
            self.replies
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn client(service: ScriptedService) -> AdvisoryClient<ScriptedService> {
        AdvisoryClient::with_models(service, "fast-model", "deep-model")
    }

    #[tokio::test]
    async fn test_empty_asset_list_skips_the_service() {
        let service = ScriptedService::default();
        let advisor = client(service.clone());

        let advice = advisor.analyze_sentiment(&[]).await;

        assert_eq!(advice, Advice::Ready(Vec::new()));
        assert!(service.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_request_is_structured() {
        let reply = r#"[{"asset":"AAPL","sentiment":"Bearish","reasoning":"Valuation",
            "predictedMove":"-1%"}]"#;
        let service = ScriptedService::replying(vec![Ok(reply.to_string())]);
        let advisor = client(service.clone());
        let assets = &fixtures::demo_assets()[1..2];

        let advice = advisor.analyze_sentiment(assets).await;

        assert!(advice.is_ready());
        let requests = service.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "fast-model");
        assert_eq!(
            requests[0].format,
            crate::domain::ports::ResponseFormat::Json(schema::market_trend_schema())
        );
    }

    #[tokio::test]
    async fn test_roadmap_uses_deep_model_and_trims() {
        let service = ScriptedService::replying(vec![Ok("  Invest steadily.\n".to_string())]);
        let advisor = client(service.clone());

        let advice = advisor.investment_roadmap(&fixtures::demo_profile()).await;

        assert_eq!(advice, Advice::Ready("Invest steadily.".to_string()));
        assert_eq!(service.requests().await[0].model, "deep-model");
    }

    #[tokio::test]
    async fn test_empty_prose_uses_default_sentence() {
        let service = ScriptedService::replying(vec![Ok("   ".to_string())]);
        let advisor = client(service);

        let advice = advisor
            .rebalance_strategy(&fixtures::demo_assets(), &fixtures::demo_profile())
            .await;

        assert_eq!(advice, Advice::Ready(fallback::REBALANCE_EMPTY.to_string()));
    }

    #[tokio::test]
    async fn test_service_error_becomes_network_fallback() {
        let service = ScriptedService::replying(vec![Err(AdvisorError::ServiceStatusError {
            status: 503,
            body: "overloaded".to_string(),
        })]);
        let advisor = client(service);

        let advice = advisor.sector_outlook("Semiconductors").await;

        assert_eq!(advice.value(), fallback::SECTOR_FAILED);
        let failure = advice.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::NetworkFailure);
        assert!(failure.detail.contains("503"));
    }

    #[tokio::test]
    async fn test_chat_drops_leading_greeting() {
        let service = ScriptedService::replying(vec![Ok("Consider bonds.".to_string())]);
        let advisor = client(service.clone());
        let history = vec![
            ChatMessage::model("Hello Alex!"),
            ChatMessage::user("How is my portfolio?"),
            ChatMessage::model("Balanced."),
        ];

        let advice = advisor
            .chat(&fixtures::demo_profile(), &history, "Should I add bonds?")
            .await;

        assert_eq!(advice.value().role, ChatRole::Model);
        assert_eq!(advice.value().text, "Consider bonds.");
        let sent = &service.requests().await[0];
        assert_eq!(sent.contents.len(), 3);
        assert_eq!(sent.contents[0], Turn::user("How is my portfolio?"));
        assert_eq!(sent.contents[2], Turn::user("Should I add bonds?"));
        assert!(sent.system_instruction.as_deref().unwrap().contains("Alex Johnson"));
    }

    #[tokio::test]
    async fn test_blank_chat_message_is_not_sent() {
        let service = ScriptedService::default();
        let advisor = client(service.clone());

        let advice = advisor.chat(&fixtures::demo_profile(), &[], "   ").await;

        assert_eq!(advice.value().text, fallback::CHAT_EMPTY);
        assert!(service.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_audit_fallback_keeps_invariants() {
        let service = ScriptedService::replying(vec![Ok("not json".to_string())]);
        let advisor = client(service);

        let advice = advisor.audit_document("invoice.pdf", "invoice").await;

        let failure = advice.failure().unwrap().clone();
        assert_eq!(failure.kind, FailureKind::MalformedResponse);
        let verdict = advice.value();
        assert!(!verdict.is_consistent);
        assert!(!verdict.findings.is_empty());
        assert!((0.0..=1.0).contains(&verdict.confidence));
    }

    #[test]
    fn test_document_status_follows_audit() {
        let verdict = |consistent: bool| AuditVerdict {
            is_consistent: consistent,
            findings: vec!["Seal number mismatch".to_string()],
            confidence: 0.9,
        };
        let file = |advice| {
            TradeDocument::from_audit(
                "DOC-004".into(),
                "invoice".into(),
                "2024-06-01".into(),
                advice,
            )
        };

        let verified = file(Advice::Ready(verdict(true)));
        assert_eq!(verified.status, DocumentStatus::Verified);
        assert_eq!(verified.blockchain_id, None);
        let rejected = file(Advice::Ready(verdict(false)));
        assert_eq!(rejected.status, DocumentStatus::Rejected);
        assert!(rejected.ai_verification.is_some());

        let pending = file(Advice::Fallback {
            value: verdict(false),
            failure: AdvisorError::malformed("bad").into(),
        });
        assert_eq!(pending.status, DocumentStatus::Pending);
        assert!(pending.ai_verification.is_none());
        assert_eq!(pending.blockchain_id, None);
    }

    #[tokio::test]
    async fn test_matchmaking_prompt_and_fallback() {
        let service = ScriptedService::replying(vec![
            Ok("Look at bonded warehouses in Rotterdam.".to_string()),
            Err(AdvisorError::ServiceStatusError {
                status: 500,
                body: "internal".to_string(),
            }),
        ]);
        let advisor = client(service.clone());
        let profile = fixtures::demo_profile();

        let found = advisor
            .find_trade_partners(&profile, "  cold-chain logistics in Europe ")
            .await;
        assert_eq!(
            found,
            Advice::Ready("Look at bonded warehouses in Rotterdam.".to_string())
        );

        let prompt = &service.requests().await[0].contents[0].text;
        assert!(prompt.contains("\"cold-chain logistics in Europe\""));
        assert!(prompt.contains("risk posture: Moderate"));

        let failed = advisor.find_trade_partners(&profile, "textile mills").await;
        assert_eq!(failed.value(), fallback::MATCHMAKING_FAILED);
        assert_eq!(
            failed.failure().map(|f| f.kind),
            Some(FailureKind::NetworkFailure)
        );
    }
}
