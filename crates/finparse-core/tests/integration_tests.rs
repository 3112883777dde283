//! Integration tests for finparse-core
//!
//! These tests exercise the full channel → extraction → draft workflow,
//! including the provider fallback chain over real HTTP against the mock
//! provider server.

use std::sync::Arc;
use std::time::Duration;

use finparse_core::test_utils::{MockProviderServer, MockServerMode};
use finparse_core::{
    Channel, ExtractionSource, MockMode, MockProvider, OpenAiChatProvider, Orchestrator, Pipeline,
    SmsParser, Taxonomy, TxnType,
};

fn taxonomy() -> Arc<Taxonomy> {
    Arc::new(Taxonomy::standard())
}

fn rule_only_pipeline() -> Pipeline {
    Pipeline::new(Orchestrator::new(vec![], taxonomy()), taxonomy())
}

// =============================================================================
// End-to-end channel scenarios
// =============================================================================

#[tokio::test]
async fn test_sms_debit_end_to_end() {
    let result = rule_only_pipeline()
        .process_sms("Paid Rs. 500 to Swiggy for dinner")
        .await;

    assert_eq!(result.draft.txn_type, TxnType::Debited);
    assert_eq!(result.draft.amount, 500.0);
    assert_eq!(result.draft.counterparty, "Swiggy");
    assert_eq!(result.draft.category, "Food & Dining");
    assert_eq!(result.draft.source_channel, Channel::Sms);
    assert_eq!(result.provider_used, "rule_based");
}

#[tokio::test]
async fn test_sms_credit_end_to_end() {
    let result = rule_only_pipeline()
        .process_sms("Salary of INR 45000 credited to your account")
        .await;

    assert_eq!(result.draft.txn_type, TxnType::Credited);
    assert_eq!(result.draft.amount, 45000.0);
    assert_eq!(result.draft.category, "Income");
}

#[tokio::test]
async fn test_unparseable_sms_degrades_to_defaults() {
    let result = rule_only_pipeline()
        .process_sms("thanks for the update")
        .await;

    assert_eq!(result.draft.txn_type, TxnType::Unknown);
    assert_eq!(result.draft.amount, 0.0);
    assert_eq!(result.draft.counterparty, "Unknown");
    assert_eq!(result.draft.category, "Uncategorized");
    assert!(result.draft.error.is_none());
}

#[tokio::test]
async fn test_statement_page_end_to_end() {
    let page = "\
STATE BANK  Statement of Account
Date        Narration            Amount     Type
05/02/2024  UPI-ZOMATO           320.00     DR
06/02/2024  NEFT SALARY          60,000.00  CR
Opening balance 1,234.56";

    let drafts = rule_only_pipeline().process_statement(page);

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].amount, 320.0);
    assert_eq!(drafts[0].txn_type, TxnType::Debited);
    assert_eq!(drafts[1].amount, 60_000.0);
    assert_eq!(drafts[1].txn_type, TxnType::Credited);
    assert!(drafts
        .iter()
        .all(|d| d.source_channel == Channel::PdfStatement));
}

// =============================================================================
// Fallback monotonicity
// =============================================================================

#[tokio::test]
async fn test_all_provider_timeouts_produce_rule_based_draft() {
    let slow = |name: &str| {
        finparse_core::ProviderClient::Mock(MockProvider::new(
            name,
            MockMode::Slow(Duration::from_secs(10)),
        ))
    };

    let orchestrator = Orchestrator::new(vec![slow("groq"), slow("openai")], taxonomy())
        .with_timeouts(Duration::from_millis(20), Duration::from_millis(100));

    let outcome = orchestrator
        .analyze("Paid Rs. 500 to Swiggy for dinner", Channel::Sms)
        .await;

    assert_eq!(outcome.source, ExtractionSource::RuleBased);

    // The fallback draft matches a direct rule-based parse
    let direct = SmsParser::new(taxonomy()).parse("Paid Rs. 500 to Swiggy for dinner");
    assert_eq!(outcome.draft.txn_type, direct.txn_type);
    assert_eq!(outcome.draft.amount, direct.amount);
    assert_eq!(outcome.draft.counterparty, direct.counterparty);
    assert_eq!(outcome.draft.category, direct.category);
}

#[tokio::test]
async fn test_later_provider_rescues_after_earlier_failures() {
    let payload = r#"{"txn_type": "Debited", "amount": 450,
        "counterparty": "Zomato", "category": "whatever"}"#;

    let orchestrator = Orchestrator::new(
        vec![
            finparse_core::ProviderClient::Mock(MockProvider::new("groq", MockMode::Fail)),
            finparse_core::ProviderClient::Mock(MockProvider::new("openai", MockMode::Malformed)),
            finparse_core::ProviderClient::Mock(MockProvider::json("gemini", payload)),
        ],
        taxonomy(),
    );

    let outcome = orchestrator
        .analyze("Zomato order Rs 450 debited", Channel::Sms)
        .await;

    assert_eq!(outcome.source, ExtractionSource::Provider("gemini".into()));
    assert_eq!(outcome.draft.amount, 450.0);
    assert_eq!(outcome.draft.counterparty, "Zomato");
    // Category comes from the classifier, not the provider payload
    assert_eq!(outcome.draft.category, "Food & Dining");
}

// =============================================================================
// Provider chain over HTTP (mock server)
// =============================================================================

#[tokio::test]
async fn test_provider_extraction_over_http() {
    let payload = r#"{"txn_type": "Credited", "amount": "1,500",
        "counterparty": "Acme Corp", "category": "x"}"#;
    let mut server = MockProviderServer::start(MockServerMode::Respond(payload.into())).await;

    let provider = OpenAiChatProvider::new("mock", &server.url(), "test-model", "test-key");
    let orchestrator = Orchestrator::new(
        vec![finparse_core::ProviderClient::OpenAiChat(provider)],
        taxonomy(),
    );

    let outcome = orchestrator
        .analyze("Received 1,500 from Acme Corp", Channel::Sms)
        .await;

    assert_eq!(outcome.source, ExtractionSource::Provider("mock".into()));
    assert_eq!(outcome.draft.txn_type, TxnType::Credited);
    assert_eq!(outcome.draft.amount, 1500.0);
    assert_eq!(outcome.draft.counterparty, "Acme Corp");

    server.stop();
}

#[tokio::test]
async fn test_http_error_falls_back_to_rules() {
    let mut server = MockProviderServer::start(MockServerMode::Fail).await;

    let provider = OpenAiChatProvider::new("mock", &server.url(), "test-model", "test-key");
    let orchestrator = Orchestrator::new(
        vec![finparse_core::ProviderClient::OpenAiChat(provider)],
        taxonomy(),
    );

    let outcome = orchestrator
        .analyze("Paid Rs. 500 to Swiggy for dinner", Channel::Sms)
        .await;

    assert_eq!(outcome.source, ExtractionSource::RuleBased);
    assert_eq!(outcome.draft.amount, 500.0);

    server.stop();
}

// =============================================================================
// Determinism
// =============================================================================

#[tokio::test]
async fn test_rule_based_extraction_is_deterministic() {
    let text = "Rs 900 debited on 15/01/2024 at DMart";
    let parser = SmsParser::new(taxonomy());

    let a = parser.parse(text);
    let b = parser.parse(text);

    // Dated input pins the draft completely, so serialized forms match
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
