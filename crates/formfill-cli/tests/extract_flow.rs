//! End-to-end extraction through the HTTP provider against a local stub

use axum::{routing::post, Json, Router};
use formfill_cli::commands::extract::{load_schema, provider_config, run_extraction};
use formfill_cli::config::{Config, Profile};
use formfill_domain::FieldValue;
use formfill_llm::OpenRouterProvider;
use serde_json::{json, Value};
use std::fs;

async fn spawn_stub(answer: &'static str) -> String {
    let router = Router::new().route(
        "/api/v1/chat/completions",
        post(move |Json(_payload): Json<Value>| async move {
            Json(json!({"choices": [{"message": {"role": "assistant", "content": answer}}]}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

#[tokio::test]
async fn test_extract_with_profile_and_schema_file() {
    let base_url = spawn_stub("```json\n{\"vendor\": \"Acme\", \"amount\": \"49.99\", \"priority\": \"high\"}\n```").await;

    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("invoice.json");
    fs::write(
        &schema_path,
        r#"{"fields": [
            {"name": "vendor", "type": "text", "label": "Vendor"},
            {"name": "amount", "type": "number", "label": "Amount"},
            {"name": "priority", "type": "select", "label": "Priority", "options": ["low", "normal"]}
        ]}"#,
    )
    .unwrap();

    let mut config = Config::load_from(dir.path().join("config.toml")).unwrap();
    config.set_profile(
        "stub".to_string(),
        Profile {
            base_url: base_url.clone(),
            model: Some("stub/model".to_string()),
            ..Profile::default()
        },
    );
    config.switch_profile("stub".to_string()).unwrap();
    let profile = config.get_active_profile().unwrap();

    let provider = OpenRouterProvider::with_base_url(&profile.base_url);
    let (extraction, filled) = run_extraction(
        provider,
        config.extractor.clone(),
        load_schema(&schema_path).unwrap(),
        "Invoice from Acme, total 49.99, urgent".to_string(),
        provider_config(profile, Some("sk-test".to_string()), None),
    )
    .await
    .unwrap();

    assert_eq!(extraction.metadata.model, "stub/model");
    assert_eq!(extraction.values.get("vendor"), Some(&FieldValue::Text("Acme".into())));
    assert_eq!(extraction.values.get("amount"), Some(&FieldValue::Number(49.99)));
    assert_eq!(extraction.metadata.rejected, vec!["priority".to_string()]);

    let document = filled.to_json();
    assert_eq!(document["fields"][0]["value"], "Acme");
    assert_eq!(document["fields"][1]["value"], 49.99);
    assert_eq!(document["fields"][2]["value"], "");
}
