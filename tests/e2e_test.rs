mod helpers;

use helpers::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tradein_pricing::models::*;
use tradein_pricing::services::*;

/// End-to-end test: quote → recorder → JSON-lines audit trail on disk
#[tokio::test]
async fn test_quotes_land_in_the_audit_trail() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let audit_dir = dir.path().join("audit");
    let audit_trail = Arc::new(AuditTrailService::new(audit_dir.clone()).expect("Failed to open audit trail"));

    let model = model_released(date(2025, 1, 19));
    let model_id = model.id;
    let catalog = Arc::new(InMemoryCatalog::with_models(vec![model]));

    let (recorder, sender) = PricingHistoryRecorder::channel(8);
    let recorder = recorder.with_writer(audit_trail);
    let handle = tokio::spawn(recorder.start());

    let service = TradeInService::new(catalog).with_history(sender);

    // Step 1: two quotes, one with labels the storefront does not know
    let first = service
        .calculate_at(model_id, &StorageCapacity::Gb256, &DeviceCondition::Good, at(2026, 3, 15))
        .await
        .expect("Failed to price first quote");
    let second = service
        .calculate_at(
            model_id,
            &StorageCapacity::parse("2TB"),
            &DeviceCondition::parse("cracked"),
            at(2026, 3, 15),
        )
        .await
        .expect("Failed to price second quote");

    // Step 2: close the pipeline and wait for the recorder to drain
    drop(service);
    let stats = handle.await.expect("Recorder task panicked");
    assert_eq!(stats.written, 2);
    assert_eq!(stats.failed, 0);

    // Step 3: the dated audit files hold one JSON line per quote
    let mut files: Vec<_> = std::fs::read_dir(&audit_dir)
        .expect("Failed to list audit dir")
        .map(|e| e.expect("Failed to read dir entry").path())
        .collect();
    files.sort();
    assert!(files.iter().all(|p| p.to_string_lossy().ends_with(".log")));
    let contents: String = files
        .iter()
        .map(|p| std::fs::read_to_string(p).expect("Failed to read audit log"))
        .collect();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("Audit line is not JSON"))
        .collect();
    assert_eq!(lines.len(), 2);

    for line in &lines {
        assert_eq!(line["event_type"], "trade_in_quoted");
        assert_eq!(line["model_id"], serde_json::json!(model_id.to_string()));
    }

    assert_eq!(lines[0]["details"]["storage_capacity"], "256GB");
    assert_eq!(lines[0]["details"]["final_value"], serde_json::json!(first.final_value.to_string()));

    assert_eq!(lines[1]["details"]["storage_capacity"], "2TB");
    assert_eq!(lines[1]["details"]["device_condition"], "cracked");
    let multiplier: Decimal = lines[1]["details"]["condition_multiplier"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("condition_multiplier should be a decimal string");
    assert_eq!(multiplier, Decimal::new(5, 1));
    assert_eq!(lines[1]["details"]["final_value"], serde_json::json!(second.final_value.to_string()));
}
