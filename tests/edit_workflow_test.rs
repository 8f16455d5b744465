// ==========================================
// 客户档案导入核心 - 编辑流程集成测试
// ==========================================
// 覆盖: 编辑提交 → 差异 → 更新客户 → 审计日志 → 变更历史
// ==========================================


use customer_reconcile::api::{EditApi, EditOutcome};
use customer_reconcile::domain::change_log::{ChangeEntry, RecordSnapshot};
use test_helpers::{MockChangeLogRepository, MockCustomerRepository};

fn stored_customer() -> RecordSnapshot {
    RecordSnapshot::new()
        .with("first_name", Some("Alice"))
        .with("middle_name", None)
        .with("last_name", Some("Wong"))
        .with("phone_no_primary", Some("5551234567"))
        .with("whatsapp_num", None)
        .with("phone_no_secondary", None)
        .with("email_id", Some("alice@example.com"))
}

fn setup() -> (
    MockCustomerRepository,
    MockChangeLogRepository,
    EditApi<MockCustomerRepository, MockChangeLogRepository>,
) {
    customer_reconcile::logging::init_test();
    let customers = MockCustomerRepository::new();
    let change_log = MockChangeLogRepository::new();
    let api = EditApi::new(customers.clone(), change_log.clone());
    (customers, change_log, api)
}

#[tokio::test]
async fn test_blank_optional_inputs_are_not_changes() {
    let (customers, change_log, api) = setup();
    let original = stored_customer();
    let edited = original
        .clone()
        .with("middle_name", Some(""))
        .with("whatsapp_num", Some(""))
        .with("phone_no_secondary", Some(""));

    let outcome = api
        .submit_edit("42", Some("C-42"), &original, edited)
        .await
        .unwrap();

    assert_eq!(outcome, EditOutcome::NoChanges);
    assert!(customers.updates().is_empty());
    assert!(change_log.payloads().is_empty());
}

#[tokio::test]
async fn test_changed_fields_update_then_audit() {
    let (customers, change_log, api) = setup();
    let original = stored_customer();
    let edited = original
        .clone()
        .with("last_name", Some("Wang"))
        .with("whatsapp_num", Some("5550000000"));

    let outcome = api
        .submit_edit("42", Some("C-42"), &original, edited)
        .await
        .unwrap();

    let expected = vec![
        ChangeEntry::new(
            "last_name",
            Some("Wong".to_string()),
            Some("Wang".to_string()),
        ),
        ChangeEntry::new("whatsapp_num", None, Some("5550000000".to_string())),
    ];
    assert_eq!(
        outcome,
        EditOutcome::Updated {
            changes: expected.clone()
        }
    );

    let updates = customers.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "42");
    assert_eq!(updates[0].1.get("last_name"), Some("Wang"));

    let payloads = change_log.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].customer_id, "42");
    assert_eq!(payloads[0].external_id.as_deref(), Some("C-42"));
    assert_eq!(payloads[0].changes, expected);

    let json = serde_json::to_value(&payloads[0]).unwrap();
    assert_eq!(json["customerId"], "42");
    assert_eq!(json["C_unique_id"], "C-42");
}

#[tokio::test]
async fn test_cleared_required_field_is_logged_as_null() {
    let (_customers, change_log, api) = setup();
    let original = stored_customer();
    let edited = original.clone().with("email_id", Some(""));

    api.submit_edit("42", None, &original, edited).await.unwrap();

    let payloads = change_log.payloads();
    assert_eq!(
        payloads[0].changes,
        vec![ChangeEntry::new(
            "email_id",
            Some("alice@example.com".to_string()),
            None
        )]
    );
}

#[tokio::test]
async fn test_customer_update_failure_skips_audit() {
    let change_log = MockChangeLogRepository::new();
    let api = EditApi::new(MockCustomerRepository::failing("down"), change_log.clone());
    let original = stored_customer();
    let edited = original.clone().with("first_name", Some("Alicia"));

    let err = api
        .submit_edit("42", None, &original, edited)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "STORAGE_ERROR");
    assert!(change_log.payloads().is_empty());
}

#[tokio::test]
async fn test_audit_failure_is_reported_after_update() {
    let customers = MockCustomerRepository::new();
    let api = EditApi::new(customers.clone(), MockChangeLogRepository::failing("down"));
    let original = stored_customer();
    let edited = original.clone().with("first_name", Some("Alicia"));

    let err = api
        .submit_edit("42", None, &original, edited)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "STORAGE_ERROR");
    assert_eq!(customers.updates().len(), 1);
}

#[tokio::test]
async fn test_empty_customer_id_is_invalid() {
    let (customers, _change_log, api) = setup();
    let original = stored_customer();
    let edited = original.clone().with("first_name", Some("Alicia"));

    let err = api
        .submit_edit("  ", None, &original, edited)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(customers.updates().is_empty());
}

#[tokio::test]
async fn test_change_history_newest_first() {
    let (_customers, _change_log, api) = setup();
    let original = stored_customer();

    let first = original.clone().with("first_name", Some("Alicia"));
    api.submit_edit("42", None, &original, first.clone())
        .await
        .unwrap();
    let second = first.clone().with("last_name", Some("Wang"));
    api.submit_edit("42", None, &first, second).await.unwrap();

    let history = api.change_history("42").await.unwrap();
    let fields: Vec<&str> = history.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["last_name", "first_name"]);
    assert_eq!(
        history[0].summary(),
        "Changes made on: 15/03/2024, 09:31:00 || updated last_name from Wong to Wang"
    );

    assert!(api.change_history("7").await.unwrap().is_empty());
}
