use cc_shared::{Sidecar, SidecarOrigin, SidecarResponse};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn sidecar() -> Sidecar {
    Sidecar {
        guid: Uuid::new_v4(),
        app_guid: "app-guid".to_string(),
        name: "my sidecar".to_string(),
        command: "bundle exec rackup".to_string(),
        process_types: vec!["web".to_string(), "worker".to_string()],
        memory_in_mb: None,
        origin: SidecarOrigin::User,
        created_at: Utc.with_ymd_and_hms(2026, 2, 20, 10, 30, 0).unwrap(),
        updated_at: None,
    }
}

#[test]
fn test_response_links_app_relationship() {
    let sidecar = sidecar();
    let response = SidecarResponse::from(&sidecar);

    assert_eq!(response.guid, sidecar.guid);
    assert_eq!(response.relationships.app.data.guid, "app-guid");
    assert_eq!(response.created_at, "2026-02-20T10:30:00Z");
    assert!(response.updated_at.is_none());
}

#[test]
fn test_response_serializes_origin_lowercase() {
    let response = SidecarResponse::from(&sidecar());
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["origin"], "user");
    assert_eq!(json["process_types"], serde_json::json!(["web", "worker"]));
    assert_eq!(json["updated_at"], serde_json::Value::Null);
}

#[test]
fn test_origin_display() {
    assert_eq!(SidecarOrigin::User.to_string(), "user");
    assert_eq!(SidecarOrigin::System.to_string(), "system");
}
