use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_created_member_is_listed_and_retrievable() {
    let app = TestApp::new();

    let (status, body) = app.post("/members", json!({ "name": "Ada Lovelace", "age": 36 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New Member added successfully");
    let id = body["id"].as_i64().unwrap();

    let (status, members) = app.get("/members").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        members,
        json!([{ "id": id, "name": "Ada Lovelace", "age": 36, "email": null, "phone": null }])
    );

    let (status, member) = app.get(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["name"], "Ada Lovelace");
    assert_eq!(member["age"], 36);
}

#[tokio::test]
async fn test_create_keeps_email_and_phone() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/members",
            json!({ "name": "Grace", "age": 45, "email": "grace@example.com", "phone": "555-0100" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, member) = app.get(&format!("/members/{}", body["id"])).await;
    assert_eq!(member["email"], "grace@example.com");
    assert_eq!(member["phone"], "555-0100");
}

#[tokio::test]
async fn test_create_with_missing_field_persists_nothing() {
    let app = TestApp::new();

    let (status, body) = app.post("/members", json!({ "name": "No Age" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "age": ["Missing data for required field."] }));
    assert_eq!(app.store.member_count(), 0);

    let (_, members) = app.get("/members").await;
    assert_eq!(members, json!([]));
}

#[tokio::test]
async fn test_create_with_malformed_age() {
    let app = TestApp::new();

    let (status, body) = app.post("/members", json!({ "name": "Ada", "age": "thirty" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "age": ["Not a valid integer."] }));
}

#[tokio::test]
async fn test_members_are_listed_in_id_order() {
    let app = TestApp::new();
    let first = app.create_member("First", 20).await;
    let second = app.create_member("Second", 30).await;

    let (_, members) = app.get("/members").await;
    let ids: Vec<i64> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();

    assert_eq!(ids, vec![first as i64, second as i64]);
}

#[tokio::test]
async fn test_get_unknown_member_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/members/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Member not found" }));
}

#[tokio::test]
async fn test_update_replaces_all_fields() {
    let app = TestApp::new();
    let id = app.create_member("Ada", 36).await;

    let (status, body) = app
        .put(
            &format!("/members/{}", id),
            json!({ "name": "Ada King", "age": 37, "email": "ada@example.com", "phone": "555-0199" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member updated successfully");

    let (_, member) = app.get(&format!("/members/{}", id)).await;
    assert_eq!(
        member,
        json!({ "id": id, "name": "Ada King", "age": 37, "email": "ada@example.com", "phone": "555-0199" })
    );
}

#[tokio::test]
async fn test_update_requires_every_field() {
    let app = TestApp::new();
    let id = app.create_member("Ada", 36).await;

    let (status, body) = app
        .put(&format!("/members/{}", id), json!({ "name": "Ada", "age": 37 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "email": ["Missing data for required field."],
            "phone": ["Missing data for required field."]
        })
    );

    let (_, member) = app.get(&format!("/members/{}", id)).await;
    assert_eq!(member["age"], 36);
}

#[tokio::test]
async fn test_update_unknown_member_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app
        .put(
            "/members/404",
            json!({ "name": "Ghost", "age": 1, "email": null, "phone": null }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_email_is_a_storage_error_without_details() {
    let app = TestApp::new();
    app.post("/members", json!({ "name": "A", "age": 20, "email": "same@example.com" }))
        .await;

    let (status, body) = app
        .post("/members", json!({ "name": "B", "age": 21, "email": "same@example.com" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_delete_member() {
    let app = TestApp::new();
    let id = app.create_member("Leaving", 50).await;

    let (status, body) = app.delete(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Member removed successfully" }));

    let (status, _) = app.get(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/members/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
