mod common;

use serde_json::Value;

#[tokio::test]
async fn register_login_and_me() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "email": "Alice@Example.com",
            "password": "password_123",
            "account_type": "job_seeker"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["data"]["account_type"], "job_seeker");

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": "alice@example.com",
            "password": "password_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["account_type"], "job_seeker");
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let app = common::spawn_app().await;
    let payload = serde_json::json!({
        "email": "bob@example.com",
        "password": "password_123",
        "account_type": "employer"
    });

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = common::spawn_app().await;
    common::create_test_user(&app, "contributor").await;

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "whatever_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn registration_materializes_default_preferences() {
    let app = common::spawn_app().await;
    let (user_id, _) = common::create_test_user(&app, "job_seeker").await;

    let catalog = jobboard::services::notification_catalog::default_catalog();
    assert_eq!(
        common::preference_row_count(&app.db, user_id).await,
        catalog.len() as i64
    );
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
}
