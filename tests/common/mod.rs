#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Keep hashing cheap in tests
        std::env::set_var("BCRYPT_COST", "4");
        let config = jobboard::config::jwt::JwtConfig::from_env().unwrap();
        let _ = jobboard::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        jobboard::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;
    jobboard::services::notification_catalog::seed_catalog(&db)
        .await
        .expect("Failed to seed notification catalog");

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(jobboard::routes::create_routes_with(
            jobboard::config::rate_limit::RateLimitConfig::disabled(),
        ))
        .layer(axum::middleware::from_fn(
            jobboard::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

/// Catalog rows survive between tests; everything user-owned is wiped.
async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = [
        "user_notification_preferences",
        "work_experiences",
        "profiles",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Register a user of the given account type and return (user_id, token).
pub async fn create_test_user(app: &TestApp, account_type: &str) -> (i32, String) {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let email = format!("{}_{}@test.com", account_type, counter);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "email": email,
            "password": "test_password_123",
            "account_type": account_type
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse register response for '{}': status={}, error={}",
            email, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to register '{}': status={}, body={}", email, status, body);
    }

    let user_id = body["data"]["user_id"]
        .as_i64()
        .unwrap_or_else(|| panic!("Response missing user_id: {:?}", body)) as i32;
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("Response missing token: {:?}", body))
        .to_string();
    (user_id, token)
}

/// Number of stored override rows for a user.
pub async fn preference_row_count(db: &DatabaseConnection, user_id: i32) -> i64 {
    let row = db
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT COUNT(*) AS count FROM user_notification_preferences WHERE user_id = $1",
            vec![user_id.into()],
        ))
        .await
        .expect("Failed to count preference rows")
        .expect("COUNT returned no row");
    row.try_get::<i64>("", "count").unwrap()
}

/// Drop every stored override so the resolver falls back to catalog defaults.
pub async fn clear_preferences(db: &DatabaseConnection, user_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "DELETE FROM user_notification_preferences WHERE user_id = $1",
        vec![user_id.into()],
    ))
    .await
    .expect("Failed to clear preferences");
}

/// Find one resolved event in a GET /notification-preferences body.
pub fn find_event<'a>(body: &'a serde_json::Value, event: &str) -> &'a serde_json::Value {
    body["data"]
        .as_array()
        .expect("data should be an array of categories")
        .iter()
        .flat_map(|c| c["settings"].as_array().into_iter().flatten())
        .find(|s| s["event"] == event)
        .unwrap_or_else(|| panic!("event '{}' missing from response", event))
}

/// (created_at, updated_at) of one stored override.
pub async fn preference_timestamps(
    db: &DatabaseConnection,
    user_id: i32,
    event: &str,
) -> (chrono::NaiveDateTime, chrono::NaiveDateTime) {
    let row = db
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT created_at, updated_at FROM user_notification_preferences \
             WHERE user_id = $1 AND event = $2",
            vec![user_id.into(), event.into()],
        ))
        .await
        .expect("Failed to read preference timestamps")
        .unwrap_or_else(|| panic!("no stored override for '{}'", event));
    (
        row.try_get("", "created_at").unwrap(),
        row.try_get("", "updated_at").unwrap(),
    )
}

/// Store an override directly; `None` flags are written as NULL.
pub async fn insert_raw_preference(
    db: &DatabaseConnection,
    user_id: i32,
    category: &str,
    event: &str,
    flags: [Option<bool>; 3],
) {
    let [none, in_app, email] = flags;
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "INSERT INTO user_notification_preferences \
         (user_id, category, event, none_enabled, in_app_enabled, email_enabled) \
         VALUES ($1, $2, $3, $4, $5, $6)",
        vec![
            user_id.into(),
            category.into(),
            event.into(),
            none.into(),
            in_app.into(),
            email.into(),
        ],
    ))
    .await
    .expect("Failed to insert raw preference");
}
