use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    create_routes_with(RateLimitConfig::from_env())
}

pub fn create_routes_with(rate_limit_config: RateLimitConfig) -> Router {
    Router::new().nest("/api/v1", api_routes(&rate_limit_config))
}

fn api_routes(config: &RateLimitConfig) -> Router {
    let auth = auth_routes(config);
    let protected = protected_routes(config).layer(middleware::from_fn(auth_middleware));

    auth.merge(protected)
}

/// Public auth routes: register, login.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Routes that need a caller identity.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/me", routing::get(handlers::get_current_user))
        // Profile
        .route(
            "/profile",
            routing::get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/profile/experiences",
            routing::get(handlers::profile::list_experiences)
                .post(handlers::profile::add_experience),
        )
        .route(
            "/profile/experiences/{id}",
            routing::delete(handlers::profile::remove_experience),
        )
        .route(
            "/profile/completion",
            routing::get(handlers::profile::get_completion),
        )
        .route(
            "/profile/complete",
            routing::post(handlers::profile::mark_completed),
        )
        // Notification preferences
        .route(
            "/notification-preferences",
            routing::get(handlers::notification_preference::get_preferences),
        )
        .route(
            "/notification-preferences/initialize",
            routing::post(handlers::notification_preference::initialize_defaults),
        )
        .route(
            "/notification-preferences/events/{event}",
            routing::put(handlers::notification_preference::update_event),
        )
        .route(
            "/notification-preferences/events/{event}/toggle",
            routing::post(handlers::notification_preference::toggle_channel),
        )
        .route(
            "/notification-preferences/categories/{category}",
            routing::put(handlers::notification_preference::update_category),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let Some(governor_conf) = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
    else {
        tracing::warn!(?rule, "Invalid rate limit rule, serving without rate limiting");
        return router;
    };

    router.layer(GovernorLayer::new(governor_conf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Extension,
    };
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    /// Router with a disconnected database: any storage access would fail
    /// with a 500, so a 401 proves the request was rejected beforehand.
    fn app() -> Router {
        create_routes_with(RateLimitConfig::disabled())
            .layer(Extension(DatabaseConnection::Disconnected))
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn resolver_without_identity_is_unauthorized() {
        let (status, body) = send(
            Request::get("/api/v1/notification-preferences")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn mutator_without_identity_is_unauthorized() {
        let (status, body) = send(
            Request::put("/api/v1/notification-preferences/categories/jobs")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"none_enabled":false,"in_app_enabled":true,"email_enabled":true}"#,
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn malformed_bearer_is_unauthorized() {
        let (status, body) = send(
            Request::put("/api/v1/notification-preferences/events/weekly_digest")
                .header("authorization", "Basic Zm9vOmJhcg==")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
    }
}
