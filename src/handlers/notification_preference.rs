use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{Channel, ChannelSettings, NotificationCategory};
use crate::response::ApiResponse;
use crate::services::notification_preference::{
    CategoryPreferences, NotificationPreferenceService, ResolvedPreference,
};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub category: NotificationCategory,
    pub none_enabled: bool,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
}

impl UpdateEventRequest {
    fn settings(&self) -> ChannelSettings {
        ChannelSettings::new(self.none_enabled, self.in_app_enabled, self.email_enabled)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleChannelRequest {
    pub channel: Channel,
    pub checked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub category: NotificationCategory,
    pub updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitializeResponse {
    pub created: u64,
}

fn parse_category(raw: &str) -> AppResult<NotificationCategory> {
    raw.parse().map_err(AppError::Validation)
}

#[utoipa::path(
    get,
    path = "/api/v1/notification-preferences",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Effective preferences grouped by category", body = Vec<CategoryPreferences>),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 500, description = "Failed to load preferences", body = AppError),
    ),
    tag = "notification-preferences"
)]
pub async fn get_preferences(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = NotificationPreferenceService::from_db(db);
    let categories = service.resolve(auth_user.user_id).await?;
    Ok(ApiResponse::ok(categories))
}

#[utoipa::path(
    put,
    path = "/api/v1/notification-preferences/events/{event}",
    security(("jwt_token" = [])),
    params(("event" = String, Path, description = "Catalog event key")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Preference updated", body = ResolvedPreference),
        (status = 400, description = "Unknown event or category mismatch", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 500, description = "Failed to update preference", body = AppError),
    ),
    tag = "notification-preferences"
)]
pub async fn update_event(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(event): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> AppResult<impl IntoResponse> {
    let service = NotificationPreferenceService::from_db(db);
    let resolved = service
        .update_event(auth_user.user_id, payload.category, &event, payload.settings())
        .await?;
    Ok(ApiResponse::with_message(resolved, "Notification preference updated"))
}

#[utoipa::path(
    put,
    path = "/api/v1/notification-preferences/categories/{category}",
    security(("jwt_token" = [])),
    params(("category" = String, Path, description = "alerts, jobs, articles or news")),
    request_body = ChannelSettings,
    responses(
        (status = 200, description = "Every event in the category updated", body = BulkUpdateResponse),
        (status = 400, description = "Unknown category", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 500, description = "Failed to update preferences", body = AppError),
    ),
    tag = "notification-preferences"
)]
pub async fn update_category(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(category): Path<String>,
    Json(settings): Json<ChannelSettings>,
) -> AppResult<impl IntoResponse> {
    let category = parse_category(&category)?;
    let service = NotificationPreferenceService::from_db(db);
    let updated = service
        .update_category(auth_user.user_id, category, settings)
        .await?;
    Ok(ApiResponse::with_message(
        BulkUpdateResponse { category, updated },
        format!("{} notification preferences updated", category.title()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/notification-preferences/events/{event}/toggle",
    security(("jwt_token" = [])),
    params(("event" = String, Path, description = "Catalog event key")),
    request_body = ToggleChannelRequest,
    responses(
        (status = 200, description = "Checkbox change applied", body = ResolvedPreference),
        (status = 400, description = "Unknown event", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notification-preferences"
)]
pub async fn toggle_channel(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(event): Path<String>,
    Json(payload): Json<ToggleChannelRequest>,
) -> AppResult<impl IntoResponse> {
    let service = NotificationPreferenceService::from_db(db);
    let resolved = service
        .toggle_channel(auth_user.user_id, &event, payload.channel, payload.checked)
        .await?;
    Ok(ApiResponse::ok(resolved))
}

#[utoipa::path(
    post,
    path = "/api/v1/notification-preferences/initialize",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Missing defaults materialized", body = InitializeResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "notification-preferences"
)]
pub async fn initialize_defaults(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = NotificationPreferenceService::from_db(db);
    let created = service.initialize_defaults(auth_user.user_id).await?;
    Ok(ApiResponse::ok(InitializeResponse { created }))
}
