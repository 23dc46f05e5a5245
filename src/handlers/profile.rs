use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{ProfileModel, WorkExperienceModel};
use crate::response::ApiResponse;
use crate::services::profile::{CompletionStatus, NewWorkExperience, ProfilePatch, ProfileService};
use crate::services::profile_completion::string_list;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub cv: Option<String>,
    pub recruiter_experience: Option<String>,
    pub company_name: Option<String>,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_email: Option<String>,
    pub company_logo: Option<String>,
    pub skills: Vec<String>,
    pub job_preferences: Vec<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub updated_at: String,
}

impl From<ProfileModel> for ProfileResponse {
    fn from(p: ProfileModel) -> Self {
        Self {
            user_id: p.user_id,
            skills: string_list(&p.skills),
            job_preferences: string_list(&p.job_preferences),
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            location: p.location,
            bio: p.bio,
            profile_picture: p.profile_picture,
            cv: p.cv,
            recruiter_experience: p.recruiter_experience,
            company_name: p.company_name,
            company_description: p.company_description,
            company_website: p.company_website,
            company_email: p.company_email,
            company_logo: p.company_logo,
            completed: p.completed,
            completed_at: p.completed_at.map(|t| t.to_string()),
            updated_at: p.updated_at.to_string(),
        }
    }
}

/// Partial update; omitted fields are left as they are, empty strings clear.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(length(max = 500))]
    pub profile_picture: Option<String>,
    #[validate(length(max = 500))]
    pub cv: Option<String>,
    #[validate(length(max = 50))]
    pub recruiter_experience: Option<String>,
    #[validate(length(max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 5000))]
    pub company_description: Option<String>,
    #[validate(length(max = 500))]
    pub company_website: Option<String>,
    #[validate(length(max = 255))]
    pub company_email: Option<String>,
    #[validate(length(max = 500))]
    pub company_logo: Option<String>,
    #[validate(length(max = 50))]
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 20))]
    pub job_preferences: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            location: r.location,
            bio: r.bio,
            profile_picture: r.profile_picture,
            cv: r.cv,
            recruiter_experience: r.recruiter_experience,
            company_name: r.company_name,
            company_description: r.company_description,
            company_website: r.company_website,
            company_email: r.company_email,
            company_logo: r.company_logo,
            skills: r.skills,
            job_preferences: r.job_preferences,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExperienceRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub company: String,
    /// ISO date, e.g. 2021-03-01
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExperienceResponse {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl From<WorkExperienceModel> for ExperienceResponse {
    fn from(w: WorkExperienceModel) -> Self {
        Self {
            id: w.id,
            title: w.title,
            company: w.company,
            start_date: w.start_date.map(|d| d.to_string()),
            end_date: w.end_date.map(|d| d.to_string()),
            description: w.description,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn get_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = ProfileService::new(db);
    let profile = service.get(auth_user.user_id).await?;
    Ok(ApiResponse::ok(ProfileResponse::from(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    security(("jwt_token" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ProfileService::new(db);
    let profile = service
        .update(auth_user.user_id, ProfilePatch::from(payload))
        .await?;
    Ok(ApiResponse::ok(ProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/experiences",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Work experience records", body = Vec<ExperienceResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn list_experiences(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = ProfileService::new(db);
    let items: Vec<ExperienceResponse> = service
        .list_experiences(auth_user.user_id)
        .await?
        .into_iter()
        .map(ExperienceResponse::from)
        .collect();
    Ok(ApiResponse::ok(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/experiences",
    security(("jwt_token" = [])),
    request_body = CreateExperienceRequest,
    responses(
        (status = 200, description = "Work experience added", body = ExperienceResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn add_experience(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateExperienceRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ProfileService::new(db);
    let created = service
        .add_experience(
            auth_user.user_id,
            NewWorkExperience {
                title: payload.title,
                company: payload.company,
                start_date: payload.start_date,
                end_date: payload.end_date,
                description: payload.description,
            },
        )
        .await?;
    Ok(ApiResponse::ok(ExperienceResponse::from(created)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile/experiences/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Work experience ID")),
    responses(
        (status = 200, description = "Work experience removed", body = String),
        (status = 403, description = "Not the owner", body = AppError),
        (status = 404, description = "Not found", body = AppError),
    ),
    tag = "profile"
)]
pub async fn remove_experience(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ProfileService::new(db);
    service.remove_experience(auth_user.user_id, id).await?;
    Ok(ApiResponse::ok("Work experience removed"))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/completion",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Completion gate state", body = CompletionStatus),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn get_completion(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = ProfileService::new(db);
    let status = service.completion(auth_user.user_id).await?;
    Ok(ApiResponse::ok(status))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/complete",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Profile marked as completed", body = ProfileResponse),
        (status = 400, description = "Required fields missing", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "profile"
)]
pub async fn mark_completed(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = ProfileService::new(db);
    let profile = service.mark_completed(auth_user.user_id).await?;
    Ok(ApiResponse::with_message(
        ProfileResponse::from(profile),
        "Profile completed",
    ))
}
