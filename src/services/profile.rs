use crate::{
    error::{AppError, AppResult},
    models::{
        profile, work_experience, AccountType, Profile, ProfileModel, User, WorkExperience,
        WorkExperienceModel,
    },
    services::profile_completion::{can_proceed, missing_fields, CompletionInput},
};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Partial profile update. `None` leaves a field unchanged; an empty string
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
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
    pub skills: Option<Vec<String>>,
    pub job_preferences: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewWorkExperience {
    pub title: String,
    pub company: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletionStatus {
    pub account_type: AccountType,
    pub can_proceed: bool,
    pub missing_fields: Vec<String>,
    pub completed: bool,
}

pub struct ProfileService {
    db: DatabaseConnection,
}

impl ProfileService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert an empty profile for a freshly registered user.
    pub async fn create_empty<C: ConnectionTrait>(db: &C, user_id: i32) -> AppResult<ProfileModel> {
        Ok(empty_profile(user_id).insert(db).await?)
    }

    /// Fetch the caller's profile, creating an empty one if registration
    /// never did. Concurrent first reads converge on the same row.
    pub async fn get(&self, user_id: i32) -> AppResult<ProfileModel> {
        if let Some(existing) = self.find(user_id).await? {
            return Ok(existing);
        }

        Profile::insert(empty_profile(user_id))
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.find(user_id).await?.ok_or(AppError::NotFound)
    }

    async fn find(&self, user_id: i32) -> AppResult<Option<ProfileModel>> {
        Ok(Profile::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn update(&self, user_id: i32, patch: ProfilePatch) -> AppResult<ProfileModel> {
        let existing = self.get(user_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: profile::ActiveModel = existing.into();
        set_text(&mut active.first_name, patch.first_name);
        set_text(&mut active.last_name, patch.last_name);
        set_text(&mut active.email, patch.email);
        set_text(&mut active.phone, patch.phone);
        set_text(&mut active.location, patch.location);
        set_text(&mut active.bio, patch.bio);
        set_text(&mut active.profile_picture, patch.profile_picture);
        set_text(&mut active.cv, patch.cv);
        set_text(&mut active.recruiter_experience, patch.recruiter_experience);
        set_text(&mut active.company_name, patch.company_name);
        set_text(&mut active.company_description, patch.company_description);
        set_text(&mut active.company_website, patch.company_website);
        set_text(&mut active.company_email, patch.company_email);
        set_text(&mut active.company_logo, patch.company_logo);
        if let Some(skills) = patch.skills {
            active.skills = Set(serde_json::json!(skills));
        }
        if let Some(prefs) = patch.job_preferences {
            active.job_preferences = Set(serde_json::json!(prefs));
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    pub async fn list_experiences(&self, user_id: i32) -> AppResult<Vec<WorkExperienceModel>> {
        let items = WorkExperience::find()
            .filter(work_experience::Column::UserId.eq(user_id))
            .order_by_desc(work_experience::Column::StartDate)
            .order_by_desc(work_experience::Column::Id)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    pub async fn add_experience(
        &self,
        user_id: i32,
        input: NewWorkExperience,
    ) -> AppResult<WorkExperienceModel> {
        if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }

        let model = work_experience::ActiveModel {
            user_id: Set(user_id),
            title: Set(input.title),
            company: Set(input.company),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            description: Set(input.description),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn remove_experience(&self, user_id: i32, id: i32) -> AppResult<()> {
        let existing = WorkExperience::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if existing.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        WorkExperience::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Evaluate the completion gate against the current stored state.
    pub async fn completion(&self, user_id: i32) -> AppResult<CompletionStatus> {
        let account_type = self.account_type(user_id).await?;
        let profile = self.get(user_id).await?;
        let experience_count = WorkExperience::find()
            .filter(work_experience::Column::UserId.eq(user_id))
            .count(&self.db)
            .await? as usize;

        let input = CompletionInput::from_profile(&profile, experience_count);
        Ok(CompletionStatus {
            account_type,
            can_proceed: can_proceed(account_type, &input),
            missing_fields: missing_fields(account_type, &input)
                .into_iter()
                .map(str::to_string)
                .collect(),
            completed: profile.completed,
        })
    }

    /// Set the one-way "completed" milestone. Refused while the gate is
    /// closed; a no-op once set. Never cleared afterwards.
    pub async fn mark_completed(&self, user_id: i32) -> AppResult<ProfileModel> {
        let profile = self.get(user_id).await?;
        if profile.completed {
            return Ok(profile);
        }

        let status = self.completion(user_id).await?;
        if !status.can_proceed {
            return Err(AppError::Validation(format!(
                "Profile incomplete, missing: {}",
                status.missing_fields.join(", ")
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let mut active: profile::ActiveModel = profile.into();
        active.completed = Set(true);
        active.completed_at = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&self.db).await?;

        tracing::info!(user_id, "Profile marked as completed");
        Ok(updated)
    }

    async fn account_type(&self, user_id: i32) -> AppResult<AccountType> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        user.account_type
            .parse::<AccountType>()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
    }
}

fn empty_profile(user_id: i32) -> profile::ActiveModel {
    let now = chrono::Utc::now().naive_utc();
    profile::ActiveModel {
        user_id: Set(user_id),
        skills: Set(serde_json::json!([])),
        job_preferences: Set(serde_json::json!([])),
        completed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

fn set_text(field: &mut sea_orm::ActiveValue<Option<String>>, value: Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        *field = Set(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        });
    }
}
