use crate::{
    error::{AppError, AppResult},
    models::{user, AccountType, User, UserModel},
    services::{notification_preference::NotificationPreferenceService, profile::ProfileService},
    utils::{encode_access_token, hash_password, verify_password},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new account with an empty profile and default
    /// notification preferences. Returns (user_model, access_token).
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        account_type: AccountType,
    ) -> AppResult<(UserModel, String)> {
        let email = normalize_email(email);
        if self.email_exists(&email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let txn = self.db.begin().await?;
        let new_user = user::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            account_type: Set(account_type.as_str().to_string()),
            role: Set("user".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let user = new_user.insert(&txn).await?;
        ProfileService::create_empty(&txn, user.id).await?;
        txn.commit().await?;

        // The resolver falls back to catalog defaults, so this is non-fatal.
        let preferences = NotificationPreferenceService::from_db(self.db.clone());
        if let Err(e) = preferences.initialize_defaults(user.id).await {
            tracing::warn!(user_id = user.id, "Failed to initialize notification preferences: {e}");
        }

        let token = encode_access_token(&user.id.to_string())?;
        tracing::info!(user_id = user.id, account_type = account_type.as_str(), "User registered");
        Ok((user, token))
    }

    /// Returns (user_model, access_token).
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }
        if user.role == "banned" {
            return Err(AppError::Forbidden);
        }

        let token = encode_access_token(&user.id.to_string())?;
        Ok((user, token))
    }

    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
