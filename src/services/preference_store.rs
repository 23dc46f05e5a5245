use crate::{
    error::AppResult,
    models::{
        notification_event, user_notification_preference, ChannelSettings, NotificationCategory,
        NotificationEvent, UserNotificationPreference,
    },
    services::notification_catalog::CatalogEntry,
};
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

/// A stored override. `None` flags fall back to the catalog default.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceOverride {
    pub event: String,
    pub none_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
}

impl PreferenceOverride {
    pub fn full(event: impl Into<String>, settings: ChannelSettings) -> Self {
        Self {
            event: event.into(),
            none_enabled: Some(settings.none_enabled),
            in_app_enabled: Some(settings.in_app_enabled),
            email_enabled: Some(settings.email_enabled),
        }
    }

    /// Overlay the stored flags on `defaults`, flag by flag.
    pub fn apply_to(&self, defaults: ChannelSettings) -> ChannelSettings {
        ChannelSettings {
            none_enabled: self.none_enabled.unwrap_or(defaults.none_enabled),
            in_app_enabled: self.in_app_enabled.unwrap_or(defaults.in_app_enabled),
            email_enabled: self.email_enabled.unwrap_or(defaults.email_enabled),
        }
    }
}

impl From<user_notification_preference::Model> for PreferenceOverride {
    fn from(m: user_notification_preference::Model) -> Self {
        Self {
            event: m.event,
            none_enabled: m.none_enabled,
            in_app_enabled: m.in_app_enabled,
            email_enabled: m.email_enabled,
        }
    }
}

/// One row to write into the override store.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideWrite {
    pub category: NotificationCategory,
    pub event: String,
    pub settings: ChannelSettings,
}

/// Storage seam for the preference resolver and mutator.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Every catalog entry, ordered by `display_order`.
    async fn catalog(&self) -> AppResult<Vec<CatalogEntry>>;

    async fn overrides_for(&self, user_id: i32) -> AppResult<Vec<PreferenceOverride>>;

    /// Insert or replace the override keyed on `(user_id, event)`.
    async fn upsert(&self, user_id: i32, row: OverrideWrite) -> AppResult<()>;

    /// Upsert every row atomically. Returns the number of rows written.
    async fn upsert_many(&self, user_id: i32, rows: Vec<OverrideWrite>) -> AppResult<u64>;

    /// Insert rows that have no override yet; existing overrides are kept.
    async fn insert_missing(&self, user_id: i32, rows: Vec<OverrideWrite>) -> AppResult<u64>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct DbPreferenceStore {
    db: DatabaseConnection,
}

impl DbPreferenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn active_models(
        user_id: i32,
        rows: Vec<OverrideWrite>,
    ) -> Vec<user_notification_preference::ActiveModel> {
        let now = chrono::Utc::now().naive_utc();
        rows.into_iter()
            .map(|row| user_notification_preference::ActiveModel {
                user_id: Set(user_id),
                category: Set(row.category.as_str().to_string()),
                event: Set(row.event),
                none_enabled: Set(Some(row.settings.none_enabled)),
                in_app_enabled: Set(Some(row.settings.in_app_enabled)),
                email_enabled: Set(Some(row.settings.email_enabled)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .collect()
    }

    fn conflict_target() -> OnConflict {
        OnConflict::columns([
            user_notification_preference::Column::UserId,
            user_notification_preference::Column::Event,
        ])
    }

    fn on_conflict_update() -> OnConflict {
        Self::conflict_target()
            .update_columns([
                user_notification_preference::Column::Category,
                user_notification_preference::Column::NoneEnabled,
                user_notification_preference::Column::InAppEnabled,
                user_notification_preference::Column::EmailEnabled,
                user_notification_preference::Column::UpdatedAt,
            ])
            .to_owned()
    }
}

#[async_trait]
impl PreferenceStore for DbPreferenceStore {
    async fn catalog(&self) -> AppResult<Vec<CatalogEntry>> {
        let rows = NotificationEvent::find()
            .order_by_asc(notification_event::Column::DisplayOrder)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().filter_map(CatalogEntry::from_model).collect())
    }

    async fn overrides_for(&self, user_id: i32) -> AppResult<Vec<PreferenceOverride>> {
        let rows = UserNotificationPreference::find()
            .filter(user_notification_preference::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(PreferenceOverride::from).collect())
    }

    async fn upsert(&self, user_id: i32, row: OverrideWrite) -> AppResult<()> {
        UserNotificationPreference::insert_many(Self::active_models(user_id, vec![row]))
            .on_conflict(Self::on_conflict_update())
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn upsert_many(&self, user_id: i32, rows: Vec<OverrideWrite>) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        // One statement in one transaction: all rows land or none do.
        let txn = self.db.begin().await?;
        let written = UserNotificationPreference::insert_many(Self::active_models(user_id, rows))
            .on_conflict(Self::on_conflict_update())
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;
        Ok(written)
    }

    async fn insert_missing(&self, user_id: i32, rows: Vec<OverrideWrite>) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let inserted = UserNotificationPreference::insert_many(Self::active_models(user_id, rows))
            .on_conflict(Self::conflict_target().do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;
        Ok(inserted)
    }
}
