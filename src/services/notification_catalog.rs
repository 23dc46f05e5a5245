use crate::{
    error::AppResult,
    models::{notification_event, ChannelSettings, NotificationCategory, NotificationEvent},
};
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait,
    TransactionTrait,
};

/// A catalog entry as the resolver and mutator see it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub event: String,
    pub category: NotificationCategory,
    pub defaults: ChannelSettings,
    pub event_description: String,
    pub category_description: String,
    pub display_order: i32,
}

impl CatalogEntry {
    /// Convert a stored row. Rows with an unknown category are skipped.
    pub fn from_model(model: notification_event::Model) -> Option<Self> {
        let category = match model.category.parse::<NotificationCategory>() {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping catalog event '{}': {}", model.event, e);
                return None;
            }
        };

        Some(Self {
            event: model.event,
            category,
            defaults: ChannelSettings::new(
                model.none_enabled,
                model.in_app_enabled,
                model.email_enabled,
            ),
            event_description: model.event_description,
            category_description: model.category_description,
            display_order: model.display_order,
        })
    }
}

struct SeedEvent {
    event: &'static str,
    category: NotificationCategory,
    defaults: ChannelSettings,
    description: &'static str,
}

const IN_APP_ONLY: ChannelSettings = ChannelSettings::new(false, true, false);
const EMAIL_ONLY: ChannelSettings = ChannelSettings::new(false, false, true);
const BOTH: ChannelSettings = ChannelSettings::new(false, true, true);
const OFF: ChannelSettings = ChannelSettings::new(true, false, false);

const SEED_EVENTS: &[SeedEvent] = &[
    SeedEvent {
        event: "account_security",
        category: NotificationCategory::Alerts,
        defaults: BOTH,
        description: "Security alerts such as new sign-ins and password changes",
    },
    SeedEvent {
        event: "direct_messages",
        category: NotificationCategory::Alerts,
        defaults: BOTH,
        description: "New direct messages from other members",
    },
    SeedEvent {
        event: "profile_views",
        category: NotificationCategory::Alerts,
        defaults: IN_APP_ONLY,
        description: "Someone viewed your profile",
    },
    SeedEvent {
        event: "job_recommendations",
        category: NotificationCategory::Jobs,
        defaults: BOTH,
        description: "New jobs matching your preferences",
    },
    SeedEvent {
        event: "application_updates",
        category: NotificationCategory::Jobs,
        defaults: BOTH,
        description: "Status changes on your job applications",
    },
    SeedEvent {
        event: "new_applicants",
        category: NotificationCategory::Jobs,
        defaults: BOTH,
        description: "New applications for jobs you have posted",
    },
    SeedEvent {
        event: "saved_job_reminders",
        category: NotificationCategory::Jobs,
        defaults: IN_APP_ONLY,
        description: "Reminders before a saved job closes",
    },
    SeedEvent {
        event: "new_articles",
        category: NotificationCategory::Articles,
        defaults: IN_APP_ONLY,
        description: "New articles from contributors you follow",
    },
    SeedEvent {
        event: "article_comments",
        category: NotificationCategory::Articles,
        defaults: IN_APP_ONLY,
        description: "Replies to your articles and comments",
    },
    SeedEvent {
        event: "weekly_digest",
        category: NotificationCategory::News,
        defaults: EMAIL_ONLY,
        description: "A weekly summary of jobs and articles",
    },
    SeedEvent {
        event: "product_updates",
        category: NotificationCategory::News,
        defaults: OFF,
        description: "Platform news and feature announcements",
    },
];

fn category_description(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::Alerts => "Important activity on your account",
        NotificationCategory::Jobs => "Jobs you posted, saved or applied to",
        NotificationCategory::Articles => "Articles and discussions you take part in",
        NotificationCategory::News => "News and announcements from the platform",
    }
}

/// The built-in catalog, with display order following declaration order.
pub fn default_catalog() -> Vec<CatalogEntry> {
    SEED_EVENTS
        .iter()
        .zip(1..)
        .map(|(seed, order)| CatalogEntry {
            event: seed.event.to_string(),
            category: seed.category,
            defaults: seed.defaults,
            event_description: seed.description.to_string(),
            category_description: category_description(seed.category).to_string(),
            display_order: order,
        })
        .collect()
}

/// Insert the built-in catalog. Does nothing once any catalog row exists;
/// events already present are skipped, so concurrent seeds both succeed.
/// Returns the number of events inserted.
pub async fn seed_catalog(db: &DatabaseConnection) -> AppResult<u64> {
    let existing = NotificationEvent::find().count(db).await?;
    if existing > 0 {
        tracing::debug!("Notification catalog already seeded ({} events)", existing);
        return Ok(0);
    }

    let now = chrono::Utc::now().naive_utc();
    let entries = default_catalog();
    let count = entries.len() as u64;
    let models = entries.into_iter().map(|e| notification_event::ActiveModel {
        event: Set(e.event),
        category: Set(e.category.as_str().to_string()),
        none_enabled: Set(e.defaults.none_enabled),
        in_app_enabled: Set(e.defaults.in_app_enabled),
        email_enabled: Set(e.defaults.email_enabled),
        event_description: Set(e.event_description),
        category_description: Set(e.category_description),
        display_order: Set(e.display_order),
        created_at: Set(now),
        ..Default::default()
    });

    let txn = db.begin().await?;
    let inserted = NotificationEvent::insert_many(models)
        .on_conflict(
            OnConflict::column(notification_event::Column::Event)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
    txn.commit().await?;

    tracing::info!(
        "Seeded notification catalog with {} of {} events",
        inserted,
        count
    );
    Ok(inserted)
}
