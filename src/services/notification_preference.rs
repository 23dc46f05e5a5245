use crate::{
    error::{AppError, AppResult},
    models::{Channel, ChannelSettings, NotificationCategory},
    services::{
        notification_catalog::CatalogEntry,
        preference_store::{DbPreferenceStore, OverrideWrite, PreferenceOverride, PreferenceStore},
    },
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Effective setting of one event for one user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedPreference {
    pub event: String,
    pub category: NotificationCategory,
    pub none_enabled: bool,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
    pub event_description: String,
    pub category_description: String,
    pub display_order: i32,
}

impl ResolvedPreference {
    pub fn settings(&self) -> ChannelSettings {
        ChannelSettings::new(self.none_enabled, self.in_app_enabled, self.email_enabled)
    }

    fn from_catalog(entry: &CatalogEntry, settings: ChannelSettings) -> Self {
        Self {
            event: entry.event.clone(),
            category: entry.category,
            none_enabled: settings.none_enabled,
            in_app_enabled: settings.in_app_enabled,
            email_enabled: settings.email_enabled,
            event_description: entry.event_description.clone(),
            category_description: entry.category_description.clone(),
            display_order: entry.display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryPreferences {
    pub category: NotificationCategory,
    pub title: String,
    pub description: String,
    pub settings: Vec<ResolvedPreference>,
}

/// Merge overrides onto the catalog and group the result by category.
///
/// Categories always come back in [`NotificationCategory::ALL`] order, empty
/// ones included. Within a category settings are sorted by `display_order`.
/// Descriptions and ordering always come from the catalog.
pub fn resolve_preferences(
    catalog: &[CatalogEntry],
    overrides: &[PreferenceOverride],
) -> Vec<CategoryPreferences> {
    let by_event: HashMap<&str, &PreferenceOverride> =
        overrides.iter().map(|o| (o.event.as_str(), o)).collect();

    let mut entries: Vec<&CatalogEntry> = catalog.iter().collect();
    entries.sort_by_key(|e| e.display_order);

    let resolved: Vec<ResolvedPreference> = entries
        .into_iter()
        .map(|entry| {
            let settings = match by_event.get(entry.event.as_str()) {
                Some(o) => o.apply_to(entry.defaults),
                None => entry.defaults,
            };
            ResolvedPreference::from_catalog(entry, settings)
        })
        .collect();

    NotificationCategory::ALL
        .iter()
        .map(|category| {
            let settings: Vec<ResolvedPreference> = resolved
                .iter()
                .filter(|r| r.category == *category)
                .cloned()
                .collect();
            let description = settings
                .first()
                .map(|r| r.category_description.clone())
                .unwrap_or_default();
            CategoryPreferences {
                category: *category,
                title: category.title().to_string(),
                description,
                settings,
            }
        })
        .collect()
}

/// Resolver and mutator over an injected [`PreferenceStore`].
pub struct NotificationPreferenceService<S = DbPreferenceStore> {
    store: S,
}

impl NotificationPreferenceService<DbPreferenceStore> {
    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(DbPreferenceStore::new(db))
    }
}

impl<S: PreferenceStore> NotificationPreferenceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Effective preferences for `user_id`, grouped by category.
    pub async fn resolve(&self, user_id: i32) -> AppResult<Vec<CategoryPreferences>> {
        let catalog = self.store.catalog().await.map_err(AppError::fetch_failed)?;
        let overrides = self
            .store
            .overrides_for(user_id)
            .await
            .map_err(AppError::fetch_failed)?;
        Ok(resolve_preferences(&catalog, &overrides))
    }

    /// Replace the three flags of one event. The combination is stored as
    /// given; only the event and its category are checked.
    pub async fn update_event(
        &self,
        user_id: i32,
        category: NotificationCategory,
        event: &str,
        settings: ChannelSettings,
    ) -> AppResult<ResolvedPreference> {
        let entry = self.find_entry(event).await?;
        if entry.category != category {
            return Err(AppError::Validation(format!(
                "Event '{}' belongs to category '{}', not '{}'",
                event, entry.category, category
            )));
        }

        self.store
            .upsert(
                user_id,
                OverrideWrite {
                    category,
                    event: entry.event.clone(),
                    settings,
                },
            )
            .await
            .map_err(AppError::update_failed)?;

        tracing::debug!(user_id, event, ?settings, "Notification preference updated");
        Ok(ResolvedPreference::from_catalog(&entry, settings))
    }

    /// Apply `settings` to every catalog event of `category` in one atomic
    /// write. Returns the number of events written.
    pub async fn update_category(
        &self,
        user_id: i32,
        category: NotificationCategory,
        settings: ChannelSettings,
    ) -> AppResult<u64> {
        let catalog = self.store.catalog().await.map_err(AppError::update_failed)?;
        let rows: Vec<OverrideWrite> = catalog
            .into_iter()
            .filter(|e| e.category == category)
            .map(|e| OverrideWrite {
                category,
                event: e.event,
                settings,
            })
            .collect();

        let written = self
            .store
            .upsert_many(user_id, rows)
            .await
            .map_err(AppError::update_failed)?;

        tracing::debug!(user_id, %category, written, ?settings, "Category preferences updated");
        Ok(written)
    }

    /// Apply one checkbox change to the current effective setting of `event`.
    pub async fn toggle_channel(
        &self,
        user_id: i32,
        event: &str,
        channel: Channel,
        checked: bool,
    ) -> AppResult<ResolvedPreference> {
        let entry = self.find_entry(event).await?;
        let overrides = self
            .store
            .overrides_for(user_id)
            .await
            .map_err(AppError::update_failed)?;
        let current = overrides
            .iter()
            .find(|o| o.event == entry.event)
            .map(|o| o.apply_to(entry.defaults))
            .unwrap_or(entry.defaults);

        let next = current.toggle(channel, checked);
        self.update_event(user_id, entry.category, &entry.event, next)
            .await
    }

    /// Copy catalog defaults into override rows the user does not have yet.
    pub async fn initialize_defaults(&self, user_id: i32) -> AppResult<u64> {
        let catalog = self.store.catalog().await.map_err(AppError::update_failed)?;
        let rows = catalog
            .into_iter()
            .map(|e| OverrideWrite {
                category: e.category,
                event: e.event,
                settings: e.defaults,
            })
            .collect();

        let inserted = self
            .store
            .insert_missing(user_id, rows)
            .await
            .map_err(AppError::update_failed)?;
        tracing::debug!(user_id, inserted, "Default notification preferences materialized");
        Ok(inserted)
    }

    async fn find_entry(&self, event: &str) -> AppResult<CatalogEntry> {
        let catalog = self.store.catalog().await.map_err(AppError::update_failed)?;
        catalog
            .into_iter()
            .find(|e| e.event == event)
            .ok_or_else(|| AppError::Validation(format!("Unknown notification event '{}'", event)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_catalog::default_catalog;
    use crate::services::preference_store::memory::MemoryPreferenceStore;

    fn entry(event: &str, category: NotificationCategory, order: i32) -> CatalogEntry {
        CatalogEntry {
            event: event.to_string(),
            category,
            defaults: ChannelSettings::new(false, true, false),
            event_description: format!("{} description", event),
            category_description: format!("{} category", category),
            display_order: order,
        }
    }

    fn service() -> NotificationPreferenceService<MemoryPreferenceStore> {
        NotificationPreferenceService::new(MemoryPreferenceStore::with_catalog(default_catalog()))
    }

    #[test]
    fn zero_overrides_resolve_to_defaults() {
        let catalog = default_catalog();
        let groups = resolve_preferences(&catalog, &[]);

        for resolved in groups.iter().flat_map(|g| g.settings.iter()) {
            let entry = catalog.iter().find(|e| e.event == resolved.event).unwrap();
            assert_eq!(resolved.settings(), entry.defaults);
        }
        let total: usize = groups.iter().map(|g| g.settings.len()).sum();
        assert_eq!(total, catalog.len());
    }

    #[test]
    fn override_wins_verbatim() {
        let catalog = default_catalog();
        let odd = ChannelSettings::new(true, true, true);
        let overrides = vec![PreferenceOverride::full("weekly_digest", odd)];

        let groups = resolve_preferences(&catalog, &overrides);
        let digest = groups
            .iter()
            .flat_map(|g| g.settings.iter())
            .find(|r| r.event == "weekly_digest")
            .unwrap();
        assert_eq!(digest.settings(), odd);
    }

    #[test]
    fn categories_keep_fixed_order_regardless_of_insertion() {
        let catalog = vec![
            entry("n1", NotificationCategory::News, 4),
            entry("j1", NotificationCategory::Jobs, 2),
            entry("a1", NotificationCategory::Alerts, 1),
        ];
        let groups = resolve_preferences(&catalog, &[]);

        let order: Vec<NotificationCategory> = groups.iter().map(|g| g.category).collect();
        assert_eq!(order, NotificationCategory::ALL.to_vec());

        let articles = &groups[2];
        assert_eq!(articles.title, "Articles");
        assert!(articles.settings.is_empty());
        assert_eq!(articles.description, "");
    }

    #[test]
    fn settings_sorted_by_display_order() {
        let catalog = vec![
            entry("j3", NotificationCategory::Jobs, 30),
            entry("j1", NotificationCategory::Jobs, 10),
            entry("j2", NotificationCategory::Jobs, 20),
        ];
        let groups = resolve_preferences(&catalog, &[]);
        let jobs: Vec<&str> = groups[1].settings.iter().map(|r| r.event.as_str()).collect();
        assert_eq!(jobs, vec!["j1", "j2", "j3"]);
        assert_eq!(groups[1].description, "jobs category");
    }

    #[test]
    fn catalog_fields_are_not_overridable() {
        let catalog = vec![entry("a1", NotificationCategory::Alerts, 7)];
        let overrides = vec![PreferenceOverride::full("a1", ChannelSettings::all_off())];
        let groups = resolve_preferences(&catalog, &overrides);
        let a1 = &groups[0].settings[0];
        assert_eq!(a1.event_description, "a1 description");
        assert_eq!(a1.display_order, 7);
        assert_eq!(a1.category, NotificationCategory::Alerts);
    }

    #[tokio::test]
    async fn identical_updates_keep_one_row() {
        let svc = service();
        let flags = ChannelSettings::new(false, false, true);

        svc.update_event(1, NotificationCategory::Jobs, "new_applicants", flags)
            .await
            .unwrap();
        svc.update_event(1, NotificationCategory::Jobs, "new_applicants", flags)
            .await
            .unwrap();

        let rows = svc.store.rows_for(1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, PreferenceOverride::full("new_applicants", flags));
    }

    #[tokio::test]
    async fn second_update_replaces_flags_in_place() {
        let svc = service();
        svc.update_event(1, NotificationCategory::Alerts, "profile_views", ChannelSettings::all_on())
            .await
            .unwrap();
        let echoed = svc
            .update_event(1, NotificationCategory::Alerts, "profile_views", ChannelSettings::all_off())
            .await
            .unwrap();

        assert_eq!(echoed.settings(), ChannelSettings::all_off());
        let rows = svc.store.rows_for(1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].writes, 2);
        assert_eq!(rows[0].value.none_enabled, Some(true));
    }

    #[tokio::test]
    async fn inconsistent_combination_is_stored_as_given() {
        let svc = service();
        let all_three = ChannelSettings::new(true, true, true);
        svc.update_event(2, NotificationCategory::News, "weekly_digest", all_three)
            .await
            .unwrap();

        let groups = svc.resolve(2).await.unwrap();
        let digest = groups[3]
            .settings
            .iter()
            .find(|r| r.event == "weekly_digest")
            .unwrap();
        assert_eq!(digest.settings(), all_three);
    }

    #[tokio::test]
    async fn update_rejects_unknown_event_and_wrong_category() {
        let svc = service();
        let err = svc
            .update_event(1, NotificationCategory::Jobs, "nope", ChannelSettings::all_on())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = svc
            .update_event(1, NotificationCategory::News, "new_applicants", ChannelSettings::all_on())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.store.rows_for(1).is_empty());
    }

    #[tokio::test]
    async fn bulk_update_covers_every_event_in_category() {
        let svc = service();
        let flags = ChannelSettings::new(false, true, true);
        let written = svc
            .update_category(3, NotificationCategory::Jobs, flags)
            .await
            .unwrap();

        let jobs: Vec<String> = default_catalog()
            .into_iter()
            .filter(|e| e.category == NotificationCategory::Jobs)
            .map(|e| e.event)
            .collect();
        assert_eq!(written, jobs.len() as u64);

        let rows = svc.store.rows_for(3);
        assert_eq!(rows.len(), jobs.len());
        for row in rows {
            assert!(jobs.contains(&row.value.event));
            assert_eq!(row.category, NotificationCategory::Jobs);
            assert_eq!(row.value, PreferenceOverride::full(row.value.event.clone(), flags));
        }
    }

    #[tokio::test]
    async fn bulk_update_leaves_other_categories_alone() {
        let svc = service();
        svc.update_category(3, NotificationCategory::News, ChannelSettings::all_off())
            .await
            .unwrap();

        let groups = svc.resolve(3).await.unwrap();
        let catalog = default_catalog();
        for resolved in groups.iter().filter(|g| g.category != NotificationCategory::News).flat_map(|g| g.settings.iter()) {
            let entry = catalog.iter().find(|e| e.event == resolved.event).unwrap();
            assert_eq!(resolved.settings(), entry.defaults);
        }
    }

    #[tokio::test]
    async fn toggle_applies_checkbox_rule_to_effective_setting() {
        let svc = service();
        // weekly_digest defaults to email only
        let resolved = svc
            .toggle_channel(4, "weekly_digest", Channel::None, true)
            .await
            .unwrap();
        assert_eq!(resolved.settings(), ChannelSettings::all_off());

        let resolved = svc
            .toggle_channel(4, "weekly_digest", Channel::InApp, true)
            .await
            .unwrap();
        assert_eq!(resolved.settings(), ChannelSettings::new(false, true, false));
        assert_eq!(svc.store.rows_for(4).len(), 1);
    }

    #[tokio::test]
    async fn initialize_defaults_does_not_overwrite() {
        let svc = service();
        svc.update_event(5, NotificationCategory::Alerts, "direct_messages", ChannelSettings::all_off())
            .await
            .unwrap();

        let inserted = svc.initialize_defaults(5).await.unwrap();
        assert_eq!(inserted, default_catalog().len() as u64 - 1);

        let again = svc.initialize_defaults(5).await.unwrap();
        assert_eq!(again, 0);

        let groups = svc.resolve(5).await.unwrap();
        let dm = groups[0]
            .settings
            .iter()
            .find(|r| r.event == "direct_messages")
            .unwrap();
        assert_eq!(dm.settings(), ChannelSettings::all_off());
    }

    #[tokio::test]
    async fn overrides_are_scoped_per_user() {
        let svc = service();
        svc.update_event(6, NotificationCategory::News, "product_updates", ChannelSettings::all_on())
            .await
            .unwrap();

        let other = svc.resolve(7).await.unwrap();
        let product = other[3]
            .settings
            .iter()
            .find(|r| r.event == "product_updates")
            .unwrap();
        assert_eq!(product.settings(), ChannelSettings::all_off());
    }

    #[tokio::test]
    async fn read_failure_is_fetch_failed() {
        let store = MemoryPreferenceStore {
            catalog: default_catalog(),
            fail_reads: true,
            ..Default::default()
        };
        let svc = NotificationPreferenceService::new(store);
        let err = svc.resolve(1).await.unwrap_err();
        assert!(matches!(err, AppError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn write_failure_is_update_failed() {
        let store = MemoryPreferenceStore {
            catalog: default_catalog(),
            fail_writes: true,
            ..Default::default()
        };
        let svc = NotificationPreferenceService::new(store);
        let err = svc
            .update_category(1, NotificationCategory::Jobs, ChannelSettings::all_on())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpdateFailed(_)));
        assert!(svc.store.rows_for(1).is_empty());
    }

    #[tokio::test]
    async fn resolve_reads_twice_and_writes_nothing() {
        let svc = service();
        svc.resolve(3).await.unwrap();
        // catalog + overrides
        assert_eq!(svc.store.call_count(), 2);
        assert!(svc.store.rows_for(3).is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_rejected_before_any_write() {
        let svc = service();
        let err = svc
            .update_event(
                3,
                NotificationCategory::Jobs,
                "no_such_event",
                ChannelSettings::all_on(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // Only the catalog lookup touched the store
        assert_eq!(svc.store.call_count(), 1);
        assert!(svc.store.rows_for(3).is_empty());
    }

    #[tokio::test]
    async fn stored_row_with_missing_flags_mixes_with_defaults() {
        let svc = service();
        svc.store.insert_raw(
            5,
            NotificationCategory::News,
            PreferenceOverride {
                event: "weekly_digest".to_string(),
                none_enabled: None,
                in_app_enabled: Some(true),
                email_enabled: None,
            },
        );

        let groups = svc.resolve(5).await.unwrap();
        let digest = groups[3]
            .settings
            .iter()
            .find(|r| r.event == "weekly_digest")
            .unwrap();
        // in_app from the row, none and email from the default (email only)
        assert_eq!(digest.settings(), ChannelSettings::new(false, true, true));
    }

    #[tokio::test]
    async fn toggle_starts_from_partially_stored_row() {
        let svc = service();
        svc.store.insert_raw(
            5,
            NotificationCategory::News,
            PreferenceOverride {
                event: "product_updates".to_string(),
                none_enabled: None,
                in_app_enabled: None,
                email_enabled: Some(true),
            },
        );

        // Effective before: none (default on), email (stored on)
        let resolved = svc
            .toggle_channel(5, "product_updates", Channel::InApp, true)
            .await
            .unwrap();
        assert_eq!(resolved.settings(), ChannelSettings::new(false, true, true));
        assert_eq!(svc.store.rows_for(5)[0].writes, 2);
    }
}
