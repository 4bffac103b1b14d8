//! Preference repository.
//!
//! Get-or-create is a single atomic upsert (`INSERT .. ON CONFLICT DO
//! NOTHING` followed by a read), so concurrent first reads can never
//! produce two rows for one profile.

use std::sync::Arc;

use crate::entities::{Preference, preference};
use chattr_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Preference repository for database operations.
#[derive(Clone)]
pub struct PreferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl PreferenceRepository {
    /// Create a new preference repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a preference row by profile ID.
    pub async fn find_by_profile(&self, profile_id: &str) -> AppResult<Option<preference::Model>> {
        Preference::find_by_id(profile_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a preference row by profile ID, returning an error if not found.
    pub async fn get_by_profile(&self, profile_id: &str) -> AppResult<preference::Model> {
        self.find_by_profile(profile_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Preferences not found: {profile_id}")))
    }

    /// Insert the given row if no row exists for its profile, then return
    /// the stored row. The insert-if-absent is a single statement.
    pub async fn ensure(&self, model: preference::ActiveModel) -> AppResult<preference::Model> {
        let profile_id = match &model.profile_id {
            sea_orm::ActiveValue::Set(id) => id.clone(),
            _ => return Err(AppError::Internal("Preference row without profile id".into())),
        };

        Preference::insert(model)
            .on_conflict(
                OnConflict::column(preference::Column::ProfileId)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.get_by_profile(&profile_id).await
    }

    /// Overwrite the row for its profile with the given values, inserting
    /// when absent. Used by reset.
    pub async fn put(&self, model: preference::ActiveModel) -> AppResult<preference::Model> {
        let profile_id = match &model.profile_id {
            sea_orm::ActiveValue::Set(id) => id.clone(),
            _ => return Err(AppError::Internal("Preference row without profile id".into())),
        };

        Preference::insert(model)
            .on_conflict(
                OnConflict::column(preference::Column::ProfileId)
                    .update_columns([
                        preference::Column::Theme,
                        preference::Column::NotificationsEnabled,
                        preference::Column::NotifyOnMessage,
                        preference::Column::NotifyOnMention,
                        preference::Column::NotifyOnReply,
                        preference::Column::MutedChannels,
                        preference::Column::CompactView,
                        preference::Column::FontSize,
                        preference::Column::TimeFormat,
                        preference::Column::DateFormat,
                        preference::Column::Timezone,
                        preference::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.get_by_profile(&profile_id).await
    }

    /// Update an existing preference row.
    pub async fn update(&self, model: preference::ActiveModel) -> AppResult<preference::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn create_test_preference(profile_id: &str) -> preference::Model {
        preference::Model {
            profile_id: profile_id.to_string(),
            theme: "system".to_string(),
            notifications_enabled: true,
            notify_on_message: true,
            notify_on_mention: true,
            notify_on_reply: true,
            muted_channels: json!([]),
            compact_view: false,
            font_size: "medium".to_string(),
            time_format: "12h".to_string(),
            date_format: "MM/DD/YYYY".to_string(),
            timezone: "UTC".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_profile() {
        let pref = create_test_preference("p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pref.clone()]])
                .into_connection(),
        );

        let repo = PreferenceRepository::new(db);
        let result = repo.find_by_profile("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().theme, "system");
    }

    #[tokio::test]
    async fn test_get_by_profile_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<preference::Model>::new()])
                .into_connection(),
        );

        let repo = PreferenceRepository::new(db);
        let result = repo.get_by_profile("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
