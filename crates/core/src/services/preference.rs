//! Preference service.
//!
//! Reads use get-or-create-default semantics backed by an atomic
//! insert-if-absent, so two concurrent first reads for the same profile
//! converge on a single row.

use chattr_common::{AppError, AppResult};
use chattr_db::{entities::preference, repositories::PreferenceRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;

/// Default preference values.
const DEFAULT_THEME: &str = "system";
const DEFAULT_FONT_SIZE: &str = "medium";
const DEFAULT_TIME_FORMAT: &str = "12h";
const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";
const DEFAULT_TIMEZONE: &str = "UTC";

/// The fixed set of boolean notification settings that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationToggle {
    NotificationsEnabled,
    NotifyOnMessage,
    NotifyOnMention,
    NotifyOnReply,
}

/// Partial update of a preference row.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesInput {
    pub theme: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub notify_on_message: Option<bool>,
    pub notify_on_mention: Option<bool>,
    pub notify_on_reply: Option<bool>,
    pub muted_channels: Option<Vec<String>>,
    pub compact_view: Option<bool>,
    pub font_size: Option<String>,
    pub time_format: Option<String>,
    pub date_format: Option<String>,
    pub timezone: Option<String>,
}

impl UpdatePreferencesInput {
    fn validate(&self) -> AppResult<()> {
        if let Some(ref theme) = self.theme
            && !matches!(theme.as_str(), "light" | "dark" | "system")
        {
            return Err(AppError::Validation(format!("Invalid theme: {theme}")));
        }

        if let Some(ref size) = self.font_size
            && !matches!(size.as_str(), "small" | "medium" | "large")
        {
            return Err(AppError::Validation(format!("Invalid font size: {size}")));
        }

        if let Some(ref format) = self.time_format
            && !matches!(format.as_str(), "12h" | "24h")
        {
            return Err(AppError::Validation(format!(
                "Invalid time format: {format}"
            )));
        }

        if let Some(ref tz) = self.timezone
            && tz.parse::<chrono_tz::Tz>().is_err()
        {
            return Err(AppError::Validation(format!("Unknown timezone: {tz}")));
        }

        Ok(())
    }
}

/// Preference service.
#[derive(Clone)]
pub struct PreferenceService {
    preference_repo: PreferenceRepository,
}

impl PreferenceService {
    /// Create a new preference service.
    #[must_use]
    pub const fn new(preference_repo: PreferenceRepository) -> Self {
        Self { preference_repo }
    }

    fn default_row(profile_id: &str) -> preference::ActiveModel {
        let now = Utc::now();
        preference::ActiveModel {
            profile_id: Set(profile_id.to_string()),
            theme: Set(DEFAULT_THEME.to_string()),
            notifications_enabled: Set(true),
            notify_on_message: Set(true),
            notify_on_mention: Set(true),
            notify_on_reply: Set(true),
            muted_channels: Set(serde_json::json!([])),
            compact_view: Set(false),
            font_size: Set(DEFAULT_FONT_SIZE.to_string()),
            time_format: Set(DEFAULT_TIME_FORMAT.to_string()),
            date_format: Set(DEFAULT_DATE_FORMAT.to_string()),
            timezone: Set(DEFAULT_TIMEZONE.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }

    /// Get preferences for a profile, creating the default row when
    /// absent.
    pub async fn get(&self, profile_id: &str) -> AppResult<preference::Model> {
        self.preference_repo
            .ensure(Self::default_row(profile_id))
            .await
    }

    /// Merge a partial patch into the profile's preferences.
    pub async fn update(
        &self,
        profile_id: &str,
        input: UpdatePreferencesInput,
    ) -> AppResult<preference::Model> {
        input.validate()?;

        let current = self.get(profile_id).await?;
        let mut active: preference::ActiveModel = current.into();

        if let Some(theme) = input.theme {
            active.theme = Set(theme);
        }
        if let Some(enabled) = input.notifications_enabled {
            active.notifications_enabled = Set(enabled);
        }
        if let Some(on_message) = input.notify_on_message {
            active.notify_on_message = Set(on_message);
        }
        if let Some(on_mention) = input.notify_on_mention {
            active.notify_on_mention = Set(on_mention);
        }
        if let Some(on_reply) = input.notify_on_reply {
            active.notify_on_reply = Set(on_reply);
        }
        if let Some(muted) = input.muted_channels {
            active.muted_channels = Set(serde_json::json!(muted));
        }
        if let Some(compact) = input.compact_view {
            active.compact_view = Set(compact);
        }
        if let Some(size) = input.font_size {
            active.font_size = Set(size);
        }
        if let Some(time_format) = input.time_format {
            active.time_format = Set(time_format);
        }
        if let Some(date_format) = input.date_format {
            active.date_format = Set(date_format);
        }
        if let Some(timezone) = input.timezone {
            active.timezone = Set(timezone);
        }

        active.updated_at = Set(Utc::now().into());

        self.preference_repo.update(active).await
    }

    /// Flip exactly one boolean notification setting.
    pub async fn toggle(
        &self,
        profile_id: &str,
        setting: NotificationToggle,
    ) -> AppResult<preference::Model> {
        let current = self.get(profile_id).await?;

        let patch = match setting {
            NotificationToggle::NotificationsEnabled => UpdatePreferencesInput {
                notifications_enabled: Some(!current.notifications_enabled),
                ..Default::default()
            },
            NotificationToggle::NotifyOnMessage => UpdatePreferencesInput {
                notify_on_message: Some(!current.notify_on_message),
                ..Default::default()
            },
            NotificationToggle::NotifyOnMention => UpdatePreferencesInput {
                notify_on_mention: Some(!current.notify_on_mention),
                ..Default::default()
            },
            NotificationToggle::NotifyOnReply => UpdatePreferencesInput {
                notify_on_reply: Some(!current.notify_on_reply),
                ..Default::default()
            },
        };

        self.update(profile_id, patch).await
    }

    /// Add or remove a channel from the muted list (idempotent toggle,
    /// not a count).
    pub async fn toggle_muted_channel(
        &self,
        profile_id: &str,
        channel_id: &str,
    ) -> AppResult<preference::Model> {
        let current = self.get(profile_id).await?;

        let mut muted: Vec<String> =
            serde_json::from_value(current.muted_channels.clone()).unwrap_or_default();

        if let Some(idx) = muted.iter().position(|id| id == channel_id) {
            muted.remove(idx);
        } else {
            muted.push(channel_id.to_string());
        }

        self.update(
            profile_id,
            UpdatePreferencesInput {
                muted_channels: Some(muted),
                ..Default::default()
            },
        )
        .await
    }

    /// Overwrite the profile's preferences with defaults.
    pub async fn reset(&self, profile_id: &str) -> AppResult<preference::Model> {
        self.preference_repo
            .put(Self::default_row(profile_id))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_known_values() {
        let input = UpdatePreferencesInput {
            theme: Some("dark".to_string()),
            font_size: Some("large".to_string()),
            time_format: Some("24h".to_string()),
            timezone: Some("Asia/Tokyo".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_theme() {
        let input = UpdatePreferencesInput {
            theme: Some("solarized".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_timezone() {
        let input = UpdatePreferencesInput {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_time_format() {
        let input = UpdatePreferencesInput {
            time_format: Some("13h".to_string()),
            ..Default::default()
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_toggle_targets_are_exhaustive() {
        // The toggleable set is fixed; adding a variant without wiring it
        // into toggle() fails to compile, this documents the intent.
        let all = [
            NotificationToggle::NotificationsEnabled,
            NotificationToggle::NotifyOnMessage,
            NotificationToggle::NotifyOnMention,
            NotificationToggle::NotifyOnReply,
        ];
        assert_eq!(all.len(), 4);
    }
}
