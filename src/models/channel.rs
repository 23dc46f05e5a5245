use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Notification category. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Alerts,
    Jobs,
    Articles,
    News,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 4] = [
        NotificationCategory::Alerts,
        NotificationCategory::Jobs,
        NotificationCategory::Articles,
        NotificationCategory::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Alerts => "alerts",
            NotificationCategory::Jobs => "jobs",
            NotificationCategory::Articles => "articles",
            NotificationCategory::News => "news",
        }
    }

    /// Capitalized category name shown as the group heading.
    pub fn title(&self) -> &'static str {
        match self {
            NotificationCategory::Alerts => "Alerts",
            NotificationCategory::Jobs => "Jobs",
            NotificationCategory::Articles => "Articles",
            NotificationCategory::News => "News",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alerts" => Ok(NotificationCategory::Alerts),
            "jobs" => Ok(NotificationCategory::Jobs),
            "articles" => Ok(NotificationCategory::Articles),
            "news" => Ok(NotificationCategory::News),
            other => Err(format!("Unknown notification category '{}'", other)),
        }
    }
}

/// One of the three delivery modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    None,
    InApp,
    Email,
}

/// The three channel flags of one event.
///
/// The flags are independent booleans in storage. The "none excludes the
/// others" rule only applies through [`ChannelSettings::toggle`]; values
/// written directly are stored as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChannelSettings {
    pub none_enabled: bool,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
}

impl ChannelSettings {
    pub const fn new(none_enabled: bool, in_app_enabled: bool, email_enabled: bool) -> Self {
        Self {
            none_enabled,
            in_app_enabled,
            email_enabled,
        }
    }

    /// "All On": every delivery channel enabled.
    pub const fn all_on() -> Self {
        Self::new(false, true, true)
    }

    /// "All Off": only `none` checked.
    pub const fn all_off() -> Self {
        Self::new(true, false, false)
    }

    /// Apply a checkbox change.
    ///
    /// Checking `none` clears both delivery channels, checking a delivery
    /// channel clears `none`. Unchecking only clears the given flag.
    pub fn toggle(self, channel: Channel, checked: bool) -> Self {
        let mut next = self;
        match (channel, checked) {
            (Channel::None, true) => {
                next.none_enabled = true;
                next.in_app_enabled = false;
                next.email_enabled = false;
            }
            (Channel::InApp, true) => {
                next.in_app_enabled = true;
                next.none_enabled = false;
            }
            (Channel::Email, true) => {
                next.email_enabled = true;
                next.none_enabled = false;
            }
            (Channel::None, false) => next.none_enabled = false,
            (Channel::InApp, false) => next.in_app_enabled = false,
            (Channel::Email, false) => next.email_enabled = false,
        }
        next
    }
}
