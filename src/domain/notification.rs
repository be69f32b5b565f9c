//! Notification preferences and the payloads dispatched through them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::text_enum;

text_enum!(
    NotificationMethod {
        Email => "email",
        Push => "push",
        Sms => "sms",
        InApp => "in_app",
    }
);

text_enum!(
    Urgency {
        Low => "low",
        Normal => "normal",
        High => "high",
        Critical => "critical",
    }
);

/// Church-wide kill switches per delivery method.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GlobalSettings {
    pub church_id: i32,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub in_app_enabled: bool,
}

impl GlobalSettings {
    pub fn allows(&self, method: NotificationMethod) -> bool {
        match method {
            NotificationMethod::Email => self.email_enabled,
            NotificationMethod::Push => self.push_enabled,
            NotificationMethod::Sms => self.sms_enabled,
            NotificationMethod::InApp => self.in_app_enabled,
        }
    }
}

/// Per notification-type switch, optionally restricted to roles.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TypeSetting {
    pub id: i32,
    pub church_id: i32,
    pub notification_type: String,
    pub method: NotificationMethod,
    pub enabled: bool,
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTypeSetting {
    pub church_id: i32,
    pub notification_type: String,
    pub method: NotificationMethod,
    pub enabled: bool,
    pub roles: Vec<String>,
}

/// A single user's opt-out for one type and method.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserPreference {
    pub user_id: String,
    pub notification_type: String,
    pub method: NotificationMethod,
    pub enabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InAppNotification {
    pub id: i32,
    pub church_id: i32,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub data: Value,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewInAppNotification {
    pub church_id: i32,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub data: Value,
}

/// What a caller asks the notification service to deliver.
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationPayload {
    pub notification_type: String,
    pub recipient_user_id: String,
    pub title: String,
    pub message: String,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    pub data: Value,
    pub urgency: Urgency,
}

/// What actually went out after the preference gates.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct NotificationOutcome {
    pub email_sent: bool,
    pub push_sent: bool,
    pub in_app_stored: bool,
}
