use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::notification::{
    NotificationMethod, NotificationPayload, Urgency, UserPreference,
};

#[derive(Deserialize, Validate)]
pub struct SendNotificationForm {
    #[validate(length(min = 1))]
    pub notification_type: String,
    #[validate(length(min = 1))]
    pub recipient_user_id: String,
    /// Email address of the recipient, when email delivery is wanted.
    #[validate(email)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub recipient_roles: Vec<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default = "default_urgency")]
    pub urgency: Urgency,
}

fn default_urgency() -> Urgency {
    Urgency::Normal
}

impl From<&SendNotificationForm> for NotificationPayload {
    fn from(form: &SendNotificationForm) -> Self {
        NotificationPayload {
            notification_type: form.notification_type.clone(),
            recipient_user_id: form.recipient_user_id.clone(),
            title: form.title.clone(),
            message: form.message.clone(),
            email_subject: form.email_subject.clone(),
            email_body: form.email_body.clone().map(|b| ammonia::clean(&b)),
            data: form.data.clone(),
            urgency: form.urgency,
        }
    }
}

#[derive(Deserialize)]
pub struct MarkReadForm {
    pub ids: Vec<i32>,
}

#[derive(Deserialize)]
/// A user's own opt-in/opt-out for one type and method.
pub struct PreferenceForm {
    pub notification_type: String,
    pub method: NotificationMethod,
    pub enabled: bool,
}

impl PreferenceForm {
    pub fn into_domain(self, user_id: &str) -> UserPreference {
        UserPreference {
            user_id: user_id.to_string(),
            notification_type: self.notification_type,
            method: self.method,
            enabled: self.enabled,
        }
    }
}
