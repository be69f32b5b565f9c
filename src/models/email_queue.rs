use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::email::{
    EmailType, NewQueuedEmail as DomainNewQueuedEmail, QueueStatus,
    QueuedEmail as DomainQueuedEmail,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::email_queue)]
pub struct QueuedEmail {
    pub id: i32,
    pub church_id: i32,
    pub to_address: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    pub email_type: String,
    pub status: String,
    pub attempts: i32,
    pub last_attempt_at: Option<NaiveDateTime>,
    pub next_attempt_at: NaiveDateTime,
    pub error: Option<String>,
    pub metadata: String,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_queue)]
pub struct NewQueuedEmail<'a> {
    pub church_id: i32,
    pub to_address: &'a str,
    pub subject: &'a str,
    pub html_body: &'a str,
    pub text_body: Option<&'a str>,
    pub email_type: String,
    pub metadata: String,
}

impl TryFrom<QueuedEmail> for DomainQueuedEmail {
    type Error = TypeConstraintError;

    fn try_from(email: QueuedEmail) -> Result<Self, Self::Error> {
        let metadata = serde_json::from_str(&email.metadata).unwrap_or_default();

        Ok(Self {
            id: email.id,
            church_id: email.church_id,
            to_address: email.to_address,
            subject: email.subject,
            html_body: email.html_body,
            text_body: email.text_body,
            email_type: email.email_type.parse::<EmailType>()?,
            status: email.status.parse::<QueueStatus>()?,
            attempts: email.attempts,
            last_attempt_at: email.last_attempt_at,
            next_attempt_at: email.next_attempt_at,
            error: email.error,
            metadata,
            sent_at: email.sent_at,
            created_at: email.created_at,
            updated_at: email.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewQueuedEmail> for NewQueuedEmail<'a> {
    fn from(email: &'a DomainNewQueuedEmail) -> Self {
        Self {
            church_id: email.church_id,
            to_address: &email.to_address,
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: email.text_body.as_deref(),
            email_type: email.email_type.to_string(),
            metadata: email.metadata.to_string(),
        }
    }
}
