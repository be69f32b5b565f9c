//! Durable outbound email queue entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::text_enum;

text_enum!(
    QueueStatus {
        Pending => "pending",
        Sending => "sending",
        Sent => "sent",
        Failed => "failed",
    }
);

text_enum!(
    /// Selects the sender account the relay uses.
    EmailType {
        Admin => "admin",
        Info => "info",
        Events => "events",
        System => "system",
        Bulk => "bulk",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueuedEmail {
    pub id: i32,
    pub church_id: i32,
    pub to_address: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    pub email_type: EmailType,
    pub status: QueueStatus,
    pub attempts: i32,
    pub last_attempt_at: Option<NaiveDateTime>,
    pub next_attempt_at: NaiveDateTime,
    pub error: Option<String>,
    pub metadata: Value,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewQueuedEmail {
    pub church_id: i32,
    pub to_address: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    pub email_type: EmailType,
    pub metadata: Value,
}

impl NewQueuedEmail {
    #[must_use]
    pub fn new(
        church_id: i32,
        to_address: String,
        subject: String,
        html_body: String,
        email_type: EmailType,
        metadata: Value,
    ) -> Self {
        // Plain-text fallback is derived by stripping tags from the HTML body.
        let text_body = strip_tags(&html_body);
        Self {
            church_id,
            to_address: to_address.trim().to_lowercase(),
            subject,
            html_body,
            text_body: Some(text_body),
            email_type,
            metadata,
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                // Tags often separate words; collapse the extra spaces below.
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_fallback_strips_markup() {
        let email = NewQueuedEmail::new(
            1,
            "Driver@Example.com".to_string(),
            "Route".to_string(),
            "<h1>Your route</h1><p>3 stops</p>".to_string(),
            EmailType::Events,
            json!({}),
        );
        assert_eq!(email.to_address, "driver@example.com");
        assert_eq!(email.text_body.as_deref(), Some("Your route 3 stops"));
    }
}
