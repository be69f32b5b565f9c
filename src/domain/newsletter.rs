use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::text_enum;

text_enum!(
    SubscriberStatus {
        Subscribed => "subscribed",
        Unsubscribed => "unsubscribed",
    }
);

text_enum!(
    IssueStatus {
        Draft => "draft",
        Sent => "sent",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subscriber {
    pub id: i32,
    pub church_id: i32,
    pub email: String,
    pub name: Option<String>,
    pub status: SubscriberStatus,
    /// Where the address came from: `manual`, `contact_sync` or `signup`.
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSubscriber {
    pub church_id: i32,
    pub email: String,
    pub name: Option<String>,
    pub source: String,
}

impl NewSubscriber {
    #[must_use]
    pub fn new(church_id: i32, email: String, name: Option<String>, source: String) -> Self {
        Self {
            church_id,
            email: email.trim().to_lowercase(),
            name: name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            source,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: i32,
    pub church_id: i32,
    pub subject: String,
    pub html_body: String,
    pub status: IssueStatus,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewIssue {
    pub church_id: i32,
    pub subject: String,
    pub html_body: String,
}

impl NewIssue {
    /// Stored HTML is sanitized so a pasted body cannot smuggle scripts into
    /// subscriber inboxes.
    #[must_use]
    pub fn new(church_id: i32, subject: String, html_body: String) -> Self {
        Self {
            church_id,
            subject: subject.trim().to_string(),
            html_body: ammonia::clean(&html_body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_issue_sanitizes_html() {
        let issue = NewIssue::new(
            1,
            "Hello".to_string(),
            "<p>Hi</p><script>alert(1)</script>".to_string(),
        );
        assert_eq!(issue.html_body, "<p>Hi</p>");
    }

    #[test]
    fn new_subscriber_normalizes_email() {
        let sub = NewSubscriber::new(1, " User@Example.COM ".to_string(), None, "manual".into());
        assert_eq!(sub.email, "user@example.com");
    }
}
