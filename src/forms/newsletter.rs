use serde::Deserialize;
use validator::Validate;

use crate::domain::newsletter::{NewIssue, NewSubscriber};

#[derive(Deserialize, Validate)]
pub struct AddSubscriberForm {
    #[validate(email)]
    pub email: String,
    pub name: Option<String>,
}

impl AddSubscriberForm {
    pub fn into_domain(self, church_id: i32) -> NewSubscriber {
        NewSubscriber::new(church_id, self.email, self.name, "manual".to_string())
    }
}

#[derive(Deserialize)]
/// Token-less unsubscribe used by the link in newsletter footers. The email
/// is validated and normalized by the handler.
pub struct UnsubscribeForm {
    pub church_id: i32,
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct AddIssueForm {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub html_body: String,
}

impl AddIssueForm {
    pub fn into_domain(self, church_id: i32) -> NewIssue {
        NewIssue::new(church_id, self.subject, self.html_body)
    }
}
