use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::text_enum;

text_enum!(
    /// Where a person currently sits in the congregation lifecycle.
    Lifecycle {
        Lead => "lead",
        Visitor => "visitor",
        Member => "member",
        Leader => "leader",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: i32,
    pub church_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lifecycle: Lifecycle,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Optional set of custom field values.
    pub fields: Option<HashMap<String, String>>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewContact {
    pub church_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lifecycle: Lifecycle,
    pub fields: Option<HashMap<String, String>>,
}

impl NewContact {
    #[must_use]
    pub fn new(
        church_id: i32,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        lifecycle: Lifecycle,
        fields: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            church_id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            lifecycle,
            fields: fields.filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lifecycle: Lifecycle,
    /// Updated map of custom field values.
    pub fields: Option<HashMap<String, String>>,
}

impl UpdateContact {
    #[must_use]
    pub fn new(
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        lifecycle: Lifecycle,
        fields: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            lifecycle,
            fields: fields.filter(|m| !m.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contact_normalizes_email_and_drops_blanks() {
        let contact = NewContact::new(
            1,
            " Alice ".to_string(),
            "Smith".to_string(),
            Some(" Alice@Example.COM ".to_string()),
            Some("  ".to_string()),
            None,
            Lifecycle::Visitor,
            None,
        );
        assert_eq!(contact.first_name, "Alice");
        assert_eq!(contact.email.as_deref(), Some("alice@example.com"));
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn lifecycle_round_trips_through_text() {
        assert_eq!("leader".parse::<Lifecycle>().unwrap(), Lifecycle::Leader);
        assert_eq!(Lifecycle::Member.as_str(), "member");
        assert!("pastor".parse::<Lifecycle>().is_err());
    }
}
