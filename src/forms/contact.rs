use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{Lifecycle, NewContact, UpdateContact};

#[derive(Deserialize, Validate)]
/// Payload for creating a contact.
pub struct AddContactForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl AddContactForm {
    pub fn into_domain(self, church_id: i32) -> NewContact {
        NewContact::new(
            church_id,
            self.first_name,
            self.last_name,
            self.email,
            self.phone,
            self.address,
            self.lifecycle.unwrap_or(Lifecycle::Visitor),
            Some(self.fields),
        )
    }
}

#[derive(Deserialize, Validate)]
/// Payload for updating an existing contact.
pub struct SaveContactForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl From<SaveContactForm> for UpdateContact {
    fn from(form: SaveContactForm) -> Self {
        UpdateContact::new(
            form.first_name,
            form.last_name,
            form.email,
            form.phone,
            form.address,
            form.lifecycle,
            Some(form.fields),
        )
    }
}

#[derive(Deserialize)]
pub struct ContactListParams {
    pub q: Option<String>,
    pub lifecycle: Option<Lifecycle>,
    pub page: Option<usize>,
}
