use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::contact::{
    Contact as DomainContact, Lifecycle, NewContact as DomainNewContact,
    UpdateContact as DomainUpdateContact,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::contacts)]
/// Diesel model for [`crate::domain::contact::Contact`].
pub struct Contact {
    pub id: i32,
    pub church_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub lifecycle: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
/// Insertable form of [`Contact`].
pub struct NewContact<'a> {
    pub church_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub lifecycle: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
/// Data used when updating a [`Contact`] record.
pub struct UpdateContact<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub lifecycle: String,
}

#[derive(Identifiable, Queryable, Selectable, Associations, Insertable, Serialize)]
#[diesel(table_name = crate::schema::contact_fields)]
#[diesel(belongs_to(Contact, foreign_key = contact_id))]
#[diesel(primary_key(contact_id, field))]
pub struct ContactField {
    pub contact_id: i32,
    pub field: String,
    pub value: String,
}

impl TryFrom<Contact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        Ok(Self {
            id: contact.id,
            church_id: contact.church_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
            lifecycle: contact.lifecycle.parse::<Lifecycle>()?,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
            fields: None,
        })
    }
}

impl<'a> From<&'a DomainNewContact> for NewContact<'a> {
    fn from(contact: &'a DomainNewContact) -> Self {
        Self {
            church_id: contact.church_id,
            first_name: &contact.first_name,
            last_name: &contact.last_name,
            email: contact.email.as_deref(),
            phone: contact.phone.as_deref(),
            address: contact.address.as_deref(),
            lifecycle: contact.lifecycle.to_string(),
        }
    }
}

impl<'a> From<&'a DomainUpdateContact> for UpdateContact<'a> {
    fn from(contact: &'a DomainUpdateContact) -> Self {
        Self {
            first_name: &contact.first_name,
            last_name: &contact.last_name,
            email: contact.email.as_deref(),
            phone: contact.phone.as_deref(),
            address: contact.address.as_deref(),
            lifecycle: contact.lifecycle.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn contact_into_domain_parses_lifecycle() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_contact = Contact {
            id: 1,
            church_id: 2,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: Some("a@example.com".to_string()),
            phone: None,
            address: None,
            lifecycle: "member".to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainContact::try_from(db_contact).unwrap();
        assert_eq!(domain.lifecycle, Lifecycle::Member);
        assert_eq!(domain.full_name(), "A B");
    }

    #[test]
    fn unknown_lifecycle_is_an_error() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_contact = Contact {
            id: 1,
            church_id: 2,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: None,
            phone: None,
            address: None,
            lifecycle: "stranger".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(DomainContact::try_from(db_contact).is_err());
    }
}
