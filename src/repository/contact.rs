//! Repository implementation for contacts and their custom field values.

use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::contact::{Contact, Lifecycle, NewContact, UpdateContact};
use crate::models::contact::{
    Contact as DbContact, ContactField as DbContactField, NewContact as DbNewContact,
    UpdateContact as DbUpdateContact,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ContactListQuery, ContactReader, ContactWriter, DieselRepository};

fn load_fields(
    conn: &mut crate::db::DbConnection,
    contact_id: i32,
) -> RepositoryResult<HashMap<String, String>> {
    use crate::schema::contact_fields;

    let fields = contact_fields::table
        .filter(contact_fields::contact_id.eq(contact_id))
        .load::<DbContactField>(conn)?
        .into_iter()
        .map(|f| (f.field, f.value))
        .collect();

    Ok(fields)
}

fn replace_fields(
    conn: &mut crate::db::DbConnection,
    contact_id: i32,
    fields: &HashMap<String, String>,
) -> RepositoryResult<()> {
    use crate::schema::contact_fields;

    diesel::delete(contact_fields::table.filter(contact_fields::contact_id.eq(contact_id)))
        .execute(conn)?;

    let rows: Vec<DbContactField> = fields
        .iter()
        .map(|(field, value)| DbContactField {
            contact_id,
            field: field.clone(),
            value: value.clone(),
        })
        .collect();

    diesel::insert_into(contact_fields::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

impl ContactReader for DieselRepository {
    fn get_contact_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Contact>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let db_contact = contacts::table
            .find(id)
            .filter(contacts::church_id.eq(church_id))
            .first::<DbContact>(&mut conn)
            .optional()?;

        match db_contact {
            Some(db_contact) => {
                let mut contact =
                    Contact::try_from(db_contact).map_err(RepositoryError::from)?;
                let fields = load_fields(&mut conn, contact.id)?;
                if !fields.is_empty() {
                    contact.fields = Some(fields);
                }
                Ok(Some(contact))
            }
            None => Ok(None),
        }
    }

    fn get_contact_by_email(
        &self,
        email: &str,
        church_id: i32,
    ) -> RepositoryResult<Option<Contact>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let db_contact = contacts::table
            .filter(contacts::email.eq(email))
            .filter(contacts::church_id.eq(church_id))
            .first::<DbContact>(&mut conn)
            .optional()?;

        match db_contact {
            Some(db_contact) => Ok(Some(
                Contact::try_from(db_contact).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<(usize, Vec<Contact>)> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = contacts::table
                .filter(contacts::church_id.eq(query.church_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    contacts::first_name
                        .like(pattern.clone())
                        .or(contacts::last_name.like(pattern.clone()))
                        .or(contacts::email.like(pattern.clone()))
                        .or(contacts::phone.like(pattern)),
                );
            }

            if let Some(lifecycle) = &query.lifecycle {
                items = items.filter(contacts::lifecycle.eq(lifecycle.to_string()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let contacts = items
            .order(contacts::last_name.asc())
            .load::<DbContact>(&mut conn)?
            .into_iter()
            .map(|c| Contact::try_from(c).map_err(RepositoryError::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, contacts))
    }

    fn count_contacts_by_lifecycle(&self, church_id: i32) -> RepositoryResult<Vec<(String, i64)>> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let counts = contacts::table
            .filter(contacts::church_id.eq(church_id))
            .group_by(contacts::lifecycle)
            .select((contacts::lifecycle, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(counts)
    }
}

impl ContactWriter for DieselRepository {
    fn create_contacts(&self, new_contacts: &[NewContact]) -> RepositoryResult<usize> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let mut inserted = 0;

        // Bulk uploads skip addresses that already exist instead of failing
        // the whole batch on the unique (church_id, email) index.
        for new_contact in new_contacts {
            let insertable: DbNewContact = new_contact.into();
            let created = diesel::insert_into(contacts::table)
                .values(&insertable)
                .on_conflict_do_nothing()
                .get_result::<DbContact>(&mut conn)
                .optional()?;

            if let Some(created) = created {
                if let Some(fields) = &new_contact.fields {
                    replace_fields(&mut conn, created.id, fields)?;
                }
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    fn update_contact(
        &self,
        contact_id: i32,
        updates: &UpdateContact,
    ) -> RepositoryResult<Contact> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateContact = updates.into();

        let updated = diesel::update(contacts::table.find(contact_id))
            .set(&db_updates)
            .get_result::<DbContact>(&mut conn)?;

        if let Some(fields) = &updates.fields {
            replace_fields(&mut conn, contact_id, fields)?;
        }

        let mut contact = Contact::try_from(updated).map_err(RepositoryError::from)?;
        let fields = load_fields(&mut conn, contact_id)?;
        if !fields.is_empty() {
            contact.fields = Some(fields);
        }

        Ok(contact)
    }

    fn set_contact_lifecycle(
        &self,
        contact_id: i32,
        lifecycle: Lifecycle,
    ) -> RepositoryResult<()> {
        use crate::schema::contacts;

        let mut conn = self.conn()?;
        diesel::update(contacts::table.find(contact_id))
            .set(contacts::lifecycle.eq(lifecycle.to_string()))
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete_contact(&self, contact_id: i32) -> RepositoryResult<()> {
        use crate::schema::{contact_fields, contacts};

        let mut conn = self.conn()?;

        diesel::delete(contact_fields::table.filter(contact_fields::contact_id.eq(contact_id)))
            .execute(&mut conn)?;
        diesel::delete(contacts::table.find(contact_id)).execute(&mut conn)?;

        Ok(())
    }
}
