use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::Contact;
use crate::domain::event::{
    AttendanceRecord, Event, NewAttendanceRecord, NewEvent, UpdateEvent,
};
use crate::models::contact::Contact as DbContact;
use crate::models::event::{
    AttendanceRecord as DbAttendanceRecord, Event as DbEvent,
    NewAttendanceRecord as DbNewAttendanceRecord, NewEvent as DbNewEvent,
    UpdateEvent as DbUpdateEvent,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AttendanceReader, AttendanceWriter, DieselRepository, EventListQuery,
    EventReader, EventWriter};

impl EventReader for DieselRepository {
    fn get_event_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Event>> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let event = events::table
            .find(id)
            .filter(events::church_id.eq(church_id))
            .first::<DbEvent>(&mut conn)
            .optional()?;

        Ok(event.map(Into::into))
    }

    fn list_events(&self, query: EventListQuery) -> RepositoryResult<(usize, Vec<Event>)> {
        use crate::schema::events;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = events::table
                .filter(events::church_id.eq(query.church_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(from) = query.from {
                items = items.filter(events::starts_at.ge(from));
            }
            if let Some(to) = query.to {
                items = items.filter(events::starts_at.le(to));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let events = items
            .order(events::starts_at.asc())
            .load::<DbEvent>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((total, events))
    }

    fn get_events_by_ids(&self, ids: &[i32], church_id: i32) -> RepositoryResult<Vec<Event>> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let events = events::table
            .filter(events::id.eq_any(ids))
            .filter(events::church_id.eq(church_id))
            .order(events::starts_at.asc())
            .load::<DbEvent>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(events)
    }
}

impl EventWriter for DieselRepository {
    fn create_event(&self, event: &NewEvent) -> RepositoryResult<Event> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let insertable: DbNewEvent = event.into();

        let created = diesel::insert_into(events::table)
            .values(&insertable)
            .get_result::<DbEvent>(&mut conn)?;

        Ok(created.into())
    }

    fn update_event(&self, event_id: i32, updates: &UpdateEvent) -> RepositoryResult<Event> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateEvent = updates.into();

        let updated = diesel::update(events::table.find(event_id))
            .set(&db_updates)
            .get_result::<DbEvent>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_event(&self, event_id: i32) -> RepositoryResult<()> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        diesel::delete(events::table.find(event_id)).execute(&mut conn)?;
        Ok(())
    }
}

impl AttendanceReader for DieselRepository {
    fn list_attendance(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(AttendanceRecord, Contact)>> {
        use crate::schema::{attendance_records, contacts};

        let mut conn = self.conn()?;
        let rows = attendance_records::table
            .inner_join(contacts::table)
            .filter(attendance_records::event_id.eq(event_id))
            .order(attendance_records::checked_in_at.asc())
            .load::<(DbAttendanceRecord, DbContact)>(&mut conn)?;

        rows.into_iter()
            .map(|(record, contact)| {
                let contact = Contact::try_from(contact).map_err(RepositoryError::from)?;
                Ok((record.into(), contact))
            })
            .collect()
    }

    fn count_attendance(&self, event_id: i32) -> RepositoryResult<i64> {
        use crate::schema::attendance_records;

        let mut conn = self.conn()?;
        let count = attendance_records::table
            .filter(attendance_records::event_id.eq(event_id))
            .count()
            .get_result(&mut conn)?;

        Ok(count)
    }

    fn count_attendance_since(
        &self,
        church_id: i32,
        since: NaiveDateTime,
    ) -> RepositoryResult<i64> {
        use crate::schema::attendance_records;

        let mut conn = self.conn()?;
        let count = attendance_records::table
            .filter(attendance_records::church_id.eq(church_id))
            .filter(attendance_records::checked_in_at.ge(since))
            .count()
            .get_result(&mut conn)?;

        Ok(count)
    }
}

impl AttendanceWriter for DieselRepository {
    fn create_attendance_record(
        &self,
        record: &NewAttendanceRecord,
    ) -> RepositoryResult<AttendanceRecord> {
        use crate::schema::attendance_records;

        let mut conn = self.conn()?;
        let insertable: DbNewAttendanceRecord = record.into();

        let created = diesel::insert_into(attendance_records::table)
            .values(&insertable)
            .get_result::<DbAttendanceRecord>(&mut conn)?;

        Ok(created.into())
    }
}
