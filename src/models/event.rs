use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::event::{
    AttendanceRecord as DomainAttendanceRecord, Event as DomainEvent,
    NewAttendanceRecord as DomainNewAttendanceRecord, NewEvent as DomainNewEvent,
    UpdateEvent as DomainUpdateEvent,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::events)]
pub struct Event {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::events)]
pub struct NewEvent<'a> {
    pub church_id: i32,
    pub name: &'a str,
    pub starts_at: NaiveDateTime,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::events)]
pub struct UpdateEvent<'a> {
    pub name: &'a str,
    pub starts_at: NaiveDateTime,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(table_name = crate::schema::attendance_records)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
pub struct AttendanceRecord {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub checked_in_at: NaiveDateTime,
    pub method: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::attendance_records)]
pub struct NewAttendanceRecord<'a> {
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub checked_in_at: NaiveDateTime,
    pub method: &'a str,
}

impl From<Event> for DomainEvent {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            church_id: event.church_id,
            name: event.name,
            starts_at: event.starts_at,
            location: event.location,
            description: event.description,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewEvent> for NewEvent<'a> {
    fn from(event: &'a DomainNewEvent) -> Self {
        Self {
            church_id: event.church_id,
            name: &event.name,
            starts_at: event.starts_at,
            location: event.location.as_deref(),
            description: event.description.as_deref(),
            status: &event.status,
        }
    }
}

impl<'a> From<&'a DomainUpdateEvent> for UpdateEvent<'a> {
    fn from(event: &'a DomainUpdateEvent) -> Self {
        Self {
            name: &event.name,
            starts_at: event.starts_at,
            location: event.location.as_deref(),
            description: event.description.as_deref(),
            status: &event.status,
        }
    }
}

impl From<AttendanceRecord> for DomainAttendanceRecord {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            church_id: record.church_id,
            event_id: record.event_id,
            contact_id: record.contact_id,
            checked_in_at: record.checked_in_at,
            method: record.method,
            created_at: record.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAttendanceRecord> for NewAttendanceRecord<'a> {
    fn from(record: &'a DomainNewAttendanceRecord) -> Self {
        Self {
            church_id: record.church_id,
            event_id: record.event_id,
            contact_id: record.contact_id,
            checked_in_at: record.checked_in_at,
            method: &record.method,
        }
    }
}
