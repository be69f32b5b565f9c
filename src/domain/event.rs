use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
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

#[derive(Clone, Debug, Deserialize)]
pub struct NewEvent {
    pub church_id: i32,
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateEvent {
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AttendanceRecord {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub checked_in_at: NaiveDateTime,
    /// How the person was checked in: `manual`, `kiosk`, `mobile`.
    pub method: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAttendanceRecord {
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub checked_in_at: NaiveDateTime,
    pub method: String,
}
