use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::event::{NewAttendanceRecord, NewEvent, UpdateEvent};

#[derive(Deserialize, Validate)]
pub struct AddEventForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "upcoming".to_string()
}

impl AddEventForm {
    pub fn into_domain(self, church_id: i32) -> NewEvent {
        NewEvent {
            church_id,
            name: self.name,
            starts_at: self.starts_at,
            location: self.location,
            description: self.description,
            status: self.status,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct SaveEventForm {
    #[validate(length(min = 1))]
    pub name: String,
    pub starts_at: NaiveDateTime,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: String,
}

impl From<SaveEventForm> for UpdateEvent {
    fn from(form: SaveEventForm) -> Self {
        UpdateEvent {
            name: form.name,
            starts_at: form.starts_at,
            location: form.location,
            description: form.description,
            status: form.status,
        }
    }
}

#[derive(Deserialize)]
pub struct EventListParams {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub page: Option<usize>,
}

#[derive(Deserialize, Validate)]
/// Ids picked in the events table for CSV export.
pub struct ExportEventsForm {
    #[validate(length(min = 1))]
    pub event_ids: Vec<i32>,
}

#[derive(Deserialize)]
pub struct CheckInForm {
    pub event_id: i32,
    pub contact_id: i32,
    pub checked_in_at: Option<NaiveDateTime>,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "manual".to_string()
}

impl CheckInForm {
    pub fn into_domain(self, church_id: i32, now: NaiveDateTime) -> NewAttendanceRecord {
        NewAttendanceRecord {
            church_id,
            event_id: self.event_id,
            contact_id: self.contact_id,
            checked_in_at: self.checked_in_at.unwrap_or(now),
            method: self.method,
        }
    }
}
