//! Planned first-time visits and their follow-up workflow.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::text_enum;

text_enum!(
    VisitStatus {
        Planned => "planned",
        Contacted => "contacted",
        Confirmed => "confirmed",
        Attended => "attended",
        NoShow => "no_show",
        Cancelled => "cancelled",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedVisit {
    pub id: i32,
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub interest_level: String,
    pub contact_preference: String,
    pub companions_count: i32,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: VisitStatus,
    pub converted_at: Option<NaiveDateTime>,
    /// Auth-service subject of the follow-up owner.
    pub assigned_to: Option<String>,
    pub message_count: i32,
    pub last_message_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PlannedVisit {
    pub fn is_converted(&self) -> bool {
        self.converted_at.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewPlannedVisit {
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub interest_level: String,
    pub contact_preference: String,
    pub companions_count: i32,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdatePlannedVisit {
    pub interest_level: String,
    pub contact_preference: String,
    pub companions_count: i32,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: VisitStatus,
    pub assigned_to: Option<String>,
}
