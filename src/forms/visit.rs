use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::visit::{NewPlannedVisit, UpdatePlannedVisit, VisitStatus};

#[derive(Deserialize, Validate)]
pub struct AddPlannedVisitForm {
    pub contact_id: Option<i32>,
    #[validate(length(min = 1))]
    pub event_name: String,
    pub event_date: NaiveDate,
    #[validate(length(min = 1))]
    pub interest_level: String,
    #[serde(default = "default_preference")]
    pub contact_preference: String,
    #[serde(default)]
    pub companions_count: i32,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
}

fn default_preference() -> String {
    "email".to_string()
}

impl AddPlannedVisitForm {
    pub fn into_domain(self, church_id: i32) -> NewPlannedVisit {
        NewPlannedVisit {
            church_id,
            contact_id: self.contact_id,
            event_name: self.event_name,
            event_date: self.event_date,
            interest_level: self.interest_level,
            contact_preference: self.contact_preference,
            companions_count: self.companions_count.max(0),
            special_needs: self.special_needs,
            notes: self.notes,
            follow_up_date: self.follow_up_date,
            assigned_to: self.assigned_to,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct SavePlannedVisitForm {
    #[validate(length(min = 1))]
    pub interest_level: String,
    pub contact_preference: String,
    #[serde(default)]
    pub companions_count: i32,
    pub special_needs: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: VisitStatus,
    pub assigned_to: Option<String>,
}

impl From<SavePlannedVisitForm> for UpdatePlannedVisit {
    fn from(form: SavePlannedVisitForm) -> Self {
        UpdatePlannedVisit {
            interest_level: form.interest_level,
            contact_preference: form.contact_preference,
            companions_count: form.companions_count.max(0),
            special_needs: form.special_needs,
            notes: form.notes,
            follow_up_date: form.follow_up_date,
            status: form.status,
            assigned_to: form.assigned_to,
        }
    }
}

#[derive(Deserialize)]
pub struct VisitListParams {
    pub status: Option<VisitStatus>,
    pub page: Option<usize>,
}

#[derive(Deserialize, Validate)]
pub struct VisitMessageForm {
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}
