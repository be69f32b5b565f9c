use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::types::TypeConstraintError;
use crate::domain::visit::{
    NewPlannedVisit as DomainNewPlannedVisit, PlannedVisit as DomainPlannedVisit,
    UpdatePlannedVisit as DomainUpdatePlannedVisit, VisitStatus,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::planned_visits)]
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
    pub status: String,
    pub converted_at: Option<NaiveDateTime>,
    pub assigned_to: Option<String>,
    pub message_count: i32,
    pub last_message_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::planned_visits)]
pub struct NewPlannedVisit<'a> {
    pub church_id: i32,
    pub contact_id: Option<i32>,
    pub event_name: &'a str,
    pub event_date: NaiveDate,
    pub interest_level: &'a str,
    pub contact_preference: &'a str,
    pub companions_count: i32,
    pub special_needs: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub follow_up_date: Option<NaiveDate>,
    pub assigned_to: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::planned_visits)]
pub struct UpdatePlannedVisit<'a> {
    pub interest_level: &'a str,
    pub contact_preference: &'a str,
    pub companions_count: i32,
    pub special_needs: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub follow_up_date: Option<NaiveDate>,
    pub status: String,
    pub assigned_to: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PlannedVisit> for DomainPlannedVisit {
    type Error = TypeConstraintError;

    fn try_from(visit: PlannedVisit) -> Result<Self, Self::Error> {
        Ok(Self {
            id: visit.id,
            church_id: visit.church_id,
            contact_id: visit.contact_id,
            event_name: visit.event_name,
            event_date: visit.event_date,
            interest_level: visit.interest_level,
            contact_preference: visit.contact_preference,
            companions_count: visit.companions_count,
            special_needs: visit.special_needs,
            notes: visit.notes,
            follow_up_date: visit.follow_up_date,
            status: visit.status.parse::<VisitStatus>()?,
            converted_at: visit.converted_at,
            assigned_to: visit.assigned_to,
            message_count: visit.message_count,
            last_message_at: visit.last_message_at,
            created_at: visit.created_at,
            updated_at: visit.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPlannedVisit> for NewPlannedVisit<'a> {
    fn from(visit: &'a DomainNewPlannedVisit) -> Self {
        Self {
            church_id: visit.church_id,
            contact_id: visit.contact_id,
            event_name: &visit.event_name,
            event_date: visit.event_date,
            interest_level: &visit.interest_level,
            contact_preference: &visit.contact_preference,
            companions_count: visit.companions_count,
            special_needs: visit.special_needs.as_deref(),
            notes: visit.notes.as_deref(),
            follow_up_date: visit.follow_up_date,
            assigned_to: visit.assigned_to.as_deref(),
        }
    }
}

impl<'a> UpdatePlannedVisit<'a> {
    pub fn from_domain(visit: &'a DomainUpdatePlannedVisit, now: NaiveDateTime) -> Self {
        Self {
            interest_level: &visit.interest_level,
            contact_preference: &visit.contact_preference,
            companions_count: visit.companions_count,
            special_needs: visit.special_needs.as_deref(),
            notes: visit.notes.as_deref(),
            follow_up_date: visit.follow_up_date,
            status: visit.status.to_string(),
            assigned_to: visit.assigned_to.as_deref(),
            updated_at: now,
        }
    }
}
