use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::newsletter::{
    Issue as DomainIssue, IssueStatus, NewIssue as DomainNewIssue,
    NewSubscriber as DomainNewSubscriber, Subscriber as DomainSubscriber, SubscriberStatus,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::newsletter_subscribers)]
pub struct Subscriber {
    pub id: i32,
    pub church_id: i32,
    pub email: String,
    pub name: Option<String>,
    pub status: String,
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::newsletter_subscribers)]
pub struct NewSubscriber<'a> {
    pub church_id: i32,
    pub email: &'a str,
    pub name: Option<&'a str>,
    pub source: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::newsletter_issues)]
pub struct Issue {
    pub id: i32,
    pub church_id: i32,
    pub subject: String,
    pub html_body: String,
    pub status: String,
    pub sent_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::newsletter_issues)]
pub struct NewIssue<'a> {
    pub church_id: i32,
    pub subject: &'a str,
    pub html_body: &'a str,
}

impl TryFrom<Subscriber> for DomainSubscriber {
    type Error = TypeConstraintError;

    fn try_from(subscriber: Subscriber) -> Result<Self, Self::Error> {
        Ok(Self {
            id: subscriber.id,
            church_id: subscriber.church_id,
            email: subscriber.email,
            name: subscriber.name,
            status: subscriber.status.parse::<SubscriberStatus>()?,
            source: subscriber.source,
            created_at: subscriber.created_at,
            updated_at: subscriber.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewSubscriber> for NewSubscriber<'a> {
    fn from(subscriber: &'a DomainNewSubscriber) -> Self {
        Self {
            church_id: subscriber.church_id,
            email: &subscriber.email,
            name: subscriber.name.as_deref(),
            source: &subscriber.source,
        }
    }
}

impl TryFrom<Issue> for DomainIssue {
    type Error = TypeConstraintError;

    fn try_from(issue: Issue) -> Result<Self, Self::Error> {
        Ok(Self {
            id: issue.id,
            church_id: issue.church_id,
            subject: issue.subject,
            html_body: issue.html_body,
            status: issue.status.parse::<IssueStatus>()?,
            sent_at: issue.sent_at,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewIssue> for NewIssue<'a> {
    fn from(issue: &'a DomainNewIssue) -> Self {
        Self {
            church_id: issue.church_id,
            subject: &issue.subject,
            html_body: &issue.html_body,
        }
    }
}
