use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::newsletter::{Issue, NewIssue, NewSubscriber, Subscriber, SubscriberStatus};
use crate::models::newsletter::{
    Issue as DbIssue, NewIssue as DbNewIssue, NewSubscriber as DbNewSubscriber,
    Subscriber as DbSubscriber,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, IssueReader, IssueWriter, SubscriberReader,
    SubscriberWriter};

impl SubscriberReader for DieselRepository {
    fn list_subscribers(
        &self,
        church_id: i32,
        subscribed_only: bool,
    ) -> RepositoryResult<Vec<Subscriber>> {
        use crate::schema::newsletter_subscribers;

        let mut conn = self.conn()?;

        let mut query = newsletter_subscribers::table
            .filter(newsletter_subscribers::church_id.eq(church_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if subscribed_only {
            query = query.filter(
                newsletter_subscribers::status.eq(SubscriberStatus::Subscribed.to_string()),
            );
        }

        query
            .order(newsletter_subscribers::email.asc())
            .load::<DbSubscriber>(&mut conn)?
            .into_iter()
            .map(|s| Subscriber::try_from(s).map_err(RepositoryError::from))
            .collect()
    }
}

impl SubscriberWriter for DieselRepository {
    fn upsert_subscribers(&self, subscribers: &[NewSubscriber]) -> RepositoryResult<usize> {
        use crate::schema::newsletter_subscribers;

        let mut conn = self.conn()?;
        let mut inserted = 0;

        for subscriber in subscribers {
            let insertable: DbNewSubscriber = subscriber.into();
            inserted += diesel::insert_into(newsletter_subscribers::table)
                .values(&insertable)
                .on_conflict_do_nothing()
                .execute(&mut conn)?;
        }

        Ok(inserted)
    }

    fn unsubscribe(&self, church_id: i32, email: &str) -> RepositoryResult<bool> {
        use crate::schema::newsletter_subscribers;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            newsletter_subscribers::table
                .filter(newsletter_subscribers::church_id.eq(church_id))
                .filter(newsletter_subscribers::email.eq(email)),
        )
        .set((
            newsletter_subscribers::status.eq(SubscriberStatus::Unsubscribed.to_string()),
            newsletter_subscribers::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }
}

impl IssueReader for DieselRepository {
    fn get_issue_by_id(&self, id: i32, church_id: i32) -> RepositoryResult<Option<Issue>> {
        use crate::schema::newsletter_issues;

        let mut conn = self.conn()?;
        let issue = newsletter_issues::table
            .find(id)
            .filter(newsletter_issues::church_id.eq(church_id))
            .first::<DbIssue>(&mut conn)
            .optional()?;

        match issue {
            Some(issue) => Ok(Some(Issue::try_from(issue).map_err(RepositoryError::from)?)),
            None => Ok(None),
        }
    }

    fn list_issues(&self, church_id: i32) -> RepositoryResult<Vec<Issue>> {
        use crate::schema::newsletter_issues;

        let mut conn = self.conn()?;
        newsletter_issues::table
            .filter(newsletter_issues::church_id.eq(church_id))
            .order(newsletter_issues::created_at.desc())
            .load::<DbIssue>(&mut conn)?
            .into_iter()
            .map(|i| Issue::try_from(i).map_err(RepositoryError::from))
            .collect()
    }
}

impl IssueWriter for DieselRepository {
    fn create_issue(&self, issue: &NewIssue) -> RepositoryResult<Issue> {
        use crate::schema::newsletter_issues;

        let mut conn = self.conn()?;
        let insertable: DbNewIssue = issue.into();

        let created = diesel::insert_into(newsletter_issues::table)
            .values(&insertable)
            .get_result::<DbIssue>(&mut conn)?;

        Issue::try_from(created).map_err(RepositoryError::from)
    }

    fn mark_issue_sent(&self, issue_id: i32, sent_at: NaiveDateTime) -> RepositoryResult<Issue> {
        use crate::schema::newsletter_issues;

        let mut conn = self.conn()?;
        let updated = diesel::update(newsletter_issues::table.find(issue_id))
            .set((
                newsletter_issues::status.eq("sent"),
                newsletter_issues::sent_at.eq(Some(sent_at)),
                newsletter_issues::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbIssue>(&mut conn)?;

        Issue::try_from(updated).map_err(RepositoryError::from)
    }
}
