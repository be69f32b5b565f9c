//! Repository implementation for the outbound email queue.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::email::{NewQueuedEmail, QueueStatus, QueuedEmail};
use crate::models::email_queue::{NewQueuedEmail as DbNewQueuedEmail, QueuedEmail as DbQueuedEmail};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, EmailQueueReader, EmailQueueWriter};

impl EmailQueueReader for DieselRepository {
    fn get_queued_email(&self, id: i32) -> RepositoryResult<Option<QueuedEmail>> {
        use crate::schema::email_queue;

        let mut conn = self.conn()?;
        let email = email_queue::table
            .find(id)
            .first::<DbQueuedEmail>(&mut conn)
            .optional()?;

        match email {
            Some(email) => Ok(Some(
                QueuedEmail::try_from(email).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }
}

impl EmailQueueWriter for DieselRepository {
    fn enqueue_emails(&self, emails: &[NewQueuedEmail]) -> RepositoryResult<usize> {
        use crate::schema::email_queue;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewQueuedEmail> = emails.iter().map(|e| e.into()).collect();

        let inserted = diesel::insert_into(email_queue::table)
            .values(&insertables)
            .execute(&mut conn)?;

        Ok(inserted)
    }

    fn claim_due_emails(
        &self,
        now: NaiveDateTime,
        batch_size: usize,
        max_attempts: i32,
    ) -> RepositoryResult<Vec<QueuedEmail>> {
        use crate::schema::email_queue;

        let mut conn = self.conn()?;

        conn.transaction::<Vec<QueuedEmail>, RepositoryError, _>(move |conn| {
            let due = email_queue::table
                .filter(email_queue::status.eq_any(vec![
                    QueueStatus::Pending.to_string(),
                    QueueStatus::Failed.to_string(),
                ]))
                .filter(email_queue::next_attempt_at.le(now))
                .filter(email_queue::attempts.lt(max_attempts))
                .order(email_queue::created_at.asc())
                .limit(batch_size as i64)
                .load::<DbQueuedEmail>(conn)?;

            let mut claimed = Vec::with_capacity(due.len());
            for email in due {
                diesel::update(email_queue::table.find(email.id))
                    .set((
                        email_queue::status.eq(QueueStatus::Sending.to_string()),
                        email_queue::attempts.eq(email.attempts + 1),
                        email_queue::last_attempt_at.eq(Some(now)),
                        email_queue::updated_at.eq(now),
                    ))
                    .execute(conn)?;

                let mut email = QueuedEmail::try_from(email).map_err(RepositoryError::from)?;
                email.status = QueueStatus::Sending;
                email.attempts += 1;
                email.last_attempt_at = Some(now);
                claimed.push(email);
            }

            Ok(claimed)
        })
    }

    fn mark_email_sent(&self, email_id: i32, sent_at: NaiveDateTime) -> RepositoryResult<()> {
        use crate::schema::email_queue;

        let mut conn = self.conn()?;

        // Only status/sent_at/updated_at change; the attempt counters were
        // already bumped when the entry was claimed.
        diesel::update(email_queue::table.find(email_id))
            .set((
                email_queue::status.eq(QueueStatus::Sent.to_string()),
                email_queue::sent_at.eq(Some(sent_at)),
                email_queue::error.eq(None::<String>),
                email_queue::updated_at.eq(sent_at),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    fn mark_email_failed(
        &self,
        email_id: i32,
        error: &str,
        next_attempt_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> RepositoryResult<()> {
        use crate::schema::email_queue;

        let mut conn = self.conn()?;
        diesel::update(email_queue::table.find(email_id))
            .set((
                email_queue::status.eq(QueueStatus::Failed.to_string()),
                email_queue::error.eq(Some(error)),
                email_queue::next_attempt_at.eq(next_attempt_at),
                email_queue::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
