//! Newsletter workflows: subscriber sync and issue sending.

use chrono::Utc;
use serde_json::json;

use crate::domain::email::{EmailType, NewQueuedEmail};
use crate::domain::newsletter::{Issue, IssueStatus, NewSubscriber};
use crate::repository::{
    ContactListQuery, ContactReader, EmailQueueWriter, IssueReader, IssueWriter,
    SubscriberReader, SubscriberWriter,
};
use crate::services::{ServiceError, ServiceResult};

/// Subscribes every contact that has an email address. Existing subscriber
/// rows are left untouched, so unsubscribes survive a re-sync.
pub fn sync_contacts<R>(repo: &R, church_id: i32) -> ServiceResult<usize>
where
    R: ContactReader + SubscriberWriter + ?Sized,
{
    let (_, contacts) = repo.list_contacts(ContactListQuery::new(church_id))?;

    let subscribers: Vec<NewSubscriber> = contacts
        .into_iter()
        .filter_map(|contact| {
            let email = contact.email.clone()?;
            Some(NewSubscriber::new(
                church_id,
                email,
                Some(contact.full_name()),
                "contact_sync".to_string(),
            ))
        })
        .collect();

    repo.upsert_subscribers(&subscribers)
        .map_err(ServiceError::from)
}

/// Sends a draft issue to every subscribed address through the outbound
/// queue and marks it sent.
pub fn send_issue<R>(repo: &R, church_id: i32, issue_id: i32) -> ServiceResult<(Issue, usize)>
where
    R: IssueReader + IssueWriter + SubscriberReader + EmailQueueWriter + ?Sized,
{
    let issue = repo
        .get_issue_by_id(issue_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    if issue.status == IssueStatus::Sent {
        return Err(ServiceError::Conflict(
            "issue has already been sent".to_string(),
        ));
    }

    let subscribers = repo.list_subscribers(church_id, true)?;
    if subscribers.is_empty() {
        return Err(ServiceError::Validation(
            "there are no subscribed addresses".to_string(),
        ));
    }

    let emails: Vec<NewQueuedEmail> = subscribers
        .iter()
        .map(|subscriber| {
            NewQueuedEmail::new(
                church_id,
                subscriber.email.clone(),
                issue.subject.clone(),
                issue.html_body.clone(),
                EmailType::Bulk,
                json!({"newsletter_issue_id": issue.id}),
            )
        })
        .collect();

    let queued = repo.enqueue_emails(&emails)?;
    let issue = repo.mark_issue_sent(issue.id, Utc::now().naive_utc())?;

    Ok((issue, queued))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::contact::{Contact, Lifecycle};
    use crate::domain::newsletter::{Subscriber, SubscriberStatus};
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn contact(id: i32, email: Option<&str>) -> Contact {
        let now = Utc::now().naive_utc();
        Contact {
            id,
            church_id: 1,
            first_name: "C".to_string(),
            last_name: format!("{id}"),
            email: email.map(str::to_string),
            phone: None,
            address: None,
            lifecycle: Lifecycle::Member,
            created_at: now,
            updated_at: now,
            fields: None,
        }
    }

    fn subscriber(id: i32, email: &str) -> Subscriber {
        let now = Utc::now().naive_utc();
        Subscriber {
            id,
            church_id: 1,
            email: email.to_string(),
            name: None,
            status: SubscriberStatus::Subscribed,
            source: "manual".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn issue(status: IssueStatus) -> Issue {
        let now = Utc::now().naive_utc();
        Issue {
            id: 3,
            church_id: 1,
            subject: "March news".to_string(),
            html_body: "<p>News</p>".to_string(),
            status,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sync_skips_contacts_without_email() {
        let mut repo = MockRepository::new();
        repo.expect_list_contacts().returning(|_| {
            Ok((
                2,
                vec![contact(1, Some("a@example.com")), contact(2, None)],
            ))
        });
        repo.expect_upsert_subscribers()
            .withf(|subs| subs.len() == 1 && subs[0].email == "a@example.com")
            .times(1)
            .returning(|subs| Ok(subs.len()));

        let added = sync_contacts(&repo, 1).unwrap();
        assert_eq!(added, 1);
    }

    #[test]
    fn sending_an_issue_queues_one_email_per_subscriber() {
        let mut repo = MockRepository::new();
        repo.expect_get_issue_by_id()
            .returning(|_, _| Ok(Some(issue(IssueStatus::Draft))));
        repo.expect_list_subscribers().returning(|_, _| {
            Ok(vec![
                subscriber(1, "a@example.com"),
                subscriber(2, "b@example.com"),
            ])
        });
        repo.expect_enqueue_emails()
            .withf(|emails| emails.len() == 2 && emails[0].email_type == EmailType::Bulk)
            .times(1)
            .returning(|emails| Ok(emails.len()));
        repo.expect_mark_issue_sent().times(1).returning(|_, _| {
            let mut sent = issue(IssueStatus::Sent);
            sent.sent_at = Some(Utc::now().naive_utc());
            Ok(sent)
        });

        let (issue, queued) = send_issue(&repo, 1, 3).unwrap();
        assert_eq!(queued, 2);
        assert_eq!(issue.status, IssueStatus::Sent);
    }

    #[test]
    fn sent_issues_cannot_be_resent() {
        let mut repo = MockRepository::new();
        repo.expect_get_issue_by_id()
            .returning(|_, _| Ok(Some(issue(IssueStatus::Sent))));
        repo.expect_enqueue_emails().times(0);

        let result = send_issue(&repo, 1, 3);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }
}
