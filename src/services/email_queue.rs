//! Outbound queue mechanics: retry backoff, sender account selection and the
//! batch hand-off to the delivery relay.

use chrono::{Duration, NaiveDateTime};
use rand::RngExt;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::comms::RecipientStatus;
use crate::domain::email::EmailType;
use crate::models::relay::RelayEmailMessage;
use crate::relay::OutboundRelay;
use crate::repository::{CampaignWriter, EmailQueueWriter};
use crate::services::ServiceResult;

/// Retry schedule after a failed delivery attempt. `attempts` is the number
/// of attempts already made.
pub fn backoff_delay(attempts: i32) -> Duration {
    const DELAY_MINUTES: [i64; 3] = [15, 60, 240];
    let index = (attempts - 1).clamp(0, DELAY_MINUTES.len() as i32 - 1) as usize;
    Duration::minutes(DELAY_MINUTES[index])
}

/// Picks the sender account for an email type. Bulk mail rotates across the
/// numbered no-reply pool so one mailbox does not carry a whole campaign.
pub fn sender_account(email_type: EmailType, domain: &str) -> String {
    match email_type {
        EmailType::Admin => format!("admin@{domain}"),
        EmailType::Info => format!("info@{domain}"),
        EmailType::Events => format!("events@{domain}"),
        EmailType::System => format!("no-reply@{domain}"),
        EmailType::Bulk => {
            let n = rand::rng().random_range(1..=9);
            format!("no-reply{n}@{domain}")
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Drains one batch of due queue entries, publishing each to the delivery
/// relay and recording the outcome. Campaign recipients referenced in the
/// entry metadata are kept in sync.
pub fn process_due_batch<R, T>(
    repo: &R,
    relay: &T,
    sender_domain: &str,
    batch_size: usize,
    max_attempts: i32,
    now: NaiveDateTime,
) -> ServiceResult<BatchReport>
where
    R: EmailQueueWriter + CampaignWriter + ?Sized,
    T: OutboundRelay + ?Sized,
{
    let claimed = repo.claim_due_emails(now, batch_size, max_attempts)?;
    let mut report = BatchReport {
        processed: claimed.len(),
        ..BatchReport::default()
    };

    for email in claimed {
        let message = RelayEmailMessage {
            id: Uuid::new_v4(),
            sender: sender_account(email.email_type, sender_domain),
            to: email.to_address.clone(),
            subject: email.subject.clone(),
            html_body: email.html_body.clone(),
            text_body: email.text_body.clone(),
            metadata: email.metadata.clone(),
        };

        let recipient_id = email
            .metadata
            .get("campaign_recipient_id")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        match relay.publish_email(&message) {
            Ok(()) => {
                repo.mark_email_sent(email.id, now)?;
                if let Some(recipient_id) = recipient_id {
                    repo.mark_campaign_recipient(
                        recipient_id,
                        RecipientStatus::Sent,
                        None,
                        Some(now),
                    )?;
                }
                report.sent += 1;
            }
            Err(e) => {
                let error = e.to_string();
                log::error!("Failed to hand email {} to the relay: {error}", email.id);
                let next_attempt_at = now + backoff_delay(email.attempts);
                repo.mark_email_failed(email.id, &error, next_attempt_at, now)?;

                // The recipient only becomes failed once retries are spent.
                if email.attempts >= max_attempts
                    && let Some(recipient_id) = recipient_id
                {
                    repo.mark_campaign_recipient(
                        recipient_id,
                        RecipientStatus::Failed,
                        Some(&error),
                        None,
                    )?;
                }
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_follows_retry_schedule() {
        assert_eq!(backoff_delay(1), Duration::minutes(15));
        assert_eq!(backoff_delay(2), Duration::minutes(60));
        assert_eq!(backoff_delay(3), Duration::minutes(240));
        // Further attempts keep the longest delay.
        assert_eq!(backoff_delay(7), Duration::minutes(240));
    }

    #[test]
    fn sender_accounts_match_email_types() {
        assert_eq!(
            sender_account(EmailType::Admin, "example.org"),
            "admin@example.org"
        );
        assert_eq!(
            sender_account(EmailType::System, "example.org"),
            "no-reply@example.org"
        );
        let bulk = sender_account(EmailType::Bulk, "example.org");
        assert!(bulk.starts_with("no-reply"));
        assert!(bulk.ends_with("@example.org"));
        assert_ne!(bulk, "no-reply@example.org");
    }

    #[cfg(feature = "test-mocks")]
    mod with_mock_repo {
        use super::*;
        use crate::domain::email::{QueueStatus, QueuedEmail};
        use crate::models::relay::{RelayPushMessage, RelayTextMessage};
        use crate::relay::RelayError;
        use crate::repository::mock::MockRepository;
        use chrono::Utc;
        use serde_json::json;
        use std::sync::Mutex;

        struct FakeRelay {
            emails: Mutex<Vec<RelayEmailMessage>>,
            fail: bool,
        }

        impl FakeRelay {
            fn new(fail: bool) -> Self {
                Self {
                    emails: Mutex::new(vec![]),
                    fail,
                }
            }
        }

        impl OutboundRelay for FakeRelay {
            fn publish_email(&self, message: &RelayEmailMessage) -> Result<(), RelayError> {
                if self.fail {
                    return Err(RelayError::ChannelClosed);
                }
                self.emails.lock().unwrap().push(message.clone());
                Ok(())
            }

            fn publish_push(&self, _message: &RelayPushMessage) -> Result<(), RelayError> {
                Ok(())
            }

            fn publish_text(&self, _message: &RelayTextMessage) -> Result<(), RelayError> {
                Ok(())
            }
        }

        fn queued(id: i32, attempts: i32) -> QueuedEmail {
            let now = Utc::now().naive_utc();
            QueuedEmail {
                id,
                church_id: 1,
                to_address: "member@example.com".to_string(),
                subject: "Hello".to_string(),
                html_body: "<p>Hi</p>".to_string(),
                text_body: Some("Hi".to_string()),
                email_type: EmailType::Bulk,
                status: QueueStatus::Sending,
                attempts,
                last_attempt_at: Some(now),
                next_attempt_at: now,
                error: None,
                metadata: json!({"campaign_recipient_id": 42}),
                sent_at: None,
                created_at: now,
                updated_at: now,
            }
        }

        #[test]
        fn successful_publish_marks_sent_and_updates_recipient() {
            let now = Utc::now().naive_utc();
            let mut repo = MockRepository::new();
            repo.expect_claim_due_emails()
                .times(1)
                .returning(|_, _, _| Ok(vec![queued(1, 1)]));
            repo.expect_mark_email_sent()
                .withf(|id, _| *id == 1)
                .times(1)
                .returning(|_, _| Ok(()));
            repo.expect_mark_campaign_recipient()
                .withf(|id, status, _, _| *id == 42 && *status == RecipientStatus::Sent)
                .times(1)
                .returning(|_, _, _, _| Ok(()));

            let relay = FakeRelay::new(false);
            let report =
                process_due_batch(&repo, &relay, "example.org", 20, 3, now).expect("batch");

            assert_eq!(report.sent, 1);
            assert_eq!(report.failed, 0);
            assert_eq!(relay.emails.lock().unwrap().len(), 1);
        }

        #[test]
        fn failed_publish_schedules_retry() {
            let now = Utc::now().naive_utc();
            let mut repo = MockRepository::new();
            repo.expect_claim_due_emails()
                .times(1)
                .returning(|_, _, _| Ok(vec![queued(1, 1)]));
            let expected_retry = now + Duration::minutes(15);
            repo.expect_mark_email_failed()
                .withf(move |id, _, next, _| *id == 1 && *next == expected_retry)
                .times(1)
                .returning(|_, _, _, _| Ok(()));
            // First failure of three allowed attempts: recipient stays pending.
            repo.expect_mark_campaign_recipient().times(0);

            let relay = FakeRelay::new(true);
            let report =
                process_due_batch(&repo, &relay, "example.org", 20, 3, now).expect("batch");

            assert_eq!(report.failed, 1);
        }

        #[test]
        fn final_failure_marks_recipient_failed() {
            let now = Utc::now().naive_utc();
            let mut repo = MockRepository::new();
            repo.expect_claim_due_emails()
                .times(1)
                .returning(|_, _, _| Ok(vec![queued(1, 3)]));
            repo.expect_mark_email_failed()
                .times(1)
                .returning(|_, _, _, _| Ok(()));
            repo.expect_mark_campaign_recipient()
                .withf(|id, status, error, _| {
                    *id == 42 && *status == RecipientStatus::Failed && error.is_some()
                })
                .times(1)
                .returning(|_, _, _, _| Ok(()));

            let relay = FakeRelay::new(true);
            let report =
                process_due_batch(&repo, &relay, "example.org", 20, 3, now).expect("batch");

            assert_eq!(report.failed, 1);
        }
    }
}
