//! Campaign workflows: recipient fan-out, dispatch, scheduling and metrics.

use chrono::{NaiveDateTime, Utc};
use serde_json::json;

use crate::domain::comms::{
    Campaign, CampaignMetrics, CampaignStatus, Channel, NewCampaign, NewCampaignRecipient,
    RecipientStatus, Template,
};
use crate::domain::contact::Contact;
use crate::domain::email::{EmailType, NewQueuedEmail};
use crate::models::relay::{RelayPushMessage, RelayTextMessage};
use crate::relay::OutboundRelay;
use crate::repository::{
    CampaignReader, CampaignWriter, ContactListQuery, ContactReader, EmailQueueWriter,
    TemplateReader,
};
use crate::services::{ServiceError, ServiceResult};

/// Fills `{{placeholder}}` variables in a template string from contact data.
pub fn render_template(text: &str, contact: &Contact) -> String {
    text.replace("{{first_name}}", &contact.first_name)
        .replace("{{last_name}}", &contact.last_name)
        .replace("{{full_name}}", &contact.full_name())
        .replace("{{email}}", contact.email.as_deref().unwrap_or(""))
}

/// Creates a campaign after checking the template exists and matches the
/// requested channel.
pub fn create_campaign<R>(repo: &R, campaign: &NewCampaign) -> ServiceResult<Campaign>
where
    R: CampaignWriter + TemplateReader + ?Sized,
{
    let template = repo
        .get_template_by_id(campaign.template_id, campaign.church_id)?
        .ok_or_else(|| ServiceError::Validation("template not found".to_string()))?;

    if template.channel != campaign.channel {
        return Err(ServiceError::Validation(format!(
            "template channel {} does not match campaign channel {}",
            template.channel, campaign.channel
        )));
    }

    repo.create_campaign(campaign).map_err(ServiceError::from)
}

/// The address book slice a campaign goes out to: every contact that has an
/// address for the campaign's channel.
fn recipients_for_channel<R>(
    repo: &R,
    church_id: i32,
    channel: Channel,
) -> ServiceResult<Vec<(Contact, String)>>
where
    R: ContactReader + ?Sized,
{
    let (_, contacts) = repo.list_contacts(ContactListQuery::new(church_id))?;

    let recipients = contacts
        .into_iter()
        .filter_map(|contact| {
            let address = match channel {
                Channel::Email => contact.email.clone(),
                Channel::Sms | Channel::Whatsapp => contact.phone.clone(),
                Channel::Push => None,
            };
            address.map(|address| (contact, address))
        })
        .collect();

    Ok(recipients)
}

/// Renders and hands a campaign to its channel: email goes through the
/// durable queue, text channels and push go straight to the relay. Returns
/// the number of recipients reached.
pub fn fan_out_campaign<R, T>(
    repo: &R,
    relay: &T,
    campaign: &Campaign,
    template: &Template,
) -> ServiceResult<usize>
where
    R: CampaignReader + CampaignWriter + ContactReader + EmailQueueWriter + ?Sized,
    T: OutboundRelay + ?Sized,
{
    if campaign.channel == Channel::Push {
        // Push campaigns broadcast to the mobile audience; there is no
        // per-contact recipient list to track.
        relay.publish_push(&RelayPushMessage {
            user_ids: vec![],
            title: template.subject.clone(),
            body: template.body.clone(),
            data: json!({"campaign_id": campaign.id}),
        })?;
        return Ok(0);
    }

    let contacts = recipients_for_channel(repo, campaign.church_id, campaign.channel)?;
    if contacts.is_empty() {
        return Err(ServiceError::Validation(
            "campaign has no recipients".to_string(),
        ));
    }

    // Recipients are only built once; a re-dispatch reuses the existing list.
    let mut recipients = repo.list_campaign_recipients(campaign.id)?;
    if recipients.is_empty() {
        let new_recipients: Vec<NewCampaignRecipient> = contacts
            .iter()
            .map(|(contact, address)| NewCampaignRecipient {
                campaign_id: campaign.id,
                contact_id: contact.id,
                address: address.clone(),
            })
            .collect();
        repo.add_campaign_recipients(&new_recipients)?;
        recipients = repo.list_campaign_recipients(campaign.id)?;
    }

    let now = Utc::now().naive_utc();
    let mut reached = 0;

    match campaign.channel {
        Channel::Email => {
            let mut emails = Vec::new();
            for recipient in &recipients {
                if recipient.status != RecipientStatus::Pending {
                    continue;
                }
                let Some((contact, _)) = contacts
                    .iter()
                    .find(|(contact, _)| contact.id == recipient.contact_id)
                else {
                    continue;
                };

                emails.push(NewQueuedEmail::new(
                    campaign.church_id,
                    recipient.address.clone(),
                    render_template(&template.subject, contact),
                    render_template(&template.body, contact),
                    EmailType::Bulk,
                    json!({
                        "campaign_id": campaign.id,
                        "campaign_recipient_id": recipient.id,
                    }),
                ));
            }
            if !emails.is_empty() {
                reached = repo.enqueue_emails(&emails)?;
            }
        }
        Channel::Sms | Channel::Whatsapp => {
            for recipient in &recipients {
                if recipient.status != RecipientStatus::Pending {
                    continue;
                }
                let Some((contact, _)) = contacts
                    .iter()
                    .find(|(contact, _)| contact.id == recipient.contact_id)
                else {
                    continue;
                };

                let outcome = relay.publish_text(&RelayTextMessage {
                    channel: campaign.channel.to_string(),
                    to: recipient.address.clone(),
                    body: render_template(&template.body, contact),
                });

                match outcome {
                    Ok(()) => {
                        repo.mark_campaign_recipient(
                            recipient.id,
                            RecipientStatus::Sent,
                            None,
                            Some(now),
                        )?;
                        reached += 1;
                    }
                    Err(e) => {
                        repo.mark_campaign_recipient(
                            recipient.id,
                            RecipientStatus::Failed,
                            Some(&e.to_string()),
                            None,
                        )?;
                    }
                }
            }
        }
        Channel::Push => unreachable!("handled above"),
    }

    Ok(reached)
}

/// "Dispatch Now": validates the campaign can go out, fans it out, and moves
/// it to `sending`. Non-push campaigns with nobody to reach are rejected.
pub fn dispatch_now<R, T>(
    repo: &R,
    relay: &T,
    campaign_id: i32,
    church_id: i32,
) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ContactReader + TemplateReader + EmailQueueWriter
        + ?Sized,
    T: OutboundRelay + ?Sized,
{
    let campaign = repo
        .get_campaign_by_id(campaign_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    if !matches!(
        campaign.status,
        CampaignStatus::Draft | CampaignStatus::Scheduled
    ) {
        return Err(ServiceError::Conflict(format!(
            "campaign is already {}",
            campaign.status
        )));
    }

    let template = repo
        .get_template_by_id(campaign.template_id, church_id)?
        .ok_or_else(|| ServiceError::Validation("template not found".to_string()))?;

    fan_out_campaign(repo, relay, &campaign, &template)?;

    let now = Utc::now().naive_utc();
    repo.set_campaign_status(campaign.id, CampaignStatus::Sending, Some(now))
        .map_err(ServiceError::from)
}

/// Moves a draft campaign to `scheduled` for the worker to pick up.
pub fn schedule<R>(
    repo: &R,
    campaign_id: i32,
    church_id: i32,
    scheduled_at: NaiveDateTime,
) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ?Sized,
{
    let campaign = repo
        .get_campaign_by_id(campaign_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    if campaign.status != CampaignStatus::Draft {
        return Err(ServiceError::Conflict(format!(
            "only draft campaigns can be scheduled, this one is {}",
            campaign.status
        )));
    }

    repo.set_campaign_status(campaign.id, CampaignStatus::Scheduled, Some(scheduled_at))
        .map_err(ServiceError::from)
}

/// Cancels a scheduled campaign back to draft.
pub fn cancel<R>(repo: &R, campaign_id: i32, church_id: i32) -> ServiceResult<Campaign>
where
    R: CampaignReader + CampaignWriter + ?Sized,
{
    let campaign = repo
        .get_campaign_by_id(campaign_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    if campaign.status != CampaignStatus::Scheduled {
        return Err(ServiceError::Conflict(format!(
            "only scheduled campaigns can be cancelled, this one is {}",
            campaign.status
        )));
    }

    repo.set_campaign_status(campaign.id, CampaignStatus::Draft, None)
        .map_err(ServiceError::from)
}

/// Worker tick: promotes due scheduled campaigns and fans them out.
pub fn promote_due_campaigns<R, T>(
    repo: &R,
    relay: &T,
    now: NaiveDateTime,
) -> ServiceResult<usize>
where
    R: CampaignReader + CampaignWriter + ContactReader + TemplateReader + EmailQueueWriter
        + ?Sized,
    T: OutboundRelay + ?Sized,
{
    let due = repo.list_due_campaigns(now)?;
    let mut promoted = 0;

    for campaign in due {
        let Some(template) =
            repo.get_template_by_id(campaign.template_id, campaign.church_id)?
        else {
            log::error!(
                "Campaign {} references missing template {}",
                campaign.id,
                campaign.template_id
            );
            continue;
        };

        match fan_out_campaign(repo, relay, &campaign, &template) {
            Ok(reached) => {
                log::info!("Campaign {} fanned out to {reached} recipients", campaign.id);
                repo.set_campaign_status(campaign.id, CampaignStatus::Sending, Some(now))?;
                promoted += 1;
            }
            Err(e) => {
                log::error!("Failed to fan out campaign {}: {e}", campaign.id);
            }
        }
    }

    Ok(promoted)
}

/// Worker tick: completes campaigns whose recipients are all resolved.
pub fn finalize_sending_campaigns<R>(repo: &R) -> ServiceResult<usize>
where
    R: CampaignReader + CampaignWriter + ?Sized,
{
    let sending = repo.list_sending_campaigns()?;
    let mut completed = 0;

    for campaign in sending {
        let metrics = repo.campaign_metrics(campaign.id)?;
        if metrics.pending_count == 0 {
            repo.set_campaign_status(
                campaign.id,
                CampaignStatus::Completed,
                campaign.scheduled_at,
            )?;
            completed += 1;
        }
    }

    Ok(completed)
}

pub fn metrics<R>(repo: &R, campaign_id: i32, church_id: i32) -> ServiceResult<CampaignMetrics>
where
    R: CampaignReader + ?Sized,
{
    repo.get_campaign_by_id(campaign_id, church_id)?
        .ok_or(ServiceError::NotFound)?;
    repo.campaign_metrics(campaign_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::Lifecycle;
    use chrono::Utc;

    fn contact(id: i32, first: &str, email: Option<&str>) -> Contact {
        let now = Utc::now().naive_utc();
        Contact {
            id,
            church_id: 1,
            first_name: first.to_string(),
            last_name: "Member".to_string(),
            email: email.map(str::to_string),
            phone: None,
            address: None,
            lifecycle: Lifecycle::Member,
            created_at: now,
            updated_at: now,
            fields: None,
        }
    }

    #[test]
    fn template_variables_are_substituted() {
        let contact = contact(1, "Grace", Some("grace@example.com"));
        let rendered = render_template("Hi {{first_name}} ({{email}})", &contact);
        assert_eq!(rendered, "Hi Grace (grace@example.com)");
    }

    #[cfg(feature = "test-mocks")]
    mod with_mock_repo {
        use super::*;
        use crate::models::relay::RelayEmailMessage;
        use crate::relay::RelayError;
        use crate::repository::mock::MockRepository;

        struct NullRelay;

        impl OutboundRelay for NullRelay {
            fn publish_email(&self, _m: &RelayEmailMessage) -> Result<(), RelayError> {
                Ok(())
            }
            fn publish_push(&self, _m: &RelayPushMessage) -> Result<(), RelayError> {
                Ok(())
            }
            fn publish_text(&self, _m: &RelayTextMessage) -> Result<(), RelayError> {
                Ok(())
            }
        }

        fn campaign(id: i32, channel: Channel, status: CampaignStatus) -> Campaign {
            let now = Utc::now().naive_utc();
            Campaign {
                id,
                church_id: 1,
                template_id: 5,
                name: "Easter invite".to_string(),
                channel,
                status,
                scheduled_at: None,
                created_by: "u1".to_string(),
                created_at: now,
                updated_at: now,
            }
        }

        fn template(channel: Channel) -> Template {
            let now = Utc::now().naive_utc();
            Template {
                id: 5,
                church_id: 1,
                name: "Invite".to_string(),
                channel,
                subject: "Hello {{first_name}}".to_string(),
                body: "You are invited".to_string(),
                created_at: now,
                updated_at: now,
            }
        }

        #[test]
        fn email_dispatch_with_zero_recipients_is_rejected() {
            let mut repo = MockRepository::new();
            repo.expect_get_campaign_by_id()
                .returning(|id, _| Ok(Some(campaign(id, Channel::Email, CampaignStatus::Draft))));
            repo.expect_get_template_by_id()
                .returning(|_, _| Ok(Some(template(Channel::Email))));
            // Nobody has an email address.
            repo.expect_list_contacts()
                .returning(|_| Ok((1, vec![contact(1, "NoEmail", None)])));
            repo.expect_set_campaign_status().times(0);

            let result = dispatch_now(&repo, &NullRelay, 9, 1);
            assert!(matches!(result, Err(ServiceError::Validation(_))));
        }

        #[test]
        fn push_dispatch_with_zero_recipients_is_allowed() {
            let mut repo = MockRepository::new();
            repo.expect_get_campaign_by_id()
                .returning(|id, _| Ok(Some(campaign(id, Channel::Push, CampaignStatus::Draft))));
            repo.expect_get_template_by_id()
                .returning(|_, _| Ok(Some(template(Channel::Push))));
            repo.expect_set_campaign_status()
                .withf(|_, status, _| *status == CampaignStatus::Sending)
                .times(1)
                .returning(|id, status, at| {
                    let mut c = campaign(id, Channel::Push, CampaignStatus::Draft);
                    c.status = status;
                    c.scheduled_at = at;
                    Ok(c)
                });

            let sent = dispatch_now(&repo, &NullRelay, 9, 1).expect("push dispatch");
            assert_eq!(sent.status, CampaignStatus::Sending);
        }

        #[test]
        fn email_dispatch_builds_recipients_and_queues_rendered_mail() {
            let mut repo = MockRepository::new();
            repo.expect_get_campaign_by_id()
                .returning(|id, _| Ok(Some(campaign(id, Channel::Email, CampaignStatus::Draft))));
            repo.expect_get_template_by_id()
                .returning(|_, _| Ok(Some(template(Channel::Email))));
            repo.expect_list_contacts().returning(|_| {
                Ok((1, vec![contact(1, "Grace", Some("grace@example.com"))]))
            });

            let mut recipient_lists = vec![
                // First read: none yet.
                vec![],
                // Second read after insertion.
                vec![crate::domain::comms::CampaignRecipient {
                    id: 77,
                    campaign_id: 9,
                    contact_id: 1,
                    address: "grace@example.com".to_string(),
                    status: RecipientStatus::Pending,
                    error: None,
                    sent_at: None,
                }],
            ];
            repo.expect_list_campaign_recipients()
                .times(2)
                .returning(move |_| Ok(recipient_lists.remove(0)));
            repo.expect_add_campaign_recipients()
                .withf(|recipients| {
                    recipients.len() == 1 && recipients[0].address == "grace@example.com"
                })
                .times(1)
                .returning(|r| Ok(r.len()));
            repo.expect_enqueue_emails()
                .withf(|emails| {
                    emails.len() == 1
                        && emails[0].subject == "Hello Grace"
                        && emails[0].email_type == EmailType::Bulk
                        && emails[0].metadata["campaign_recipient_id"] == 77
                })
                .times(1)
                .returning(|emails| Ok(emails.len()));
            repo.expect_set_campaign_status()
                .times(1)
                .returning(|id, status, at| {
                    let mut c = campaign(id, Channel::Email, CampaignStatus::Draft);
                    c.status = status;
                    c.scheduled_at = at;
                    Ok(c)
                });

            let sent = dispatch_now(&repo, &NullRelay, 9, 1).expect("dispatch");
            assert_eq!(sent.status, CampaignStatus::Sending);
        }

        #[test]
        fn completed_campaign_cannot_be_redispatched() {
            let mut repo = MockRepository::new();
            repo.expect_get_campaign_by_id().returning(|id, _| {
                Ok(Some(campaign(id, Channel::Email, CampaignStatus::Completed)))
            });

            let result = dispatch_now(&repo, &NullRelay, 9, 1);
            assert!(matches!(result, Err(ServiceError::Conflict(_))));
        }

        #[test]
        fn finalize_completes_only_drained_campaigns() {
            let mut repo = MockRepository::new();
            repo.expect_list_sending_campaigns().returning(|| {
                Ok(vec![
                    campaign(1, Channel::Email, CampaignStatus::Sending),
                    campaign(2, Channel::Email, CampaignStatus::Sending),
                ])
            });
            repo.expect_campaign_metrics().returning(|id| {
                Ok(CampaignMetrics {
                    total_recipients: 10,
                    pending_count: if id == 1 { 0 } else { 4 },
                    sent_count: 6,
                    failed_count: 0,
                })
            });
            repo.expect_set_campaign_status()
                .withf(|id, status, _| *id == 1 && *status == CampaignStatus::Completed)
                .times(1)
                .returning(|id, status, at| {
                    let mut c = campaign(id, Channel::Email, CampaignStatus::Sending);
                    c.status = status;
                    c.scheduled_at = at;
                    Ok(c)
                });

            let completed = finalize_sending_campaigns(&repo).expect("finalize");
            assert_eq!(completed, 1);
        }
    }
}
