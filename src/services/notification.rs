//! Unified notification dispatch with layered preference gates.
//!
//! A notification only goes out on a method when, in order, the church-wide
//! switch, the per-type setting (including its role list) and the recipient's
//! own preference all allow it. Missing configuration defaults to allow, so a
//! fresh install notifies everyone until an admin tightens things.

use serde_json::json;

use crate::domain::email::{EmailType, NewQueuedEmail};
use crate::domain::notification::{
    NewInAppNotification, NotificationMethod, NotificationOutcome, NotificationPayload,
};
use crate::models::relay::RelayPushMessage;
use crate::relay::OutboundRelay;
use crate::repository::{EmailQueueWriter, NotificationReader, NotificationWriter};
use crate::services::ServiceResult;

/// Resolves the gate chain for one recipient, type and method.
pub fn should_send<R>(
    repo: &R,
    church_id: i32,
    notification_type: &str,
    method: NotificationMethod,
    recipient_user_id: &str,
    recipient_roles: &[String],
) -> ServiceResult<bool>
where
    R: NotificationReader + ?Sized,
{
    if let Some(global) = repo.get_global_settings(church_id)?
        && !global.allows(method)
    {
        log::debug!("{method} notifications disabled church-wide");
        return Ok(false);
    }

    if let Some(setting) = repo.get_type_setting(church_id, notification_type, method)? {
        if !setting.enabled {
            log::debug!("{notification_type} {method} notifications disabled");
            return Ok(false);
        }
        if !setting.roles.is_empty()
            && !recipient_roles.iter().any(|role| setting.roles.contains(role))
        {
            log::debug!(
                "recipient roles not allowed for {notification_type} {method} notifications"
            );
            return Ok(false);
        }
    }

    if let Some(pref) = repo.get_user_preference(recipient_user_id, notification_type, method)?
        && !pref.enabled
    {
        log::debug!("recipient disabled {notification_type} {method} notifications");
        return Ok(false);
    }

    Ok(true)
}

/// Dispatches a notification over every method its gates allow: email through
/// the outbound queue, push via the relay, and an in-app entry for the feed.
pub fn notify<R, T>(
    repo: &R,
    relay: &T,
    church_id: i32,
    recipient_email: Option<&str>,
    recipient_roles: &[String],
    payload: &NotificationPayload,
) -> ServiceResult<NotificationOutcome>
where
    R: NotificationReader + NotificationWriter + EmailQueueWriter + ?Sized,
    T: OutboundRelay + ?Sized,
{
    let mut outcome = NotificationOutcome::default();

    if let Some(address) = recipient_email
        && should_send(
            repo,
            church_id,
            &payload.notification_type,
            NotificationMethod::Email,
            &payload.recipient_user_id,
            recipient_roles,
        )?
    {
        let subject = payload
            .email_subject
            .clone()
            .unwrap_or_else(|| payload.title.clone());
        let body = payload
            .email_body
            .clone()
            .unwrap_or_else(|| format!("<p>{}</p>", payload.message));

        repo.enqueue_emails(&[NewQueuedEmail::new(
            church_id,
            address.to_string(),
            subject,
            body,
            EmailType::System,
            json!({
                "notification_type": payload.notification_type,
                "urgency": payload.urgency,
            }),
        )])?;
        outcome.email_sent = true;
    }

    if should_send(
        repo,
        church_id,
        &payload.notification_type,
        NotificationMethod::Push,
        &payload.recipient_user_id,
        recipient_roles,
    )? {
        relay.publish_push(&RelayPushMessage {
            user_ids: vec![payload.recipient_user_id.clone()],
            title: payload.title.clone(),
            body: payload.message.clone(),
            data: payload.data.clone(),
        })?;
        outcome.push_sent = true;
    }

    if should_send(
        repo,
        church_id,
        &payload.notification_type,
        NotificationMethod::InApp,
        &payload.recipient_user_id,
        recipient_roles,
    )? {
        repo.create_in_app_notification(&NewInAppNotification {
            church_id,
            user_id: payload.recipient_user_id.clone(),
            title: payload.title.clone(),
            body: payload.message.clone(),
            data: payload.data.clone(),
        })?;
        outcome.in_app_stored = true;
    }

    Ok(outcome)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::notification::{GlobalSettings, TypeSetting, Urgency, UserPreference};
    use crate::models::relay::{RelayEmailMessage, RelayTextMessage};
    use crate::relay::RelayError;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

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

    fn global(email: bool) -> GlobalSettings {
        GlobalSettings {
            church_id: 1,
            email_enabled: email,
            push_enabled: true,
            sms_enabled: true,
            in_app_enabled: true,
        }
    }

    fn type_setting(enabled: bool, roles: Vec<String>) -> TypeSetting {
        TypeSetting {
            id: 1,
            church_id: 1,
            notification_type: "follow_up_assigned".to_string(),
            method: NotificationMethod::Email,
            enabled,
            roles,
        }
    }

    fn payload() -> NotificationPayload {
        NotificationPayload {
            notification_type: "follow_up_assigned".to_string(),
            recipient_user_id: "u1".to_string(),
            title: "Follow-up assigned".to_string(),
            message: "You have a new follow-up".to_string(),
            email_subject: None,
            email_body: None,
            data: serde_json::json!({}),
            urgency: Urgency::Normal,
        }
    }

    #[test]
    fn missing_configuration_defaults_to_allow() {
        let mut repo = MockRepository::new();
        repo.expect_get_global_settings().returning(|_| Ok(None));
        repo.expect_get_type_setting().returning(|_, _, _| Ok(None));
        repo.expect_get_user_preference().returning(|_, _, _| Ok(None));

        let allowed = should_send(
            &repo,
            1,
            "follow_up_assigned",
            NotificationMethod::Email,
            "u1",
            &[],
        )
        .unwrap();
        assert!(allowed);
    }

    #[test]
    fn global_switch_blocks_method() {
        let mut repo = MockRepository::new();
        repo.expect_get_global_settings()
            .returning(|_| Ok(Some(global(false))));
        repo.expect_get_type_setting().times(0);
        repo.expect_get_user_preference().times(0);

        let allowed = should_send(
            &repo,
            1,
            "follow_up_assigned",
            NotificationMethod::Email,
            "u1",
            &[],
        )
        .unwrap();
        assert!(!allowed);
    }

    #[test]
    fn type_setting_role_list_restricts_recipients() {
        let mut repo = MockRepository::new();
        repo.expect_get_global_settings()
            .returning(|_| Ok(Some(global(true))));
        repo.expect_get_type_setting()
            .returning(|_, _, _| Ok(Some(type_setting(true, vec!["church_admin".to_string()]))));
        repo.expect_get_user_preference().returning(|_, _, _| Ok(None));

        let member_allowed = should_send(
            &repo,
            1,
            "follow_up_assigned",
            NotificationMethod::Email,
            "u1",
            &["church".to_string()],
        )
        .unwrap();
        assert!(!member_allowed);

        let admin_allowed = should_send(
            &repo,
            1,
            "follow_up_assigned",
            NotificationMethod::Email,
            "u1",
            &["church".to_string(), "church_admin".to_string()],
        )
        .unwrap();
        assert!(admin_allowed);
    }

    #[test]
    fn user_preference_wins_last() {
        let mut repo = MockRepository::new();
        repo.expect_get_global_settings()
            .returning(|_| Ok(Some(global(true))));
        repo.expect_get_type_setting()
            .returning(|_, _, _| Ok(Some(type_setting(true, vec![]))));
        repo.expect_get_user_preference().returning(|_, _, _| {
            Ok(Some(UserPreference {
                user_id: "u1".to_string(),
                notification_type: "follow_up_assigned".to_string(),
                method: NotificationMethod::Email,
                enabled: false,
            }))
        });

        let allowed = should_send(
            &repo,
            1,
            "follow_up_assigned",
            NotificationMethod::Email,
            "u1",
            &[],
        )
        .unwrap();
        assert!(!allowed);
    }

    #[test]
    fn notify_dispatches_over_allowed_methods() {
        let mut repo = MockRepository::new();
        repo.expect_get_global_settings().returning(|_| Ok(None));
        repo.expect_get_type_setting().returning(|_, _, _| Ok(None));
        repo.expect_get_user_preference().returning(|_, _, _| Ok(None));
        repo.expect_enqueue_emails()
            .withf(|emails| {
                emails.len() == 1
                    && emails[0].to_address == "leader@example.com"
                    && emails[0].subject == "Follow-up assigned"
            })
            .times(1)
            .returning(|emails| Ok(emails.len()));
        repo.expect_create_in_app_notification()
            .times(1)
            .returning(|n| {
                Ok(crate::domain::notification::InAppNotification {
                    id: 1,
                    church_id: n.church_id,
                    user_id: n.user_id.clone(),
                    title: n.title.clone(),
                    body: n.body.clone(),
                    data: n.data.clone(),
                    read: false,
                    created_at: Utc::now().naive_utc(),
                })
            });

        let outcome = notify(
            &repo,
            &NullRelay,
            1,
            Some("leader@example.com"),
            &[],
            &payload(),
        )
        .unwrap();

        assert!(outcome.email_sent);
        assert!(outcome.push_sent);
        assert!(outcome.in_app_stored);
    }
}
