//! Planned visit follow-up workflow.

use chrono::Utc;
use serde_json::json;

use crate::domain::contact::Lifecycle;
use crate::domain::email::{EmailType, NewQueuedEmail};
use crate::domain::visit::PlannedVisit;
use crate::repository::{ContactReader, ContactWriter, EmailQueueWriter, VisitReader, VisitWriter};
use crate::services::{ServiceError, ServiceResult};

/// Marks a planned visit as having actually happened: the linked contact
/// becomes a visitor in the lifecycle and the visit records its conversion
/// time.
pub fn convert_visit<R>(repo: &R, church_id: i32, visit_id: i32) -> ServiceResult<PlannedVisit>
where
    R: VisitReader + VisitWriter + ContactReader + ContactWriter + ?Sized,
{
    let visit = repo
        .get_visit_by_id(visit_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    if visit.is_converted() {
        return Err(ServiceError::Conflict(
            "visit has already been converted".to_string(),
        ));
    }

    let contact_id = visit.contact_id.ok_or_else(|| {
        ServiceError::Validation("visit has no linked contact to convert".to_string())
    })?;

    let contact = repo
        .get_contact_by_id(contact_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    // A lead who showed up becomes a visitor; members and leaders keep
    // their standing.
    if contact.lifecycle == Lifecycle::Lead {
        repo.set_contact_lifecycle(contact.id, Lifecycle::Visitor)?;
    }

    repo.mark_visit_converted(visit.id, contact.id, Utc::now().naive_utc())
        .map_err(ServiceError::from)
}

/// Queues a follow-up email to the visit's contact and bumps the message
/// counters shown on the visit detail page.
pub fn send_follow_up<R>(
    repo: &R,
    church_id: i32,
    visit_id: i32,
    subject: &str,
    body: &str,
) -> ServiceResult<()>
where
    R: VisitReader + VisitWriter + ContactReader + EmailQueueWriter + ?Sized,
{
    let visit = repo
        .get_visit_by_id(visit_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    let contact_id = visit.contact_id.ok_or_else(|| {
        ServiceError::Validation("visit has no linked contact".to_string())
    })?;

    let contact = repo
        .get_contact_by_id(contact_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    let address = contact.email.clone().ok_or_else(|| {
        ServiceError::Validation("contact has no email address".to_string())
    })?;

    repo.enqueue_emails(&[NewQueuedEmail::new(
        church_id,
        address,
        subject.to_string(),
        ammonia::clean(body),
        EmailType::Info,
        json!({"planned_visit_id": visit.id}),
    )])?;

    repo.record_visit_message(visit.id, Utc::now().naive_utc())
        .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::contact::Contact;
    use crate::domain::visit::VisitStatus;
    use crate::repository::mock::MockRepository;
    use chrono::NaiveDate;

    fn visit(contact_id: Option<i32>, converted: bool) -> PlannedVisit {
        let now = Utc::now().naive_utc();
        PlannedVisit {
            id: 11,
            church_id: 1,
            contact_id,
            event_name: "Sunday Service".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            interest_level: "high".to_string(),
            contact_preference: "email".to_string(),
            companions_count: 2,
            special_needs: None,
            notes: None,
            follow_up_date: None,
            status: VisitStatus::Confirmed,
            converted_at: converted.then_some(now),
            assigned_to: None,
            message_count: 0,
            last_message_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn contact(id: i32, lifecycle: Lifecycle, email: Option<&str>) -> Contact {
        let now = Utc::now().naive_utc();
        Contact {
            id,
            church_id: 1,
            first_name: "New".to_string(),
            last_name: "Person".to_string(),
            email: email.map(str::to_string),
            phone: None,
            address: None,
            lifecycle,
            created_at: now,
            updated_at: now,
            fields: None,
        }
    }

    #[test]
    fn converting_marks_the_visit_and_keeps_member_standing() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id()
            .returning(|_, _| Ok(Some(visit(Some(5), false))));
        repo.expect_get_contact_by_id()
            .returning(|id, _| Ok(Some(contact(id, Lifecycle::Member, None))));
        // A member does not get demoted back to visitor.
        repo.expect_set_contact_lifecycle().times(0);
        repo.expect_mark_visit_converted()
            .withf(|visit_id, contact_id, _| *visit_id == 11 && *contact_id == 5)
            .times(1)
            .returning(|_, contact_id, at| {
                let mut v = visit(Some(contact_id), false);
                v.converted_at = Some(at);
                v.status = VisitStatus::Attended;
                Ok(v)
            });

        let converted = convert_visit(&repo, 1, 11).unwrap();
        assert!(converted.is_converted());
        assert_eq!(converted.status, VisitStatus::Attended);
    }

    #[test]
    fn converting_a_lead_promotes_them_to_visitor() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id()
            .returning(|_, _| Ok(Some(visit(Some(5), false))));
        repo.expect_get_contact_by_id()
            .returning(|id, _| Ok(Some(contact(id, Lifecycle::Lead, None))));
        repo.expect_set_contact_lifecycle()
            .withf(|id, lifecycle| *id == 5 && *lifecycle == Lifecycle::Visitor)
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_mark_visit_converted()
            .times(1)
            .returning(|_, contact_id, at| {
                let mut v = visit(Some(contact_id), false);
                v.converted_at = Some(at);
                v.status = VisitStatus::Attended;
                Ok(v)
            });

        convert_visit(&repo, 1, 11).unwrap();
    }

    #[test]
    fn double_conversion_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id()
            .returning(|_, _| Ok(Some(visit(Some(5), true))));
        repo.expect_mark_visit_converted().times(0);

        assert!(matches!(
            convert_visit(&repo, 1, 11),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn conversion_requires_a_linked_contact() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id()
            .returning(|_, _| Ok(Some(visit(None, false))));

        assert!(matches!(
            convert_visit(&repo, 1, 11),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn follow_up_queues_email_and_records_message() {
        let mut repo = MockRepository::new();
        repo.expect_get_visit_by_id()
            .returning(|_, _| Ok(Some(visit(Some(5), false))));
        repo.expect_get_contact_by_id()
            .returning(|id, _| Ok(Some(contact(id, Lifecycle::Visitor, Some("p@example.com")))));
        repo.expect_enqueue_emails()
            .withf(|emails| emails.len() == 1 && emails[0].to_address == "p@example.com")
            .times(1)
            .returning(|emails| Ok(emails.len()));
        repo.expect_record_visit_message()
            .withf(|id, _| *id == 11)
            .times(1)
            .returning(|_, _| Ok(()));

        send_follow_up(&repo, 1, 11, "See you Sunday", "<p>Hi!</p>").unwrap();
    }
}
