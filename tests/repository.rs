use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde_json::json;

use pushkind_church::domain::comms::{CampaignStatus, Channel, NewCampaign, NewTemplate};
use pushkind_church::domain::contact::{Lifecycle, NewContact, UpdateContact};
use pushkind_church::domain::email::{EmailType, NewQueuedEmail, QueueStatus};
use pushkind_church::domain::event::{NewAttendanceRecord, NewEvent};
use pushkind_church::domain::transport::{
    EventDriverStatus, NewDriver, NewEventDriver, NewTransportRequest, NewVehicle, RequestStatus,
};
use pushkind_church::repository::{
    AttendanceReader, AttendanceWriter, CampaignReader, CampaignWriter, ContactListQuery,
    ContactReader, ContactWriter, EmailQueueWriter, EventReader, EventWriter, TemplateWriter,
    TransportReader, TransportRequestQuery, TransportWriter,
};
use pushkind_church::services::transport as transport_service;

mod common;

fn new_contact(name: &str, email: Option<&str>, address: Option<&str>) -> NewContact {
    NewContact::new(
        1,
        name.to_string(),
        "Tester".to_string(),
        email.map(str::to_string),
        None,
        address.map(str::to_string),
        Lifecycle::Member,
        None,
    )
}

#[test]
fn test_contact_repository_crud() {
    let test_db = common::TestDb::new("test_contact_repository_crud.db");
    let repo = test_db.repo();

    let created = repo
        .create_contacts(&[
            new_contact("Alice", Some("alice@example.com"), None),
            new_contact("Bob", Some("bob@example.com"), None),
        ])
        .unwrap();
    assert_eq!(created, 2);

    // Same email again is skipped, not an error.
    let skipped = repo
        .create_contacts(&[new_contact("Alice2", Some("alice@example.com"), None)])
        .unwrap();
    assert_eq!(skipped, 0);

    let (total, contacts) = repo.list_contacts(ContactListQuery::new(1)).unwrap();
    assert_eq!(total, 2);

    let (search_total, search_items) = repo
        .list_contacts(ContactListQuery::new(1).search("Bob"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].first_name, "Bob");

    let alice = contacts
        .iter()
        .find(|c| c.first_name == "Alice")
        .unwrap()
        .clone();

    let mut fields = HashMap::new();
    fields.insert("shirt_size".to_string(), "M".to_string());
    let updates = UpdateContact::new(
        "Alice".to_string(),
        "Updated".to_string(),
        Some("alice@example.com".to_string()),
        None,
        None,
        Lifecycle::Leader,
        Some(fields),
    );
    let updated = repo.update_contact(alice.id, &updates).unwrap();
    assert_eq!(updated.last_name, "Updated");
    assert_eq!(updated.lifecycle, Lifecycle::Leader);
    assert_eq!(
        updated.fields.as_ref().unwrap().get("shirt_size"),
        Some(&"M".to_string())
    );

    let counts = repo.count_contacts_by_lifecycle(1).unwrap();
    let leaders = counts.iter().find(|(l, _)| l == "leader").unwrap().1;
    assert_eq!(leaders, 1);

    repo.delete_contact(alice.id).unwrap();
    assert!(repo.get_contact_by_id(alice.id, 1).unwrap().is_none());

    // Contacts are scoped by church.
    assert!(
        repo.get_contact_by_email("bob@example.com", 2)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_event_and_attendance_repository() {
    let test_db = common::TestDb::new("test_event_and_attendance_repository.db");
    let repo = test_db.repo();

    let event = repo
        .create_event(&NewEvent {
            church_id: 1,
            name: "Easter Service".to_string(),
            starts_at: Utc::now().naive_utc() + Duration::days(7),
            location: Some("Main Hall".to_string()),
            description: None,
            status: "upcoming".to_string(),
        })
        .unwrap();

    repo.create_contacts(&[new_contact("Attendee", Some("a@example.com"), None)])
        .unwrap();
    let contact = repo
        .get_contact_by_email("a@example.com", 1)
        .unwrap()
        .unwrap();

    let record = repo
        .create_attendance_record(&NewAttendanceRecord {
            church_id: 1,
            event_id: event.id,
            contact_id: contact.id,
            checked_in_at: Utc::now().naive_utc(),
            method: "kiosk".to_string(),
        })
        .unwrap();
    assert_eq!(record.method, "kiosk");

    // Double check-in violates the unique index.
    assert!(
        repo.create_attendance_record(&NewAttendanceRecord {
            church_id: 1,
            event_id: event.id,
            contact_id: contact.id,
            checked_in_at: Utc::now().naive_utc(),
            method: "manual".to_string(),
        })
        .is_err()
    );

    assert_eq!(repo.count_attendance(event.id).unwrap(), 1);
    let attendance = repo.list_attendance(event.id).unwrap();
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0].1.id, contact.id);

    let found = repo.get_events_by_ids(&[event.id], 1).unwrap();
    assert_eq!(found.len(), 1);
    assert!(repo.get_events_by_ids(&[event.id], 2).unwrap().is_empty());
}

#[test]
fn test_transport_pipeline_end_to_end() {
    let test_db = common::TestDb::new("test_transport_pipeline_end_to_end.db");
    let repo = test_db.repo();

    let event = repo
        .create_event(&NewEvent {
            church_id: 1,
            name: "Youth Conference".to_string(),
            starts_at: Utc::now().naive_utc() + Duration::days(3),
            location: Some("Main Hall".to_string()),
            description: None,
            status: "upcoming".to_string(),
        })
        .unwrap();

    // Riders in two metro areas plus one duplicated request.
    let riders = [
        ("R1", "r1@example.com", "12 Main St, Denver CO 80202"),
        ("R2", "r2@example.com", "34 Oak St, Denver CO 80203"),
        ("R3", "r3@example.com", "56 Pine St, Brooklyn NY 11201"),
    ];
    for (name, email, _) in &riders {
        repo.create_contacts(&[new_contact(name, Some(email), None)])
            .unwrap();
    }

    let mut first_request_contact = None;
    for (_, email, address) in &riders {
        let contact = repo.get_contact_by_email(email, 1).unwrap().unwrap();
        if first_request_contact.is_none() {
            first_request_contact = Some(contact.id);
        }
        repo.create_transport_request(&NewTransportRequest {
            church_id: 1,
            event_id: event.id,
            contact_id: contact.id,
            pickup_address: Some(address.to_string()),
        })
        .unwrap();
    }

    // Duplicate request for the first rider.
    let duplicate = repo
        .create_transport_request(&NewTransportRequest {
            church_id: 1,
            event_id: event.id,
            contact_id: first_request_contact.unwrap(),
            pickup_address: Some("12 Main St, Denver CO 80202".to_string()),
        })
        .unwrap();

    // Two drivers with vehicles.
    let driver1 = repo
        .create_driver(&NewDriver {
            church_id: 1,
            name: "Driver One".to_string(),
            email: Some("d1@example.com".to_string()),
            phone: None,
        })
        .unwrap();
    let driver2 = repo
        .create_driver(&NewDriver {
            church_id: 1,
            name: "Driver Two".to_string(),
            email: None,
            phone: None,
        })
        .unwrap();
    let van = repo
        .create_vehicle(&NewVehicle {
            church_id: 1,
            make: "Ford".to_string(),
            model: "Transit".to_string(),
            license_plate: "VAN-1".to_string(),
            capacity: 8,
            status: "available".to_string(),
        })
        .unwrap();
    let car = repo
        .create_vehicle(&NewVehicle {
            church_id: 1,
            make: "Honda".to_string(),
            model: "Odyssey".to_string(),
            license_plate: "CAR-2".to_string(),
            capacity: 4,
            status: "available".to_string(),
        })
        .unwrap();

    repo.roster_event_driver(&NewEventDriver {
        event_id: event.id,
        driver_id: driver1.id,
        vehicle_id: Some(van.id),
        status: EventDriverStatus::Confirmed,
    })
    .unwrap();
    repo.roster_event_driver(&NewEventDriver {
        event_id: event.id,
        driver_id: driver2.id,
        vehicle_id: Some(car.id),
        status: EventDriverStatus::Assigned,
    })
    .unwrap();

    let before = repo.transport_summary(event.id).unwrap();
    assert_eq!(before.total_requests, 4);
    assert_eq!(before.assigned_requests, 0);
    assert_eq!(before.available_vehicles, 2);
    assert_eq!(before.total_capacity, 12);
    assert_eq!(before.routes_generated, 0);

    // Stage 1: assign.
    let report = transport_service::auto_assign(&repo, event.id).unwrap();
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.assigned_requests, 3);
    assert_eq!(report.unassigned, 0);

    let assigned = repo
        .list_transport_requests(
            TransportRequestQuery::new(event.id).status(RequestStatus::Assigned),
        )
        .unwrap();
    assert_eq!(assigned.len(), 3);
    assert!(assigned.iter().all(|r| r.assigned_driver.is_some()
        && r.assigned_vehicle.is_some()));
    // The duplicate request is gone entirely.
    assert!(assigned.iter().all(|r| r.id != duplicate.id));

    // Stage 2: routes.
    let route_report = transport_service::generate_routes(&repo, 1, event.id).unwrap();
    assert_eq!(route_report.total_stops, 3);

    let routes = repo.list_routes(event.id).unwrap();
    assert_eq!(routes.len() as i64, route_report.routes_generated as i64);
    for route in &routes {
        assert!(!route.stops.is_empty());
        assert!(route.url.starts_with("https://www.google.com/maps"));
        let orders: Vec<usize> = route.stops.iter().map(|s| s.order).collect();
        assert_eq!(orders, (1..=route.stops.len()).collect::<Vec<_>>());
    }

    // Replacing routes is idempotent, not additive.
    transport_service::generate_routes(&repo, 1, event.id).unwrap();
    assert_eq!(repo.list_routes(event.id).unwrap().len(), routes.len());

    // Stage 3: send. Driver Two has no email address.
    assert_eq!(routes.len(), 2);
    let send_report = transport_service::send_routes(&repo, 1, event.id).unwrap();
    assert_eq!(send_report.total_routes, 2);
    assert_eq!(send_report.emails_sent, 1);
    assert_eq!(send_report.emails_failed, 1);

    let after = repo.transport_summary(event.id).unwrap();
    assert_eq!(after.total_requests, 3);
    assert_eq!(after.assigned_requests, 3);
    assert_eq!(after.routes_generated, routes.len() as i64);

    let utilization = repo.vehicle_utilization(1, Some(event.id)).unwrap();
    let total_assigned: i64 = utilization.iter().map(|u| u.assigned).sum();
    assert_eq!(total_assigned, 3);
    for entry in &utilization {
        assert!(entry.assigned <= entry.vehicle.capacity as i64);
    }
}

#[test]
fn test_email_queue_claim_and_retry() {
    let test_db = common::TestDb::new("test_email_queue_claim_and_retry.db");
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();

    let emails: Vec<NewQueuedEmail> = (0..3)
        .map(|i| {
            NewQueuedEmail::new(
                1,
                format!("user{i}@example.com"),
                "Subject".to_string(),
                "<p>Body</p>".to_string(),
                EmailType::System,
                json!({}),
            )
        })
        .collect();
    assert_eq!(repo.enqueue_emails(&emails).unwrap(), 3);

    // Claim respects the batch size and bumps attempts.
    let later = now + Duration::seconds(5);
    let claimed = repo.claim_due_emails(later, 2, 3).unwrap();
    assert_eq!(claimed.len(), 2);
    assert!(claimed.iter().all(|e| e.status == QueueStatus::Sending));
    assert!(claimed.iter().all(|e| e.attempts == 1));

    // Claimed entries are not claimable again.
    let second = repo.claim_due_emails(later, 10, 3).unwrap();
    assert_eq!(second.len(), 1);

    // A failed entry becomes claimable only after its backoff.
    let failed = &claimed[0];
    let retry_at = later + Duration::minutes(15);
    repo.mark_email_failed(failed.id, "relay down", retry_at, later)
        .unwrap();

    assert!(repo.claim_due_emails(later, 10, 3).unwrap().is_empty());
    let retried = repo
        .claim_due_emails(retry_at + Duration::seconds(1), 10, 3)
        .unwrap();
    assert_eq!(retried.len(), 1);
    assert_eq!(retried[0].id, failed.id);
    assert_eq!(retried[0].attempts, 2);

    // Entries at the attempt cap stay put.
    repo.mark_email_failed(failed.id, "relay down", retry_at, later)
        .unwrap();
    repo.mark_email_failed(failed.id, "relay down", retry_at, later)
        .unwrap();
    let exhausted = repo
        .claim_due_emails(retry_at + Duration::days(1), 10, 2)
        .unwrap();
    assert!(exhausted.iter().all(|e| e.id != failed.id));

    // Sent entries record their timestamp.
    let sent = &claimed[1];
    repo.mark_email_sent(sent.id, later).unwrap();
    let reread = pushkind_church::repository::EmailQueueReader::get_queued_email(&repo, sent.id)
        .unwrap()
        .unwrap();
    assert_eq!(reread.status, QueueStatus::Sent);
    assert!(reread.sent_at.is_some());
}

#[test]
fn test_campaign_repository_lifecycle() {
    let test_db = common::TestDb::new("test_campaign_repository_lifecycle.db");
    let repo = test_db.repo();

    let template = repo
        .create_template(&NewTemplate {
            church_id: 1,
            name: "Invite".to_string(),
            channel: Channel::Email,
            subject: "Hello {{first_name}}".to_string(),
            body: "Join us".to_string(),
        })
        .unwrap();

    let campaign = repo
        .create_campaign(&NewCampaign {
            church_id: 1,
            template_id: template.id,
            name: "Easter invite".to_string(),
            channel: Channel::Email,
            scheduled_at: None,
            created_by: "u1".to_string(),
        })
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Draft);

    let past = Utc::now().naive_utc() - Duration::minutes(5);
    repo.set_campaign_status(campaign.id, CampaignStatus::Scheduled, Some(past))
        .unwrap();

    let due = repo.list_due_campaigns(Utc::now().naive_utc()).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, campaign.id);

    repo.create_contacts(&[new_contact("Grace", Some("grace@example.com"), None)])
        .unwrap();
    let contact = repo
        .get_contact_by_email("grace@example.com", 1)
        .unwrap()
        .unwrap();

    repo.add_campaign_recipients(&[pushkind_church::domain::comms::NewCampaignRecipient {
        campaign_id: campaign.id,
        contact_id: contact.id,
        address: "grace@example.com".to_string(),
    }])
    .unwrap();

    let metrics = repo.campaign_metrics(campaign.id).unwrap();
    assert_eq!(metrics.total_recipients, 1);
    assert_eq!(metrics.pending_count, 1);

    let recipients = repo.list_campaign_recipients(campaign.id).unwrap();
    repo.mark_campaign_recipient(
        recipients[0].id,
        pushkind_church::domain::comms::RecipientStatus::Sent,
        None,
        Some(Utc::now().naive_utc()),
    )
    .unwrap();

    let metrics = repo.campaign_metrics(campaign.id).unwrap();
    assert_eq!(metrics.pending_count, 0);
    assert_eq!(metrics.sent_count, 1);

    let comms = repo.comms_metrics(1).unwrap();
    assert_eq!(comms.total_campaigns, 1);
    assert_eq!(comms.total_templates, 1);
}
