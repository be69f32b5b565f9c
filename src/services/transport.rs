//! The three-stage transport pipeline: assign riders to vehicles, build a
//! pickup route per driver, and mail every driver their route sheet.
//!
//! Assignment clusters riders geographically by pickup ZIP code and packs one
//! region per vehicle before topping up the remaining seats, so each driver
//! stays in one part of town.

use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use crate::domain::contact::Contact;
use crate::domain::email::{EmailType, NewQueuedEmail};
use crate::domain::event::Event;
use crate::domain::transport::{
    EventDriver, EventDriverStatus, NewTransportRoute, RequestStatus, RouteStop, TransportRequest,
    TransportSummary,
};
use crate::repository::{EmailQueueWriter, EventReader, TransportReader, TransportWriter};
use crate::services::{ServiceError, ServiceResult};

const FALLBACK_ZIP: &str = "99999";

/// Extracts the first 5-digit ZIP code from a pickup address.
pub fn extract_zip(address: &str) -> String {
    // Compiled per call; addresses per event number in the hundreds at most.
    let re = Regex::new(r"\b(\d{5})\b").expect("valid zip regex");
    re.captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_ZIP.to_string())
}

/// Buckets a ZIP code into a named metro region, falling back to the ZIP
/// itself so unknown areas still cluster together.
pub fn geographic_region(zip: &str) -> String {
    match zip.parse::<u32>() {
        Ok(z) if (80200..=80299).contains(&z) => "Denver, CO".to_string(),
        Ok(z) if (10000..=11999).contains(&z) => "New York, NY".to_string(),
        Ok(z) if (20000..=20599).contains(&z) => "Washington, DC".to_string(),
        Ok(z) if (90000..=90999).contains(&z) => "Los Angeles, CA".to_string(),
        _ => zip.to_string(),
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Assignment {
    pub request_id: i32,
    pub driver_id: i32,
    pub vehicle_id: i32,
    pub driver_name: String,
    pub vehicle_label: String,
    pub contact_name: String,
    pub region: String,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct AssignmentPlan {
    pub assignments: Vec<Assignment>,
    /// Requests dropped because the contact already had an earlier one.
    pub duplicate_request_ids: Vec<i32>,
    pub unassigned: usize,
    pub vehicles_used: usize,
    pub total_capacity: i64,
}

struct VehicleSlot {
    driver_id: i32,
    vehicle_id: i32,
    driver_name: String,
    vehicle_label: String,
    capacity: usize,
    assigned: usize,
    regions: Vec<String>,
}

impl VehicleSlot {
    fn available(&self) -> usize {
        self.capacity - self.assigned
    }
}

struct Rider {
    request_id: i32,
    contact_name: String,
    region: String,
}

/// Pure assignment planner. Deduplicates riders per contact, groups them into
/// geographic regions ordered by size, then packs regions onto vehicles
/// ordered by capacity: first one region per vehicle, then overflow fill
/// preferring a vehicle's existing region. Riders beyond total capacity stay
/// unassigned.
pub fn plan_assignments(
    requests: &[(TransportRequest, Contact)],
    fleet: &[EventDriver],
) -> AssignmentPlan {
    // Dedupe by contact, first request wins.
    let mut seen_contacts = HashMap::new();
    let mut duplicate_request_ids = Vec::new();
    let mut unique: Vec<&(TransportRequest, Contact)> = Vec::new();

    for entry in requests {
        let (request, contact) = entry;
        if seen_contacts.insert(contact.id, request.id).is_some() {
            duplicate_request_ids.push(request.id);
        } else {
            unique.push(entry);
        }
    }

    // Vehicles sorted by capacity, biggest first.
    let mut slots: Vec<VehicleSlot> = fleet
        .iter()
        .filter(|entry| {
            matches!(
                entry.status,
                EventDriverStatus::Assigned | EventDriverStatus::Confirmed
            )
        })
        .filter_map(|entry| {
            let vehicle = entry.vehicle.as_ref()?;
            if vehicle.capacity <= 0 {
                return None;
            }
            Some(VehicleSlot {
                driver_id: entry.driver.id,
                vehicle_id: vehicle.id,
                driver_name: entry.driver.name.clone(),
                vehicle_label: vehicle.label(),
                capacity: vehicle.capacity as usize,
                assigned: 0,
                regions: Vec::new(),
            })
        })
        .collect();
    slots.sort_by(|a, b| b.capacity.cmp(&a.capacity));

    let total_capacity: i64 = slots.iter().map(|s| s.capacity as i64).sum();

    // Group riders by region; ZIP sort keeps intra-region order stable.
    let mut riders: Vec<(String, Rider)> = unique
        .iter()
        .map(|(request, contact)| {
            let zip = extract_zip(request.pickup_address.as_deref().unwrap_or(""));
            let region = geographic_region(&zip);
            (
                zip,
                Rider {
                    request_id: request.id,
                    contact_name: contact.full_name(),
                    region,
                },
            )
        })
        .collect();
    riders.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut groups: Vec<(String, Vec<Rider>)> = Vec::new();
    for (_, rider) in riders {
        match groups.iter_mut().find(|(region, _)| *region == rider.region) {
            Some((_, members)) => members.push(rider),
            None => groups.push((rider.region.clone(), vec![rider])),
        }
    }
    groups.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()));

    let mut assignments = Vec::new();

    // Round one: one region per vehicle, largest groups first.
    let mut slot_index = 0;
    for (region, members) in &mut groups {
        if slot_index >= slots.len() {
            break;
        }
        let slot = &mut slots[slot_index];
        let can_assign = members.len().min(slot.available());
        for rider in members.drain(..can_assign) {
            assignments.push(Assignment {
                request_id: rider.request_id,
                driver_id: slot.driver_id,
                vehicle_id: slot.vehicle_id,
                driver_name: slot.driver_name.clone(),
                vehicle_label: slot.vehicle_label.clone(),
                contact_name: rider.contact_name,
                region: region.clone(),
            });
            slot.assigned += 1;
        }
        slot.regions.push(region.clone());
        slot_index += 1;
    }
    groups.retain(|(_, members)| !members.is_empty());

    // Round two: top up leftover seats, preferring the region already aboard.
    for slot in &mut slots {
        while slot.available() > 0 && !groups.is_empty() {
            let group_index = slot
                .regions
                .first()
                .and_then(|home| groups.iter().position(|(region, _)| region == home))
                .unwrap_or(0);

            let (region, members) = &mut groups[group_index];
            let region = region.clone();
            let can_fit = members.len().min(slot.available());
            for rider in members.drain(..can_fit) {
                assignments.push(Assignment {
                    request_id: rider.request_id,
                    driver_id: slot.driver_id,
                    vehicle_id: slot.vehicle_id,
                    driver_name: slot.driver_name.clone(),
                    vehicle_label: slot.vehicle_label.clone(),
                    contact_name: rider.contact_name,
                    region: region.clone(),
                });
                slot.assigned += 1;
            }
            if !slot.regions.contains(&region) {
                slot.regions.push(region);
            }
            groups.retain(|(_, members)| !members.is_empty());
        }
    }

    let unassigned = groups.iter().map(|(_, members)| members.len()).sum();

    AssignmentPlan {
        assignments,
        duplicate_request_ids,
        unassigned,
        vehicles_used: slots.iter().filter(|s| s.assigned > 0).count(),
        total_capacity,
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AutoAssignReport {
    pub message: String,
    pub total_requests: usize,
    pub unique_contacts: usize,
    pub duplicates_removed: usize,
    pub assigned_requests: usize,
    pub vehicles_used: usize,
    pub total_capacity: i64,
    pub remaining_capacity: i64,
    pub unassigned: usize,
}

/// Stage one of the pipeline. Loads the event's pending, unassigned requests
/// and persists the planned vehicle assignments.
pub fn auto_assign<R>(repo: &R, event_id: i32) -> ServiceResult<AutoAssignReport>
where
    R: TransportReader + TransportWriter + ?Sized,
{
    let pending = repo
        .list_requests_with_contacts(event_id)?
        .into_iter()
        .filter(|(request, _)| {
            request.status == RequestStatus::Pending
                && request.assigned_driver.is_none()
                && request.assigned_vehicle.is_none()
        })
        .collect::<Vec<_>>();

    if pending.is_empty() {
        return Ok(AutoAssignReport {
            message: "No pending transport requests found".to_string(),
            total_requests: 0,
            unique_contacts: 0,
            duplicates_removed: 0,
            assigned_requests: 0,
            vehicles_used: 0,
            total_capacity: 0,
            remaining_capacity: 0,
            unassigned: 0,
        });
    }

    let fleet = repo.list_event_drivers(event_id)?;
    let has_vehicles = fleet.iter().any(|entry| {
        entry.vehicle.as_ref().is_some_and(|v| v.capacity > 0)
            && entry.status != EventDriverStatus::Declined
    });
    if !has_vehicles {
        return Err(ServiceError::Conflict(
            "No drivers with vehicles assigned to this event".to_string(),
        ));
    }

    let plan = plan_assignments(&pending, &fleet);

    if !plan.duplicate_request_ids.is_empty() {
        let removed = repo.delete_transport_requests(&plan.duplicate_request_ids)?;
        log::info!("Removed {removed} duplicate transport requests for event {event_id}");
    }

    for assignment in &plan.assignments {
        repo.assign_transport_request(
            assignment.request_id,
            assignment.driver_id,
            assignment.vehicle_id,
        )?;
    }

    if plan.unassigned > 0 {
        log::warn!(
            "{} riders could not be assigned for event {event_id}: insufficient capacity",
            plan.unassigned
        );
    }

    let unique_contacts = pending.len() - plan.duplicate_request_ids.len();

    Ok(AutoAssignReport {
        message: format!(
            "Successfully assigned {} riders to {} vehicles",
            plan.assignments.len(),
            plan.vehicles_used
        ),
        total_requests: pending.len(),
        unique_contacts,
        duplicates_removed: plan.duplicate_request_ids.len(),
        assigned_requests: plan.assignments.len(),
        vehicles_used: plan.vehicles_used,
        total_capacity: plan.total_capacity,
        remaining_capacity: plan.total_capacity - plan.assignments.len() as i64,
        unassigned: plan.unassigned,
    })
}

/// Percent-encodes an address for use in a Google Maps path segment.
fn encode_address(address: &str) -> String {
    let mut out = String::with_capacity(address.len());
    for byte in address.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Builds the driving-directions URL for an ordered list of pickup stops.
pub fn directions_url(stops: &[RouteStop]) -> String {
    let addresses: Vec<String> = stops
        .iter()
        .filter(|stop| !stop.address.is_empty())
        .map(|stop| encode_address(&stop.address))
        .collect();

    match addresses.len() {
        0 => "https://www.google.com/maps".to_string(),
        1 => format!("https://www.google.com/maps/search/{}", addresses[0]),
        _ => format!("https://www.google.com/maps/dir/{}", addresses.join("/")),
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RouteReport {
    pub message: String,
    pub routes_generated: usize,
    pub drivers_assigned: usize,
    pub total_stops: usize,
}

/// Stage two of the pipeline. Groups assigned requests by driver and replaces
/// the event's stored routes with freshly built ones.
pub fn generate_routes<R>(repo: &R, church_id: i32, event_id: i32) -> ServiceResult<RouteReport>
where
    R: TransportReader + TransportWriter + ?Sized,
{
    let assigned: Vec<(TransportRequest, Contact)> = repo
        .list_requests_with_contacts(event_id)?
        .into_iter()
        .filter(|(request, _)| {
            request.status == RequestStatus::Assigned
                && request.assigned_driver.is_some()
                && request.assigned_vehicle.is_some()
        })
        .collect();

    if assigned.is_empty() {
        return Err(ServiceError::Conflict(
            "No assigned transport requests found; run auto-assign first".to_string(),
        ));
    }

    let fleet = repo.list_event_drivers(event_id)?;
    let driver_names: HashMap<i32, String> = fleet
        .iter()
        .map(|entry| (entry.driver.id, entry.driver.name.clone()))
        .collect();

    // Group by driver, preserving assignment order.
    let mut grouped: Vec<(i32, i32, Vec<(TransportRequest, Contact)>)> = Vec::new();
    for (request, contact) in assigned {
        let (Some(driver_id), Some(vehicle_id)) =
            (request.assigned_driver, request.assigned_vehicle)
        else {
            continue;
        };
        match grouped.iter_mut().find(|(d, _, _)| *d == driver_id) {
            Some((_, _, members)) => members.push((request, contact)),
            None => grouped.push((driver_id, vehicle_id, vec![(request, contact)])),
        }
    }

    let mut routes = Vec::new();
    for (index, (driver_id, vehicle_id, members)) in grouped.iter().enumerate() {
        let stops: Vec<RouteStop> = members
            .iter()
            .enumerate()
            .map(|(order, (request, contact))| RouteStop {
                order: order + 1,
                address: request.pickup_address.clone().unwrap_or_default(),
                passenger: contact.full_name(),
                phone: contact.phone.clone(),
                contact_id: contact.id,
                request_id: request.id,
            })
            .collect();

        let driver_name = driver_names
            .get(driver_id)
            .map(String::as_str)
            .unwrap_or("Unknown Driver");

        routes.push(NewTransportRoute {
            church_id,
            event_id,
            driver_id: *driver_id,
            vehicle_id: *vehicle_id,
            name: format!("Route {} - {}", index + 1, driver_name),
            url: directions_url(&stops),
            stops,
        });
    }

    let total_stops = routes.iter().map(|r| r.stops.len()).sum();
    let inserted = repo.replace_event_routes(event_id, &routes)?;

    Ok(RouteReport {
        message: format!(
            "Generated {} routes for {} drivers",
            inserted,
            grouped.len()
        ),
        routes_generated: inserted,
        drivers_assigned: grouped.len(),
        total_stops,
    })
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SendReport {
    pub message: String,
    pub total_routes: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
}

fn route_email_html(event: &Event, driver_name: &str, vehicle: &str, stops: &[RouteStop], url: &str) -> String {
    let mut stop_list = String::new();
    for stop in stops {
        let phone = stop
            .phone
            .as_deref()
            .map(|p| format!(" ({p})"))
            .unwrap_or_default();
        stop_list.push_str(&format!(
            "<li>{}. {}: {}{}</li>",
            stop.order, stop.passenger, stop.address, phone
        ));
    }
    if stops.is_empty() {
        stop_list.push_str("<li>No pickup locations specified</li>");
    }

    let when = event.starts_at.format("%A, %B %-d %Y at %-I:%M %p");
    let location = event.location.as_deref().unwrap_or("TBD");

    format!(
        "<h1>Transport Route Assignment</h1>\
         <p><strong>Event:</strong> {}</p>\
         <p><strong>When:</strong> {when}</p>\
         <p><strong>Location:</strong> {location}</p>\
         <p><strong>Driver:</strong> {driver_name}</p>\
         <p><strong>Vehicle:</strong> {vehicle}</p>\
         <h2>Pickup stops</h2>\
         <ol>{stop_list}</ol>\
         <p><a href=\"{url}\">Open route in Google Maps</a></p>\
         <p>Please arrive a few minutes early at each stop and contact your \
         passengers if you are running late.</p>",
        event.name
    )
}

/// Stage three of the pipeline. Queues one route sheet email per driver;
/// drivers without an email address are counted as failures but do not abort
/// the batch.
pub fn send_routes<R>(repo: &R, church_id: i32, event_id: i32) -> ServiceResult<SendReport>
where
    R: TransportReader + EventReader + EmailQueueWriter + ?Sized,
{
    let routes = repo.list_routes_with_fleet(event_id)?;
    if routes.is_empty() {
        return Err(ServiceError::Conflict(
            "No routes found; generate routes first".to_string(),
        ));
    }

    let event = repo
        .get_event_by_id(event_id, church_id)?
        .ok_or(ServiceError::NotFound)?;

    let mut emails = Vec::new();
    let mut failed = 0;

    for (route, driver, vehicle) in &routes {
        let Some(address) = driver.email.as_deref() else {
            log::warn!("No email address for driver {}", driver.name);
            failed += 1;
            continue;
        };

        let vehicle_label = format!("{} ({})", vehicle.label(), vehicle.license_plate);
        let html = route_email_html(&event, &driver.name, &vehicle_label, &route.stops, &route.url);

        emails.push(NewQueuedEmail::new(
            church_id,
            address.to_string(),
            format!("Transport Route for {}", event.name),
            html,
            EmailType::Events,
            json!({
                "event_id": event_id,
                "route_id": route.id,
                "driver_id": driver.id,
                "transport_type": "route_assignment",
            }),
        ));
    }

    let sent = if emails.is_empty() {
        0
    } else {
        repo.enqueue_emails(&emails)?
    };

    let message = if failed > 0 {
        format!("Queued routes for {sent} drivers ({failed} failed)")
    } else {
        format!("Queued routes for {sent} drivers")
    };

    Ok(SendReport {
        message,
        total_routes: routes.len(),
        emails_sent: sent,
        emails_failed: failed,
    })
}

/// Summary snapshot the dashboard polls between pipeline steps.
pub fn summary<R>(repo: &R, event_id: i32) -> ServiceResult<TransportSummary>
where
    R: TransportReader + ?Sized,
{
    repo.transport_summary(event_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::Lifecycle;
    use crate::domain::transport::{Driver, Vehicle};
    use chrono::Utc;

    fn contact(id: i32, name: &str) -> Contact {
        let now = Utc::now().naive_utc();
        Contact {
            id,
            church_id: 1,
            first_name: name.to_string(),
            last_name: "Rider".to_string(),
            email: None,
            phone: None,
            address: None,
            lifecycle: Lifecycle::Member,
            created_at: now,
            updated_at: now,
            fields: None,
        }
    }

    fn request(id: i32, contact_id: i32, address: &str) -> TransportRequest {
        let now = Utc::now().naive_utc();
        TransportRequest {
            id,
            church_id: 1,
            event_id: 7,
            contact_id,
            pickup_address: Some(address.to_string()),
            status: RequestStatus::Pending,
            assigned_driver: None,
            assigned_vehicle: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn fleet_entry(driver_id: i32, vehicle_id: i32, capacity: i32) -> EventDriver {
        let now = Utc::now().naive_utc();
        EventDriver {
            event_id: 7,
            driver: Driver {
                id: driver_id,
                church_id: 1,
                name: format!("Driver {driver_id}"),
                email: Some(format!("driver{driver_id}@example.com")),
                phone: None,
                created_at: now,
            },
            vehicle: Some(Vehicle {
                id: vehicle_id,
                church_id: 1,
                make: "Ford".to_string(),
                model: "Transit".to_string(),
                license_plate: format!("PLATE{vehicle_id}"),
                capacity,
                status: "available".to_string(),
                created_at: now,
            }),
            status: EventDriverStatus::Confirmed,
        }
    }

    #[test]
    fn zip_extraction_falls_back_when_absent() {
        assert_eq!(extract_zip("12 Main St, Denver CO 80202"), "80202");
        assert_eq!(extract_zip("somewhere unknown"), "99999");
        // 4- and 6-digit runs are not ZIPs.
        assert_eq!(extract_zip("PO 1234"), "99999");
        assert_eq!(extract_zip("code 123456 here"), "99999");
    }

    #[test]
    fn regions_bucket_known_metro_zips() {
        assert_eq!(geographic_region("80250"), "Denver, CO");
        assert_eq!(geographic_region("11201"), "New York, NY");
        assert_eq!(geographic_region("20500"), "Washington, DC");
        assert_eq!(geographic_region("90210"), "Los Angeles, CA");
        assert_eq!(geographic_region("55401"), "55401");
    }

    #[test]
    fn duplicate_contacts_keep_first_request() {
        let requests = vec![
            (request(1, 100, "80202"), contact(100, "A")),
            (request(2, 100, "80202"), contact(100, "A")),
            (request(3, 101, "80203"), contact(101, "B")),
        ];
        let fleet = vec![fleet_entry(1, 10, 4)];

        let plan = plan_assignments(&requests, &fleet);

        assert_eq!(plan.duplicate_request_ids, vec![2]);
        assert_eq!(plan.assignments.len(), 2);
        assert!(plan.assignments.iter().any(|a| a.request_id == 1));
        assert!(plan.assignments.iter().all(|a| a.request_id != 2));
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let requests: Vec<_> = (0..10)
            .map(|i| (request(i, 100 + i, "80202"), contact(100 + i, "R")))
            .collect();
        let fleet = vec![fleet_entry(1, 10, 3), fleet_entry(2, 11, 4)];

        let plan = plan_assignments(&requests, &fleet);

        let mut per_vehicle: HashMap<i32, usize> = HashMap::new();
        for assignment in &plan.assignments {
            *per_vehicle.entry(assignment.vehicle_id).or_insert(0) += 1;
        }
        assert!(per_vehicle.get(&10).copied().unwrap_or(0) <= 4);
        assert!(per_vehicle.get(&11).copied().unwrap_or(0) <= 4);
        assert_eq!(plan.assignments.len(), 7);
        assert_eq!(plan.unassigned, 3);
    }

    #[test]
    fn regions_are_spread_across_vehicles_before_overflow() {
        // Two regions, two vehicles: each vehicle should start with its own
        // region even though the first vehicle could hold everyone.
        let requests = vec![
            (request(1, 100, "80202"), contact(100, "D1")),
            (request(2, 101, "80203"), contact(101, "D2")),
            (request(3, 102, "80204"), contact(102, "D3")),
            (request(4, 103, "11201"), contact(103, "N1")),
            (request(5, 104, "11202"), contact(104, "N2")),
        ];
        let fleet = vec![fleet_entry(1, 10, 8), fleet_entry(2, 11, 8)];

        let plan = plan_assignments(&requests, &fleet);

        let denver_vehicles: Vec<i32> = plan
            .assignments
            .iter()
            .filter(|a| a.region == "Denver, CO")
            .map(|a| a.vehicle_id)
            .collect();
        let ny_vehicles: Vec<i32> = plan
            .assignments
            .iter()
            .filter(|a| a.region == "New York, NY")
            .map(|a| a.vehicle_id)
            .collect();

        assert!(denver_vehicles.iter().all(|v| *v == 10));
        assert!(ny_vehicles.iter().all(|v| *v == 11));
        assert_eq!(plan.vehicles_used, 2);
        assert_eq!(plan.unassigned, 0);
    }

    #[test]
    fn overflow_prefers_vehicle_with_same_region() {
        // Denver group larger than the first vehicle; the spill-over should
        // land on the vehicle that already carries Denver riders once the
        // region round is done.
        let requests: Vec<_> = (0..5)
            .map(|i| (request(i, 100 + i, "80202"), contact(100 + i, "D")))
            .collect();
        let fleet = vec![fleet_entry(1, 10, 3), fleet_entry(2, 11, 3)];

        let plan = plan_assignments(&requests, &fleet);

        assert_eq!(plan.assignments.len(), 5);
        assert_eq!(plan.unassigned, 0);
        let first: usize = plan
            .assignments
            .iter()
            .filter(|a| a.vehicle_id == 10)
            .count();
        let second: usize = plan
            .assignments
            .iter()
            .filter(|a| a.vehicle_id == 11)
            .count();
        assert_eq!(first, 3);
        assert_eq!(second, 2);
    }

    #[test]
    fn directions_url_shapes() {
        let stop = |order: usize, address: &str| RouteStop {
            order,
            address: address.to_string(),
            passenger: "P".to_string(),
            phone: None,
            contact_id: 1,
            request_id: 1,
        };

        assert_eq!(directions_url(&[]), "https://www.google.com/maps");
        assert_eq!(
            directions_url(&[stop(1, "12 Main St")]),
            "https://www.google.com/maps/search/12%20Main%20St"
        );
        assert_eq!(
            directions_url(&[stop(1, "A St"), stop(2, "B St")]),
            "https://www.google.com/maps/dir/A%20St/B%20St"
        );
    }

    #[cfg(feature = "test-mocks")]
    mod with_mock_repo {
        use super::*;
        use crate::repository::mock::MockRepository;

        #[test]
        fn auto_assign_with_no_pending_requests_is_a_noop() {
            let mut repo = MockRepository::new();
            repo.expect_list_requests_with_contacts()
                .times(1)
                .returning(|_| Ok(vec![]));
            repo.expect_list_event_drivers().times(0);

            let report = auto_assign(&repo, 7).expect("should succeed");
            assert_eq!(report.assigned_requests, 0);
            assert_eq!(report.message, "No pending transport requests found");
        }

        #[test]
        fn auto_assign_without_vehicles_is_rejected() {
            let mut repo = MockRepository::new();
            repo.expect_list_requests_with_contacts()
                .times(1)
                .returning(|_| Ok(vec![(request(1, 100, "80202"), contact(100, "A"))]));
            repo.expect_list_event_drivers()
                .times(1)
                .returning(|_| Ok(vec![]));

            let result = auto_assign(&repo, 7);
            assert!(matches!(result, Err(ServiceError::Conflict(_))));
        }

        #[test]
        fn auto_assign_persists_assignments_and_deletes_duplicates() {
            let mut repo = MockRepository::new();
            repo.expect_list_requests_with_contacts()
                .times(1)
                .returning(|_| {
                    Ok(vec![
                        (request(1, 100, "80202"), contact(100, "A")),
                        (request(2, 100, "80202"), contact(100, "A")),
                        (request(3, 101, "80203"), contact(101, "B")),
                    ])
                });
            repo.expect_list_event_drivers()
                .times(1)
                .returning(|_| Ok(vec![fleet_entry(1, 10, 4)]));
            repo.expect_delete_transport_requests()
                .withf(|ids| ids == [2])
                .times(1)
                .returning(|ids| Ok(ids.len()));
            repo.expect_assign_transport_request()
                .times(2)
                .returning(|_, _, _| Ok(()));

            let report = auto_assign(&repo, 7).expect("should assign");
            assert_eq!(report.assigned_requests, 2);
            assert_eq!(report.duplicates_removed, 1);
            assert_eq!(report.vehicles_used, 1);
            assert_eq!(report.remaining_capacity, 2);
        }

        #[test]
        fn generate_routes_requires_assignments() {
            let mut repo = MockRepository::new();
            repo.expect_list_requests_with_contacts()
                .times(1)
                .returning(|_| Ok(vec![]));

            let result = generate_routes(&repo, 1, 7);
            assert!(matches!(result, Err(ServiceError::Conflict(_))));
        }

        #[test]
        fn generate_routes_groups_by_driver_in_order() {
            let mut repo = MockRepository::new();
            repo.expect_list_requests_with_contacts()
                .times(1)
                .returning(|_| {
                    let mut r1 = request(1, 100, "12 A St, 80202");
                    r1.status = RequestStatus::Assigned;
                    r1.assigned_driver = Some(1);
                    r1.assigned_vehicle = Some(10);
                    let mut r2 = request(2, 101, "34 B St, 80202");
                    r2.status = RequestStatus::Assigned;
                    r2.assigned_driver = Some(1);
                    r2.assigned_vehicle = Some(10);
                    let mut r3 = request(3, 102, "56 C St, 11201");
                    r3.status = RequestStatus::Assigned;
                    r3.assigned_driver = Some(2);
                    r3.assigned_vehicle = Some(11);
                    Ok(vec![
                        (r1, contact(100, "A")),
                        (r2, contact(101, "B")),
                        (r3, contact(102, "C")),
                    ])
                });
            repo.expect_list_event_drivers()
                .times(1)
                .returning(|_| Ok(vec![fleet_entry(1, 10, 4), fleet_entry(2, 11, 4)]));
            repo.expect_replace_event_routes()
                .withf(|event_id, routes| {
                    *event_id == 7
                        && routes.len() == 2
                        && routes[0].name == "Route 1 - Driver 1"
                        && routes[0].stops.len() == 2
                        && routes[0].stops[0].order == 1
                        && routes[0].stops[1].order == 2
                        && routes[1].name == "Route 2 - Driver 2"
                })
                .times(1)
                .returning(|_, routes| Ok(routes.len()));

            let report = generate_routes(&repo, 1, 7).expect("should generate");
            assert_eq!(report.routes_generated, 2);
            assert_eq!(report.total_stops, 3);
        }

        #[test]
        fn send_routes_counts_missing_driver_emails_as_failures() {
            let now = Utc::now().naive_utc();
            let event = Event {
                id: 7,
                church_id: 1,
                name: "Youth Conference".to_string(),
                starts_at: now,
                location: Some("Main Hall".to_string()),
                description: None,
                status: "upcoming".to_string(),
                created_at: now,
                updated_at: now,
            };

            let route = |id: i32, driver_id: i32| TransportRoute {
                id,
                church_id: 1,
                event_id: 7,
                driver_id,
                vehicle_id: 10,
                name: format!("Route {id}"),
                stops: vec![],
                url: "https://www.google.com/maps".to_string(),
                created_at: now,
                updated_at: now,
            };

            let driver_with_email = Driver {
                id: 1,
                church_id: 1,
                name: "Has Email".to_string(),
                email: Some("driver@example.com".to_string()),
                phone: None,
                created_at: now,
            };
            let driver_without_email = Driver {
                id: 2,
                church_id: 1,
                name: "No Email".to_string(),
                email: None,
                phone: None,
                created_at: now,
            };
            let vehicle = Vehicle {
                id: 10,
                church_id: 1,
                make: "Ford".to_string(),
                model: "Transit".to_string(),
                license_plate: "P1".to_string(),
                capacity: 4,
                status: "available".to_string(),
                created_at: now,
            };

            let mut repo = MockRepository::new();
            let v = vehicle.clone();
            repo.expect_list_routes_with_fleet()
                .times(1)
                .returning(move |_| {
                    Ok(vec![
                        (route(1, 1), driver_with_email.clone(), v.clone()),
                        (route(2, 2), driver_without_email.clone(), v.clone()),
                    ])
                });
            repo.expect_get_event_by_id()
                .times(1)
                .returning(move |_, _| Ok(Some(event.clone())));
            repo.expect_enqueue_emails()
                .withf(|emails| {
                    emails.len() == 1
                        && emails[0].to_address == "driver@example.com"
                        && emails[0].email_type == EmailType::Events
                })
                .times(1)
                .returning(|emails| Ok(emails.len()));

            let report = send_routes(&repo, 1, 7).expect("should send");
            assert_eq!(report.emails_sent, 1);
            assert_eq!(report.emails_failed, 1);
            assert_eq!(report.total_routes, 2);
        }
    }
}
