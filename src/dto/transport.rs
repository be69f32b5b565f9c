use serde::Serialize;

use crate::domain::contact::Contact;
use crate::domain::transport::{RequestStatus, TransportRequest, TransportSummary};

/// A ride request joined with its contact, as the dashboard table shows it.
#[derive(Serialize)]
pub struct TransportRequestView {
    pub id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub contact_name: String,
    pub phone: Option<String>,
    pub pickup_address: Option<String>,
    pub status: RequestStatus,
    pub assigned_driver: Option<i32>,
    pub assigned_vehicle: Option<i32>,
}

impl From<(TransportRequest, Contact)> for TransportRequestView {
    fn from((request, contact): (TransportRequest, Contact)) -> Self {
        Self {
            id: request.id,
            event_id: request.event_id,
            contact_id: contact.id,
            contact_name: contact.full_name(),
            phone: contact.phone,
            pickup_address: request.pickup_address,
            status: request.status,
            assigned_driver: request.assigned_driver,
            assigned_vehicle: request.assigned_vehicle,
        }
    }
}

/// Payload of the summary endpoint the dashboard polls between steps.
#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: TransportSummary,
    pub requests: Vec<TransportRequestView>,
}
