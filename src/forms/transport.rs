use serde::Deserialize;
use validator::Validate;

use crate::domain::transport::{
    EventDriverStatus, NewDriver, NewEventDriver, NewTransportRequest, NewVehicle,
};

#[derive(Deserialize)]
/// Body for the three pipeline endpoints.
pub struct PipelineForm {
    pub event_id: i32,
}

#[derive(Deserialize, Validate)]
pub struct AddTransportRequestForm {
    pub event_id: i32,
    pub contact_id: i32,
    pub pickup_address: Option<String>,
}

impl AddTransportRequestForm {
    pub fn into_domain(self, church_id: i32) -> NewTransportRequest {
        NewTransportRequest {
            church_id,
            event_id: self.event_id,
            contact_id: self.contact_id,
            pickup_address: self
                .pickup_address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        }
    }
}

#[derive(Deserialize)]
pub struct TransportRequestListParams {
    pub event_id: i32,
}

#[derive(Deserialize)]
pub struct CapacityParams {
    pub event_id: Option<i32>,
}

#[derive(Deserialize, Validate)]
pub struct AddDriverForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AddDriverForm {
    pub fn into_domain(self, church_id: i32) -> NewDriver {
        NewDriver {
            church_id,
            name: self.name,
            email: self.email.map(|e| e.trim().to_lowercase()),
            phone: self.phone,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct AddVehicleForm {
    #[validate(length(min = 1))]
    pub make: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(length(min = 1))]
    pub license_plate: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "available".to_string()
}

impl AddVehicleForm {
    pub fn into_domain(self, church_id: i32) -> NewVehicle {
        NewVehicle {
            church_id,
            make: self.make,
            model: self.model,
            license_plate: self.license_plate,
            capacity: self.capacity,
            status: self.status,
        }
    }
}

#[derive(Deserialize)]
/// Rosters a driver (and the vehicle they bring) onto an event.
pub struct RosterDriverForm {
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: Option<i32>,
    #[serde(default = "default_roster_status")]
    pub status: EventDriverStatus,
}

fn default_roster_status() -> EventDriverStatus {
    EventDriverStatus::Assigned
}

impl From<RosterDriverForm> for NewEventDriver {
    fn from(form: RosterDriverForm) -> Self {
        NewEventDriver {
            event_id: form.event_id,
            driver_id: form.driver_id,
            vehicle_id: form.vehicle_id,
            status: form.status,
        }
    }
}
