//! Ride requests, the driver/vehicle fleet and generated pickup routes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::text_enum;

text_enum!(
    RequestStatus {
        Pending => "pending",
        Assigned => "assigned",
        InTransit => "in_transit",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

text_enum!(
    /// A driver's standing for a particular event.
    EventDriverStatus {
        Assigned => "assigned",
        Confirmed => "confirmed",
        Declined => "declined",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewDriver {
    pub church_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: i32,
    pub church_id: i32,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub capacity: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl Vehicle {
    pub fn label(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewVehicle {
    pub church_id: i32,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub capacity: i32,
    pub status: String,
}

/// A driver (with the vehicle they bring) rostered onto an event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventDriver {
    pub event_id: i32,
    pub driver: Driver,
    pub vehicle: Option<Vehicle>,
    pub status: EventDriverStatus,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEventDriver {
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: Option<i32>,
    pub status: EventDriverStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransportRequest {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub pickup_address: Option<String>,
    pub status: RequestStatus,
    pub assigned_driver: Option<i32>,
    pub assigned_vehicle: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTransportRequest {
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub pickup_address: Option<String>,
}

/// One pickup on a driver's route, in driving order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteStop {
    pub order: usize,
    pub address: String,
    pub passenger: String,
    pub phone: Option<String>,
    pub contact_id: i32,
    pub request_id: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransportRoute {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: i32,
    pub name: String,
    pub stops: Vec<RouteStop>,
    pub url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTransportRoute {
    pub church_id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: i32,
    pub name: String,
    pub stops: Vec<RouteStop>,
    pub url: String,
}

/// Snapshot the dashboard polls to decide which pipeline step is active.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TransportSummary {
    pub total_requests: i64,
    pub assigned_requests: i64,
    pub available_vehicles: i64,
    pub total_capacity: i64,
    pub routes_generated: i64,
}

/// Per-vehicle utilization row for the capacity dashboard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VehicleUtilization {
    pub vehicle: Vehicle,
    pub assigned: i64,
    pub remaining: i64,
    pub utilization_percent: i64,
}
