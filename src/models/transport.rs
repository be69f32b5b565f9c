//! Diesel models for the transport fleet, ride requests and routes.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::transport::{
    Driver as DomainDriver, EventDriverStatus, NewDriver as DomainNewDriver,
    NewEventDriver as DomainNewEventDriver, NewTransportRequest as DomainNewTransportRequest,
    NewTransportRoute as DomainNewTransportRoute, NewVehicle as DomainNewVehicle, RequestStatus,
    RouteStop, TransportRequest as DomainTransportRequest, TransportRoute as DomainTransportRoute,
    Vehicle as DomainVehicle,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::drivers)]
pub struct Driver {
    pub id: i32,
    pub church_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::drivers)]
pub struct NewDriver<'a> {
    pub church_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::vehicles)]
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::vehicles)]
pub struct NewVehicle<'a> {
    pub church_id: i32,
    pub make: &'a str,
    pub model: &'a str,
    pub license_plate: &'a str,
    pub capacity: i32,
    pub status: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::event_drivers)]
#[diesel(primary_key(event_id, driver_id))]
pub struct EventDriver {
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: Option<i32>,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::event_drivers)]
pub struct NewEventDriver {
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: Option<i32>,
    pub status: String,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::transport_requests)]
pub struct TransportRequest {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub pickup_address: Option<String>,
    pub status: String,
    pub assigned_driver: Option<i32>,
    pub assigned_vehicle: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transport_requests)]
pub struct NewTransportRequest<'a> {
    pub church_id: i32,
    pub event_id: i32,
    pub contact_id: i32,
    pub pickup_address: Option<&'a str>,
}

/// Changeset applied when the auto-assigner places a request on a vehicle.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::transport_requests)]
pub struct AssignTransportRequest {
    pub status: String,
    pub assigned_driver: i32,
    pub assigned_vehicle: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::transport_routes)]
pub struct TransportRoute {
    pub id: i32,
    pub church_id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: i32,
    pub name: String,
    pub waypoints: String,
    pub url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::transport_routes)]
pub struct NewTransportRoute<'a> {
    pub church_id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub vehicle_id: i32,
    pub name: &'a str,
    pub waypoints: String,
    pub url: &'a str,
}

impl From<Driver> for DomainDriver {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            church_id: driver.church_id,
            name: driver.name,
            email: driver.email,
            phone: driver.phone,
            created_at: driver.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewDriver> for NewDriver<'a> {
    fn from(driver: &'a DomainNewDriver) -> Self {
        Self {
            church_id: driver.church_id,
            name: &driver.name,
            email: driver.email.as_deref(),
            phone: driver.phone.as_deref(),
        }
    }
}

impl From<Vehicle> for DomainVehicle {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            church_id: vehicle.church_id,
            make: vehicle.make,
            model: vehicle.model,
            license_plate: vehicle.license_plate,
            capacity: vehicle.capacity,
            status: vehicle.status,
            created_at: vehicle.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewVehicle> for NewVehicle<'a> {
    fn from(vehicle: &'a DomainNewVehicle) -> Self {
        Self {
            church_id: vehicle.church_id,
            make: &vehicle.make,
            model: &vehicle.model,
            license_plate: &vehicle.license_plate,
            capacity: vehicle.capacity,
            status: &vehicle.status,
        }
    }
}

impl EventDriver {
    pub fn status(&self) -> Result<EventDriverStatus, TypeConstraintError> {
        self.status.parse()
    }
}

impl From<&DomainNewEventDriver> for NewEventDriver {
    fn from(roster: &DomainNewEventDriver) -> Self {
        Self {
            event_id: roster.event_id,
            driver_id: roster.driver_id,
            vehicle_id: roster.vehicle_id,
            status: roster.status.to_string(),
        }
    }
}

impl TryFrom<TransportRequest> for DomainTransportRequest {
    type Error = TypeConstraintError;

    fn try_from(request: TransportRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: request.id,
            church_id: request.church_id,
            event_id: request.event_id,
            contact_id: request.contact_id,
            pickup_address: request.pickup_address,
            status: request.status.parse::<RequestStatus>()?,
            assigned_driver: request.assigned_driver,
            assigned_vehicle: request.assigned_vehicle,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewTransportRequest> for NewTransportRequest<'a> {
    fn from(request: &'a DomainNewTransportRequest) -> Self {
        Self {
            church_id: request.church_id,
            event_id: request.event_id,
            contact_id: request.contact_id,
            pickup_address: request.pickup_address.as_deref(),
        }
    }
}

impl TryFrom<TransportRoute> for DomainTransportRoute {
    type Error = TypeConstraintError;

    fn try_from(route: TransportRoute) -> Result<Self, Self::Error> {
        // Stops are stored as a JSON array in the waypoints column.
        let stops = serde_json::from_str::<Vec<RouteStop>>(&route.waypoints)
            .map_err(|_| TypeConstraintError::InvalidValue(route.waypoints.clone()))?;

        Ok(Self {
            id: route.id,
            church_id: route.church_id,
            event_id: route.event_id,
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            name: route.name,
            stops,
            url: route.url,
            created_at: route.created_at,
            updated_at: route.updated_at,
        })
    }
}

impl<'a> TryFrom<&'a DomainNewTransportRoute> for NewTransportRoute<'a> {
    type Error = TypeConstraintError;

    fn try_from(route: &'a DomainNewTransportRoute) -> Result<Self, Self::Error> {
        let waypoints = serde_json::to_string(&route.stops)
            .map_err(|e| TypeConstraintError::InvalidValue(e.to_string()))?;

        Ok(Self {
            church_id: route.church_id,
            event_id: route.event_id,
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            name: &route.name,
            waypoints,
            url: &route.url,
        })
    }
}
