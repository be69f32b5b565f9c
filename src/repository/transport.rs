//! Repository implementation for the transport pipeline.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::contact::Contact;
use crate::domain::transport::{
    Driver, EventDriver, EventDriverStatus, NewDriver, NewEventDriver, NewTransportRequest,
    NewTransportRoute, NewVehicle, RequestStatus, TransportRequest, TransportRoute,
    TransportSummary, Vehicle, VehicleUtilization,
};
use crate::models::contact::Contact as DbContact;
use crate::models::transport::{
    AssignTransportRequest, Driver as DbDriver, EventDriver as DbEventDriver,
    NewDriver as DbNewDriver, NewEventDriver as DbNewEventDriver,
    NewTransportRequest as DbNewTransportRequest, NewTransportRoute as DbNewTransportRoute,
    NewVehicle as DbNewVehicle, TransportRequest as DbTransportRequest,
    TransportRoute as DbTransportRoute, Vehicle as DbVehicle,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TransportReader, TransportRequestQuery,
    TransportWriter};

impl TransportReader for DieselRepository {
    fn list_transport_requests(
        &self,
        query: TransportRequestQuery,
    ) -> RepositoryResult<Vec<TransportRequest>> {
        use crate::schema::transport_requests;

        let mut conn = self.conn()?;

        let mut items = transport_requests::table
            .filter(transport_requests::event_id.eq(query.event_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status) = &query.status {
            items = items.filter(transport_requests::status.eq(status.to_string()));
        }
        if query.only_unassigned {
            items = items
                .filter(transport_requests::assigned_driver.is_null())
                .filter(transport_requests::assigned_vehicle.is_null());
        }

        items
            .order(transport_requests::id.asc())
            .load::<DbTransportRequest>(&mut conn)?
            .into_iter()
            .map(|r| TransportRequest::try_from(r).map_err(RepositoryError::from))
            .collect()
    }

    fn list_requests_with_contacts(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(TransportRequest, Contact)>> {
        use crate::schema::{contacts, transport_requests};

        let mut conn = self.conn()?;
        let rows = transport_requests::table
            .inner_join(contacts::table)
            .filter(transport_requests::event_id.eq(event_id))
            .order(transport_requests::id.asc())
            .load::<(DbTransportRequest, DbContact)>(&mut conn)?;

        rows.into_iter()
            .map(|(request, contact)| {
                let request =
                    TransportRequest::try_from(request).map_err(RepositoryError::from)?;
                let contact = Contact::try_from(contact).map_err(RepositoryError::from)?;
                Ok((request, contact))
            })
            .collect()
    }

    fn list_event_drivers(&self, event_id: i32) -> RepositoryResult<Vec<EventDriver>> {
        use crate::schema::{drivers, event_drivers, vehicles};

        let mut conn = self.conn()?;

        let roster = event_drivers::table
            .filter(event_drivers::event_id.eq(event_id))
            .load::<DbEventDriver>(&mut conn)?;

        let driver_ids: Vec<i32> = roster.iter().map(|r| r.driver_id).collect();
        let vehicle_ids: Vec<i32> = roster.iter().filter_map(|r| r.vehicle_id).collect();

        let driver_map: HashMap<i32, DbDriver> = drivers::table
            .filter(drivers::id.eq_any(driver_ids))
            .load::<DbDriver>(&mut conn)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let vehicle_map: HashMap<i32, DbVehicle> = vehicles::table
            .filter(vehicles::id.eq_any(vehicle_ids))
            .load::<DbVehicle>(&mut conn)?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        roster
            .into_iter()
            .filter_map(|entry| {
                let driver = driver_map.get(&entry.driver_id)?.clone();
                let vehicle = entry
                    .vehicle_id
                    .and_then(|id| vehicle_map.get(&id))
                    .cloned();
                Some((entry, driver, vehicle))
            })
            .map(|(entry, driver, vehicle)| {
                let status: EventDriverStatus =
                    entry.status().map_err(RepositoryError::from)?;
                Ok(EventDriver {
                    event_id: entry.event_id,
                    driver: driver.into(),
                    vehicle: vehicle.map(Into::into),
                    status,
                })
            })
            .collect()
    }

    fn transport_summary(&self, event_id: i32) -> RepositoryResult<TransportSummary> {
        use crate::schema::{transport_requests, transport_routes};

        let mut conn = self.conn()?;

        let total_requests = transport_requests::table
            .filter(transport_requests::event_id.eq(event_id))
            .filter(transport_requests::status.ne(RequestStatus::Cancelled.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let assigned_requests = transport_requests::table
            .filter(transport_requests::event_id.eq(event_id))
            .filter(transport_requests::status.eq(RequestStatus::Assigned.to_string()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let routes_generated = transport_routes::table
            .filter(transport_routes::event_id.eq(event_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let fleet = self.list_event_drivers(event_id)?;
        let vehicles: Vec<&Vehicle> = fleet
            .iter()
            .filter(|entry| entry.status != EventDriverStatus::Declined)
            .filter_map(|entry| entry.vehicle.as_ref())
            .collect();

        Ok(TransportSummary {
            total_requests,
            assigned_requests,
            available_vehicles: vehicles.len() as i64,
            total_capacity: vehicles.iter().map(|v| v.capacity as i64).sum(),
            routes_generated,
        })
    }

    fn list_routes(&self, event_id: i32) -> RepositoryResult<Vec<TransportRoute>> {
        use crate::schema::transport_routes;

        let mut conn = self.conn()?;
        transport_routes::table
            .filter(transport_routes::event_id.eq(event_id))
            .order(transport_routes::id.asc())
            .load::<DbTransportRoute>(&mut conn)?
            .into_iter()
            .map(|r| TransportRoute::try_from(r).map_err(RepositoryError::from))
            .collect()
    }

    fn list_routes_with_fleet(
        &self,
        event_id: i32,
    ) -> RepositoryResult<Vec<(TransportRoute, Driver, Vehicle)>> {
        use crate::schema::{drivers, transport_routes, vehicles};

        let mut conn = self.conn()?;
        let routes = transport_routes::table
            .filter(transport_routes::event_id.eq(event_id))
            .order(transport_routes::id.asc())
            .load::<DbTransportRoute>(&mut conn)?;

        let driver_ids: Vec<i32> = routes.iter().map(|r| r.driver_id).collect();
        let vehicle_ids: Vec<i32> = routes.iter().map(|r| r.vehicle_id).collect();

        let driver_map: HashMap<i32, DbDriver> = drivers::table
            .filter(drivers::id.eq_any(driver_ids))
            .load::<DbDriver>(&mut conn)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let vehicle_map: HashMap<i32, DbVehicle> = vehicles::table
            .filter(vehicles::id.eq_any(vehicle_ids))
            .load::<DbVehicle>(&mut conn)?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        routes
            .into_iter()
            .filter_map(|route| {
                let driver = driver_map.get(&route.driver_id)?.clone();
                let vehicle = vehicle_map.get(&route.vehicle_id)?.clone();
                Some((route, driver, vehicle))
            })
            .map(|(route, driver, vehicle)| {
                let route = TransportRoute::try_from(route).map_err(RepositoryError::from)?;
                Ok((route, driver.into(), vehicle.into()))
            })
            .collect()
    }

    fn list_drivers(&self, church_id: i32) -> RepositoryResult<Vec<Driver>> {
        use crate::schema::drivers;

        let mut conn = self.conn()?;
        let drivers = drivers::table
            .filter(drivers::church_id.eq(church_id))
            .order(drivers::name.asc())
            .load::<DbDriver>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(drivers)
    }

    fn list_vehicles(&self, church_id: i32) -> RepositoryResult<Vec<Vehicle>> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let vehicles = vehicles::table
            .filter(vehicles::church_id.eq(church_id))
            .order(vehicles::id.asc())
            .load::<DbVehicle>(&mut conn)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(vehicles)
    }

    fn vehicle_utilization(
        &self,
        church_id: i32,
        event_id: Option<i32>,
    ) -> RepositoryResult<Vec<VehicleUtilization>> {
        use crate::schema::transport_requests;

        let mut conn = self.conn()?;

        let mut query = transport_requests::table
            .filter(transport_requests::assigned_vehicle.is_not_null())
            .filter(transport_requests::status.eq_any(vec![
                RequestStatus::Assigned.to_string(),
                RequestStatus::InTransit.to_string(),
            ]))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(event_id) = event_id {
            query = query.filter(transport_requests::event_id.eq(event_id));
        }

        let assignments: Vec<Option<i32>> = query
            .select(transport_requests::assigned_vehicle)
            .load::<Option<i32>>(&mut conn)?;

        let mut counts: HashMap<i32, i64> = HashMap::new();
        for vehicle_id in assignments.into_iter().flatten() {
            *counts.entry(vehicle_id).or_insert(0) += 1;
        }

        let utilization = self
            .list_vehicles(church_id)?
            .into_iter()
            .map(|vehicle| {
                let assigned = counts.get(&vehicle.id).copied().unwrap_or(0);
                let capacity = vehicle.capacity as i64;
                let remaining = (capacity - assigned).max(0);
                let utilization_percent = if capacity > 0 {
                    (assigned * 100) / capacity
                } else {
                    0
                };
                VehicleUtilization {
                    vehicle,
                    assigned,
                    remaining,
                    utilization_percent,
                }
            })
            .collect();

        Ok(utilization)
    }
}

impl TransportWriter for DieselRepository {
    fn create_transport_request(
        &self,
        request: &NewTransportRequest,
    ) -> RepositoryResult<TransportRequest> {
        use crate::schema::transport_requests;

        let mut conn = self.conn()?;
        let insertable: DbNewTransportRequest = request.into();

        let created = diesel::insert_into(transport_requests::table)
            .values(&insertable)
            .get_result::<DbTransportRequest>(&mut conn)?;

        TransportRequest::try_from(created).map_err(RepositoryError::from)
    }

    fn assign_transport_request(
        &self,
        request_id: i32,
        driver_id: i32,
        vehicle_id: i32,
    ) -> RepositoryResult<()> {
        use crate::schema::transport_requests;

        let mut conn = self.conn()?;
        let changes = AssignTransportRequest {
            status: RequestStatus::Assigned.to_string(),
            assigned_driver: driver_id,
            assigned_vehicle: vehicle_id,
            updated_at: Utc::now().naive_utc(),
        };

        diesel::update(transport_requests::table.find(request_id))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete_transport_requests(&self, request_ids: &[i32]) -> RepositoryResult<usize> {
        use crate::schema::transport_requests;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            transport_requests::table.filter(transport_requests::id.eq_any(request_ids)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }

    fn replace_event_routes(
        &self,
        event_id: i32,
        routes: &[NewTransportRoute],
    ) -> RepositoryResult<usize> {
        use crate::schema::transport_routes;

        let mut conn = self.conn()?;

        let insertables = routes
            .iter()
            .map(DbNewTransportRoute::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)?;

        conn.transaction::<usize, diesel::result::Error, _>(move |conn| {
            diesel::delete(
                transport_routes::table.filter(transport_routes::event_id.eq(event_id)),
            )
            .execute(conn)?;

            let inserted = diesel::insert_into(transport_routes::table)
                .values(insertables)
                .execute(conn)?;

            Ok(inserted)
        })
        .map_err(RepositoryError::from)
    }

    fn create_driver(&self, driver: &NewDriver) -> RepositoryResult<Driver> {
        use crate::schema::drivers;

        let mut conn = self.conn()?;
        let insertable: DbNewDriver = driver.into();

        let created = diesel::insert_into(drivers::table)
            .values(&insertable)
            .get_result::<DbDriver>(&mut conn)?;

        Ok(created.into())
    }

    fn create_vehicle(&self, vehicle: &NewVehicle) -> RepositoryResult<Vehicle> {
        use crate::schema::vehicles;

        let mut conn = self.conn()?;
        let insertable: DbNewVehicle = vehicle.into();

        let created = diesel::insert_into(vehicles::table)
            .values(&insertable)
            .get_result::<DbVehicle>(&mut conn)?;

        Ok(created.into())
    }

    fn roster_event_driver(&self, roster: &NewEventDriver) -> RepositoryResult<()> {
        use crate::schema::event_drivers;

        let mut conn = self.conn()?;
        let insertable: DbNewEventDriver = roster.into();

        diesel::insert_into(event_drivers::table)
            .values(&insertable)
            .on_conflict((event_drivers::event_id, event_drivers::driver_id))
            .do_update()
            .set((
                event_drivers::vehicle_id.eq(insertable.vehicle_id),
                event_drivers::status.eq(insertable.status.clone()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
