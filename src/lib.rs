use std::sync::Arc;

use actix_cors::Cors;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::relay::ZmqRelay;
use crate::repository::DieselRepository;
use crate::routes::comms::{
    add_campaign, add_template, campaign_metrics, cancel_campaign, comms_metrics,
    delete_campaign, delete_template, list_campaigns, list_templates, save_template,
    schedule_campaign, send_campaign, show_campaign, show_template,
};
use crate::routes::contacts::{
    add_contact, contacts_upload, delete_contact, list_contacts, save_contact, show_contact,
};
use crate::routes::events::{
    add_event, check_in, delete_event, export_attendance, export_events, list_attendance,
    list_events, save_event, show_event,
};
use crate::routes::groups::{
    add_group, add_group_member, delete_group, list_groups, remove_group_member, save_group,
    show_group,
};
use crate::routes::newsletter::{
    add_issue, add_subscriber, list_issues, list_subscribers, send_issue, sync_subscribers,
    unsubscribe,
};
use crate::routes::notifications::{
    list_notifications, mark_read, save_preference, send_notification,
};
use crate::routes::reports::{add_expense, add_transaction, financial_report, people_report};
use crate::routes::settings::{
    add_custom_field, delete_custom_field, list_custom_fields, save_notification_settings,
    show_notification_settings,
};
use crate::routes::transport::{
    add_driver, add_transport_request, add_vehicle, auto_assign, generate_routes, list_drivers,
    list_transport_requests, list_vehicles, roster_driver, send_routes, transport_routes,
    transport_summary, vehicle_capacity,
};
use crate::routes::visits::{
    add_visit, convert_visit, list_visits, message_visit, save_visit, show_visit,
};

pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod relay;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "church";
pub const SERVICE_ADMIN_ROLE: &str = "church_admin";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Start the background ZeroMQ publishers used for outbound delivery.
    let zmq_relay = ZmqRelay::start(
        &server_config.zmq_emailer_pub,
        &server_config.zmq_push_pub,
    )
    .map_err(|e| std::io::Error::other(format!("Failed to start relay publisher: {e}")))?;
    let zmq_relay = Arc::new(zmq_relay);

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    let secret_key = Key::from(server_config.secret.as_bytes());
    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(
                web::scope("/api")
                    .wrap(RedirectUnauthorized)
                    .service(list_contacts)
                    .service(add_contact)
                    .service(contacts_upload)
                    .service(show_contact)
                    .service(save_contact)
                    .service(delete_contact)
                    .service(list_custom_fields)
                    .service(add_custom_field)
                    .service(delete_custom_field)
                    .service(show_notification_settings)
                    .service(save_notification_settings)
                    .service(list_templates)
                    .service(add_template)
                    .service(show_template)
                    .service(save_template)
                    .service(delete_template)
                    .service(list_campaigns)
                    .service(add_campaign)
                    .service(comms_metrics)
                    .service(show_campaign)
                    .service(delete_campaign)
                    .service(schedule_campaign)
                    .service(cancel_campaign)
                    .service(send_campaign)
                    .service(campaign_metrics)
                    .service(list_subscribers)
                    .service(add_subscriber)
                    .service(sync_subscribers)
                    .service(unsubscribe)
                    .service(list_issues)
                    .service(add_issue)
                    .service(send_issue)
                    .service(list_events)
                    .service(add_event)
                    .service(export_events)
                    .service(transport_summary)
                    .service(transport_routes)
                    .service(list_attendance)
                    .service(export_attendance)
                    .service(show_event)
                    .service(save_event)
                    .service(delete_event)
                    .service(check_in)
                    .service(list_groups)
                    .service(add_group)
                    .service(show_group)
                    .service(save_group)
                    .service(delete_group)
                    .service(add_group_member)
                    .service(remove_group_member)
                    .service(list_visits)
                    .service(add_visit)
                    .service(show_visit)
                    .service(save_visit)
                    .service(convert_visit)
                    .service(message_visit)
                    .service(add_transaction)
                    .service(add_expense)
                    .service(financial_report)
                    .service(people_report)
                    .service(send_notification)
                    .service(list_notifications)
                    .service(mark_read)
                    .service(save_preference)
                    .service(list_transport_requests)
                    .service(add_transport_request)
                    .service(auto_assign)
                    .service(generate_routes)
                    .service(send_routes)
                    .service(vehicle_capacity)
                    .service(list_drivers)
                    .service(add_driver)
                    .service(list_vehicles)
                    .service(add_vehicle)
                    .service(roster_driver),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(zmq_relay.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
