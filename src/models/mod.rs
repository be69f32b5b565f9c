pub mod auth;
pub mod comms;
pub mod config;
pub mod contact;
pub mod custom_field;
pub mod email_queue;
pub mod event;
pub mod finance;
pub mod group;
pub mod newsletter;
pub mod notification;
pub mod relay;
pub mod transport;
pub mod visit;
