pub mod comms;
pub mod contact;
pub mod custom_field;
pub mod email;
pub mod event;
pub mod finance;
pub mod group;
pub mod newsletter;
pub mod notification;
pub mod transport;
pub mod types;
pub mod visit;
