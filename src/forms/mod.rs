pub mod comms;
pub mod contact;
pub mod event;
pub mod finance;
pub mod group;
pub mod newsletter;
pub mod notification;
pub mod settings;
pub mod transport;
pub mod visit;
