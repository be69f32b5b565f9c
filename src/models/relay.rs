//! Wire models published to the delivery relays.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single email handed to the delivery relay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RelayEmailMessage {
    pub id: Uuid,
    /// Account address the relay should send from.
    pub sender: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
    pub metadata: Value,
}

/// A push notification batch handed to the mobile relay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RelayPushMessage {
    pub user_ids: Vec<String>,
    pub title: String,
    pub body: String,
    pub data: Value,
}

/// A text message handed to the SMS/WhatsApp relay.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RelayTextMessage {
    pub channel: String,
    pub to: String,
    pub body: String,
}
