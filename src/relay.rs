//! Background publisher for the delivery relays.
//!
//! Outbound mail and push payloads are serialized to JSON and published on a
//! PUB socket; the delivery relays subscribe and own the actual SMTP/push
//! legwork. The socket lives on its own thread so request handlers never
//! block on the wire.

use std::sync::{Mutex, mpsc};
use std::thread;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("zmq error: {0}")]
    Socket(#[from] zmq::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("relay sender thread is gone")]
    ChannelClosed,
}

/// Outbound side of the delivery contract. The production implementation
/// publishes over ZeroMQ; tests substitute an in-memory collector.
pub trait OutboundRelay {
    fn publish_email(
        &self,
        message: &crate::models::relay::RelayEmailMessage,
    ) -> Result<(), RelayError>;

    fn publish_push(
        &self,
        message: &crate::models::relay::RelayPushMessage,
    ) -> Result<(), RelayError>;

    fn publish_text(
        &self,
        message: &crate::models::relay::RelayTextMessage,
    ) -> Result<(), RelayError>;
}

/// PUB sockets for the email and push relays.
pub struct ZmqRelay {
    emailer: RelaySender,
    push: RelaySender,
}

impl ZmqRelay {
    pub fn start(emailer_endpoint: &str, push_endpoint: &str) -> Result<Self, RelayError> {
        Ok(Self {
            emailer: RelaySender::start(emailer_endpoint)?,
            push: RelaySender::start(push_endpoint)?,
        })
    }
}

impl OutboundRelay for ZmqRelay {
    fn publish_email(
        &self,
        message: &crate::models::relay::RelayEmailMessage,
    ) -> Result<(), RelayError> {
        self.emailer.send(message)
    }

    fn publish_push(
        &self,
        message: &crate::models::relay::RelayPushMessage,
    ) -> Result<(), RelayError> {
        self.push.send(message)
    }

    fn publish_text(
        &self,
        message: &crate::models::relay::RelayTextMessage,
    ) -> Result<(), RelayError> {
        // Text messages ride the emailer socket; the relay dispatches on the
        // payload's channel field.
        self.emailer.send(message)
    }
}

/// Handle to a PUB socket running on a dedicated thread. The channel sender
/// sits behind a mutex so the handle can be shared across server workers.
pub struct RelaySender {
    tx: Mutex<mpsc::Sender<Vec<u8>>>,
}

impl RelaySender {
    /// Binds a PUB socket to `endpoint` and starts the forwarding thread.
    pub fn start(endpoint: &str) -> Result<Self, RelayError> {
        let context = zmq::Context::new();
        let socket = context.socket(zmq::PUB)?;
        socket.bind(endpoint)?;

        let (tx, rx) = mpsc::channel::<Vec<u8>>();

        thread::spawn(move || {
            while let Ok(payload) = rx.recv() {
                if let Err(e) = socket.send(&payload, 0) {
                    log::error!("Failed to publish relay message: {e}");
                }
            }
        });

        Ok(Self { tx: Mutex::new(tx) })
    }

    /// Serializes the message and hands it to the publisher thread.
    pub fn send<T: Serialize>(&self, message: &T) -> Result<(), RelayError> {
        let payload = serde_json::to_vec(message)?;
        let tx = self.tx.lock().map_err(|_| RelayError::ChannelClosed)?;
        tx.send(payload).map_err(|_| RelayError::ChannelClosed)
    }
}
