//! # CloudEvent Envelope
//!
//! The envelope every console event shares, independent of its payload.
//! Field names follow the wire format exactly (`specversion`, `dataschema`,
//! `redhatorgid`, ...), only `type` is renamed because it is a Rust keyword.
//!
//! Optional fields are skipped when `None` so that a serialized event never
//! carries `null` for a field the schema types as `string`. Members the
//! envelope does not name (CloudEvents extension attributes such as
//! `traceparent`) are kept in [`CloudEvent::extensions`] and written back.

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::CoreError;

/// CloudEvents specification version emitted by [`CloudEvent::new`].
pub const SPEC_VERSION: &str = "1.0.2";

/// A console cloud event with payload type `D`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent<D> {
    /// Event identifier, unique per `source`.
    pub id: String,

    /// Identifies the context in which the event happened.
    pub source: String,

    /// CloudEvents specification version.
    pub specversion: String,

    /// Event type, e.g. `com.redhat.console.notifications.new-event`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// URI of the schema `data` adheres to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataschema: Option<String>,

    /// Subject of the event in the context of the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// When the occurrence happened.
    pub time: DateTime<FixedOffset>,

    /// Organization the event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redhatorgid: Option<String>,

    /// Legacy account number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redhataccount: Option<String>,

    /// Console bundle that produced the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redhatconsolebundle: Option<String>,

    /// Event payload.
    pub data: D,

    /// Extension attributes, in wire form.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// The default envelope: payload left as a generic JSON tree.
pub type ConsoleCloudEvent = CloudEvent<Value>;

impl<D> CloudEvent<D> {
    /// Create an event with a fresh UUIDv4 id, the current time and the
    /// current CloudEvents version.
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: D) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            specversion: SPEC_VERSION.to_string(),
            event_type: event_type.into(),
            dataschema: None,
            subject: None,
            time: Utc::now().fixed_offset(),
            redhatorgid: None,
            redhataccount: None,
            redhatconsolebundle: None,
            data,
            extensions: Map::new(),
        }
    }

    /// Replace the payload, keeping the envelope.
    pub fn map_data<E>(self, f: impl FnOnce(D) -> E) -> CloudEvent<E> {
        CloudEvent {
            id: self.id,
            source: self.source,
            specversion: self.specversion,
            event_type: self.event_type,
            dataschema: self.dataschema,
            subject: self.subject,
            time: self.time,
            redhatorgid: self.redhatorgid,
            redhataccount: self.redhataccount,
            redhatconsolebundle: self.redhatconsolebundle,
            data: f(self.data),
            extensions: self.extensions,
        }
    }
}

impl CloudEvent<Value> {
    /// Bind the generic payload to a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Payload`] if `data` does not have the shape of `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Convert into an envelope with a typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Payload`] if `data` does not have the shape of `T`.
    pub fn into_typed<T: DeserializeOwned>(mut self) -> Result<CloudEvent<T>, CoreError> {
        let data: T = serde_json::from_value(std::mem::take(&mut self.data))?;
        Ok(self.map_data(|_| data))
    }
}
