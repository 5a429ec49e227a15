//! Contacts, locations, venues and dice

use serde::Serialize;
use serde_json::Value;

use crate::decode::{Decode, DecodeError, Object};

/// Point on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    /// Radius of uncertainty in meters, 0-1500
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_accuracy: Option<f64>,
    /// Seconds the live location can be updated for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity_alert_radius: Option<u32>,
}

impl Decode for Location {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Location", value)?;
        Ok(Self {
            longitude: obj.required("longitude")?,
            latitude: obj.required("latitude")?,
            horizontal_accuracy: obj.optional("horizontal_accuracy"),
            live_period: obj.optional("live_period"),
            heading: obj.optional("heading"),
            proximity_alert_radius: obj.optional("proximity_alert_radius"),
        })
    }
}

/// Phone contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Set when the contact is a known Telegram user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcard: Option<String>,
}

impl Decode for Contact {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Contact", value)?;
        Ok(Self {
            phone_number: obj.required("phone_number")?,
            first_name: obj.required("first_name")?,
            last_name: obj.optional("last_name"),
            user_id: obj.optional("user_id"),
            vcard: obj.optional("vcard"),
        })
    }
}

/// Named place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub location: Location,
    pub title: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foursquare_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foursquare_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_place_type: Option<String>,
}

impl Decode for Venue {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Venue", value)?;
        Ok(Self {
            location: obj.required_nested("location")?,
            title: obj.required("title")?,
            address: obj.required("address")?,
            foursquare_id: obj.optional("foursquare_id"),
            foursquare_type: obj.optional("foursquare_type"),
            google_place_id: obj.optional("google_place_id"),
            google_place_type: obj.optional("google_place_type"),
        })
    }
}

/// Animated emoji with a random value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dice {
    pub emoji: String,
    /// 1-6 for dice and darts, 1-5 for basketball and football, 1-64 for slots
    pub value: u8,
}

impl Decode for Dice {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let obj = Object::new("Dice", value)?;
        Ok(Self {
            emoji: obj.required("emoji")?,
            value: obj.required("value")?,
        })
    }
}
