use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded request body, before it is checked against a field schema.
pub type Payload = HashMap<String, String>;

pub const ID_KEY: &str = "cars_id";
pub const FIELD_KEYS: [&str; 6] = [
    "make",
    "model",
    "licence_plate",
    "owner_name",
    "date",
    "status",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Car {
    #[serde(rename = "carsid")]
    #[sqlx(rename = "carsid")]
    pub id: String,
    pub make: String,
    pub model: String,
    #[serde(rename = "licenceplate")]
    #[sqlx(rename = "licenceplate")]
    pub licence_plate: String,
    #[serde(rename = "ownername")]
    #[sqlx(rename = "ownername")]
    pub owner_name: String,
    /// `dd-mm-yyyy`, kept as opaque text.
    pub date: String,
    pub status: String,
}

/// Every column of a car except its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFields {
    pub make: String,
    pub model: String,
    pub licence_plate: String,
    pub owner_name: String,
    pub date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub id: String,
    pub fields: CarFields,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error(
        "payload keys do not match: missing [{}], unexpected [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    Fields {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Rejects the payload unless its key set is exactly `expected`.
fn check_keys(payload: &Payload, expected: &[&str]) -> Result<(), PayloadError> {
    let mut missing: Vec<String> = expected
        .iter()
        .filter(|key| !payload.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    let mut unexpected: Vec<String> = payload
        .keys()
        .filter(|key| !expected.contains(&key.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }
    missing.sort();
    unexpected.sort();
    Err(PayloadError::Fields {
        missing,
        unexpected,
    })
}

fn take(payload: &mut Payload, key: &str) -> String {
    payload.remove(key).unwrap_or_default()
}

impl CarFields {
    pub fn from_payload(mut payload: Payload) -> Result<Self, PayloadError> {
        check_keys(&payload, &FIELD_KEYS)?;
        Ok(Self::take_from(&mut payload))
    }

    fn take_from(payload: &mut Payload) -> Self {
        CarFields {
            make: take(payload, "make"),
            model: take(payload, "model"),
            licence_plate: take(payload, "licence_plate"),
            owner_name: take(payload, "owner_name"),
            date: take(payload, "date"),
            status: take(payload, "status"),
        }
    }

    pub fn into_car(self, id: String) -> Car {
        Car {
            id,
            make: self.make,
            model: self.model,
            licence_plate: self.licence_plate,
            owner_name: self.owner_name,
            date: self.date,
            status: self.status,
        }
    }
}

impl NewCar {
    pub fn from_payload(mut payload: Payload) -> Result<Self, PayloadError> {
        let mut expected = vec![ID_KEY];
        expected.extend_from_slice(&FIELD_KEYS);
        check_keys(&payload, &expected)?;

        let id = take(&mut payload, ID_KEY);
        if id.trim().is_empty() {
            return Err(PayloadError::Empty(ID_KEY));
        }
        Ok(NewCar {
            id,
            fields: CarFields::take_from(&mut payload),
        })
    }

    pub fn into_car(self) -> Car {
        self.fields.into_car(self.id)
    }
}
