//! Reference-data rows, one struct per lookup table.

use autobazaar_core::types::RefId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Make {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Model {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
    pub make_id: RefId,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: RefId,
    #[serde(rename = "start")]
    pub start_year: i32,
    #[serde(rename = "end")]
    pub end_year: i32,
    pub model_id: RefId,
}

/// A version with its factory defaults.
///
/// `transmission`, `fuel_type` and `engine_capacity` are `0` when the version
/// has no details row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Version {
    pub id: RefId,
    pub gen_id: RefId,
    pub model_id: RefId,
    pub name: String,
    pub name_ur: String,
    pub transmission: RefId,
    pub fuel_type: RefId,
    pub engine_capacity: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Color {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
    pub hex_code: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transmission {
    pub id: RefId,
    pub name: String,
    pub is_auto: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BodyType {
    pub id: RefId,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FuelType {
    pub id: RefId,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
    pub popular: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Area {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
    #[serde(rename = "city_id")]
    pub city: RefId,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: RefId,
    pub name: String,
    pub name_ur: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
}

/// Every row of one reference category, ready to serialize as a JSON array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReferenceRows {
    Makes(Vec<Make>),
    Models(Vec<Model>),
    Generations(Vec<Generation>),
    Versions(Vec<Version>),
    Colors(Vec<Color>),
    Transmissions(Vec<Transmission>),
    BodyTypes(Vec<BodyType>),
    FuelTypes(Vec<FuelType>),
    Cities(Vec<City>),
    Areas(Vec<Area>),
    Registrations(Vec<Registration>),
}

impl ReferenceRows {
    pub fn len(&self) -> usize {
        match self {
            ReferenceRows::Makes(rows) => rows.len(),
            ReferenceRows::Models(rows) => rows.len(),
            ReferenceRows::Generations(rows) => rows.len(),
            ReferenceRows::Versions(rows) => rows.len(),
            ReferenceRows::Colors(rows) => rows.len(),
            ReferenceRows::Transmissions(rows) => rows.len(),
            ReferenceRows::BodyTypes(rows) => rows.len(),
            ReferenceRows::FuelTypes(rows) => rows.len(),
            ReferenceRows::Cities(rows) => rows.len(),
            ReferenceRows::Areas(rows) => rows.len(),
            ReferenceRows::Registrations(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
