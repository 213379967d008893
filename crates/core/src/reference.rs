//! Reference-data categories and the "zero means unset" request convention.

use std::fmt;

/// Serde adapter for optional reference ids.
///
/// Clients send `0` (or omit the field) for "not set". Inside the domain the
/// value is `None`; it becomes `0` again only when serialized.
///
/// ```
/// use autobazaar_core::types::RefId;
///
/// #[derive(serde::Deserialize, serde::Serialize)]
/// struct Payload {
///     #[serde(default, with = "autobazaar_core::reference::sentinel")]
///     area: Option<RefId>,
/// }
///
/// let p: Payload = serde_json::from_str(r#"{"area": 0}"#).unwrap();
/// assert_eq!(p.area, None);
/// assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"area":0}"#);
/// ```
pub mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::RefId;

    pub fn serialize<S: Serializer>(value: &Option<RefId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RefId>, D::Error> {
        let raw = Option::<RefId>::deserialize(deserializer)?;
        Ok(raw.filter(|id| *id != 0))
    }
}

/// Every read-only lookup table exposed by the reference-data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCategory {
    Makes,
    Models,
    Generations,
    Versions,
    Colors,
    Transmissions,
    BodyTypes,
    FuelTypes,
    Cities,
    Areas,
    Registrations,
}

impl ReferenceCategory {
    pub const ALL: [ReferenceCategory; 11] = [
        ReferenceCategory::Makes,
        ReferenceCategory::Models,
        ReferenceCategory::Generations,
        ReferenceCategory::Versions,
        ReferenceCategory::Colors,
        ReferenceCategory::Transmissions,
        ReferenceCategory::BodyTypes,
        ReferenceCategory::FuelTypes,
        ReferenceCategory::Cities,
        ReferenceCategory::Areas,
        ReferenceCategory::Registrations,
    ];

    /// URL path segment, also used as the snapshot file stem.
    pub fn slug(self) -> &'static str {
        match self {
            ReferenceCategory::Makes => "makes",
            ReferenceCategory::Models => "models",
            ReferenceCategory::Generations => "generations",
            ReferenceCategory::Versions => "versions",
            ReferenceCategory::Colors => "colors",
            ReferenceCategory::Transmissions => "transmissions",
            ReferenceCategory::BodyTypes => "body_types",
            ReferenceCategory::FuelTypes => "fuel_types",
            ReferenceCategory::Cities => "cities",
            ReferenceCategory::Areas => "areas",
            ReferenceCategory::Registrations => "registrations",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    /// File name of the pretty-printed JSON snapshot for this category.
    pub fn snapshot_file_name(self) -> String {
        format!("{}.json", self.slug())
    }
}

impl fmt::Display for ReferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
